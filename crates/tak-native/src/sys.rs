// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raw declarations for the subset of the TAK C API the wrappers forward to.
//
// `TAK_RETURN` is a plain `int`. On Android `JNIEnv*` / `jobject` are the
// real JNI types; elsewhere the header aliases them to `void`, so both are
// declared as opaque pointers here.

#![allow(non_snake_case)]

use std::ffi::{c_char, c_int, c_void};

use crate::buffer::TakByteBuffer;

pub type TakReturn = c_int;

#[link(name = "tak")]
unsafe extern "C" {
    pub fn TakLib_initialize(
        working_path: *const c_char,
        license: *const c_char,
        jni_environment: *mut c_void,
        context: *mut c_void,
    ) -> TakReturn;
    pub fn TakLib_isInitialized() -> bool;
    pub fn TakLib_release() -> TakReturn;
    pub fn TakLib_reset() -> TakReturn;

    pub fn TakLib_getTAKVersion(version: *mut *mut c_char) -> TakReturn;
    pub fn TakLib_getBuildVersion(version: *mut *mut c_char) -> TakReturn;

    pub fn TakLib_register(user_hash: *const c_char) -> TakReturn;
    pub fn TakLib_isRegistered(error: *mut TakReturn) -> bool;
    pub fn TakLib_getTakIdentifier(tak_id: *mut *mut c_char) -> TakReturn;
    pub fn TakLib_checkIntegrity(safetynet_attestation: *const c_char) -> TakReturn;

    pub fn TakLib_getRootStatus() -> bool;
    pub fn TakLib_getAdvancedRootStatus() -> c_int;

    pub fn TakLib_createRuntimeCheckThread(time_interval: c_int) -> TakReturn;
    pub fn TakLib_stopRuntimeThread() -> TakReturn;
    pub fn TakLib_isRuntimeThreadActive(relaunch: bool) -> bool;

    pub fn TakLib_fileProtectorDecryptFromFile(
        file_name: *const c_char,
        extension: *const c_char,
        output: *mut TakByteBuffer,
    ) -> TakReturn;
    pub fn TakLib_fileProtectorEncrypt(input: TakByteBuffer, output: *mut TakByteBuffer) -> TakReturn;
    pub fn TakLib_fileProtectorDecrypt(input: TakByteBuffer, output: *mut TakByteBuffer) -> TakReturn;

    pub fn TakLib_storageCreate(storage_name: *const c_char) -> TakReturn;
    pub fn TakLib_storageWrite(
        storage_name: *const c_char,
        key: *const c_char,
        value: TakByteBuffer,
    ) -> TakReturn;
    pub fn TakLib_storageRead(
        storage_name: *const c_char,
        key: *const c_char,
        value: *mut TakByteBuffer,
    ) -> TakReturn;
    pub fn TakLib_storageDeleteEntry(storage_name: *const c_char, key: *const c_char) -> TakReturn;
    pub fn TakLib_storageDelete(storage_name: *const c_char) -> TakReturn;
}
