// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// C ABI consumed by the host's FFI layer.
//
// One function per TAK operation the host exposes. Each forwards to the
// matching `TakLib_*` call; buffer-producing calls hand back an owned copy
// (see `TakByteBufferResponse::copied_from`) and release the library's own
// allocation. Strings returned by the version and identifier calls are owned
// by the caller and must be released with `free()`.

#![allow(non_snake_case)]

use std::ffi::{c_char, c_int, c_void};
use std::ptr;

use tak_core::NativeStatus;

use crate::buffer::{IsRegisteredResponse, TakByteBuffer, TakByteBufferResponse, TakIdResponse};
use crate::sys;

/// Run a buffer-producing library call and wrap its output.
///
/// The library's output allocation is freed after the copy is taken.
fn buffer_call(call: impl FnOnce(*mut TakByteBuffer) -> sys::TakReturn) -> TakByteBufferResponse {
    let mut output = TakByteBuffer::empty();
    let status = NativeStatus(call(&mut output as *mut TakByteBuffer));
    // SAFETY: on success the library filled `output` with `length` bytes.
    let response = unsafe { TakByteBufferResponse::copied_from(status, &output) };
    if status == NativeStatus::SUCCESS {
        // SAFETY: `output.data` was allocated by the library with malloc and
        // ownership was handed to us.
        unsafe { output.free() };
    } else {
        tracing::debug!(%status, "TAK buffer call failed");
    }
    response
}

/// JNI environment and context for `TakLib_initialize`.
#[cfg(target_os = "android")]
fn platform_handles() -> (*mut c_void, *mut c_void) {
    crate::provider::raw_handles()
}

#[cfg(not(target_os = "android"))]
fn platform_handles() -> (*mut c_void, *mut c_void) {
    (ptr::null_mut(), ptr::null_mut())
}

/// Initialise the TAK library with its working directory and license file.
///
/// # Safety
/// `path` and `license` must be valid NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn native_initialize(path: *mut c_char, license: *mut c_char) -> i32 {
    let (environment, context) = platform_handles();
    // SAFETY: pointers are forwarded unchanged; validity is the caller's
    // contract.
    let status = unsafe { sys::TakLib_initialize(path, license, environment, context) };
    tracing::info!(status = %NativeStatus(status), "TakLib_initialize");
    status
}

#[unsafe(no_mangle)]
pub extern "C" fn native_release() {
    // The environment provider keeps its context until the host releases
    // the plugin; releasing the library does not drop it.
    // SAFETY: no arguments.
    let status = unsafe { sys::TakLib_release() };
    tracing::debug!(status = %NativeStatus(status), "TakLib_release");
}

#[unsafe(no_mangle)]
pub extern "C" fn native_reset() {
    // SAFETY: no arguments.
    let status = unsafe { sys::TakLib_reset() };
    tracing::debug!(status = %NativeStatus(status), "TakLib_reset");
}

/// # Safety
/// `user` must be a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn native_register(user: *mut c_char) -> i32 {
    // SAFETY: forwarded unchanged.
    unsafe { sys::TakLib_register(user) }
}

#[unsafe(no_mangle)]
pub extern "C" fn native_checkIntegrity() -> i32 {
    // SAFETY: a null attestation is accepted by the library.
    unsafe { sys::TakLib_checkIntegrity(ptr::null()) }
}

fn version_string(call: unsafe extern "C" fn(*mut *mut c_char) -> sys::TakReturn) -> *mut c_char {
    let mut version: *mut c_char = ptr::null_mut();
    // SAFETY: `version` is a valid out-pointer for the duration of the call.
    let status = NativeStatus(unsafe { call(&mut version) });
    if status != NativeStatus::SUCCESS {
        tracing::warn!(%status, "version query failed");
        return ptr::null_mut();
    }
    version
}

#[unsafe(no_mangle)]
pub extern "C" fn native_getTakVersion() -> *mut c_char {
    version_string(sys::TakLib_getTAKVersion)
}

#[unsafe(no_mangle)]
pub extern "C" fn native_getBuildVersion() -> *mut c_char {
    version_string(sys::TakLib_getBuildVersion)
}

#[unsafe(no_mangle)]
pub extern "C" fn native_isRegistered() -> IsRegisteredResponse {
    let mut return_code: c_int = NativeStatus::SUCCESS.code();
    // SAFETY: `return_code` is a valid out-pointer.
    let is_registered = unsafe { sys::TakLib_isRegistered(&mut return_code) };
    IsRegisteredResponse {
        is_registered,
        return_code,
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn native_isInitialized() -> bool {
    // SAFETY: no arguments.
    unsafe { sys::TakLib_isInitialized() }
}

#[unsafe(no_mangle)]
pub extern "C" fn native_getTakId() -> TakIdResponse {
    let mut tak_id: *mut c_char = ptr::null_mut();
    // SAFETY: `tak_id` is a valid out-pointer.
    let return_code = unsafe { sys::TakLib_getTakIdentifier(&mut tak_id) };
    TakIdResponse { tak_id, return_code }
}

#[unsafe(no_mangle)]
pub extern "C" fn native_getRootStatus() -> bool {
    // SAFETY: no arguments.
    unsafe { sys::TakLib_getRootStatus() }
}

/// Advanced root level as the raw `TAK_ROOT_STATUS` value.
#[unsafe(no_mangle)]
pub extern "C" fn native_getAdvancedRootStatus() -> c_int {
    // SAFETY: no arguments.
    let raw = unsafe { sys::TakLib_getAdvancedRootStatus() };
    tracing::debug!(level = ?crate::buffer::RootStatus::from_raw(raw), raw, "advanced root status");
    raw
}

#[unsafe(no_mangle)]
pub extern "C" fn native_createRuntimeCheckThread(time_interval: c_int) -> c_int {
    // SAFETY: plain integer argument.
    unsafe { sys::TakLib_createRuntimeCheckThread(time_interval) }
}

#[unsafe(no_mangle)]
pub extern "C" fn native_stopRuntimeThread() -> c_int {
    // SAFETY: no arguments.
    unsafe { sys::TakLib_stopRuntimeThread() }
}

#[unsafe(no_mangle)]
pub extern "C" fn native_isRuntimeThreadActive(relaunch: bool) -> bool {
    // SAFETY: plain boolean argument.
    unsafe { sys::TakLib_isRuntimeThreadActive(relaunch) }
}

/// # Safety
/// `file_name` and `extension` must be valid NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn native_fileProtectorDecryptFromFile(
    file_name: *mut c_char,
    extension: *mut c_char,
) -> TakByteBufferResponse {
    // SAFETY: string pointers forwarded unchanged; `out` is valid.
    buffer_call(|out| unsafe { sys::TakLib_fileProtectorDecryptFromFile(file_name, extension, out) })
}

/// # Safety
/// `input` must describe `length` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn native_fileProtectorEncrypt(input: TakByteBuffer) -> TakByteBufferResponse {
    // SAFETY: `input` is forwarded unchanged; `out` is valid.
    buffer_call(|out| unsafe { sys::TakLib_fileProtectorEncrypt(input, out) })
}

/// # Safety
/// `input` must describe `length` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn native_fileProtectorDecrypt(input: TakByteBuffer) -> TakByteBufferResponse {
    // SAFETY: `input` is forwarded unchanged; `out` is valid.
    buffer_call(|out| unsafe { sys::TakLib_fileProtectorDecrypt(input, out) })
}

/// # Safety
/// `storage_name` must be a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn native_storageCreate(storage_name: *mut c_char) -> i32 {
    // SAFETY: forwarded unchanged.
    unsafe { sys::TakLib_storageCreate(storage_name) }
}

/// # Safety
/// `storage_name` must be a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn native_storageDelete(storage_name: *mut c_char) -> i32 {
    // SAFETY: forwarded unchanged.
    unsafe { sys::TakLib_storageDelete(storage_name) }
}

/// # Safety
/// `storage_name` and `key` must be valid NUL-terminated strings and
/// `value` must point to `value_length` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn native_storageWrite(
    storage_name: *mut c_char,
    key: *mut c_char,
    value: *mut u8,
    value_length: c_int,
) -> i32 {
    if value_length < 0 {
        return NativeStatus::INVALID_PARAMETER.code();
    }
    let buffer = TakByteBuffer {
        data: value,
        length: value_length as u32,
    };
    // SAFETY: forwarded unchanged; the library only reads `buffer`.
    unsafe { sys::TakLib_storageWrite(storage_name, key, buffer) }
}

/// # Safety
/// `storage_name` and `key` must be valid NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn native_storageRead(
    storage_name: *mut c_char,
    key: *mut c_char,
) -> TakByteBufferResponse {
    // SAFETY: string pointers forwarded unchanged; `out` is valid.
    buffer_call(|out| unsafe { sys::TakLib_storageRead(storage_name, key, out) })
}

/// # Safety
/// `storage_name` and `key` must be valid NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn native_storageDeleteEntry(storage_name: *mut c_char, key: *mut c_char) -> i32 {
    // SAFETY: forwarded unchanged.
    unsafe { sys::TakLib_storageDeleteEntry(storage_name, key) }
}
