// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android environment provider.
//
// The TAK library needs a `JNIEnv*` and the application `Context` to
// initialise. It pulls both through three C symbols it links against:
//
// - `getEnvironment(void**)` attaches the calling thread and writes its env
// - `getContext(void*)` writes the retained context global reference
// - `releaseEnvironment()` drops that reference
//
// The context is handed over by `load_environment`, reached either from the
// Rust bridge or from a Kotlin host through the
// `Java_com_build38_tak_flutter_TakPlugin_loadEnvironment` export.

#![cfg(target_os = "android")]
#![allow(non_snake_case)]

use std::ffi::c_void;
use std::ptr;
use std::sync::{Mutex, OnceLock};

use jni::objects::{GlobalRef, JObject};
use jni::sys::{jint, jobject, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM};

use tak_core::error::{Result, TakError};
use tak_core::NativeStatus;

static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();

static CONTEXT: Mutex<Option<GlobalRef>> = Mutex::new(None);

fn jni_err(context: &str, e: jni::errors::Error) -> TakError {
    TakError::Bridge(format!("{context}: {e}"))
}

fn context_slot() -> std::sync::MutexGuard<'static, Option<GlobalRef>> {
    CONTEXT.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Retain `context` for the TAK library and report the provider status.
///
/// Replaces any context retained by an earlier call. Also records the
/// `JavaVM` if `JNI_OnLoad` did not run (e.g. statically linked hosts).
pub fn load_environment(env: &mut JNIEnv, context: &JObject) -> Result<NativeStatus> {
    if JAVA_VM.get().is_none() {
        let vm = env.get_java_vm().map_err(|e| jni_err("GetJavaVM", e))?;
        let _ = JAVA_VM.set(vm);
    }

    let global = env
        .new_global_ref(context)
        .map_err(|e| jni_err("NewGlobalRef(context)", e))?;
    if context_slot().replace(global).is_some() {
        tracing::debug!("replaced previously retained Android context");
    }

    Ok(NativeStatus::SUCCESS)
}

/// The `JavaVM` recorded by `JNI_OnLoad` or the first `load_environment`.
pub fn java_vm() -> Option<&'static JavaVM> {
    JAVA_VM.get()
}

/// A new handle on the retained context, if any.
pub fn context() -> Option<GlobalRef> {
    context_slot().clone()
}

/// Raw `(JNIEnv*, jobject)` for the current thread, attaching it if needed.
///
/// Either pointer is null when the VM or context is not available.
pub fn raw_handles() -> (*mut c_void, *mut c_void) {
    let env = JAVA_VM
        .get()
        .and_then(|vm| match vm.attach_current_thread_permanently() {
            Ok(env) => Some(env.get_raw().cast::<c_void>()),
            Err(e) => {
                tracing::error!(error = %e, "failed to attach thread to JavaVM");
                None
            }
        })
        .unwrap_or(ptr::null_mut());

    let context = context_slot()
        .as_ref()
        .map(|global| global.as_obj().as_raw().cast::<c_void>())
        .unwrap_or(ptr::null_mut());

    (env, context)
}

/// Record the `JavaVM` when the JVM loads this library.
#[unsafe(no_mangle)]
pub extern "system" fn JNI_OnLoad(vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    // SAFETY: the JVM passes a valid `JavaVM*` that outlives the library.
    match unsafe { JavaVM::from_raw(vm) } {
        Ok(vm) => {
            let _ = JAVA_VM.set(vm);
        }
        Err(e) => tracing::error!(error = %e, "JNI_OnLoad received an invalid JavaVM"),
    }
    JNI_VERSION_1_6
}

/// JVM-facing `TakPlugin.loadEnvironment(ContextWrapper): Int`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_build38_tak_flutter_TakPlugin_loadEnvironment<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    context: JObject<'local>,
) -> jint {
    match load_environment(&mut env, &context) {
        Ok(status) => status.code(),
        Err(e) => {
            tracing::error!(error = %e, "loadEnvironment failed");
            NativeStatus::GENERAL_ERROR.code()
        }
    }
}

/// Write the calling thread's `JNIEnv*` into `environment`.
///
/// # Safety
/// `environment` must be null or valid for one pointer-sized write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn getEnvironment(environment: *mut *mut c_void) {
    if environment.is_null() {
        return;
    }
    let (env, _) = raw_handles();
    // SAFETY: checked non-null; validity is the caller's contract.
    unsafe { *environment = env };
}

/// Write the retained context `jobject` (or null) into `context`.
///
/// # Safety
/// `context` must be null or valid for one `jobject`-sized write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn getContext(context: *mut c_void) {
    if context.is_null() {
        return;
    }
    let raw: jobject = context_slot()
        .as_ref()
        .map(|global| global.as_obj().as_raw())
        .unwrap_or(ptr::null_mut());
    // SAFETY: checked non-null; validity is the caller's contract.
    unsafe { *context.cast::<jobject>() = raw };
}

/// Drop the retained context global reference.
#[unsafe(no_mangle)]
pub extern "C" fn releaseEnvironment() {
    if context_slot().take().is_some() {
        tracing::debug!("released Android context");
    }
}
