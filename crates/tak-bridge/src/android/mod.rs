// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. The bridge keeps a global reference to the
// application `Context` and reaches the ART runtime through the `JavaVM`.
//
// Native initialisation goes through the environment provider in
// `tak-native`: the context is wrapped in a fresh `ContextWrapper` and handed
// to `provider::load_environment`, the same entry point the Kotlin-facing
// `TakPlugin.loadEnvironment` export uses.

#![cfg(target_os = "android")]

pub mod exports;

use std::path::PathBuf;

use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::{AttachGuard, JNIEnv, JavaVM};

use tak_core::error::{Result, TakError};
use tak_core::{DirectoryKind, NativeStatus};
use tak_native::provider;

use crate::traits::*;

/// Convenience: map any `jni::errors::Error` into `TakError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> TakError {
    TakError::Bridge(format!("{context}: {e}"))
}

/// Android implementation of the platform bridge.
pub struct AndroidBridge {
    vm: JavaVM,
    context: GlobalRef,
}

impl AndroidBridge {
    /// Build the bridge from the context the environment provider retained.
    ///
    /// Only succeeds once a Kotlin host has called `TakPlugin.loadEnvironment`
    /// (or `nativeAttach`) in this process. Hosts that attach through
    /// `nativeAttach` get a bridge from [`AndroidBridge::new`] instead.
    pub fn from_provider() -> Result<Self> {
        let (Some(vm), Some(context)) = (provider::java_vm(), provider::context()) else {
            return Err(TakError::Bridge(
                "no Android context retained, attach through TakPlugin.nativeAttach".into(),
            ));
        };
        // SAFETY: the pointer comes from a live `JavaVM` that is recorded for
        // the lifetime of the process.
        let vm = unsafe { JavaVM::from_raw(vm.get_java_vm_pointer()) }
            .map_err(|e| jni_err("failed to obtain JavaVM", e))?;
        Ok(Self { vm, context })
    }

    /// Build the bridge from a context passed in over JNI.
    pub fn new(env: &mut JNIEnv, context: &JObject) -> Result<Self> {
        let vm = env.get_java_vm().map_err(|e| jni_err("GetJavaVM", e))?;
        let context = Self::application_context(env, context)?;
        Ok(Self { vm, context })
    }

    /// Global reference to `getApplicationContext()` of `component`.
    ///
    /// Holding the application context rather than an activity avoids keeping
    /// the activity alive past its lifecycle.
    fn application_context(env: &mut JNIEnv, component: &JObject) -> Result<GlobalRef> {
        let app: JObject = env
            .call_method(
                component,
                "getApplicationContext",
                "()Landroid/content/Context;",
                &[],
            )
            .map_err(|e| jni_err("getApplicationContext", e))?
            .l()
            .map_err(|e| jni_err("getApplicationContext->l", e))?;

        let target = if app.is_null() { component } else { &app };
        let global = env
            .new_global_ref(target)
            .map_err(|e| jni_err("NewGlobalRef(context)", e))?;
        if !app.is_null() {
            env.delete_local_ref(app)
                .map_err(|e| jni_err("DeleteLocalRef(app)", e))?;
        }
        Ok(global)
    }

    fn env(&self) -> Result<AttachGuard<'_>> {
        self.vm
            .attach_current_thread()
            .map_err(|e| jni_err("failed to attach JNI thread", e))
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// NativeEnvironment: environment provider
// ---------------------------------------------------------------------------

impl NativeEnvironment for AndroidBridge {
    fn load_environment(&self) -> Result<NativeStatus> {
        let mut env = self.env()?;

        // new ContextWrapper(context)
        let wrapper: JObject = env
            .new_object(
                "android/content/ContextWrapper",
                "(Landroid/content/Context;)V",
                &[JValue::Object(self.context.as_obj())],
            )
            .map_err(|e| jni_err("new ContextWrapper", e))?;

        let status = provider::load_environment(&mut env, &wrapper);
        env.delete_local_ref(wrapper)
            .map_err(|e| jni_err("DeleteLocalRef(wrapper)", e))?;
        status
    }
}

// ---------------------------------------------------------------------------
// WorkingDirectory: Context.getFilesDir()
// ---------------------------------------------------------------------------

impl WorkingDirectory for AndroidBridge {
    /// `context.getFilesDir().getAbsolutePath()`, e.g.
    /// `/data/user/0/<package>/files`.
    fn working_dir(&self) -> Result<PathBuf> {
        let mut env = self.env()?;

        let files_dir: JObject = env
            .call_method(self.context.as_obj(), "getFilesDir", "()Ljava/io/File;", &[])
            .map_err(|e| jni_err("getFilesDir", e))?
            .l()
            .map_err(|e| jni_err("getFilesDir->l", e))?;
        if files_dir.is_null() {
            return Err(TakError::WorkingDir("getFilesDir returned null".into()));
        }

        let path_obj: JObject = env
            .call_method(&files_dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
            .map_err(|e| jni_err("getAbsolutePath", e))?
            .l()
            .map_err(|e| jni_err("getAbsolutePath->l", e))?;
        let path_str = JString::from(path_obj);
        let path: String = env
            .get_string(&path_str)
            .map_err(|e| jni_err("GetStringUTFChars(path)", e))?
            .into();

        env.delete_local_ref(path_str)
            .map_err(|e| jni_err("DeleteLocalRef(path)", e))?;
        env.delete_local_ref(files_dir)
            .map_err(|e| jni_err("DeleteLocalRef(filesDir)", e))?;

        Ok(PathBuf::from(path))
    }

    fn directory_kind(&self) -> DirectoryKind {
        DirectoryKind::AppFiles
    }
}
