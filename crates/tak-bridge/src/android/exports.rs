// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JVM-facing plugin entry points for `com.build38.tak.flutter.TakPlugin`.
//
// The Kotlin plugin owns the method channel; it attaches once with its
// application `Context`, forwards every message it receives on "tak" as raw
// bytes and relays the reply. Failures are logged and reported as 0 / null,
// never as a panic across the JNI boundary.

#![allow(non_snake_case)]

use std::ptr;
use std::sync::Arc;

use jni::objects::{JByteArray, JObject, JString};
use jni::sys::{jbyteArray, jlong};
use jni::JNIEnv;

use tak_core::BridgeConfig;

use super::AndroidBridge;
use crate::ffi::{config_from_json, TakPluginHandle};

fn read_config(env: &mut JNIEnv, config: &JString) -> Option<BridgeConfig> {
    if config.is_null() {
        return config_from_json(None);
    }
    match env.get_string(config) {
        Ok(text) => config_from_json(Some(&String::from(text))),
        Err(e) => {
            tracing::error!(error = %e, "JNI: unreadable config string");
            None
        }
    }
}

/// `TakPlugin.nativeAttach(context: Context, configJson: String?): Long`.
///
/// Returns 0 when the config is invalid or the context cannot be retained.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_build38_tak_flutter_TakPlugin_nativeAttach<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    context: JObject<'local>,
    config: JString<'local>,
) -> jlong {
    let Some(config) = read_config(&mut env, &config) else {
        return 0;
    };
    crate::logging::init(&config.log_filter);

    if context.is_null() {
        tracing::error!("JNI: nativeAttach called without a context");
        return 0;
    }
    let bridge = match AndroidBridge::new(&mut env, &context) {
        Ok(bridge) => bridge,
        Err(e) => {
            tracing::error!(error = %e, "JNI: failed to create Android bridge");
            return 0;
        }
    };

    let handle = TakPluginHandle::new(config, Arc::new(bridge));
    Box::into_raw(Box::new(handle)) as jlong
}

/// `TakPlugin.nativeHandleMessage(handle: Long, message: ByteArray): ByteArray?`.
///
/// A null return is the empty (not implemented) reply.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_build38_tak_flutter_TakPlugin_nativeHandleMessage<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
    message: JByteArray<'local>,
) -> jbyteArray {
    if handle == 0 {
        return ptr::null_mut();
    }
    // SAFETY: non-zero handles come from nativeAttach and stay valid until
    // nativeDetach, per the Kotlin plugin's lifecycle.
    let handle = unsafe { &*(handle as *const TakPluginHandle) };

    let bytes = match env.convert_byte_array(&message) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "JNI: unreadable message");
            return ptr::null_mut();
        }
    };
    let Some(reply) = handle.dispatch(&bytes) else {
        return ptr::null_mut();
    };

    match env.byte_array_from_slice(&reply) {
        Ok(array) => array.into_raw(),
        Err(e) => {
            tracing::error!(error = %e, "JNI: failed to allocate reply");
            ptr::null_mut()
        }
    }
}

/// `TakPlugin.nativeDetach(handle: Long)`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_build38_tak_flutter_TakPlugin_nativeDetach<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
) {
    if handle == 0 {
        return;
    }
    // SAFETY: ownership returns from the pointer handed out by nativeAttach.
    let handle = unsafe { Box::from_raw(handle as *mut TakPluginHandle) };
    handle.detach();
}
