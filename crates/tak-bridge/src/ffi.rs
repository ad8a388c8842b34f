// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! C ABI for hosts that route channel messages through C.
//!
//! A thin host registrar (e.g. Swift) attaches the plugin once, forwards every
//! message arriving on the "tak" channel to [`tak_plugin_handle_message`]
//! and relays the returned envelope, then detaches on teardown. Messages use
//! the JSON method codec (see `codec`).

use std::ffi::{c_char, CStr};
use std::ptr;
use std::sync::Arc;

use tak_core::BridgeConfig;

use crate::channel::{BinaryMessenger, LocalMessenger};
use crate::plugin::{PluginBinding, TakPlugin};
use crate::traits::PlatformBridge;

/// Opaque handle to an attached plugin.
///
/// Shared by the C exports below and the Android JNI exports.
pub struct TakPluginHandle {
    messenger: Arc<LocalMessenger>,
    plugin: TakPlugin,
}

impl TakPluginHandle {
    /// Attach a plugin to a private in-process messenger.
    pub(crate) fn new(config: BridgeConfig, context: Arc<dyn PlatformBridge>) -> Self {
        let messenger = Arc::new(LocalMessenger::new());
        let binding = PluginBinding {
            messenger: messenger.clone(),
            context,
        };
        let plugin = TakPlugin::attach(&binding, config);
        Self { messenger, plugin }
    }

    /// Deliver one encoded method call; `None` is the empty reply.
    pub(crate) fn dispatch(&self, message: &[u8]) -> Option<Vec<u8>> {
        self.messenger.send(self.plugin.channel().name(), message)
    }

    pub(crate) fn detach(self) {
        self.plugin.detach();
    }
}

/// Parse an optional JSON config, logging why it was rejected.
pub(crate) fn config_from_json(text: Option<&str>) -> Option<BridgeConfig> {
    let Some(text) = text else {
        return Some(BridgeConfig::default());
    };
    match BridgeConfig::from_json(text) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::error!(error = %e, "invalid plugin config");
            None
        }
    }
}

/// # Safety
/// `config_json` must be null or a valid NUL-terminated string.
unsafe fn parse_config(config_json: *const c_char) -> Option<BridgeConfig> {
    if config_json.is_null() {
        return Some(BridgeConfig::default());
    }
    // SAFETY: non-null and, per the caller contract, NUL-terminated.
    let raw = unsafe { CStr::from_ptr(config_json) };
    match raw.to_str() {
        Ok(text) => config_from_json(Some(text)),
        Err(e) => {
            tracing::error!(error = %e, "FFI: config is not valid UTF-8");
            None
        }
    }
}

/// Attach the plugin using the platform bridge for this target.
///
/// Returns null if the configuration cannot be parsed or the platform bridge
/// cannot be created.
///
/// # Safety
/// - `config_json` must be null (defaults) or a valid NUL-terminated string
/// - The handle must be released with `tak_plugin_detach`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tak_plugin_attach(config_json: *const c_char) -> *mut TakPluginHandle {
    // SAFETY: forwarded caller contract.
    let Some(config) = (unsafe { parse_config(config_json) }) else {
        return ptr::null_mut();
    };
    crate::logging::init(&config.log_filter);

    let context = match crate::platform_bridge(&config) {
        Ok(bridge) => bridge,
        Err(e) => {
            tracing::error!(error = %e, "FFI: failed to create platform bridge");
            return ptr::null_mut();
        }
    };

    Box::into_raw(Box::new(TakPluginHandle::new(config, context)))
}

/// Dispatch one encoded method call and return the encoded reply.
///
/// Returns null with `*out_len = 0` for the empty (not implemented) reply.
/// A non-null result must be released with `tak_plugin_free_buffer`.
///
/// # Safety
/// - `handle` must come from `tak_plugin_attach` and not be detached
/// - `data` must point to `len` readable bytes
/// - `out_len` must be valid for a write
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tak_plugin_handle_message(
    handle: *const TakPluginHandle,
    data: *const u8,
    len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    if out_len.is_null() {
        return ptr::null_mut();
    }
    // SAFETY: checked non-null above.
    unsafe { *out_len = 0 };
    if handle.is_null() || (data.is_null() && len > 0) {
        return ptr::null_mut();
    }

    // SAFETY: caller guarantees a live handle and `len` readable bytes.
    let handle = unsafe { &*handle };
    let message = if len == 0 {
        &[][..]
    } else {
        unsafe { std::slice::from_raw_parts(data, len) }
    };

    let Some(reply) = handle.dispatch(message) else {
        return ptr::null_mut();
    };

    let reply = reply.into_boxed_slice();
    // SAFETY: checked non-null above.
    unsafe { *out_len = reply.len() };
    Box::into_raw(reply).cast::<u8>()
}

/// Release a reply returned by `tak_plugin_handle_message`.
///
/// # Safety
/// `buffer`/`len` must be exactly a pointer and length returned together by
/// `tak_plugin_handle_message`, released once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tak_plugin_free_buffer(buffer: *mut u8, len: usize) {
    if buffer.is_null() {
        return;
    }
    // SAFETY: reconstructs the boxed slice leaked by handle_message.
    drop(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(buffer, len)) });
}

/// Detach the plugin and free the handle.
///
/// # Safety
/// `handle` must come from `tak_plugin_attach` and is invalid afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tak_plugin_detach(handle: *mut TakPluginHandle) {
    if handle.is_null() {
        return;
    }
    // SAFETY: ownership returns from the pointer handed out by attach.
    let handle = unsafe { Box::from_raw(handle) };
    handle.detach();
}

#[cfg(all(test, not(any(target_os = "ios", target_os = "android"))))]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::sync::atomic::Ordering;

    use tak_core::{MethodCall, MethodResult, NativeStatus};

    use crate::bridge::tests::FakePlatform;
    use crate::codec::JsonMethodCodec;

    fn call(handle: *const TakPluginHandle, method: &str) -> MethodResult {
        let message = JsonMethodCodec
            .encode_method_call(&MethodCall::new(method))
            .unwrap();
        let mut len = usize::MAX;
        let reply = unsafe { tak_plugin_handle_message(handle, message.as_ptr(), message.len(), &mut len) };
        if reply.is_null() {
            assert_eq!(len, 0);
            return MethodResult::NotImplemented;
        }
        let bytes = unsafe { std::slice::from_raw_parts(reply, len) }.to_vec();
        unsafe { tak_plugin_free_buffer(reply, len) };
        JsonMethodCodec.decode_envelope(Some(&bytes)).unwrap()
    }

    fn attach_in(dir: &std::path::Path) -> *mut TakPluginHandle {
        let config = serde_json::json!({ "working_dir": dir }).to_string();
        let config = CString::new(config).unwrap();
        let handle = unsafe { tak_plugin_attach(config.as_ptr()) };
        assert!(!handle.is_null());
        handle
    }

    #[test]
    fn load_environment_through_c_abi() {
        let tmp = tempfile::tempdir().unwrap();
        let handle = attach_in(tmp.path());

        let result = call(handle, "loadEnvironment");
        let path = result.as_str().expect("path").to_string();
        assert_eq!(std::path::Path::new(&path), tmp.path());

        assert_eq!(call(handle, "loadEnvironment").as_str(), Some(path.as_str()));
        unsafe { tak_plugin_detach(handle) };
    }

    #[test]
    fn unknown_method_gets_empty_reply() {
        let tmp = tempfile::tempdir().unwrap();
        let handle = attach_in(tmp.path());
        assert!(call(handle, "getTakVersion").is_not_implemented());
        unsafe { tak_plugin_detach(handle) };
    }

    #[test]
    fn invalid_config_yields_null() {
        let config = CString::new("{\"log_filter\": 7}").unwrap();
        let handle = unsafe { tak_plugin_attach(config.as_ptr()) };
        assert!(handle.is_null());
    }

    #[test]
    fn null_config_means_defaults() {
        let config = unsafe { parse_config(ptr::null()) };
        assert_eq!(config, Some(BridgeConfig::default()));
    }

    #[test]
    fn null_config_attaches_with_defaults() {
        let handle = unsafe { tak_plugin_attach(ptr::null()) };
        assert!(!handle.is_null());
        assert!(call(handle, "getTakVersion").is_not_implemented());
        unsafe { tak_plugin_detach(handle) };
    }

    #[test]
    fn handle_wraps_a_supplied_context() {
        let platform = Arc::new(FakePlatform::new(
            NativeStatus::SUCCESS,
            "/data/user/0/com.example/files",
        ));
        let handle = TakPluginHandle::new(BridgeConfig::default(), platform.clone());

        let message = JsonMethodCodec
            .encode_method_call(&MethodCall::new("loadEnvironment"))
            .unwrap();
        let reply = handle.dispatch(&message);
        let result = JsonMethodCodec.decode_envelope(reply.as_deref()).unwrap();
        assert_eq!(result.as_str(), Some("/data/user/0/com.example/files"));
        assert_eq!(platform.loads.load(Ordering::SeqCst), 1);

        handle.detach();
    }

    #[test]
    fn rejected_config_text_is_none() {
        assert_eq!(config_from_json(None), Some(BridgeConfig::default()));
        assert!(config_from_json(Some("{\"channel_name\": \"tak/v2\"}")).is_none());
    }

    #[test]
    fn null_handle_is_rejected() {
        let mut len = 42;
        let reply = unsafe { tak_plugin_handle_message(ptr::null(), ptr::null(), 0, &mut len) };
        assert!(reply.is_null());
        assert_eq!(len, 0);
    }
}
