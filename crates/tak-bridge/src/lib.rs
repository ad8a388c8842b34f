// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! TAK bridge: the environment bridge plugin.
//!
//! The plugin registers on the `"tak"` method channel and answers a single
//! method, `"loadEnvironment"`: it runs the platform's native environment
//! initialisation and replies with the application-private working
//! directory. Everything else is answered with "not implemented".
//!
//! Platform specifics sit behind [`traits::PlatformBridge`]: Android talks to
//! the ART runtime through `jni`, iOS asks Foundation through `objc2`, and
//! desktop/CI builds get a stub backed by an ordinary data directory.

pub mod bridge;
pub mod channel;
pub mod codec;
pub mod ffi;
pub mod logging;
pub mod plugin;
pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod stub;

use std::sync::Arc;

use tak_core::error::Result;
use tak_core::BridgeConfig;

pub use bridge::EnvironmentBridge;
pub use channel::{BinaryMessenger, LocalMessenger, MethodCallHandler, MethodChannel, Reply};
pub use plugin::{PluginBinding, TakPlugin};

/// Build the bridge implementation for the target operating system.
pub fn platform_bridge(config: &BridgeConfig) -> Result<Arc<dyn traits::PlatformBridge>> {
    #[cfg(target_os = "ios")]
    {
        let _ = config;
        Ok(Arc::new(ios::IosBridge::new()))
    }
    #[cfg(target_os = "android")]
    {
        let _ = config;
        Ok(Arc::new(android::AndroidBridge::from_provider()?))
    }
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        Ok(Arc::new(stub::StubBridge::from_config(config)?))
    }
}
