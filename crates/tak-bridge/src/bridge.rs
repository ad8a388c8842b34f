// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The environment bridge: answers `loadEnvironment` on the tak channel.

use std::sync::Arc;

use tak_core::error::{Result, TakError};
use tak_core::{BridgeConfig, MethodCall, MethodResult, LOAD_ENVIRONMENT};

use crate::channel::{MethodCallHandler, Reply};
use crate::traits::PlatformBridge;

/// Handler behind the plugin's channel.
///
/// Holds the platform bridge (and through it the application context) for
/// the lifetime of the attachment. Read-only after construction.
pub struct EnvironmentBridge {
    platform: Arc<dyn PlatformBridge>,
    config: BridgeConfig,
}

impl EnvironmentBridge {
    pub fn new(platform: Arc<dyn PlatformBridge>, config: BridgeConfig) -> Self {
        Self { platform, config }
    }

    pub fn platform(&self) -> &dyn PlatformBridge {
        self.platform.as_ref()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Run native initialisation, then resolve the working directory.
    ///
    /// The native status is logged. It only fails the call when
    /// `surface_native_status` is set.
    pub fn load_environment(&self) -> Result<String> {
        let status = self.platform.load_environment()?;
        if status.is_success() {
            tracing::debug!(%status, platform = self.platform.platform_name(), "native environment loaded");
        } else {
            tracing::warn!(%status, platform = self.platform.platform_name(), "native environment reported failure");
            if self.config.surface_native_status {
                return Err(TakError::NativeInit(status));
            }
        }

        let dir = self.platform.working_dir()?;
        if !dir.is_absolute() {
            return Err(TakError::WorkingDir(format!(
                "{} is not an absolute path",
                dir.display()
            )));
        }
        dir.into_os_string()
            .into_string()
            .map_err(|raw| TakError::WorkingDir(format!("{raw:?} is not valid UTF-8")))
    }

    /// Answer one call. Arguments are never inspected.
    pub fn handle(&self, call: &MethodCall) -> MethodResult {
        if call.method != LOAD_ENVIRONMENT {
            tracing::trace!(method = %call.method, "not implemented");
            return MethodResult::NotImplemented;
        }

        match self.load_environment() {
            Ok(path) => {
                tracing::info!(path = %path, kind = ?self.platform.directory_kind(), "environment ready");
                MethodResult::Success(path.into())
            }
            Err(e) => {
                tracing::error!(error = %e, "loadEnvironment failed");
                e.into()
            }
        }
    }
}

impl MethodCallHandler for EnvironmentBridge {
    fn on_method_call(&self, call: MethodCall, reply: Reply) {
        reply.send(self.handle(&call));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;
    use tak_core::{DirectoryKind, NativeStatus};

    use crate::traits::{NativeEnvironment, WorkingDirectory};

    /// Platform double with a fixed status and directory.
    pub(crate) struct FakePlatform {
        pub status: NativeStatus,
        pub dir: PathBuf,
        pub loads: AtomicUsize,
    }

    impl FakePlatform {
        pub(crate) fn new(status: NativeStatus, dir: impl Into<PathBuf>) -> Self {
            Self {
                status,
                dir: dir.into(),
                loads: AtomicUsize::new(0),
            }
        }
    }

    impl PlatformBridge for FakePlatform {
        fn platform_name(&self) -> &str {
            "fake"
        }
    }

    impl NativeEnvironment for FakePlatform {
        fn load_environment(&self) -> Result<NativeStatus> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.status)
        }
    }

    impl WorkingDirectory for FakePlatform {
        fn working_dir(&self) -> Result<PathBuf> {
            Ok(self.dir.clone())
        }

        fn directory_kind(&self) -> DirectoryKind {
            DirectoryKind::AppFiles
        }
    }

    fn bridge(status: NativeStatus, surface: bool) -> (Arc<FakePlatform>, EnvironmentBridge) {
        let platform = Arc::new(FakePlatform::new(status, "/data/user/0/com.example/files"));
        let config = BridgeConfig {
            surface_native_status: surface,
            ..BridgeConfig::default()
        };
        (platform.clone(), EnvironmentBridge::new(platform, config))
    }

    #[test]
    fn load_environment_returns_working_dir() {
        let (platform, bridge) = bridge(NativeStatus::SUCCESS, false);
        let result = bridge.handle(&MethodCall::new("loadEnvironment"));
        assert_eq!(result.as_str(), Some("/data/user/0/com.example/files"));
        assert_eq!(platform.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn other_methods_are_not_implemented_and_skip_native() {
        let (platform, bridge) = bridge(NativeStatus::SUCCESS, false);
        for call in [
            MethodCall::new("getTakId"),
            MethodCall::new("LoadEnvironment"),
            MethodCall::with_arguments("initialize", json!({"path": "/tmp"})),
        ] {
            assert!(bridge.handle(&call).is_not_implemented());
        }
        assert_eq!(platform.loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn arguments_are_ignored() {
        let (_, bridge) = bridge(NativeStatus::SUCCESS, false);
        let call = MethodCall::with_arguments("loadEnvironment", json!({"ignored": true}));
        assert_eq!(bridge.handle(&call).as_str(), Some("/data/user/0/com.example/files"));
    }

    #[test]
    fn failed_status_is_discarded_by_default() {
        let (_, bridge) = bridge(NativeStatus::GENERAL_ERROR, false);
        let result = bridge.handle(&MethodCall::new("loadEnvironment"));
        assert_eq!(result.as_str(), Some("/data/user/0/com.example/files"));
    }

    #[test]
    fn failed_status_surfaces_when_configured() {
        let (_, bridge) = bridge(NativeStatus::LICENSE_EXPIRED, true);
        match bridge.handle(&MethodCall::new("loadEnvironment")) {
            MethodResult::Error { code, details, .. } => {
                assert_eq!(code, "native_init_failed");
                assert_eq!(details, json!(NativeStatus::LICENSE_EXPIRED.code()));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn success_variants_never_surface() {
        let (_, bridge) = bridge(NativeStatus::UPDATE_SUCCESS, true);
        assert!(bridge.handle(&MethodCall::new("loadEnvironment")).as_str().is_some());
    }

    #[test]
    fn relative_directory_is_rejected() {
        let platform = Arc::new(FakePlatform::new(NativeStatus::SUCCESS, "files"));
        let bridge = EnvironmentBridge::new(platform, BridgeConfig::default());
        let err = bridge.load_environment().unwrap_err();
        assert_eq!(err.code(), "working_dir_unavailable");
    }

    #[test]
    fn repeated_calls_return_same_path() {
        let (platform, bridge) = bridge(NativeStatus::SUCCESS, false);
        let first = bridge.load_environment().unwrap();
        let second = bridge.load_environment().unwrap();
        assert_eq!(first, second);
        assert_eq!(platform.loads.load(Ordering::SeqCst), 2);
    }
}
