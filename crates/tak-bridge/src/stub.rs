// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where the mobile runtimes are absent.
//
// There is no native TAK library here: `load_environment` reports success
// without doing anything. The working directory is a plain data directory.

use std::path::{Path, PathBuf};

use tak_core::error::{Result, TakError};
use tak_core::{BridgeConfig, DirectoryKind, NativeStatus};

use crate::traits::*;

/// Bridge returned on non-mobile platforms.
pub struct StubBridge {
    working_dir: PathBuf,
}

impl StubBridge {
    /// Use `config.working_dir` if set, otherwise `<data dir>/tak`.
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        let dir = match &config.working_dir {
            Some(dir) => dir.clone(),
            None => data_dir_fallback().join("tak"),
        };
        Self::with_working_dir(dir)
    }

    pub fn with_working_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let working_dir = std::path::absolute(dir.as_ref())?;
        Ok(Self { working_dir })
    }
}

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeEnvironment for StubBridge {
    fn load_environment(&self) -> Result<NativeStatus> {
        tracing::debug!("NativeEnvironment::load_environment called on stub bridge");
        Ok(NativeStatus::SUCCESS)
    }
}

impl WorkingDirectory for StubBridge {
    fn working_dir(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.working_dir).map_err(|e| {
            TakError::WorkingDir(format!("{}: {e}", self.working_dir.display()))
        })?;
        Ok(self.working_dir.clone())
    }

    fn directory_kind(&self) -> DirectoryKind {
        DirectoryKind::AppData
    }
}

fn data_dir_fallback() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg);
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_dir_is_created_and_stable() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested").join("work");
        let config = BridgeConfig {
            working_dir: Some(target.clone()),
            ..BridgeConfig::default()
        };
        let stub = StubBridge::from_config(&config).unwrap();

        let first = stub.working_dir().unwrap();
        assert!(first.is_absolute());
        assert!(target.is_dir());
        assert_eq!(stub.working_dir().unwrap(), first);
    }

    #[test]
    fn load_environment_reports_success() {
        let tmp = tempfile::tempdir().unwrap();
        let stub = StubBridge::with_working_dir(tmp.path()).unwrap();
        assert!(stub.load_environment().unwrap().is_success());
        assert_eq!(stub.directory_kind(), DirectoryKind::AppData);
    }

    #[test]
    fn relative_dir_is_made_absolute() {
        let stub = StubBridge::with_working_dir("relative/work").unwrap();
        assert!(stub.working_dir.is_absolute());
    }

    #[test]
    fn unusable_dir_is_working_dir_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let stub = StubBridge::with_working_dir(tmp.path().join("below-a-file")).unwrap();
        let err = stub.working_dir().unwrap_err();
        assert_eq!(err.code(), "working_dir_unavailable");
    }
}
