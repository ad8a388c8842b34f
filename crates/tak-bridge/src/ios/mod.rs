// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS platform bridge via objc2.
//
// Requires compilation with the iOS SDK (Xcode). The TAK framework is linked
// into the app directly and needs no context from the bridge, so the native
// step has nothing to hand over; the working directory comes from
// Foundation's search-path API.

#![cfg(target_os = "ios")]

use std::path::PathBuf;

use objc2::rc::autoreleasepool;
use objc2_foundation::{
    NSSearchPathDirectory, NSSearchPathDomainMask, NSSearchPathForDirectoriesInDomains,
};

use tak_core::error::{Result, TakError};
use tak_core::{DirectoryKind, NativeStatus};

use crate::traits::*;

/// iOS implementation of the platform bridge. Stateless.
pub struct IosBridge;

impl IosBridge {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IosBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for IosBridge {
    fn platform_name(&self) -> &str {
        "iOS"
    }
}

impl NativeEnvironment for IosBridge {
    fn load_environment(&self) -> Result<NativeStatus> {
        tracing::debug!("iOS: TAK framework is linked statically, no context to provide");
        Ok(NativeStatus::SUCCESS)
    }
}

impl WorkingDirectory for IosBridge {
    /// First `NSLibraryDirectory` in the user domain, tilde-expanded, e.g.
    /// `<container>/Library`.
    fn working_dir(&self) -> Result<PathBuf> {
        // The search-path array is autoreleased. Callers may have no run loop.
        let path = autoreleasepool(|_| {
            // SAFETY: plain Foundation call with enum arguments.
            #[allow(unused_unsafe)]
            let paths = unsafe {
                NSSearchPathForDirectoriesInDomains(
                    NSSearchPathDirectory::LibraryDirectory,
                    NSSearchPathDomainMask::UserDomainMask,
                    true,
                )
            };
            paths.firstObject().map(|first| first.to_string())
        });
        path.map(PathBuf::from)
            .ok_or_else(|| TakError::WorkingDir("no library directory in user domain".into()))
    }

    fn directory_kind(&self) -> DirectoryKind {
        DirectoryKind::Library
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_dir_is_absolute_and_stable() {
        let bridge = IosBridge::new();
        let first = bridge.working_dir().unwrap();
        assert!(first.is_absolute());
        assert!(first.ends_with("Library"));
        assert_eq!(bridge.working_dir().unwrap(), first);
    }
}
