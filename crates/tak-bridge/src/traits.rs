// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the native side of the bridge.

use std::path::PathBuf;

use tak_core::error::Result;
use tak_core::{DirectoryKind, NativeStatus};

/// Everything the environment bridge needs from the host platform.
///
/// An implementation owns (a non-owning handle to) the application context
/// the host passed in at attach time.
pub trait PlatformBridge: NativeEnvironment + WorkingDirectory + Send + Sync {
    /// Human-readable platform name (e.g. "Android", "iOS").
    fn platform_name(&self) -> &str;
}

/// The native environment initialisation entry point.
pub trait NativeEnvironment {
    /// Run the native `loadEnvironment(context)` routine synchronously.
    ///
    /// `Err` means the call could not be made at all. A completed call
    /// returns whatever status the native side reported, success or not.
    fn load_environment(&self) -> Result<NativeStatus>;
}

/// Resolution of the application-private working directory.
pub trait WorkingDirectory {
    /// Absolute path of the directory. Repeated calls return the same path.
    fn working_dir(&self) -> Result<PathBuf>;

    /// Which platform directory category `working_dir` comes from.
    fn directory_kind(&self) -> DirectoryKind;
}
