// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the TAK bridge.

use thiserror::Error;

use crate::status::NativeStatus;

/// Top-level error type for all bridge operations.
#[derive(Debug, Error)]
pub enum TakError {
    // -- Method channel --
    #[error("malformed method call: {0}")]
    BadCall(String),

    #[error("malformed reply envelope: {0}")]
    BadEnvelope(String),

    // -- Native environment --
    #[error("native environment initialisation failed: {}", .0.describe())]
    NativeInit(NativeStatus),

    #[error("working directory unavailable: {0}")]
    WorkingDir(String),

    // -- Configuration / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),
}

impl TakError {
    /// Stable error code sent back over the method channel.
    pub fn code(&self) -> &'static str {
        match self {
            TakError::BadCall(_) => "bad_call",
            TakError::BadEnvelope(_) => "bad_envelope",
            TakError::NativeInit(_) => "native_init_failed",
            TakError::WorkingDir(_) => "working_dir_unavailable",
            TakError::Io(_) => "io_error",
            TakError::Serialization(_) => "serialization_error",
            TakError::Bridge(_) => "bridge_error",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TakError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_init_message_uses_status_description() {
        let err = TakError::NativeInit(NativeStatus::LICENSE_EXPIRED);
        assert_eq!(err.code(), "native_init_failed");
        assert!(err.to_string().contains("license has expired"));
    }

    #[test]
    fn bad_config_reports_serialization_code() {
        let err = crate::BridgeConfig::from_json(r#"{"log_filter": 3}"#).unwrap_err();
        assert_eq!(err.code(), "serialization_error");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TakError = io.into();
        assert_eq!(err.code(), "io_error");
    }
}
