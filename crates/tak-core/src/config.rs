// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for the environment bridge.
///
/// The channel name and method name are fixed by the channel contract
/// ([`crate::CHANNEL_NAME`], [`crate::LOAD_ENVIRONMENT`]) and are not
/// configurable; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Reply with an error when the native status is not a success code.
    /// Off by default: the status is logged and dropped.
    pub surface_native_status: bool,
    /// Working directory override for the desktop stub. Ignored on mobile.
    pub working_dir: Option<PathBuf>,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            surface_native_status: false,
            working_dir: None,
            log_filter: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
