// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Return codes reported by the native TAK library.
//
// The bridge never interprets these beyond success/failure; the table exists
// so logs and opt-in error replies carry a readable message.

use serde::{Deserialize, Serialize};

/// Raw status returned by a native TAK entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeStatus(pub i32);

impl NativeStatus {
    pub const SUCCESS: Self = Self(0x0000_0000);
    pub const UPDATE_SUCCESS: Self = Self(0x0000_0001);
    pub const RE_REGISTER_SUCCESS: Self = Self(0x0000_0002);

    pub const GENERAL_ERROR: Self = Self(0x000F_0001);
    pub const OUT_OF_MEMORY: Self = Self(0x000F_0002);
    pub const INVALID_PARAMETER: Self = Self(0x000F_0003);
    pub const INVALID_EXECUTION_THREAD: Self = Self(0x000F_0004);
    pub const INVALID_SERVER_RESPONSE: Self = Self(0x000F_0005);
    pub const MULTI_THREAD_ERROR: Self = Self(0x000F_0006);
    pub const NOT_AVAILABLE: Self = Self(0x000F_FFFF);

    pub const API_ALREADY_INITIALIZED: Self = Self(0x0001_0001);
    pub const API_NOT_INITIALIZED: Self = Self(0x0001_0002);

    pub const DEVICE_VALIDATION_FAILED: Self = Self(0x0002_0002);
    pub const DEVICE_UPDATE_FAILED: Self = Self(0x0002_0003);
    pub const DEVICE_UPDATE_NEEDED: Self = Self(0x0002_0004);
    pub const DEVICE_NO_FINGERPRINT: Self = Self(0x0002_0005);
    pub const LICENSE_EXPIRED: Self = Self(0x0002_0006);
    pub const LICENSE_ABOUT_TO_EXPIRE: Self = Self(0x0002_0007);
    pub const CLIENT_CERTIFICATE_EXPIRED: Self = Self(0x0002_0008);
    pub const ALREADY_REGISTERED: Self = Self(0x0002_0009);
    pub const NOT_REGISTERED: Self = Self(0x0002_000A);
    pub const INSTANCE_WIPED: Self = Self(0x0002_000B);
    pub const INSTANCE_LOCKED: Self = Self(0x0002_000C);

    pub const SECURITY_GENERAL_ERROR: Self = Self(0x0003_0001);
    pub const NETWORK_TIMEOUT: Self = Self(0x0003_0008);
    pub const NETWORK_ERROR: Self = Self(0x0003_0009);

    pub const CRYPTO_ERROR: Self = Self(0x0004_0001);

    pub const STORAGE_ERROR: Self = Self(0x0005_0001);
    pub const STORAGE_NOT_FOUND: Self = Self(0x0005_0002);
    pub const STORAGE_KEY_NOT_FOUND: Self = Self(0x0005_0003);
    pub const STORAGE_ALREADY_EXISTS: Self = Self(0x0005_0004);
    pub const STORAGE_DEVICE_MISMATCH: Self = Self(0x0005_0005);

    pub const KEYCHAIN_ERROR: Self = Self(0x0006_0001);

    /// Raw integer value.
    pub fn code(self) -> i32 {
        self.0
    }

    /// Whether the library reported one of its success variants.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Self::SUCCESS | Self::UPDATE_SUCCESS | Self::RE_REGISTER_SUCCESS
        )
    }

    /// Plain English description, falling back to the hex code.
    pub fn describe(self) -> String {
        let known = match self {
            Self::SUCCESS => "no error",
            Self::UPDATE_SUCCESS => "device data updated",
            Self::RE_REGISTER_SUCCESS => "instance re-registered",
            Self::GENERAL_ERROR => "general error",
            Self::OUT_OF_MEMORY => "out of memory",
            Self::INVALID_PARAMETER => "invalid parameter",
            Self::INVALID_EXECUTION_THREAD => "called from the wrong thread",
            Self::INVALID_SERVER_RESPONSE => "invalid server response",
            Self::MULTI_THREAD_ERROR => "concurrent call rejected",
            Self::NOT_AVAILABLE => "not available on this platform",
            Self::API_ALREADY_INITIALIZED => "library already initialised",
            Self::API_NOT_INITIALIZED => "library not initialised",
            Self::DEVICE_VALIDATION_FAILED => "device validation failed",
            Self::DEVICE_UPDATE_FAILED => "device update failed",
            Self::DEVICE_UPDATE_NEEDED => "device update needed",
            Self::DEVICE_NO_FINGERPRINT => "device fingerprint unavailable",
            Self::LICENSE_EXPIRED => "license has expired",
            Self::LICENSE_ABOUT_TO_EXPIRE => "license is about to expire",
            Self::CLIENT_CERTIFICATE_EXPIRED => "client certificate expired",
            Self::ALREADY_REGISTERED => "instance already registered",
            Self::NOT_REGISTERED => "instance not registered",
            Self::INSTANCE_WIPED => "instance was wiped",
            Self::INSTANCE_LOCKED => "instance is locked",
            Self::SECURITY_GENERAL_ERROR => "secure channel error",
            Self::NETWORK_TIMEOUT => "network timeout",
            Self::NETWORK_ERROR => "network error",
            Self::CRYPTO_ERROR => "cryptographic operation failed",
            Self::STORAGE_ERROR => "secure storage error",
            Self::STORAGE_NOT_FOUND => "storage not found",
            Self::STORAGE_KEY_NOT_FOUND => "storage key not found",
            Self::STORAGE_ALREADY_EXISTS => "storage already exists",
            Self::STORAGE_DEVICE_MISMATCH => "storage belongs to another device",
            Self::KEYCHAIN_ERROR => "keychain error",
            _ => return format!("unknown status {:#010x}", self.0),
        };
        known.to_string()
    }
}

impl From<i32> for NativeStatus {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for NativeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x} ({})", self.0, self.describe())
    }
}
