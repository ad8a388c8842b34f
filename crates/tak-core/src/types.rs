// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the TAK method channel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TakError;

/// Name of the method channel the plugin registers on.
pub const CHANNEL_NAME: &str = "tak";

/// The single method the plugin answers.
pub const LOAD_ENVIRONMENT: &str = "loadEnvironment";

/// A decoded method invocation arriving on a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(rename = "args", default)]
    pub arguments: Value,
}

impl MethodCall {
    /// A call with no arguments.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Value::Null,
        }
    }

    pub fn with_arguments(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Outcome of a method call as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResult {
    /// The handler answered with a value.
    Success(Value),
    /// The handler answered with an error.
    Error {
        code: String,
        message: Option<String>,
        details: Value,
    },
    /// No handler, or the handler does not know the method.
    NotImplemented,
}

impl MethodResult {
    pub fn success(value: impl Into<Value>) -> Self {
        MethodResult::Success(value.into())
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, MethodResult::NotImplemented)
    }

    /// The success payload as a string, if that is what it carries.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MethodResult::Success(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<TakError> for MethodResult {
    fn from(err: TakError) -> Self {
        let details = match &err {
            TakError::NativeInit(status) => Value::from(status.code()),
            _ => Value::Null,
        };
        MethodResult::Error {
            code: err.code().to_string(),
            message: Some(err.to_string()),
            details,
        }
    }
}

/// Category of the application-private directory a platform hands back.
///
/// Each platform keeps its own category; the native library's expectations
/// about the path are external, so they are never unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectoryKind {
    /// Android `Context.getFilesDir()`.
    AppFiles,
    /// iOS `NSLibraryDirectory` in the user domain.
    Library,
    /// Desktop data directory (XDG or configured).
    AppData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::NativeStatus;

    #[test]
    fn call_without_args_deserializes() {
        let call: MethodCall = serde_json::from_str(r#"{"method":"loadEnvironment"}"#).unwrap();
        assert_eq!(call, MethodCall::new(LOAD_ENVIRONMENT));
    }

    #[test]
    fn native_error_carries_code_in_details() {
        let result = MethodResult::from(TakError::NativeInit(NativeStatus::GENERAL_ERROR));
        match result {
            MethodResult::Error { code, details, .. } => {
                assert_eq!(code, "native_init_failed");
                assert_eq!(details, Value::from(0x000F_0001));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn as_str_only_for_string_success() {
        assert_eq!(MethodResult::success("/data").as_str(), Some("/data"));
        assert_eq!(MethodResult::success(3).as_str(), None);
        assert_eq!(MethodResult::NotImplemented.as_str(), None);
    }
}
