// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON method codec.
//
// Wire forms, as the host framework's JSON codec defines them:
//
//   call            {"method": "<name>", "args": <value>}
//   success         [<value>]
//   error           ["<code>", <message|null>, <details|null>]
//   not implemented empty reply (no envelope at all)

use serde_json::{json, Value};

use tak_core::error::{Result, TakError};
use tak_core::{MethodCall, MethodResult};

/// Stateless JSON codec for method calls and reply envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMethodCodec;

impl JsonMethodCodec {
    pub fn encode_method_call(&self, call: &MethodCall) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(call)?)
    }

    pub fn decode_method_call(&self, bytes: &[u8]) -> Result<MethodCall> {
        serde_json::from_slice(bytes).map_err(|e| TakError::BadCall(e.to_string()))
    }

    pub fn encode_success_envelope(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&json!([value]))?)
    }

    pub fn encode_error_envelope(
        &self,
        code: &str,
        message: Option<&str>,
        details: &Value,
    ) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&json!([code, message, details]))?)
    }

    /// Encode a result; `NotImplemented` has no envelope.
    pub fn encode_result(&self, result: &MethodResult) -> Result<Option<Vec<u8>>> {
        match result {
            MethodResult::Success(value) => self.encode_success_envelope(value).map(Some),
            MethodResult::Error {
                code,
                message,
                details,
            } => self
                .encode_error_envelope(code, message.as_deref(), details)
                .map(Some),
            MethodResult::NotImplemented => Ok(None),
        }
    }

    /// Decode a reply; an absent or empty reply means not implemented.
    pub fn decode_envelope(&self, reply: Option<&[u8]>) -> Result<MethodResult> {
        let bytes = match reply {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Ok(MethodResult::NotImplemented),
        };

        let envelope: Value =
            serde_json::from_slice(bytes).map_err(|e| TakError::BadEnvelope(e.to_string()))?;
        let Value::Array(mut items) = envelope else {
            return Err(TakError::BadEnvelope("envelope is not a list".into()));
        };

        match items.len() {
            1 => Ok(MethodResult::Success(items.remove(0))),
            3 => {
                let details = items.pop().unwrap_or(Value::Null);
                let message = match items.pop() {
                    Some(Value::String(s)) => Some(s),
                    Some(Value::Null) | None => None,
                    Some(other) => {
                        return Err(TakError::BadEnvelope(format!(
                            "error message must be a string, got {other}"
                        )));
                    }
                };
                let code = match items.pop() {
                    Some(Value::String(s)) => s,
                    other => {
                        return Err(TakError::BadEnvelope(format!(
                            "error code must be a string, got {other:?}"
                        )));
                    }
                };
                Ok(MethodResult::Error {
                    code,
                    message,
                    details,
                })
            }
            n => Err(TakError::BadEnvelope(format!(
                "expected 1 or 3 elements, got {n}"
            ))),
        }
    }
}
