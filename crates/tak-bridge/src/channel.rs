// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Method channel plumbing: binary messenger, decoded handlers and replies.
//
// Calls are delivered on the messenger's dispatch thread and handled to
// completion there. A handler must answer through its `Reply` before it
// returns; a reply that is dropped or kept past that point reads as "not
// implemented".

use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};

use serde_json::Value;

use tak_core::error::Result;
use tak_core::{MethodCall, MethodResult};

use crate::codec::JsonMethodCodec;

/// Raw handler installed on a messenger: request bytes in, envelope out.
/// `None` is the empty reply.
pub type BinaryHandler = Arc<dyn Fn(&[u8]) -> Option<Vec<u8>> + Send + Sync>;

/// Transport that routes binary messages to per-channel handlers.
pub trait BinaryMessenger: Send + Sync {
    /// Install or (with `None`) clear the handler for `channel`.
    fn set_message_handler(&self, channel: &str, handler: Option<BinaryHandler>);

    /// Deliver `message` to the handler of `channel`. `None` when the channel
    /// has no handler or the handler sent an empty reply.
    fn send(&self, channel: &str, message: &[u8]) -> Option<Vec<u8>>;
}

/// In-process messenger keyed by channel name.
#[derive(Default)]
pub struct LocalMessenger {
    handlers: Mutex<HashMap<String, BinaryHandler>>,
}

impl LocalMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_handler(&self, channel: &str) -> bool {
        self.table().contains_key(channel)
    }

    fn table(&self) -> std::sync::MutexGuard<'_, HashMap<String, BinaryHandler>> {
        self.handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BinaryMessenger for LocalMessenger {
    fn set_message_handler(&self, channel: &str, handler: Option<BinaryHandler>) {
        let mut table = self.table();
        match handler {
            Some(handler) => {
                table.insert(channel.to_string(), handler);
            }
            None => {
                table.remove(channel);
            }
        }
    }

    fn send(&self, channel: &str, message: &[u8]) -> Option<Vec<u8>> {
        // Clone the handler out so it runs without the table locked.
        let handler = self.table().get(channel).cloned();
        match handler {
            Some(handler) => handler(message),
            None => {
                tracing::debug!(channel, "message for channel without handler");
                None
            }
        }
    }
}

/// One-shot continuation a handler answers a call through.
pub struct Reply {
    deliver: Box<dyn FnOnce(MethodResult) + Send>,
}

impl Reply {
    pub fn new(deliver: impl FnOnce(MethodResult) + Send + 'static) -> Self {
        Self {
            deliver: Box::new(deliver),
        }
    }

    pub fn send(self, result: MethodResult) {
        (self.deliver)(result)
    }

    pub fn success(self, value: impl Into<Value>) {
        self.send(MethodResult::Success(value.into()))
    }

    pub fn error(self, code: impl Into<String>, message: Option<String>, details: Value) {
        self.send(MethodResult::Error {
            code: code.into(),
            message,
            details,
        })
    }

    pub fn not_implemented(self) {
        self.send(MethodResult::NotImplemented)
    }
}

/// Receiver of decoded method calls.
pub trait MethodCallHandler: Send + Sync {
    fn on_method_call(&self, call: MethodCall, reply: Reply);
}

/// A named channel on a messenger, speaking the JSON method codec.
#[derive(Clone)]
pub struct MethodChannel {
    name: String,
    messenger: Arc<dyn BinaryMessenger>,
    codec: JsonMethodCodec,
}

impl MethodChannel {
    pub fn new(messenger: Arc<dyn BinaryMessenger>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messenger,
            codec: JsonMethodCodec,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `handler` for every call on this channel, or clear it.
    pub fn set_method_call_handler(&self, handler: Option<Arc<dyn MethodCallHandler>>) {
        let Some(handler) = handler else {
            self.messenger.set_message_handler(&self.name, None);
            return;
        };

        let codec = self.codec;
        let channel = self.name.clone();
        let binary: BinaryHandler = Arc::new(move |message: &[u8]| {
            let call = match codec.decode_method_call(message) {
                Ok(call) => call,
                Err(e) => {
                    tracing::warn!(channel = %channel, error = %e, "dropping malformed method call");
                    return codec.encode_result(&MethodResult::from(e)).ok().flatten();
                }
            };

            let (tx, rx) = mpsc::channel();
            handler.on_method_call(
                call,
                Reply::new(move |result| {
                    let _ = tx.send(result);
                }),
            );
            let result = rx.try_recv().unwrap_or(MethodResult::NotImplemented);

            match codec.encode_result(&result) {
                Ok(envelope) => envelope,
                Err(e) => {
                    tracing::error!(channel = %channel, error = %e, "failed to encode reply");
                    codec.encode_result(&MethodResult::from(e)).ok().flatten()
                }
            }
        });
        self.messenger.set_message_handler(&self.name, Some(binary));
    }

    /// Send `call` over the channel and decode the reply.
    pub fn invoke_method(&self, call: &MethodCall) -> Result<MethodResult> {
        let message = self.codec.encode_method_call(call)?;
        let reply = self.messenger.send(&self.name, &message);
        self.codec.decode_envelope(reply.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    impl MethodCallHandler for Echo {
        fn on_method_call(&self, call: MethodCall, reply: Reply) {
            match call.method.as_str() {
                "echo" => reply.success(call.arguments),
                "fail" => reply.error("boom", Some("it broke".into()), Value::Null),
                "silent" => drop(reply),
                _ => reply.not_implemented(),
            }
        }
    }

    fn echo_channel() -> (Arc<LocalMessenger>, MethodChannel) {
        let messenger = Arc::new(LocalMessenger::new());
        let channel = MethodChannel::new(messenger.clone(), "test");
        channel.set_method_call_handler(Some(Arc::new(Echo)));
        (messenger, channel)
    }

    #[test]
    fn success_round_trips_arguments() {
        let (_, channel) = echo_channel();
        let result = channel
            .invoke_method(&MethodCall::with_arguments("echo", json!([1, "two"])))
            .unwrap();
        assert_eq!(result, MethodResult::Success(json!([1, "two"])));
    }

    #[test]
    fn error_reply_reaches_caller() {
        let (_, channel) = echo_channel();
        let result = channel.invoke_method(&MethodCall::new("fail")).unwrap();
        assert_eq!(
            result,
            MethodResult::Error {
                code: "boom".into(),
                message: Some("it broke".into()),
                details: Value::Null,
            }
        );
    }

    #[test]
    fn dropped_reply_is_not_implemented() {
        let (_, channel) = echo_channel();
        let result = channel.invoke_method(&MethodCall::new("silent")).unwrap();
        assert!(result.is_not_implemented());
    }

    #[test]
    fn malformed_bytes_get_bad_call_envelope() {
        let (messenger, _) = echo_channel();
        let reply = messenger.send("test", b"not json").expect("error envelope");
        let result = JsonMethodCodec.decode_envelope(Some(&reply)).unwrap();
        assert!(matches!(result, MethodResult::Error { ref code, .. } if code == "bad_call"));
    }

    #[test]
    fn cleared_handler_stops_dispatch() {
        let (messenger, channel) = echo_channel();
        channel.set_method_call_handler(None);
        assert!(!messenger.has_handler("test"));
        let result = channel.invoke_method(&MethodCall::new("echo")).unwrap();
        assert!(result.is_not_implemented());
    }

    #[test]
    fn channels_are_isolated() {
        let (messenger, _) = echo_channel();
        let other = MethodChannel::new(messenger, "other");
        let result = other.invoke_method(&MethodCall::new("echo")).unwrap();
        assert!(result.is_not_implemented());
    }
}
