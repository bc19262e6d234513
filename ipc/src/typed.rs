//! Typed method-call records and structured errors.
//!
//! A method call is a method name plus an argument value. Replies are either a
//! result value or a [`MethodError`] carrying a code, a human-readable message,
//! and optional details.

use crate::codec::CodecError;
use crate::transport::TransportError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error code replied when no handler is registered for a method.
pub const UNIMPLEMENTED_CODE: &str = "unimplemented";

/// Error code replied when an inbound call cannot be decoded.
pub const DECODE_ERROR_CODE: &str = "decode_error";

/// Error code replied when call arguments do not match the expected record.
pub const INVALID_ARGUMENTS_CODE: &str = "invalid_arguments";

/// Error code replied when a handler panics during dispatch.
pub const HANDLER_PANIC_CODE: &str = "handler_panicked";

/// A decoded method invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodCall {
    /// Method name, e.g. `TextInput.setClient`.
    pub method: String,
    /// Untyped arguments; decode with [`MethodCall::args`].
    #[serde(default)]
    pub args: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, args: Value) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// Decodes the arguments into a typed record.
    ///
    /// A shape mismatch fails with an `invalid_arguments` error naming the
    /// method, so handlers can propagate it with `?`.
    pub fn args<T: DeserializeOwned>(&self) -> Result<T, MethodError> {
        T::deserialize(&self.args).map_err(|err| {
            MethodError::new(
                INVALID_ARGUMENTS_CODE,
                format!("invalid arguments for {}", self.method),
            )
            .with_details(Value::String(err.to_string()))
        })
    }
}

/// Structured method error reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct MethodError {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}

impl MethodError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Reply for a method nobody registered.
    pub fn not_implemented(method: &str) -> Self {
        Self::new(UNIMPLEMENTED_CODE, format!("method {method} is not implemented"))
    }

    /// Reply for an inbound payload the codec rejected.
    ///
    /// The raw payload is attached (lossily, as text) for diagnostics.
    pub fn decode_failure(err: &CodecError) -> Self {
        let error = Self::new(DECODE_ERROR_CODE, err.to_string());
        match err.payload() {
            Some(payload) => error.with_details(Value::String(
                String::from_utf8_lossy(payload).into_owned(),
            )),
            None => error,
        }
    }
}

/// Failure sending on a channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Failure of an outbound method invocation.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("method call failed: {0}")]
    Method(#[from] MethodError),

    #[error("method {method} is not implemented by the peer")]
    NotImplemented { method: String },
}

impl From<ChannelError> for InvokeError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::Transport(err) => Self::Transport(err),
            ChannelError::Codec(err) => Self::Codec(err),
        }
    }
}
