//! Codecs between structured values and byte payloads.
//!
//! Two families exist: message codecs turn a single value into bytes, method
//! codecs additionally know how to frame method calls and success/error
//! replies. Any number of codecs may coexist on different channels.

use crate::typed::{MethodCall, MethodError};
use serde_json::Value;
use thiserror::Error;

/// Codec failure.
///
/// Decode failures keep the raw payload so the caller can report what was
/// actually received.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("failed to encode {kind}: {reason}")]
    Encode { kind: &'static str, reason: String },

    #[error("failed to decode {kind} from {} bytes: {reason}", .payload.len())]
    Decode {
        kind: &'static str,
        reason: String,
        payload: Vec<u8>,
    },
}

impl CodecError {
    pub fn encode(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::Encode {
            kind,
            reason: reason.into(),
        }
    }

    pub fn decode(kind: &'static str, reason: impl Into<String>, payload: Vec<u8>) -> Self {
        Self::Decode {
            kind,
            reason: reason.into(),
            payload,
        }
    }

    /// Raw payload of a failed decode.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Decode { payload, .. } => Some(payload),
            Self::Encode { .. } => None,
        }
    }
}

/// Transform between one message value and bytes.
pub trait MessageCodec {
    type Message;

    fn encode_message(&self, message: &Self::Message) -> Result<Vec<u8>, CodecError>;

    fn decode_message(&self, payload: &[u8]) -> Result<Self::Message, CodecError>;
}

/// Transform for method calls and their replies.
pub trait MethodCodec {
    fn encode_method_call(&self, call: &MethodCall) -> Result<Vec<u8>, CodecError>;

    fn decode_method_call(&self, payload: &[u8]) -> Result<MethodCall, CodecError>;

    fn encode_success_envelope(&self, result: &Value) -> Result<Vec<u8>, CodecError>;

    fn encode_error_envelope(&self, error: &MethodError) -> Result<Vec<u8>, CodecError>;

    /// Decodes a reply envelope into the call's outcome.
    fn decode_envelope(&self, payload: &[u8]) -> Result<Result<Value, MethodError>, CodecError>;
}

/// JSON values as UTF-8 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMessageCodec;

impl MessageCodec for JsonMessageCodec {
    type Message = Value;

    fn encode_message(&self, message: &Value) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(message).map_err(|err| CodecError::encode("json message", err.to_string()))
    }

    fn decode_message(&self, payload: &[u8]) -> Result<Value, CodecError> {
        serde_json::from_slice(payload)
            .map_err(|err| CodecError::decode("json message", err.to_string(), payload.to_vec()))
    }
}

/// UTF-8 text messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl MessageCodec for StringCodec {
    type Message = String;

    fn encode_message(&self, message: &String) -> Result<Vec<u8>, CodecError> {
        Ok(message.as_bytes().to_vec())
    }

    fn decode_message(&self, payload: &[u8]) -> Result<String, CodecError> {
        String::from_utf8(payload.to_vec())
            .map_err(|err| CodecError::decode("string message", err.to_string(), payload.to_vec()))
    }
}

/// Raw bytes, passed through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl MessageCodec for BinaryCodec {
    type Message = Vec<u8>;

    fn encode_message(&self, message: &Vec<u8>) -> Result<Vec<u8>, CodecError> {
        Ok(message.clone())
    }

    fn decode_message(&self, payload: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(payload.to_vec())
    }
}

/// JSON method framing.
///
/// - call: `{"method": name, "args": value}`
/// - success: `[result]`
/// - error: `[code, message, details]`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMethodCodec;

impl MethodCodec for JsonMethodCodec {
    fn encode_method_call(&self, call: &MethodCall) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(call).map_err(|err| CodecError::encode("method call", err.to_string()))
    }

    fn decode_method_call(&self, payload: &[u8]) -> Result<MethodCall, CodecError> {
        serde_json::from_slice(payload)
            .map_err(|err| CodecError::decode("method call", err.to_string(), payload.to_vec()))
    }

    fn encode_success_envelope(&self, result: &Value) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(&[result])
            .map_err(|err| CodecError::encode("success envelope", err.to_string()))
    }

    fn encode_error_envelope(&self, error: &MethodError) -> Result<Vec<u8>, CodecError> {
        let details = error.details.clone().unwrap_or(Value::Null);
        let envelope = (&error.code, &error.message, details);
        serde_json::to_vec(&envelope)
            .map_err(|err| CodecError::encode("error envelope", err.to_string()))
    }

    fn decode_envelope(&self, payload: &[u8]) -> Result<Result<Value, MethodError>, CodecError> {
        let invalid = |reason: &str| CodecError::decode("envelope", reason, payload.to_vec());

        let value: Value = serde_json::from_slice(payload)
            .map_err(|err| CodecError::decode("envelope", err.to_string(), payload.to_vec()))?;
        let Value::Array(mut items) = value else {
            return Err(invalid("envelope is not an array"));
        };

        match items.len() {
            1 => Ok(Ok(items.remove(0))),
            3 => {
                let details = items.pop().filter(|details| !details.is_null());
                let message = match items.pop() {
                    Some(Value::String(message)) => message,
                    Some(Value::Null) | None => String::new(),
                    Some(_) => return Err(invalid("error message is not a string")),
                };
                let Some(Value::String(code)) = items.pop() else {
                    return Err(invalid("error code is not a string"));
                };
                Ok(Err(MethodError {
                    code,
                    message,
                    details,
                }))
            }
            len => Err(invalid(&format!("unexpected envelope length {len}"))),
        }
    }
}
