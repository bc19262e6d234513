//! Request/response method channel.

use crate::codec::MethodCodec;
use crate::transport::{BinaryMessenger, BinaryReply};
use crate::typed::{InvokeError, MethodCall, MethodError, HANDLER_PANIC_CODE};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use tracing::{debug, error, warn};

/// Outcome of a method handler.
pub type MethodResult = Result<Value, MethodError>;

type MethodHandler = Rc<dyn Fn(&MethodCall) -> MethodResult>;
type HandlerTable = Rc<RefCell<HashMap<String, MethodHandler>>>;

/// Named channel carrying method calls encoded by `C`.
///
/// Inbound calls are dispatched synchronously to the handler registered for
/// the method. Outbound calls complete through a continuation invoked by the
/// transport on the event-loop thread.
pub struct MethodChannel<C> {
    name: String,
    messenger: Rc<dyn BinaryMessenger>,
    codec: Rc<C>,
    handlers: HandlerTable,
}

impl<C: MethodCodec + 'static> MethodChannel<C> {
    pub fn new(messenger: Rc<dyn BinaryMessenger>, name: impl Into<String>, codec: C) -> Self {
        Self {
            name: name.into(),
            messenger,
            codec: Rc::new(codec),
            handlers: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes `method` on the peer.
    ///
    /// Send failures are returned immediately; the call outcome reaches
    /// `on_reply` once the transport delivers the reply.
    pub fn invoke<F>(&self, method: &str, args: Value, on_reply: F) -> Result<(), InvokeError>
    where
        F: FnOnce(Result<Value, InvokeError>) + 'static,
    {
        let payload = self.codec.encode_method_call(&MethodCall::new(method, args))?;
        let codec = Rc::clone(&self.codec);
        let method = method.to_string();
        let reply: BinaryReply = Box::new(move |response| {
            on_reply(decode_reply(codec.as_ref(), &method, response));
        });
        self.messenger.send(&self.name, &payload, Some(reply))?;
        Ok(())
    }

    /// Invokes `method` and reports a failed outcome through the log only.
    pub fn invoke_method(&self, method: &str, args: Value) -> Result<(), InvokeError> {
        let channel = self.name.clone();
        let name = method.to_string();
        self.invoke(method, args, move |outcome| {
            if let Err(err) = outcome {
                warn!(%channel, method = %name, error = %err, "method call failed");
            }
        })
    }

    /// Registers the handler for `method`, replacing any previous one.
    pub fn set_method_handler<F>(&self, method: &str, handler: F)
    where
        F: Fn(&MethodCall) -> MethodResult + 'static,
    {
        self.handlers
            .borrow_mut()
            .insert(method.to_string(), Rc::new(handler));
        self.attach();
    }

    /// Removes the handler for `method`; later calls reply "unimplemented".
    pub fn remove_method_handler(&self, method: &str) {
        self.handlers.borrow_mut().remove(method);
    }

    fn attach(&self) {
        let name = self.name.clone();
        let codec = Rc::clone(&self.codec);
        let handlers = Rc::clone(&self.handlers);
        self.messenger.set_handler(
            &self.name,
            Some(Rc::new(move |payload: &[u8]| {
                dispatch(&name, codec.as_ref(), &handlers, payload)
            })),
        );
    }
}

fn dispatch<C: MethodCodec>(
    channel: &str,
    codec: &C,
    handlers: &RefCell<HashMap<String, MethodHandler>>,
    payload: &[u8],
) -> Option<Vec<u8>> {
    let outcome = match codec.decode_method_call(payload) {
        Ok(call) => {
            let handler = handlers.borrow().get(&call.method).cloned();
            match handler {
                Some(handler) => invoke_handler(channel, &handler, &call),
                None => {
                    debug!(channel, method = %call.method, "no handler registered");
                    Err(MethodError::not_implemented(&call.method))
                }
            }
        }
        Err(err) => {
            warn!(channel, error = %err, "undecodable method call");
            Err(MethodError::decode_failure(&err))
        }
    };

    let encoded = match &outcome {
        Ok(result) => codec.encode_success_envelope(result),
        Err(err) => codec.encode_error_envelope(err),
    };
    match encoded {
        Ok(reply) => Some(reply),
        Err(err) => {
            error!(channel, error = %err, "failed to encode method reply");
            None
        }
    }
}

fn invoke_handler(channel: &str, handler: &MethodHandler, call: &MethodCall) -> MethodResult {
    match panic::catch_unwind(AssertUnwindSafe(|| handler(call))) {
        Ok(outcome) => {
            if let Err(err) = &outcome {
                debug!(channel, method = %call.method, error = %err, "handler returned error");
            }
            outcome
        }
        Err(_) => {
            error!(channel, method = %call.method, "method handler panicked");
            Err(MethodError::new(
                HANDLER_PANIC_CODE,
                format!("handler for {} panicked", call.method),
            ))
        }
    }
}

fn decode_reply<C: MethodCodec>(
    codec: &C,
    method: &str,
    response: Option<Vec<u8>>,
) -> Result<Value, InvokeError> {
    match response {
        Some(bytes) if !bytes.is_empty() => Ok(codec.decode_envelope(&bytes)??),
        _ => Err(InvokeError::NotImplemented {
            method: method.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonMethodCodec;
    use crate::transport::{LocalMessenger, TransportError};
    use crate::typed::{DECODE_ERROR_CODE, UNIMPLEMENTED_CODE};
    use serde_json::json;

    fn channel(messenger: &LocalMessenger) -> MethodChannel<JsonMethodCodec> {
        MethodChannel::new(Rc::new(messenger.clone()), "test/method", JsonMethodCodec)
    }

    fn call(messenger: &LocalMessenger, method: &str, args: Value) -> Result<Value, MethodError> {
        let payload = JsonMethodCodec
            .encode_method_call(&MethodCall::new(method, args))
            .unwrap();
        let reply = messenger.peer().send("test/method", &payload).unwrap().unwrap();
        JsonMethodCodec.decode_envelope(&reply).unwrap()
    }

    #[test]
    fn test_handler_success_reply() {
        let messenger = LocalMessenger::new();
        let channel = channel(&messenger);
        channel.set_method_handler("double", |call| {
            let n: i64 = call.args()?;
            Ok(json!(n * 2))
        });

        assert_eq!(call(&messenger, "double", json!(21)), Ok(json!(42)));
    }

    #[test]
    fn test_handler_error_reply() {
        let messenger = LocalMessenger::new();
        let channel = channel(&messenger);
        channel.set_method_handler("fail", |_| {
            Err(MethodError::new("bad_state", "nope").with_details(json!({"why": 1})))
        });

        let err = call(&messenger, "fail", Value::Null).unwrap_err();
        assert_eq!(err.code, "bad_state");
        assert_eq!(err.message, "nope");
        assert_eq!(err.details, Some(json!({"why": 1})));
    }

    #[test]
    fn test_unregistered_method_replies_unimplemented() {
        let messenger = LocalMessenger::new();
        let channel = channel(&messenger);
        channel.set_method_handler("known", |_| Ok(Value::Null));

        let err = call(&messenger, "unknown", Value::Null).unwrap_err();
        assert_eq!(err.code, UNIMPLEMENTED_CODE);
    }

    #[test]
    fn test_removed_handler_replies_unimplemented() {
        let messenger = LocalMessenger::new();
        let channel = channel(&messenger);
        channel.set_method_handler("known", |_| Ok(Value::Null));
        channel.remove_method_handler("known");

        let err = call(&messenger, "known", Value::Null).unwrap_err();
        assert_eq!(err.code, UNIMPLEMENTED_CODE);
    }

    #[test]
    fn test_argument_mismatch_replies_invalid_arguments() {
        let messenger = LocalMessenger::new();
        let channel = channel(&messenger);
        channel.set_method_handler("double", |call| {
            let n: i64 = call.args()?;
            Ok(json!(n * 2))
        });

        let err = call(&messenger, "double", json!("twenty")).unwrap_err();
        assert_eq!(err.code, crate::typed::INVALID_ARGUMENTS_CODE);
    }

    #[test]
    fn test_malformed_inbound_payload_replies_decode_error() {
        let messenger = LocalMessenger::new();
        let channel = channel(&messenger);
        channel.set_method_handler("known", |_| Ok(Value::Null));

        let reply = messenger.peer().send("test/method", b"{broken").unwrap().unwrap();
        let err = JsonMethodCodec.decode_envelope(&reply).unwrap().unwrap_err();
        assert_eq!(err.code, DECODE_ERROR_CODE);
        assert_eq!(err.details, Some(json!("{broken")));
    }

    #[test]
    fn test_panicking_handler_becomes_error_reply() {
        let messenger = LocalMessenger::new();
        let channel = channel(&messenger);
        channel.set_method_handler("explode", |_| panic!("handler bug"));

        let err = call(&messenger, "explode", Value::Null).unwrap_err();
        assert_eq!(err.code, HANDLER_PANIC_CODE);
    }

    #[test]
    fn test_invoke_completes_on_run_pending() {
        let messenger = LocalMessenger::new();
        messenger.peer().set_handler(
            "test/method",
            Some(Rc::new(|payload: &[u8]| {
                let call = JsonMethodCodec.decode_method_call(payload).ok()?;
                JsonMethodCodec.encode_success_envelope(&call.args).ok()
            })),
        );
        let channel = channel(&messenger);

        let result = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&result);
        channel
            .invoke("echo", json!([1, 2]), move |outcome| {
                *sink.borrow_mut() = Some(outcome.map_err(|err| err.to_string()));
            })
            .unwrap();

        assert!(result.borrow().is_none());
        messenger.run_pending();
        assert_eq!(*result.borrow(), Some(Ok(json!([1, 2]))));
    }

    #[test]
    fn test_invoke_surfaces_peer_error() {
        let messenger = LocalMessenger::new();
        messenger.peer().set_handler(
            "test/method",
            Some(Rc::new(|_: &[u8]| {
                JsonMethodCodec
                    .encode_error_envelope(&MethodError::new("denied", "no"))
                    .ok()
            })),
        );
        let channel = channel(&messenger);

        let result = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&result);
        channel
            .invoke("anything", Value::Null, move |outcome| {
                *sink.borrow_mut() = Some(outcome);
            })
            .unwrap();
        messenger.run_pending();

        let outcome = result.borrow_mut().take();
        match outcome {
            Some(Err(InvokeError::Method(err))) => assert_eq!(err.code, "denied"),
            other => panic!("expected method error, got {:?}", other),
        }
    }

    #[test]
    fn test_invoke_empty_reply_is_not_implemented() {
        let messenger = LocalMessenger::new();
        messenger
            .peer()
            .set_handler("test/method", Some(Rc::new(|_: &[u8]| None)));
        let channel = channel(&messenger);

        let result = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&result);
        channel
            .invoke("popRoute", Value::Null, move |outcome| {
                *sink.borrow_mut() = Some(outcome);
            })
            .unwrap();
        messenger.run_pending();

        assert!(matches!(
            result.borrow_mut().take(),
            Some(Err(InvokeError::NotImplemented { method })) if method == "popRoute"
        ));
    }

    #[test]
    fn test_invoke_unknown_channel_fails_immediately() {
        let messenger = LocalMessenger::new();
        let channel = channel(&messenger);

        let err = channel.invoke_method("popRoute", Value::Null).unwrap_err();
        assert!(matches!(
            err,
            InvokeError::Transport(TransportError::UnknownChannel { .. })
        ));
        assert_eq!(messenger.pending_replies(), 0);
    }
}
