//! # Text Input Pipeline Tests
//!
//! End-to-end tests of the text-input bridge over an in-process transport.
//!
//! ## Test Philosophy
//!
//! - **Engine's point of view**: Assertions are made on what the engine receives
//! - **Real wire format**: Calls and replies go through the JSON codecs
//! - **Deterministic**: Replies are delivered only when a test runs them
//!
//! [`RecordingEngine`] plays the engine side of a [`LocalMessenger`]. It
//! records every method call and key event the host sends and answers each
//! call with a success envelope.

use input_types::NormalizedKeyEvent;
use ipc::{
    InvokeError, JsonMessageCodec, JsonMethodCodec, LocalMessenger, MessageCodec, MethodCall,
    MethodCodec, PeerEndpoint,
};
use serde_json::Value;
use services_text_input::TextInputSettings;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

/// Method call received by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub channel: String,
    pub method: String,
    pub args: Value,
}

/// Engine side of a [`LocalMessenger`] that records what the host sends.
pub struct RecordingEngine {
    peer: PeerEndpoint,
    text_input_channel: String,
    calls: Rc<RefCell<Vec<RecordedCall>>>,
    key_events: Rc<RefCell<Vec<NormalizedKeyEvent>>>,
}

impl RecordingEngine {
    /// Registers engine handlers for every channel named in `settings`.
    pub fn attach(messenger: &LocalMessenger, settings: &TextInputSettings) -> Self {
        let engine = Self {
            peer: messenger.peer(),
            text_input_channel: settings.text_input_channel.clone(),
            calls: Rc::new(RefCell::new(Vec::new())),
            key_events: Rc::new(RefCell::new(Vec::new())),
        };

        for channel in [&settings.text_input_channel, &settings.navigation_channel] {
            let calls = Rc::clone(&engine.calls);
            let name = channel.clone();
            engine.peer.set_handler(
                channel,
                Some(Rc::new(move |payload: &[u8]| {
                    let call = match JsonMethodCodec.decode_method_call(payload) {
                        Ok(call) => call,
                        Err(err) => {
                            warn!(channel = %name, error = %err, "engine received undecodable call");
                            return None;
                        }
                    };
                    calls.borrow_mut().push(RecordedCall {
                        channel: name.clone(),
                        method: call.method,
                        args: call.args,
                    });
                    JsonMethodCodec.encode_success_envelope(&Value::Null).ok()
                })),
            );
        }

        let key_events = Rc::clone(&engine.key_events);
        engine.peer.set_handler(
            &settings.key_event_channel,
            Some(Rc::new(move |payload: &[u8]| {
                let event = JsonMessageCodec
                    .decode_message(payload)
                    .ok()
                    .and_then(|message| serde_json::from_value(message).ok());
                match event {
                    Some(event) => key_events.borrow_mut().push(event),
                    None => warn!("engine received malformed key event"),
                }
                None
            })),
        );

        engine
    }

    /// Calls `method` on the host's text-input channel and decodes the reply.
    pub fn call(&self, method: &str, args: Value) -> Result<Value, InvokeError> {
        let payload = JsonMethodCodec.encode_method_call(&MethodCall::new(method, args))?;
        let reply = self.peer.send(&self.text_input_channel, &payload)?;
        match reply {
            Some(reply) => Ok(JsonMethodCodec.decode_envelope(&reply)??),
            None => Err(InvokeError::NotImplemented {
                method: method.to_string(),
            }),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Arguments of every received call to `method`, oldest first.
    pub fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.method == method)
            .map(|call| call.args.clone())
            .collect()
    }

    pub fn key_events(&self) -> Vec<NormalizedKeyEvent> {
        self.key_events.borrow().clone()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
        self.key_events.borrow_mut().clear();
    }
}
