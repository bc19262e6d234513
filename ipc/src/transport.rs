//! Binary transport between the host and the engine.
//!
//! [`BinaryMessenger`] is the only coupling point to the embedder: it sends
//! byte payloads on named channels and lets one handler per channel receive
//! inbound payloads. [`LocalMessenger`] is an in-process realization used by
//! hosts that drive the engine directly and by tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, trace};

/// Inbound payload handler. Returns the reply payload, if any.
pub type BinaryHandler = Rc<dyn Fn(&[u8]) -> Option<Vec<u8>>>;

/// Continuation receiving the reply to an outbound payload.
///
/// `None` means the peer answered without a payload.
pub type BinaryReply = Box<dyn FnOnce(Option<Vec<u8>>)>;

/// Transport failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("no handler registered on channel {channel}")]
    UnknownChannel { channel: String },
}

/// Byte-level channel transport.
pub trait BinaryMessenger {
    /// Sends `payload` on `channel`.
    ///
    /// When `reply` is given it is invoked later, on the event-loop thread,
    /// with the peer's reply. There is no timeout: a reply that never
    /// arrives leaves the continuation pending.
    fn send(
        &self,
        channel: &str,
        payload: &[u8],
        reply: Option<BinaryReply>,
    ) -> Result<(), TransportError>;

    /// Registers the handler for inbound payloads on `channel`.
    ///
    /// Last registration wins; `None` removes the handler.
    fn set_handler(&self, channel: &str, handler: Option<BinaryHandler>);
}

struct PendingReply {
    channel: String,
    reply: BinaryReply,
    payload: Option<Vec<u8>>,
}

#[derive(Default)]
struct Routes {
    host: RefCell<HashMap<String, BinaryHandler>>,
    engine: RefCell<HashMap<String, BinaryHandler>>,
    pending: RefCell<VecDeque<PendingReply>>,
}

impl Routes {
    fn handler(table: &RefCell<HashMap<String, BinaryHandler>>, channel: &str) -> Option<BinaryHandler> {
        // Cloned out so the table is not borrowed while the handler runs.
        table.borrow().get(channel).cloned()
    }

    fn register(
        table: &RefCell<HashMap<String, BinaryHandler>>,
        channel: &str,
        handler: Option<BinaryHandler>,
    ) {
        let mut table = table.borrow_mut();
        match handler {
            Some(handler) => {
                table.insert(channel.to_string(), handler);
            }
            None => {
                table.remove(channel);
            }
        }
    }
}

/// In-process transport.
///
/// The messenger itself is the host side. [`LocalMessenger::peer`] hands out
/// the engine side. Replies to host sends are queued and delivered by
/// [`LocalMessenger::run_pending`], which the owner calls from its event loop.
#[derive(Clone, Default)]
pub struct LocalMessenger {
    routes: Rc<Routes>,
}

impl LocalMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the engine-side endpoint of this transport.
    pub fn peer(&self) -> PeerEndpoint {
        PeerEndpoint {
            routes: Rc::clone(&self.routes),
        }
    }

    /// Delivers every queued reply, including replies queued while running.
    ///
    /// Returns the number of continuations invoked.
    pub fn run_pending(&self) -> usize {
        let mut delivered = 0;
        loop {
            let next = self.routes.pending.borrow_mut().pop_front();
            let Some(pending) = next else {
                break;
            };
            trace!(channel = %pending.channel, "delivering reply");
            (pending.reply)(pending.payload);
            delivered += 1;
        }
        delivered
    }

    /// Number of replies waiting for [`LocalMessenger::run_pending`].
    pub fn pending_replies(&self) -> usize {
        self.routes.pending.borrow().len()
    }
}

impl fmt::Debug for LocalMessenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalMessenger")
            .field("host_channels", &self.routes.host.borrow().len())
            .field("engine_channels", &self.routes.engine.borrow().len())
            .field("pending_replies", &self.pending_replies())
            .finish()
    }
}

impl BinaryMessenger for LocalMessenger {
    fn send(
        &self,
        channel: &str,
        payload: &[u8],
        reply: Option<BinaryReply>,
    ) -> Result<(), TransportError> {
        let handler = Routes::handler(&self.routes.engine, channel).ok_or_else(|| {
            TransportError::UnknownChannel {
                channel: channel.to_string(),
            }
        })?;

        trace!(channel, bytes = payload.len(), "host -> engine");
        let response = handler(payload);

        if let Some(reply) = reply {
            self.routes.pending.borrow_mut().push_back(PendingReply {
                channel: channel.to_string(),
                reply,
                payload: response,
            });
        }
        Ok(())
    }

    fn set_handler(&self, channel: &str, handler: Option<BinaryHandler>) {
        debug!(channel, registered = handler.is_some(), "host channel handler");
        Routes::register(&self.routes.host, channel, handler);
    }
}

/// Engine side of a [`LocalMessenger`].
#[derive(Clone)]
pub struct PeerEndpoint {
    routes: Rc<Routes>,
}

impl PeerEndpoint {
    /// Registers the engine's handler for payloads the host sends on `channel`.
    pub fn set_handler(&self, channel: &str, handler: Option<BinaryHandler>) {
        Routes::register(&self.routes.engine, channel, handler);
    }

    /// Delivers `payload` to the host handler on `channel` and returns its reply.
    pub fn send(&self, channel: &str, payload: &[u8]) -> Result<Option<Vec<u8>>, TransportError> {
        let handler = Routes::handler(&self.routes.host, channel).ok_or_else(|| {
            TransportError::UnknownChannel {
                channel: channel.to_string(),
            }
        })?;

        trace!(channel, bytes = payload.len(), "engine -> host");
        Ok(handler(payload))
    }
}

impl fmt::Debug for PeerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerEndpoint").finish_non_exhaustive()
    }
}
