//! Fire-and-forget message channel.

use crate::codec::MessageCodec;
use crate::transport::BinaryMessenger;
use crate::typed::ChannelError;
use std::rc::Rc;
use tracing::warn;

/// Named channel carrying messages encoded by `C`. No replies.
pub struct BasicMessageChannel<C> {
    name: String,
    messenger: Rc<dyn BinaryMessenger>,
    codec: Rc<C>,
}

impl<C> BasicMessageChannel<C>
where
    C: MessageCodec + 'static,
    C::Message: 'static,
{
    pub fn new(messenger: Rc<dyn BinaryMessenger>, name: impl Into<String>, codec: C) -> Self {
        Self {
            name: name.into(),
            messenger,
            codec: Rc::new(codec),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encodes and transmits `message`.
    pub fn send(&self, message: &C::Message) -> Result<(), ChannelError> {
        let payload = self.codec.encode_message(message)?;
        self.messenger.send(&self.name, &payload, None)?;
        Ok(())
    }

    /// Registers the handler for inbound messages, replacing any previous one.
    ///
    /// Payloads that fail to decode are logged and dropped.
    pub fn set_message_handler<F>(&self, handler: F)
    where
        F: Fn(C::Message) + 'static,
    {
        let name = self.name.clone();
        let codec = Rc::clone(&self.codec);
        self.messenger.set_handler(
            &self.name,
            Some(Rc::new(move |payload: &[u8]| {
                match codec.decode_message(payload) {
                    Ok(message) => handler(message),
                    Err(err) => warn!(channel = %name, error = %err, "dropping undecodable message"),
                }
                None
            })),
        );
    }

    pub fn clear_message_handler(&self) {
        self.messenger.set_handler(&self.name, None);
    }
}
