//! # Inter-Process Communication (IPC)
//!
//! This crate defines the channel primitives that every engine/host
//! exchange rides on.
//!
//! ## Philosophy
//!
//! - **Named channels**: Every conversation happens on a channel identified by name
//! - **Codec-agnostic**: Values are turned into bytes by a pluggable codec per channel
//! - **Typed at the edge**: Arguments are decoded into typed records where they are used
//! - **Single-threaded**: Dispatch and reply delivery happen on the event-loop thread
//!
//! ## Architecture
//!
//! - [`BinaryMessenger`]: the transport seam to the embedder (bytes in, bytes out)
//! - [`MessageCodec`] / [`MethodCodec`]: value <-> byte transforms
//! - [`MethodChannel`]: request/response calls with structured error replies
//! - [`BasicMessageChannel`]: fire-and-forget typed messages
//!
//! The transport is shared as `Rc<dyn BinaryMessenger>`. Nothing in this crate
//! is `Send`; handlers must be registered during single-threaded initialization.

pub mod codec;
pub mod message_channel;
pub mod method_channel;
pub mod transport;
pub mod typed;

pub use codec::{BinaryCodec, CodecError, JsonMessageCodec, JsonMethodCodec, MessageCodec, MethodCodec, StringCodec};
pub use message_channel::BasicMessageChannel;
pub use method_channel::{MethodChannel, MethodResult};
pub use transport::{
    BinaryHandler, BinaryMessenger, BinaryReply, LocalMessenger, PeerEndpoint, TransportError,
};
pub use typed::{
    ChannelError, InvokeError, MethodCall, MethodError, DECODE_ERROR_CODE, HANDLER_PANIC_CODE,
    INVALID_ARGUMENTS_CODE, UNIMPLEMENTED_CODE,
};
