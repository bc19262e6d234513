//! # Editing Core
//!
//! Text and selection state of the focused text field.
//!
//! ## Philosophy
//!
//! - **One client**: At most one field is focused; the handle `0` means none
//! - **Scalar offsets**: Text is a sequence of Unicode scalar values and every
//!   offset counts scalars
//! - **Clamp, never fail**: Cursor and selection requests outside the text are
//!   clamped to `[0, len]`
//! - **Mechanism over policy**: Which key does what is decided by the caller
//!
//! ## Design
//!
//! - [`EditingStore`]: focused client plus its [`EditingState`]
//! - [`boundary`]: word and line boundary search
//! - [`args`]: typed records for the text-input protocol

pub mod args;
pub mod boundary;
pub mod client;
pub mod state;
pub mod store;

pub use args::{EditingStateArgs, EditingStateUpdate, SetClientArgs};
pub use client::{ClientConfig, ClientId, InputType};
pub use state::{Direction, EditingState, Granularity};
pub use store::{EditingError, EditingStore};
