//! Transport capability module
//!
//! The messaging transport is an external collaborator. This module defines
//! the capability the core drives (`Transport`), the events a transport
//! reports back (`TransportEvent`) and the channel carrying them.

mod events;
pub mod mock;
mod traits;

pub use events::{event_channel, EventSink, EventStream, TransportEvent};
pub use traits::{InboundHandler, Transport};
