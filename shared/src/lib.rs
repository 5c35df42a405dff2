#![warn(rust_2018_idioms)]

pub mod error;
pub mod time;
pub mod transport;

pub use time::{Clock, MonotonicClock};
pub use transport::{TaggedBytesMut, TransportContext, TransportMessage, TransportProtocol};
