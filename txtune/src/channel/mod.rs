//! Channel layer: marker-driven reads and line-framed writes.
//!
//! This is the interaction engine the router session is scripted on:
//! wait for one of a few literal markers, then send the next line.

mod buffer;
mod markers;
mod telnet;

pub use buffer::MarkerBuffer;
pub use markers::MarkerSet;
pub use telnet::{ReadResult, TelnetChannel};
