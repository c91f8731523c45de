//! Accumulating buffer with tail-only marker search.
//!
//! The buffer is checked after every appended byte, so any marker that
//! newly appears must end at the last byte. Searching only the last
//! `longest marker` bytes is therefore equivalent to searching the whole
//! buffer, and keeps each check O(marker length) instead of O(output).

use bytes::{Bytes, BytesMut};

use super::markers::MarkerSet;

/// Buffer for accumulating output one byte at a time.
#[derive(Debug)]
pub struct MarkerBuffer {
    buffer: BytesMut,
}

impl MarkerBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(1024),
        }
    }

    /// Append one byte.
    pub fn push(&mut self, byte: u8) {
        self.buffer.extend_from_slice(&[byte]);
    }

    /// Search the tail of the buffer for any marker.
    ///
    /// Only valid when called after every `push`; see the module docs.
    pub fn search_tail(&self, markers: &MarkerSet) -> Option<usize> {
        let start = self.buffer.len().saturating_sub(markers.longest());
        markers.find_in(&self.buffer[start..])
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> Bytes {
        self.buffer.split().freeze()
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for MarkerBuffer {
    fn default() -> Self {
        Self::new()
    }
}
