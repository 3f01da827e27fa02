//! Growable receive buffer.
//!
//! Wraps a [`BytesMut`] with a logical window that doubles on demand and is
//! capped at a configured limit. Bytes past `len()` are never exposed.

use std::io;

use bytes::BytesMut;
use tokio::io::AsyncRead;

use crate::http::reader::{read_exactly, read_some};

#[derive(Debug)]
pub struct RecvBuffer {
    data: BytesMut,
    window: usize,
    limit: usize,
}

impl RecvBuffer {
    /// Creates a buffer with an initial window of `initial` bytes that may
    /// grow up to `limit` bytes.
    pub fn new(initial: usize, limit: usize) -> Self {
        let limit = limit.max(1);
        let window = initial.clamp(1, limit);
        Self {
            data: BytesMut::with_capacity(window),
            window,
            limit,
        }
    }

    /// Number of valid bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current logical capacity.
    pub fn capacity(&self) -> usize {
        self.window
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Raises the growth ceiling. Never shrinks the current window.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(self.window);
    }

    pub fn is_full(&self) -> bool {
        self.data.len() >= self.window
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Doubles the window, clamped to the limit.
    ///
    /// Returns `false` when the window already sits at the limit.
    pub fn grow(&mut self) -> bool {
        if self.window >= self.limit {
            return false;
        }
        self.window = self.window.saturating_mul(2).min(self.limit);
        self.data.reserve(self.window - self.data.len());
        true
    }

    /// Grows the window until it holds at least `total` bytes.
    ///
    /// Returns `false` if the limit does not allow it; the window is then
    /// left at the limit.
    pub fn reserve_to(&mut self, total: usize) -> bool {
        while self.window < total {
            if !self.grow() {
                return false;
            }
        }
        true
    }

    /// Performs one read into the free part of the window.
    pub async fn fill<R>(&mut self, reader: &mut R) -> io::Result<usize>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        debug_assert!(!self.is_full(), "fill called on a full window");
        let filled = self.data.len();
        self.data.resize(self.window, 0);
        let result = read_some(reader, &mut self.data[filled..]).await;
        let n = *result.as_ref().unwrap_or(&0);
        self.data.truncate(filled + n);
        result
    }

    /// Appends up to `n` bytes, stopping early only at EOF.
    ///
    /// The window must already have room for `n` more bytes.
    pub async fn fill_exactly<R>(&mut self, reader: &mut R, n: usize) -> io::Result<usize>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let filled = self.data.len();
        let end = (filled + n).min(self.window);
        self.data.resize(end, 0);
        let result = read_exactly(reader, &mut self.data[filled..]).await;
        let got = *result.as_ref().unwrap_or(&0);
        self.data.truncate(filled + got);
        result
    }

    /// Drops everything past `len` valid bytes.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Frees the storage. The buffer stays usable with its current window.
    pub fn release(&mut self) {
        self.data = BytesMut::new();
    }

    /// Splits off the bytes from `at` onwards, leaving `[0, at)` in place.
    pub fn split_off(&mut self, at: usize) -> BytesMut {
        self.data.split_off(at)
    }
}
