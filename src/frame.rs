//! Frame-aligned batching for high-frequency input.
//!
//! Pointer moves can arrive many times per display refresh. A [`FrameQueue`]
//! keeps only the latest value pushed since the last flush; the host calls
//! [`FrameQueue::flush`] once per refresh tick. It is independent of any
//! particular refresh API.

/// Coalesce-to-latest queue, flushed once per tick.
#[derive(Debug)]
pub struct FrameQueue<T> {
    pending: Option<T>,
    /// Values replaced before they were flushed
    coalesced: u64,
    flushed: u64,
}

impl<T> Default for FrameQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            coalesced: 0,
            flushed: 0,
        }
    }

    /// Queue `value`, replacing anything not yet flushed.
    pub fn push(&mut self, value: T) {
        if self.pending.replace(value).is_some() {
            self.coalesced += 1;
        }
    }

    /// Take the latest value for this tick.
    pub fn flush(&mut self) -> Option<T> {
        let value = self.pending.take();
        if value.is_some() {
            self.flushed += 1;
        }
        value
    }

    /// Drop anything pending without applying it.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn coalesced_count(&self) -> u64 {
        self.coalesced
    }

    pub fn flushed_count(&self) -> u64 {
        self.flushed
    }
}
