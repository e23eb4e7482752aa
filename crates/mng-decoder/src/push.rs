use std::collections::VecDeque;

use bytes::{Buf, Bytes, BytesMut};

/// Who frees a pushed buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ownership {
    /// The decoder drops it when drained.
    #[default]
    Engine,
    /// The decoder hands it back through `DataSource::release_data`.
    Caller,
}

#[derive(Debug)]
struct Range {
    remaining: Bytes,
    /// The buffer as pushed, kept for caller-owned ranges only.
    original: Option<Bytes>,
}

impl Range {
    fn new(data: Bytes, ownership: Ownership) -> Self {
        let original = match ownership {
            Ownership::Engine => None,
            Ownership::Caller => Some(data.clone()),
        };
        Self {
            remaining: data,
            original,
        }
    }
}

/// Bytes and whole chunks supplied by the host ahead of the pull.
///
/// Data ranges are consumed strictly in push order, each to zero before
/// the next. Drained caller-owned ranges are collected in a release list
/// which the owner of the queue forwards to the host.
#[derive(Debug, Default)]
pub struct PushQueue {
    ranges: VecDeque<Range>,
    chunks: VecDeque<(Bytes, Ownership)>,
    released: Vec<Bytes>,
    buffered: usize,
    ended: bool,
}

impl PushQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_data(&mut self, data: Bytes, ownership: Ownership) {
        self.buffered += data.len();
        self.ranges.push_back(Range::new(data, ownership));
    }

    /// Queue one whole chunk: 4-byte tag followed by the payload.
    pub fn push_chunk(&mut self, chunk: Bytes, ownership: Ownership) {
        self.chunks.push_back((chunk, ownership));
    }

    pub fn pop_chunk(&mut self) -> Option<(Bytes, Ownership)> {
        self.chunks.pop_front()
    }

    /// No more data will be pushed.
    pub fn end(&mut self) {
        self.ended = true;
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Data bytes not yet consumed.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffered
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffered == 0
    }

    /// Take exactly `n` bytes without copying, if the front range alone
    /// holds them.
    pub fn take_contiguous(&mut self, n: usize) -> Option<Bytes> {
        self.retire_drained();
        let front = self.ranges.front_mut()?;
        if front.remaining.len() < n {
            return None;
        }
        let bytes = front.remaining.split_to(n);
        self.buffered -= n;
        self.retire_drained();
        Some(bytes)
    }

    /// Copy up to `max` bytes into `dst`, crossing ranges as needed.
    ///
    /// # Returns
    ///
    /// The number of bytes copied.
    pub fn copy_into(&mut self, dst: &mut BytesMut, max: usize) -> usize {
        let mut copied = 0;
        while copied < max {
            self.retire_drained();
            let Some(front) = self.ranges.front_mut() else {
                break;
            };
            let n = front.remaining.len().min(max - copied);
            dst.extend_from_slice(&front.remaining[..n]);
            front.remaining.advance(n);
            copied += n;
        }
        self.buffered -= copied;
        self.retire_drained();
        copied
    }

    /// Caller-owned buffers that have been fully consumed since the last
    /// call.
    pub fn take_released(&mut self) -> Vec<Bytes> {
        std::mem::take(&mut self.released)
    }

    /// Empty the queue, returning every caller-owned buffer still held.
    pub fn drain_all(&mut self) -> Vec<Bytes> {
        let mut out = self.take_released();
        out.extend(self.ranges.drain(..).filter_map(|r| r.original));
        out.extend(
            self.chunks
                .drain(..)
                .filter(|(_, ownership)| *ownership == Ownership::Caller)
                .map(|(chunk, _)| chunk),
        );
        self.buffered = 0;
        out
    }

    fn retire_drained(&mut self) {
        while self
            .ranges
            .front()
            .is_some_and(|r| r.remaining.is_empty())
        {
            if let Some(original) = self.ranges.pop_front().and_then(|r| r.original) {
                self.released.push(original);
            }
        }
    }
}
