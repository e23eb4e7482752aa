use std::io;

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::checkpoint::Tier;
use crate::error::Warning;
use crate::push::{Ownership, PushQueue};
use crate::source::{DataSource, Pull};

/// Outcome of one [`ByteSource::request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fill {
    /// Exactly the requested number of bytes.
    Filled(Bytes),
    /// Not enough data yet. Whatever arrived is staged and the next
    /// request for the same step picks up where this one stopped.
    Suspended,
    /// No more data will arrive. `partial` is set when some bytes of the
    /// request had already been staged.
    Exhausted { partial: bool },
}

enum Progress {
    Complete,
    Suspended,
    Exhausted { partial: bool },
}

/// Suspendable reader combining the push queue with the host pull.
///
/// ```text
///   request(n) ──▶ push queue ──▶ staging buffer ──▶ host read_data
///                  (zero-copy     (default tier or
///                   if one range   overflow tier)
///                   holds n)
/// ```
///
/// The push queue is always drained before the host is asked for more.
/// Caller-owned ranges go back to the host through `release_data` as
/// soon as they are drained, and any still queued are returned when the
/// source is dropped.
pub struct ByteSource<S: DataSource> {
    source: S,
    queue: PushQueue,
    staged: BytesMut,
    overflow: Option<BytesMut>,
    read_buffer_size: usize,
    host_eof: bool,
}

impl<S: DataSource> ByteSource<S> {
    #[must_use]
    pub fn new(source: S, read_buffer_size: usize) -> Self {
        Self {
            source,
            queue: PushQueue::new(),
            staged: BytesMut::with_capacity(read_buffer_size),
            overflow: None,
            read_buffer_size,
            host_eof: false,
        }
    }

    /// Ask for exactly `n` bytes, staged in `tier`.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the host pull. Staged bytes survive
    /// the error.
    pub fn request(&mut self, n: usize, tier: Tier) -> io::Result<Fill> {
        if self.staged(tier) == 0 {
            if let Some(bytes) = self.queue.take_contiguous(n) {
                trace!(n, "zero-copy fill from pushed data");
                self.forward_released();
                return Ok(Fill::Filled(bytes));
            }
        }

        if tier == Tier::Default {
            // Reclaims the front of the buffer once earlier frames are dropped.
            self.staged.reserve(self.read_buffer_size.max(n));
        }
        let progress = self.fill(n, tier);
        self.forward_released();

        match progress? {
            Progress::Complete => Ok(Fill::Filled(self.take_staged(tier))),
            Progress::Suspended => {
                trace!(n, staged = self.staged(tier), "suspended waiting for data");
                Ok(Fill::Suspended)
            }
            Progress::Exhausted { partial } => Ok(Fill::Exhausted { partial }),
        }
    }

    fn fill(&mut self, n: usize, tier: Tier) -> io::Result<Progress> {
        let buf = match tier {
            Tier::Default => &mut self.staged,
            Tier::Overflow => self.overflow.get_or_insert_with(|| {
                trace!(n, "allocating overflow buffer");
                BytesMut::with_capacity(n)
            }),
        };

        let have = buf.len();
        if have < n {
            self.queue.copy_into(buf, n - have);
        }

        while buf.len() < n {
            if self.queue.is_ended() || self.host_eof {
                return Ok(Progress::Exhausted {
                    partial: !buf.is_empty(),
                });
            }

            let start = buf.len();
            buf.resize(n, 0);
            let pulled = self.source.read_data(&mut buf[start..]);
            match pulled {
                Ok(Pull::Data(k)) if k > 0 => buf.truncate(start + k.min(n - start)),
                Ok(Pull::Data(_) | Pull::Pending) => {
                    buf.truncate(start);
                    return Ok(Progress::Suspended);
                }
                Ok(Pull::Eof) => {
                    buf.truncate(start);
                    self.host_eof = true;
                }
                Err(e) => {
                    buf.truncate(start);
                    return Err(e);
                }
            }
        }
        Ok(Progress::Complete)
    }

    fn take_staged(&mut self, tier: Tier) -> Bytes {
        match tier {
            Tier::Default => self.staged.split().freeze(),
            Tier::Overflow => self.overflow.take().map(BytesMut::freeze).unwrap_or_default(),
        }
    }

    /// Bytes staged for an unfinished request in `tier`.
    #[must_use]
    pub fn staged(&self, tier: Tier) -> usize {
        match tier {
            Tier::Default => self.staged.len(),
            Tier::Overflow => self.overflow.as_ref().map_or(0, BytesMut::len),
        }
    }

    pub fn push_data(&mut self, data: Bytes, ownership: Ownership) {
        self.queue.push_data(data, ownership);
    }

    pub fn push_chunk(&mut self, chunk: Bytes, ownership: Ownership) {
        self.queue.push_chunk(chunk, ownership);
    }

    pub fn pop_chunk(&mut self) -> Option<(Bytes, Ownership)> {
        self.queue.pop_chunk()
    }

    pub fn push_end(&mut self) {
        self.queue.end();
    }

    /// Pushed data bytes not yet consumed.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.queue.buffered()
    }

    /// Hand a consumed buffer back to the host if the host owns it.
    pub fn release(&mut self, data: Bytes, ownership: Ownership) {
        if ownership == Ownership::Caller {
            self.source.release_data(data);
        }
    }

    pub fn warning(&mut self, warning: &Warning) {
        self.source.warning(warning);
    }

    pub fn close(&mut self) {
        self.source.close_stream();
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn forward_released(&mut self) {
        for data in self.queue.take_released() {
            self.source.release_data(data);
        }
    }
}

impl<S: DataSource> Drop for ByteSource<S> {
    fn drop(&mut self) {
        for data in self.queue.drain_all() {
            self.source.release_data(data);
        }
    }
}
