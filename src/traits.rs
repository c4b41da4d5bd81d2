//! Core traits for the pipeio library.
//!
//! Every adapter in the crate is generic over these two contracts, so stacks of
//! adapters are resolved statically and never go through a vtable unless the
//! caller asks for one with `Box<dyn Source>`.

use crate::adapters::{CountingSink, CountingSource, LimitedSource};
use crate::buffered_sink::BufferedSink;
use crate::buffered_source::BufferedSource;
use crate::error::Result;
use crate::hex::{HexSink, HexSource};
use crate::replacer::{PlaceholderFault, ReplacerSource};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Outcome of a single [`Source::read`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// This many bytes were written to the front of the buffer.
    /// Zero is a valid, non-terminal answer.
    Read(usize),
    /// The source has no more data.
    Eof,
}

impl ReadOutcome {
    #[inline]
    pub fn is_eof(self) -> bool {
        matches!(self, ReadOutcome::Eof)
    }

    /// Number of bytes read, with `Eof` counting as zero.
    #[inline]
    pub fn bytes(self) -> usize {
        match self {
            ReadOutcome::Read(n) => n,
            ReadOutcome::Eof => 0,
        }
    }
}

/// A readable byte stream.
///
/// Implementations fill the front of `buf` and return how many bytes they
/// produced, which must never exceed `buf.len()`. A short read is not an end of
/// stream; only [`ReadOutcome::Eof`] is.
pub trait Source {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome>;
}

/// A writable byte stream.
pub trait Sink {
    /// Writes a prefix of `buf` and returns its length. Must not exceed `buf.len()`.
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Pushes any buffered bytes downstream and returns how many were flushed.
    fn flush(&mut self) -> Result<usize>;
}

//--- Ownership forwarding ---

impl<S: Source + ?Sized> Source for &mut S {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        (**self).read(buf)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        (**self).read(buf)
    }
}

/// Shared ownership. Panics if the source is already borrowed, which can only
/// happen through re-entrant use from the same thread.
impl<S: Source + ?Sized> Source for Rc<RefCell<S>> {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        self.borrow_mut().read(buf)
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    #[inline]
    fn flush(&mut self) -> Result<usize> {
        (**self).flush()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    #[inline]
    fn flush(&mut self) -> Result<usize> {
        (**self).flush()
    }
}

impl<S: Sink + ?Sized> Sink for Rc<RefCell<S>> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> Result<usize> {
        self.borrow_mut().flush()
    }
}

//--- In-memory endpoints ---

/// Reading from a byte slice consumes it from the front.
impl Source for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        if buf.is_empty() {
            return Ok(ReadOutcome::Read(0));
        }
        if self.is_empty() {
            return Ok(ReadOutcome::Eof);
        }
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(ReadOutcome::Read(n))
    }
}

/// A growable sink that never rejects a write.
impl Sink for Vec<u8> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<usize> {
        Ok(0)
    }
}

//--- Fluent Extension Traits ---

/// Extension methods for sources to enable fluent composition without importing adapter types.
pub trait SourceExt: Source + Sized {
    /// Wrap in a [`BufferedSource`] with the default capacity.
    fn buffered(self) -> BufferedSource<Self> {
        BufferedSource::new(self)
    }

    /// Count the bytes delivered.
    fn counting(self) -> CountingSource<Self> {
        CountingSource::new(self)
    }

    /// Deliver at most `limit` bytes.
    fn limited(self, limit: usize) -> LimitedSource<Self> {
        LimitedSource::new(self, limit)
    }

    /// Substitute `{{name}}` placeholders with default delimiters.
    fn replacing<F>(self, values: HashMap<String, String>, on_error: F) -> ReplacerSource<Self, F>
    where
        F: FnMut(&PlaceholderFault) -> Result<()>,
    {
        ReplacerSource::new(self, values, on_error)
    }

    /// Decode a stream of hex digit pairs.
    fn hex_decoded(self) -> HexSource<Self> {
        HexSource::new(self)
    }
}

impl<T: Source> SourceExt for T {}

/// Extension methods for sinks to enable fluent composition without importing adapter types.
pub trait SinkExt: Sink + Sized {
    /// Wrap in a [`BufferedSink`] with the default capacity.
    fn buffered(self) -> BufferedSink<Self> {
        BufferedSink::new(self)
    }

    /// Count the bytes accepted.
    fn counting(self) -> CountingSink<Self> {
        CountingSink::new(self)
    }

    /// Write every byte as two lowercase hex digits.
    fn hex_encoded(self) -> HexSink<Self> {
        HexSink::new(self)
    }
}

impl<T: Sink> SinkExt for T {}
