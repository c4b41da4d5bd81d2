//! Small pass-through adapters and fixed endpoints.
//!
//! None of these buffer anything; each one forwards a call to the wrapped
//! stream and does a little bookkeeping on the way.

use crate::error::{Error, Result};
use crate::ops::write_all;
use crate::traits::{ReadOutcome, Sink, Source};

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    #[inline(always)]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        Ok(buf.len())
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<usize> {
        Ok(0)
    }
}

/// Counts the bytes read through it.
#[derive(Debug)]
pub struct CountingSource<S> {
    inner: S,
    count: usize,
}

impl<S: Source> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, count: 0 }
    }

    /// Bytes delivered so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Source> Source for CountingSource<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        let outcome = self.inner.read(buf)?;
        self.count += outcome.bytes();
        Ok(outcome)
    }
}

/// Counts the bytes written through it.
#[derive(Debug)]
pub struct CountingSink<S> {
    inner: S,
    count: usize,
}

impl<S: Sink> CountingSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, count: 0 }
    }

    /// Bytes accepted by the inner sink so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Sink> Sink for CountingSink<S> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let written = self.inner.write(buf)?;
        self.count += written;
        Ok(written)
    }

    fn flush(&mut self) -> Result<usize> {
        self.inner.flush()
    }
}

/// Delivers at most `limit` bytes of the wrapped source, then reports EOF
/// without touching it again.
#[derive(Debug)]
pub struct LimitedSource<S> {
    inner: CountingSource<S>,
    limit: usize,
}

impl<S: Source> LimitedSource<S> {
    pub fn new(inner: S, limit: usize) -> Self {
        Self {
            inner: CountingSource::new(inner),
            limit,
        }
    }

    /// Bytes delivered so far.
    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn get_ref(&self) -> &S {
        self.inner.get_ref()
    }

    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }
}

impl<S: Source> Source for LimitedSource<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        let remaining = self.limit.saturating_sub(self.inner.count());
        if remaining == 0 {
            return Ok(ReadOutcome::Eof);
        }
        let len = buf.len().min(remaining);
        self.inner.read(&mut buf[..len])
    }
}

/// A tee: every chunk read from the source is also written to the sink.
#[derive(Debug)]
pub struct CopyingSource<S, K> {
    src: S,
    sink: K,
}

impl<S: Source, K: Sink> CopyingSource<S, K> {
    pub fn new(src: S, sink: K) -> Self {
        Self { src, sink }
    }

    /// Flushes the copy sink.
    pub fn flush(&mut self) -> Result<usize> {
        self.sink.flush()
    }

    pub fn get_source(&self) -> &S {
        &self.src
    }

    pub fn get_sink(&self) -> &K {
        &self.sink
    }

    pub fn into_parts(self) -> (S, K) {
        (self.src, self.sink)
    }
}

impl<S: Source, K: Sink> Source for CopyingSource<S, K> {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        let outcome = self.src.read(buf)?;
        if let ReadOutcome::Read(n) = outcome {
            write_all(&mut self.sink, &buf[..n])?;
        }
        Ok(outcome)
    }
}

/// Reads a sequence of sources back to back.
pub struct MultiSource<I: Iterator> {
    sources: I,
    current: Option<I::Item>,
}

impl<I> MultiSource<I>
where
    I: Iterator,
    I::Item: Source,
{
    pub fn new<T: IntoIterator<IntoIter = I>>(sources: T) -> Self {
        Self {
            sources: sources.into_iter(),
            current: None,
        }
    }
}

impl<I> Source for MultiSource<I>
where
    I: Iterator,
    I::Item: Source,
{
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        loop {
            if self.current.is_none() {
                self.current = self.sources.next();
            }
            let Some(src) = self.current.as_mut() else {
                return Ok(ReadOutcome::Eof);
            };
            match src.read(buf)? {
                ReadOutcome::Eof => self.current = None,
                outcome => return Ok(outcome),
            }
        }
    }
}

/// A sink over a caller-provided fixed buffer.
///
/// A write that does not fit fails with [`Error::WriteOverflow`] and leaves
/// the buffer untouched.
#[derive(Debug)]
pub struct MemorySink<'a> {
    dest: &'a mut [u8],
    len: usize,
}

impl<'a> MemorySink<'a> {
    pub fn new(dest: &'a mut [u8]) -> Self {
        Self { dest, len: 0 }
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.dest[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> usize {
        self.dest.len() - self.len
    }
}

impl Sink for MemorySink<'_> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.len() > self.remaining() {
            return Err(Error::WriteOverflow {
                requested: buf.len(),
                available: self.remaining(),
            });
        }
        self.dest[self.len..self.len + buf.len()].copy_from_slice(buf);
        self.len += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<usize> {
        Ok(0)
    }
}
