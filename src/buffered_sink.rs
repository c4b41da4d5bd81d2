//! Write-side buffering adapter.

use crate::buffered_source::DEFAULT_CAPACITY;
use crate::error::Result;
use crate::ops::write_all;
use crate::traits::Sink;

/// A sink that collects small writes in a fixed internal buffer and hands them
/// to the wrapped sink in bulk.
///
/// Writes of at least `N` bytes skip the buffer. Every write reports its full
/// length: the adapter loops on the inner sink until each byte it decided to
/// pass on has been accepted.
///
/// Dropping the adapter flushes it. Errors raised by that final flush are
/// logged and discarded, so call [`Sink::flush`] explicitly when they matter.
pub struct BufferedSink<S: Sink, const N: usize = DEFAULT_CAPACITY> {
    inner: S,
    buffer: [u8; N],
    // bytes buffered so far; free space is N - pos
    pos: usize,
}

impl<S: Sink> BufferedSink<S> {
    /// Wraps `inner` with a buffer of [`DEFAULT_CAPACITY`] bytes.
    pub fn new(inner: S) -> Self {
        Self::wrap(inner)
    }
}

impl<S: Sink, const N: usize> BufferedSink<S, N> {
    /// Wraps `inner` with a buffer of `N` bytes.
    pub fn wrap(inner: S) -> Self {
        Self {
            inner,
            buffer: [0u8; N],
            pos: 0,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Bytes accepted but not yet passed to the inner sink.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer[..self.pos]
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    fn avail(&self) -> usize {
        N - self.pos
    }

    // Hands the buffered bytes to the inner sink without flushing it.
    fn drain(&mut self) -> Result<usize> {
        let len = self.pos;
        if len > 0 {
            write_all(&mut self.inner, &self.buffer[..len])?;
            tracing::trace!(bytes = len, "drained write buffer");
            self.pos = 0;
        }
        Ok(len)
    }
}

impl<S: Sink, const N: usize> Sink for BufferedSink<S, N> {
    fn write(&mut self, src: &[u8]) -> Result<usize> {
        let len = src.len();
        if len >= N {
            self.drain()?;
            write_all(&mut self.inner, src)?;
        } else if len <= self.avail() {
            self.buffer[self.pos..self.pos + len].copy_from_slice(src);
            self.pos += len;
            if self.pos == N {
                self.drain()?;
            }
        } else {
            self.drain()?;
            self.buffer[..len].copy_from_slice(src);
            self.pos = len;
        }
        Ok(len)
    }

    fn flush(&mut self) -> Result<usize> {
        let drained = self.drain()?;
        Ok(drained + self.inner.flush()?)
    }
}

impl<S: Sink, const N: usize> Drop for BufferedSink<S, N> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, pending = self.pos, "flush on drop failed, buffered bytes discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Accepts at most two bytes per call and records call counts.
    #[derive(Default)]
    struct TwoBytesSink {
        data: Vec<u8>,
        writes: usize,
        flushes: usize,
    }

    impl Sink for TwoBytesSink {
        fn write(&mut self, buf: &[u8]) -> Result<usize> {
            self.writes += 1;
            let n = buf.len().min(2);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> Result<usize> {
            self.flushes += 1;
            Ok(0)
        }
    }

    struct OverReportingSink;

    impl Sink for OverReportingSink {
        fn write(&mut self, buf: &[u8]) -> Result<usize> {
            Ok(buf.len() + 1)
        }

        fn flush(&mut self) -> Result<usize> {
            Ok(0)
        }
    }

    #[test]
    fn test_buffer_size() {
        let mut sink = BufferedSink::<_, 4>::wrap(TwoBytesSink::default());
        assert_eq!(sink.write(b"foo").unwrap(), 3);
        assert!(sink.get_ref().data.is_empty());
        assert_eq!(sink.write(b"42").unwrap(), 2);
        assert_eq!(sink.get_ref().data, b"foo");
        assert_eq!(sink.buffered(), b"42");
    }

    #[test]
    fn test_flush() {
        let mut sink = BufferedSink::<_, 4>::wrap(TwoBytesSink::default());
        assert_eq!(sink.write(b"foo").unwrap(), 3);
        assert!(sink.get_ref().data.is_empty());
        assert_eq!(sink.flush().unwrap(), 3);
        assert_eq!(sink.get_ref().data, b"foo");
        assert_eq!(sink.get_ref().flushes, 1);
    }

    #[test]
    fn test_overwrite() {
        let mut sink = BufferedSink::<_, 4>::wrap(TwoBytesSink::default());
        assert_eq!(sink.write(b"foo42").unwrap(), 5);
        assert_eq!(sink.get_ref().data, b"foo42");
    }

    #[test]
    fn test_exact_fill_drains_immediately() {
        let mut sink = BufferedSink::<_, 4>::wrap(TwoBytesSink::default());
        sink.write(b"ab").unwrap();
        sink.write(b"cd").unwrap();
        assert_eq!(sink.get_ref().data, b"abcd");
        assert!(sink.buffered().is_empty());
        assert_eq!(sink.get_ref().flushes, 0);
    }

    #[test]
    fn test_large_write_drains_pending_first() {
        let mut sink = BufferedSink::<_, 4>::wrap(Vec::new());
        sink.write(b"x").unwrap();
        sink.write(b"abcdefgh").unwrap();
        assert_eq!(sink.get_ref().as_slice(), b"xabcdefgh");
    }

    #[test]
    fn test_empty_write_is_buffered_noop() {
        let mut sink = BufferedSink::<_, 4>::wrap(TwoBytesSink::default());
        assert_eq!(sink.write(b"").unwrap(), 0);
        assert_eq!(sink.get_ref().writes, 0);
        assert_eq!(sink.flush().unwrap(), 0);
    }

    #[test]
    fn test_flush_counts_inner_flush() {
        let mut inner = BufferedSink::<_, 8>::wrap(Vec::new());
        inner.write(b"abc").unwrap();
        let mut outer = BufferedSink::<_, 8>::wrap(&mut inner);
        outer.write(b"de").unwrap();
        // two bytes from this layer, five from the inner one
        assert_eq!(outer.flush().unwrap(), 7);
        drop(outer);
        assert_eq!(inner.get_ref().as_slice(), b"abcde");
    }

    #[test]
    fn test_drop_flushes() {
        let shared = Rc::new(RefCell::new(Vec::new()));
        {
            let mut sink = BufferedSink::new(Rc::clone(&shared));
            sink.write(b"hello").unwrap();
            assert!(shared.borrow().is_empty());
        }
        assert_eq!(shared.borrow().as_slice(), b"hello");
    }

    #[test]
    fn test_over_reporting_inner_fails() {
        let mut sink = BufferedSink::<_, 4>::wrap(OverReportingSink);
        sink.write(b"ab").unwrap();
        assert!(matches!(
            sink.flush(),
            Err(Error::InvalidResult {
                operation: "write",
                ..
            })
        ));
    }

    #[test]
    fn test_drop_swallows_flush_error() {
        let mut sink = BufferedSink::<_, 16>::wrap(OverReportingSink);
        sink.write(&[0u8; 8]).unwrap();
        drop(sink);
    }
}
