//! Read-side buffering adapter.

use crate::error::{Error, Result};
use crate::traits::{ReadOutcome, Source};

/// Default capacity of the internal buffer of the buffered adapters.
pub const DEFAULT_CAPACITY: usize = 4096;

/// A source that serves small reads from a fixed internal buffer and refills it
/// from the wrapped source in bulk.
///
/// Requests larger than the buffer bypass it and are read straight into the
/// caller's slice. Every pull from the inner source loops until the requested
/// amount is there or the inner source reports EOF; once EOF has been seen the
/// inner source is never read again.
///
/// The capacity is the const parameter `N`:
///
/// ```rust
/// use pipeio::{BufferedSource, ReadOutcome, Source};
///
/// let mut src = BufferedSource::<_, 16>::wrap(&b"hello"[..]);
/// let mut buf = [0u8; 5];
/// assert_eq!(src.read(&mut buf)?, ReadOutcome::Read(5));
/// assert_eq!(src.read(&mut buf)?, ReadOutcome::Eof);
/// # Ok::<(), pipeio::Error>(())
/// ```
pub struct BufferedSource<S, const N: usize = DEFAULT_CAPACITY> {
    inner: S,
    exhausted: bool,
    buffer: [u8; N],
    // [pos, pos + avail) holds unread bytes
    pos: usize,
    avail: usize,
}

impl<S: Source> BufferedSource<S> {
    /// Wraps `inner` with a buffer of [`DEFAULT_CAPACITY`] bytes.
    pub fn new(inner: S) -> Self {
        Self::wrap(inner)
    }
}

impl<S: Source, const N: usize> BufferedSource<S, N> {
    /// Wraps `inner` with a buffer of `N` bytes.
    pub fn wrap(inner: S) -> Self {
        Self {
            inner,
            exhausted: false,
            buffer: [0u8; N],
            pos: 0,
            avail: 0,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consumes the adapter. Bytes still buffered are dropped.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Bytes pulled from the inner source but not yet handed out.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer[self.pos..self.pos + self.avail]
    }

    /// Whether the inner source has reported EOF.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Reads one byte at a time until the line ends with `ending` or
    /// `max_length` bytes have been collected. The ending is stripped.
    ///
    /// A line made of the ending alone does not terminate, so a blank line is
    /// folded into the line that follows it. Returns an empty vector at EOF.
    /// An empty `ending` is rejected with [`Error::InvalidConfig`].
    pub fn read_line(&mut self, ending: &[u8], max_length: usize) -> Result<Vec<u8>> {
        if ending.is_empty() {
            return Err(Error::invalid_config("line ending must not be empty"));
        }
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        while line.len() < max_length {
            match self.read(&mut byte)? {
                ReadOutcome::Read(0) => continue,
                ReadOutcome::Read(_) => {
                    line.push(byte[0]);
                    if line.len() > ending.len() && line.ends_with(ending) {
                        line.truncate(line.len() - ending.len());
                        break;
                    }
                }
                ReadOutcome::Eof => break,
            }
        }
        Ok(line)
    }
}

impl<S: Source, const N: usize> Source for BufferedSource<S, N> {
    fn read(&mut self, dest: &mut [u8]) -> Result<ReadOutcome> {
        let ulen = dest.len();
        if ulen <= self.avail {
            dest.copy_from_slice(&self.buffer[self.pos..self.pos + ulen]);
            self.pos += ulen;
            self.avail -= ulen;
            return Ok(ReadOutcome::Read(ulen));
        }

        let head = self.avail;
        dest[..head].copy_from_slice(&self.buffer[self.pos..self.pos + head]);
        self.pos = 0;
        self.avail = 0;

        let remaining = ulen - head;
        let tail = if remaining > N {
            let read = fill_from(&mut self.inner, &mut self.exhausted, &mut dest[head..])?;
            tracing::trace!(requested = remaining, read, "direct read from inner source");
            read
        } else {
            let filled = fill_from(&mut self.inner, &mut self.exhausted, &mut self.buffer)?;
            tracing::trace!(capacity = N, filled, "refilled read buffer");
            let to_copy = remaining.min(filled);
            dest[head..head + to_copy].copy_from_slice(&self.buffer[..to_copy]);
            self.pos = to_copy;
            self.avail = filled - to_copy;
            to_copy
        };

        match head + tail {
            0 => Ok(ReadOutcome::Eof),
            total => Ok(ReadOutcome::Read(total)),
        }
    }
}

// Loops on `inner` until `buf` is full or EOF is latched.
fn fill_from<S: Source>(inner: &mut S, exhausted: &mut bool, buf: &mut [u8]) -> Result<usize> {
    if *exhausted {
        return Ok(0);
    }
    let mut filled = 0;
    while filled < buf.len() {
        let requested = buf.len() - filled;
        match inner.read(&mut buf[filled..])? {
            ReadOutcome::Read(amt) if amt > requested => {
                return Err(Error::invalid_result("read", amt, requested));
            }
            ReadOutcome::Read(amt) => filled += amt,
            ReadOutcome::Eof => {
                *exhausted = true;
                break;
            }
        }
    }
    Ok(filled)
}
