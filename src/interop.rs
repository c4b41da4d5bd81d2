//! Bridges between [`Source`]/[`Sink`] and `std::io::{Read, Write}`.
//!
//! The library itself never opens files or sockets; these shims let callers
//! plug whatever std stream they already have into an adapter stack, and hand
//! an adapter stack to code that expects std traits.

use crate::error::{Error, Result};
use crate::traits::{ReadOutcome, Sink, Source};
use std::io::{self, Read, Write};

/// A [`Source`] over any `std::io::Read`.
///
/// A zero-byte read into a non-empty buffer is std's end-of-stream signal and
/// becomes [`ReadOutcome::Eof`].
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Source for IoSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        if buf.is_empty() {
            return Ok(ReadOutcome::Read(0));
        }
        match self.inner.read(buf)? {
            0 => Ok(ReadOutcome::Eof),
            n => Ok(ReadOutcome::Read(n)),
        }
    }
}

/// A [`Sink`] over any `std::io::Write`. `flush` reports 0 bytes since std
/// does not expose how much it pushed.
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W: Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink for IoSink<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        Ok(self.inner.write(buf)?)
    }

    fn flush(&mut self) -> Result<usize> {
        self.inner.flush()?;
        Ok(0)
    }
}

/// Exposes a [`Source`] as `std::io::Read`.
#[derive(Debug)]
pub struct SourceReader<S> {
    inner: S,
}

impl<S: Source> SourceReader<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Source> Read for SourceReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.inner.read(buf).map_err(into_io)? {
                ReadOutcome::Eof => return Ok(0),
                // std reserves 0 for end of stream
                ReadOutcome::Read(0) if !buf.is_empty() => continue,
                ReadOutcome::Read(n) => return Ok(n),
            }
        }
    }
}

/// Exposes a [`Sink`] as `std::io::Write`.
#[derive(Debug)]
pub struct SinkWriter<S> {
    inner: S,
}

impl<S: Sink> SinkWriter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Sink> Write for SinkWriter<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).map_err(into_io)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().map_err(into_io)?;
        Ok(())
    }
}

fn into_io(err: Error) -> io::Error {
    match err {
        Error::Io(e) => e,
        Error::InsufficientBytes { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
        other => io::Error::new(io::ErrorKind::Other, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffered_sink::BufferedSink;
    use crate::ops::copy_all;
    use std::io::Cursor;

    #[test]
    fn test_io_source_maps_zero_to_eof() {
        let mut src = IoSource::new(Cursor::new(b"ab".to_vec()));
        let mut buf = [0u8; 4];
        assert_eq!(src.read(&mut buf).unwrap(), ReadOutcome::Read(2));
        assert_eq!(src.read(&mut buf).unwrap(), ReadOutcome::Eof);
        assert_eq!(src.read(&mut []).unwrap(), ReadOutcome::Read(0));
    }

    #[test]
    fn test_source_reader_read_to_end() {
        let mut reader = SourceReader::new(&b"hello world"[..]);
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn test_sink_writer_write_fmt() {
        let mut writer = SinkWriter::new(BufferedSink::<_, 8>::wrap(Vec::new()));
        write!(writer, "{}-{}", 4, 2).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.get_ref().get_ref().as_slice(), b"4-2");
    }

    #[test]
    fn test_copy_between_std_streams() {
        let mut src = IoSource::new(Cursor::new(vec![7u8; 10_000]));
        let mut sink = IoSink::new(Vec::new());
        let mut buf = [0u8; 333];
        assert_eq!(copy_all(&mut src, &mut sink, &mut buf).unwrap(), 10_000);
        assert_eq!(sink.into_inner(), vec![7u8; 10_000]);
    }

    #[test]
    fn test_errors_become_io_errors() {
        let err = into_io(Error::OddHexLength);
        assert_eq!(err.kind(), io::ErrorKind::Other);
        let err = into_io(Error::insufficient(1, 2));
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
