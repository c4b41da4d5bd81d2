//! Looping helpers that drive a source or sink to completion despite short reads
//! and partial writes.
//!
//! Every helper checks the byte counts reported by the stream it drives. A count
//! larger than the request is a broken contract and fails immediately with
//! [`Error::InvalidResult`]; nothing is retried.

use crate::error::{Error, Result};
use crate::traits::{ReadOutcome, Sink, Source};
use std::io;

/// Writes the whole of `buf` to `sink`, looping over partial writes.
///
/// A sink that accepts zero bytes of a non-empty write fails with
/// `io::ErrorKind::WriteZero` instead of spinning forever.
pub fn write_all<S: Sink + ?Sized>(sink: &mut S, buf: &[u8]) -> Result<()> {
    let mut written = 0;
    while written < buf.len() {
        let requested = buf.len() - written;
        let amt = sink.write(&buf[written..])?;
        if amt > requested {
            return Err(Error::invalid_result("write", amt, requested));
        }
        if amt == 0 {
            return Err(io::Error::from(io::ErrorKind::WriteZero).into());
        }
        written += amt;
    }
    Ok(())
}

/// Reads until `buf` is full or the source reports EOF.
///
/// Returns the number of bytes read, which is short of `buf.len()` only at EOF.
pub fn read_all<S: Source + ?Sized>(src: &mut S, buf: &mut [u8]) -> Result<usize> {
    let mut read = 0;
    while read < buf.len() {
        let requested = buf.len() - read;
        match src.read(&mut buf[read..])? {
            ReadOutcome::Read(amt) if amt > requested => {
                return Err(Error::invalid_result("read", amt, requested));
            }
            ReadOutcome::Read(amt) => read += amt,
            ReadOutcome::Eof => break,
        }
    }
    Ok(read)
}

/// Fills `buf` completely or fails with [`Error::InsufficientBytes`].
pub fn read_exact<S: Source + ?Sized>(src: &mut S, buf: &mut [u8]) -> Result<()> {
    let read = read_all(src, buf)?;
    if read != buf.len() {
        return Err(Error::insufficient(read, buf.len()));
    }
    Ok(())
}

/// Pumps `src` into `sink` through the scratch buffer `buf` until EOF.
///
/// Returns the total number of bytes copied. The sink is not flushed.
pub fn copy_all<S, K>(src: &mut S, sink: &mut K, buf: &mut [u8]) -> Result<usize>
where
    S: Source + ?Sized,
    K: Sink + ?Sized,
{
    if buf.is_empty() {
        return Err(Error::invalid_config("copy buffer must not be empty"));
    }
    let mut total = 0;
    loop {
        let amt = read_all(src, buf)?;
        if amt > 0 {
            write_all(sink, &buf[..amt])?;
            total += amt;
        }
        if amt < buf.len() {
            return Ok(total);
        }
    }
}

/// Discards exactly `to_skip` bytes, reading them through `buf` in chunks.
pub fn skip<S: Source + ?Sized>(src: &mut S, buf: &mut [u8], to_skip: usize) -> Result<()> {
    if buf.is_empty() && to_skip > 0 {
        return Err(Error::invalid_config("skip buffer must not be empty"));
    }
    let mut remaining = to_skip;
    while remaining > 0 {
        let chunk = remaining.min(buf.len());
        read_exact(src, &mut buf[..chunk])?;
        remaining -= chunk;
    }
    Ok(())
}
