//! Hexadecimal encoding and decoding adapters.
//!
//! Byte-to-digit conversion is delegated to the `hex` crate; this module only
//! deals with streaming, i.e. keeping digit pairs together across reads.

use crate::error::{Error, Result};
use crate::ops::{copy_all, read_all, write_all};
use crate::traits::{ReadOutcome, Sink, Source};
use std::io;

// Input bytes encoded per inner write.
const ENCODE_CHUNK: usize = 512;

/// Writes every byte as two lowercase hex digits to the wrapped sink.
#[derive(Debug)]
pub struct HexSink<S> {
    inner: S,
}

impl<S: Sink> HexSink<S> {
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

impl<S: Sink> Sink for HexSink<S> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let mut digits = [0u8; ENCODE_CHUNK * 2];
        for chunk in buf.chunks(ENCODE_CHUNK) {
            let out = &mut digits[..chunk.len() * 2];
            ::hex::encode_to_slice(chunk, out)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            write_all(&mut self.inner, out)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<usize> {
        self.inner.flush()
    }
}

/// Reads hex digit pairs from the wrapped source and yields the decoded bytes.
///
/// Upper- and lowercase digits are accepted. A stream with an odd number of
/// digits fails with [`Error::OddHexLength`] once the dangling digit is reached.
#[derive(Debug)]
pub struct HexSource<S> {
    inner: S,
}

impl<S: Source> HexSource<S> {
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

impl<S: Source> Source for HexSource<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        if buf.is_empty() {
            return Ok(ReadOutcome::Read(0));
        }
        let mut pair = [0u8; 2];
        let mut idx = 0;
        while idx < buf.len() {
            match read_all(&mut self.inner, &mut pair)? {
                2 => {
                    ::hex::decode_to_slice(pair, &mut buf[idx..idx + 1])
                        .map_err(|_| Error::InvalidHex { pair })?;
                    idx += 1;
                }
                0 => break,
                _ => return Err(Error::OddHexLength),
            }
        }
        match idx {
            0 => Ok(ReadOutcome::Eof),
            n => Ok(ReadOutcome::Read(n)),
        }
    }
}

/// Copies `src` into `sink` as hex digits. Returns the number of input bytes.
pub fn encode_hex<S, K>(src: &mut S, sink: &mut K) -> Result<usize>
where
    S: Source + ?Sized,
    K: Sink,
{
    let mut buf = [0u8; ENCODE_CHUNK];
    let mut hex = HexSink::new(sink);
    copy_all(src, &mut hex, &mut buf)
}

/// Copies the hex digits of `src` into `sink` as bytes. Returns the number of
/// decoded bytes.
pub fn decode_hex<S, K>(src: &mut S, sink: &mut K) -> Result<usize>
where
    S: Source,
    K: Sink + ?Sized,
{
    let mut buf = [0u8; ENCODE_CHUNK];
    let mut bytes = HexSource::new(src);
    copy_all(&mut bytes, sink, &mut buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{SinkExt, SourceExt};

    #[test]
    fn test_hex_sink() {
        let mut sink = Vec::<u8>::new().hex_encoded();
        assert_eq!(sink.write(b"\x00\x7f\xffHi").unwrap(), 5);
        assert_eq!(sink.get_ref().as_slice(), b"007fff4869");
    }

    #[test]
    fn test_hex_source_mixed_case() {
        let mut src = (&b"48656C6c6f"[..]).hex_decoded();
        let mut buf = [0u8; 3];
        assert_eq!(src.read(&mut buf).unwrap(), ReadOutcome::Read(3));
        assert_eq!(&buf, b"Hel");
        assert_eq!(src.read(&mut buf).unwrap(), ReadOutcome::Read(2));
        assert_eq!(&buf[..2], b"lo");
        assert_eq!(src.read(&mut buf).unwrap(), ReadOutcome::Eof);
    }

    #[test]
    fn test_hex_source_odd_length() {
        let mut src = HexSource::new(&b"414"[..]);
        let mut buf = [0u8; 4];
        assert!(matches!(src.read(&mut buf), Err(Error::OddHexLength)));
    }

    #[test]
    fn test_hex_source_invalid_digit() {
        let mut src = HexSource::new(&b"4g"[..]);
        let mut buf = [0u8; 1];
        assert!(matches!(
            src.read(&mut buf),
            Err(Error::InvalidHex { pair }) if &pair == b"4g"
        ));
    }

    #[test]
    fn test_encode_decode_streams() {
        let data: Vec<u8> = (0..2000u32).map(|i| (i * 7 % 256) as u8).collect();
        let mut encoded = Vec::new();
        assert_eq!(encode_hex(&mut &data[..], &mut encoded).unwrap(), data.len());
        assert_eq!(encoded, ::hex::encode(&data).into_bytes());

        let mut decoded = Vec::new();
        assert_eq!(decode_hex(&mut &encoded[..], &mut decoded).unwrap(), data.len());
        assert_eq!(decoded, data);
    }
}
