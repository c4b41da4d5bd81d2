//! Encodes a payload to hex through a buffered sink, then decodes it back,
//! bridging to `std::io` on both ends.

use pipeio::{decode_hex, encode_hex, IoSink, IoSource, Result, Sink, SinkExt, SourceExt};
use std::io::Cursor;

fn main() -> Result<()> {
    let payload: Vec<u8> = (0..64u8).collect();

    println!("[encode] Writing {} bytes as hex into a std::io::Write", payload.len());
    let mut text: Vec<u8> = Vec::new();
    {
        let mut sink = IoSink::new(Cursor::new(&mut text)).buffered();
        encode_hex(&mut &payload[..], &mut sink)?;
        sink.flush()?;
    }
    println!("[encode] {}", String::from_utf8_lossy(&text));

    println!("[decode] Reading the digits back from a std::io::Read");
    let mut src = IoSource::new(Cursor::new(&text)).buffered();
    let mut decoded: Vec<u8> = Vec::new();
    let n = decode_hex(&mut src, &mut decoded)?;
    assert_eq!(decoded, payload);
    println!("[decode] Recovered {n} bytes, round trip ok");
    Ok(())
}
