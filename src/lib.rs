//! # pipeio (v0.1.0)
//!
//! Composable, blocking byte-stream sources and sinks.
//!
//! ## Overview
//!
//! `pipeio` is built around two small capability traits, [`Source`] and
//! [`Sink`], and a set of adapters that wrap one source or sink and are
//! themselves a source or sink. Adapters stack freely: a file can be read
//! through a buffer, through a placeholder substitution, through a byte
//! counter, and copied into a hex encoder, without any of the layers knowing
//! about each other. Dispatch is static; every layer is a generic parameter of
//! the one above it.
//!
//! ## Key Features
//!
//! * **Tagged end of stream**: [`Source::read`] returns [`ReadOutcome`], so a
//!   zero-byte read and end of stream can never be confused
//! * **Buffering**: [`BufferedSource`] and [`BufferedSink`] with the capacity as
//!   a const parameter
//! * **Placeholder substitution**: [`ReplacerSource`] rewrites `{{name}}`
//!   spans while streaming, whatever the read sizes
//! * **std interop**: [`IoSource`], [`IoSink`], [`SourceReader`] and
//!   [`SinkWriter`] bridge to `std::io::{Read, Write}`
//!
//! ## Quick Start
//!
//! ```rust
//! use pipeio::*;
//! use std::collections::HashMap;
//!
//! fn main() -> Result<()> {
//!     let template = &b"Hello, {{who}}!"[..];
//!     let values = HashMap::from([("who".to_string(), "world".to_string())]);
//!
//!     let mut src = template.buffered().replacing(values, replacer::fail_fast);
//!     let mut out = Vec::new();
//!     let mut buf = [0u8; 64];
//!     ops::copy_all(&mut src, &mut out, &mut buf)?;
//!
//!     assert_eq!(out, b"Hello, world!");
//!     Ok(())
//! }
//! ```
//!
//! ## Ownership
//!
//! An adapter owns whatever it wraps. To keep using a stream after the adapter
//! is gone, pass `&mut stream`; to share one between several adapters, pass an
//! `Rc<RefCell<_>>`. Both implement the traits by forwarding.

pub mod adapters;
pub mod buffered_sink;
pub mod buffered_source;
pub mod error;
pub mod hex;
pub mod interop;
pub mod ops;
pub mod replacer;
pub mod traits;

// Re-export the main public API for user convenience.
pub use adapters::{
    CopyingSource, CountingSink, CountingSource, LimitedSource, MemorySink, MultiSource, NullSink,
};
pub use buffered_sink::BufferedSink;
pub use buffered_source::{BufferedSource, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use hex::{decode_hex, encode_hex, HexSink, HexSource};
pub use interop::{IoSink, IoSource, SinkWriter, SourceReader};
pub use replacer::{PlaceholderFault, ReplacerOptions, ReplacerSource};
pub use traits::{ReadOutcome, Sink, SinkExt, Source, SourceExt};
