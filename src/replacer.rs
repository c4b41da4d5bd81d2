//! Streaming `{{placeholder}}` substitution.
//!
//! [`ReplacerSource`] rewrites a byte stream on the fly: every
//! `prefix name postfix` span whose name is present in the value map is replaced
//! by the mapped value. Input is consumed one byte at a time through a
//! [`BufferedSource`], so a placeholder may straddle any number of reads and is
//! never required to sit in memory as a whole beyond its own name.
//!
//! Problems with placeholders are not errors of the stream itself. They are
//! reported to a caller-supplied handler, which decides the policy: return
//! `Err` to abort the read (see [`fail_fast`]) or `Ok(())` to keep going (see
//! [`ignore_faults`]). When a fault is ignored, the offending text is passed
//! through literally.
//!
//! ```rust
//! use pipeio::{ops, replacer, ReplacerSource};
//! use std::collections::HashMap;
//!
//! let values = HashMap::from([("abc".to_string(), "bar".to_string())]);
//! let mut src = ReplacerSource::new(&b"fox{{abc}}42"[..], values, replacer::fail_fast);
//! let mut out = [0u8; 16];
//! let n = ops::read_all(&mut src, &mut out)?;
//! assert_eq!(&out[..n], b"foxbar42");
//! # Ok::<(), pipeio::Error>(())
//! ```

use crate::buffered_source::BufferedSource;
use crate::error::{Error, Result};
use crate::traits::{ReadOutcome, Source};
use std::collections::HashMap;

/// A placeholder problem handed to the replacer's fault handler.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderFault {
    /// A complete placeholder whose name has no value.
    #[error("Parameter: [{name}] not found")]
    Unresolved { name: String },
    /// A placeholder that reached the configured length limit before closing.
    #[error("Parameter name: [{name}] is too long")]
    TooLong { name: String },
    /// The stream ended inside a placeholder.
    #[error("Invalid unclosed placeholder: [{name}]")]
    Unclosed { name: String },
}

impl PlaceholderFault {
    /// The (possibly partial) placeholder name involved.
    pub fn name(&self) -> &str {
        match self {
            Self::Unresolved { name } | Self::TooLong { name } | Self::Unclosed { name } => name,
        }
    }
}

/// Fault handler that turns every placeholder fault into an error.
pub fn fail_fast(fault: &PlaceholderFault) -> Result<()> {
    Err(Error::Placeholder(fault.clone()))
}

/// Fault handler that passes faulty placeholders through unchanged.
pub fn ignore_faults(_fault: &PlaceholderFault) -> Result<()> {
    Ok(())
}

/// Delimiters and limits of a [`ReplacerSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacerOptions {
    pub prefix: String,
    pub postfix: String,
    /// Longest accepted placeholder, counted in bytes between the delimiters.
    pub max_placeholder_len: usize,
    /// A read stops pulling input once this many output bytes are pending.
    pub queue_limit: usize,
}

impl Default for ReplacerOptions {
    fn default() -> Self {
        Self {
            prefix: "{{".to_string(),
            postfix: "}}".to_string(),
            max_placeholder_len: 255,
            queue_limit: 4096,
        }
    }
}

impl ReplacerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiters(mut self, prefix: impl Into<String>, postfix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.postfix = postfix.into();
        self
    }

    pub fn with_max_placeholder_len(mut self, max_placeholder_len: usize) -> Self {
        self.max_placeholder_len = max_placeholder_len;
        self
    }

    pub fn with_queue_limit(mut self, queue_limit: usize) -> Self {
        self.queue_limit = queue_limit;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() || self.postfix.is_empty() {
            return Err(Error::invalid_config("placeholder delimiters must not be empty"));
        }
        if self.max_placeholder_len == 0 {
            return Err(Error::invalid_config("placeholder length limit must be positive"));
        }
        if self.queue_limit == 0 {
            return Err(Error::invalid_config("queue limit must be positive"));
        }
        Ok(())
    }
}

//--- Parser ---

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// Plain text; `matched` bytes of the prefix have been seen.
    Prefix { matched: usize },
    /// Inside a placeholder; `name` includes any partially matched postfix.
    Placeholder { name: Vec<u8>, matched: usize },
}

/// What the parser needs the replacer to act on.
#[derive(Debug, PartialEq, Eq)]
enum Token {
    Complete(Vec<u8>),
    Overlong(Vec<u8>),
}

/// Resumable placeholder scanner, fed one byte per [`Parser::step`].
#[derive(Debug)]
struct Parser {
    prefix: Vec<u8>,
    postfix: Vec<u8>,
    max_len: usize,
    state: State,
}

impl Parser {
    fn new(options: &ReplacerOptions) -> Self {
        Self {
            prefix: options.prefix.as_bytes().to_vec(),
            postfix: options.postfix.as_bytes().to_vec(),
            max_len: options.max_placeholder_len,
            state: State::Prefix { matched: 0 },
        }
    }

    /// Consumes one input byte. Literal output goes to `out`.
    fn step(&mut self, byte: u8, out: &mut Vec<u8>) -> Option<Token> {
        match &mut self.state {
            State::Prefix { matched } => {
                if byte == self.prefix[*matched] {
                    *matched += 1;
                } else {
                    // false start: what matched so far was plain text
                    out.extend_from_slice(&self.prefix[..*matched]);
                    out.push(byte);
                    *matched = 0;
                }
                if *matched == self.prefix.len() {
                    self.state = State::Placeholder {
                        name: Vec::new(),
                        matched: 0,
                    };
                }
                None
            }
            State::Placeholder { name, matched } => {
                name.push(byte);
                // the limit covers every accumulated byte, postfix included
                if name.len() >= self.max_len {
                    let name = std::mem::take(name);
                    self.state = State::Prefix { matched: 0 };
                    return Some(Token::Overlong(name));
                }
                if byte == self.postfix[*matched] {
                    *matched += 1;
                } else {
                    *matched = 0;
                }
                if *matched == self.postfix.len() {
                    let mut name = std::mem::take(name);
                    name.truncate(name.len() - self.postfix.len());
                    self.state = State::Prefix { matched: 0 };
                    return Some(Token::Complete(name));
                }
                None
            }
        }
    }

    /// Called at end of input. Emits a dangling partial prefix and returns the
    /// name of an unclosed placeholder, unless nothing followed the prefix.
    fn finish(&mut self, out: &mut Vec<u8>) -> Option<Vec<u8>> {
        match std::mem::replace(&mut self.state, State::Prefix { matched: 0 }) {
            State::Prefix { matched } => {
                out.extend_from_slice(&self.prefix[..matched]);
                None
            }
            State::Placeholder { name, .. } if name.is_empty() => None,
            State::Placeholder { name, .. } => Some(name),
        }
    }
}

//--- Source ---

/// A source that substitutes placeholders in the stream read from `S`.
///
/// The handler `F` is invoked synchronously for unresolved names, names that
/// hit `max_placeholder_len`, and a non-empty placeholder left open at end of
/// input.
/// The last one is reported once, right before EOF.
pub struct ReplacerSource<S, F> {
    src: BufferedSource<S>,
    exhausted: bool,
    values: HashMap<String, String>,
    on_error: F,
    parser: Parser,
    queue_limit: usize,
    // resolved output not yet delivered: pending[pos..]
    pending: Vec<u8>,
    pos: usize,
    unclosed: Option<Vec<u8>>,
}

impl<S, F> ReplacerSource<S, F>
where
    S: Source,
    F: FnMut(&PlaceholderFault) -> Result<()>,
{
    /// Creates a replacer with the default `{{` / `}}` delimiters.
    pub fn new(src: S, values: HashMap<String, String>, on_error: F) -> Self {
        Self::build(src, values, on_error, ReplacerOptions::default())
    }

    /// Creates a replacer with explicit options. Fails on empty delimiters.
    pub fn with_options(
        src: S,
        values: HashMap<String, String>,
        on_error: F,
        options: ReplacerOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(src, values, on_error, options))
    }

    fn build(src: S, values: HashMap<String, String>, on_error: F, options: ReplacerOptions) -> Self {
        Self {
            src: BufferedSource::new(src),
            exhausted: false,
            values,
            on_error,
            parser: Parser::new(&options),
            queue_limit: options.queue_limit,
            pending: Vec::new(),
            pos: 0,
            unclosed: None,
        }
    }

    pub fn get_ref(&self) -> &S {
        self.src.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut S {
        self.src.get_mut()
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.values
    }

    fn copy_pending(&mut self, buf: &mut [u8]) -> usize {
        let avail = &self.pending[self.pos..];
        let n = avail.len().min(buf.len());
        buf[..n].copy_from_slice(&avail[..n]);
        self.pos += n;
        n
    }

    fn report(&mut self, fault: PlaceholderFault) -> Result<()> {
        tracing::debug!(%fault, "placeholder fault");
        (self.on_error)(&fault)
    }

    fn resolve(&mut self, token: Token) -> Result<()> {
        match token {
            Token::Complete(name) => {
                let key = String::from_utf8_lossy(&name);
                if let Some(value) = self.values.get(&*key) {
                    self.pending.extend_from_slice(value.as_bytes());
                    return Ok(());
                }
                let fault = PlaceholderFault::Unresolved {
                    name: key.into_owned(),
                };
                self.report(fault)?;
                self.pending.extend_from_slice(&self.parser.prefix);
                self.pending.extend_from_slice(&name);
                self.pending.extend_from_slice(&self.parser.postfix);
            }
            Token::Overlong(name) => {
                let fault = PlaceholderFault::TooLong {
                    name: String::from_utf8_lossy(&name).into_owned(),
                };
                self.report(fault)?;
                self.pending.extend_from_slice(&self.parser.prefix);
                self.pending.extend_from_slice(&name);
            }
        }
        Ok(())
    }

    // Pulls input until `limit` output bytes are pending or the input ends.
    fn fill(&mut self, limit: usize) -> Result<()> {
        self.pending.clear();
        self.pos = 0;
        let mut byte = [0u8; 1];
        while self.pending.len() < limit {
            match self.src.read(&mut byte)? {
                ReadOutcome::Read(0) => continue,
                ReadOutcome::Read(_) => {
                    if let Some(token) = self.parser.step(byte[0], &mut self.pending) {
                        self.resolve(token)?;
                    }
                }
                ReadOutcome::Eof => {
                    self.exhausted = true;
                    self.unclosed = self.parser.finish(&mut self.pending);
                    break;
                }
            }
        }
        Ok(())
    }
}

impl<S, F> Source for ReplacerSource<S, F>
where
    S: Source,
    F: FnMut(&PlaceholderFault) -> Result<()>,
{
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        if buf.is_empty() {
            return Ok(ReadOutcome::Read(0));
        }
        let served = self.copy_pending(buf);
        if served > 0 {
            return Ok(ReadOutcome::Read(served));
        }
        if !self.exhausted {
            self.fill(buf.len().min(self.queue_limit))?;
        }
        let served = self.copy_pending(buf);
        if served > 0 {
            return Ok(ReadOutcome::Read(served));
        }
        if let Some(name) = self.unclosed.take() {
            let fault = PlaceholderFault::Unclosed {
                name: String::from_utf8_lossy(&name).into_owned(),
            };
            self.report(fault)?;
        }
        Ok(ReadOutcome::Eof)
    }
}
