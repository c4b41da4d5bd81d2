use pipeio::{Error, ReadOutcome, Result, Sink, Source};

/// How a [`FaultySource`] distorts the stream it wraps.
#[derive(Clone, Copy, Debug)]
pub enum FaultMode {
    /// Never delivers more than the given number of bytes per call.
    ShortReads(usize),
    /// Every n-th call fails with `Interrupted`.
    InterruptedEvery(usize),
    /// Every n-th call reads nothing but does not report EOF either.
    EmptyEvery(usize),
    /// Reports one byte more than it delivered.
    OverReport,
}

/// Wraps an in-memory stream and misbehaves in a controlled way. Counts
/// every call so tests can assert on the traffic an adapter generates.
pub struct FaultySource<'a> {
    data: &'a [u8],
    mode: FaultMode,
    pub calls: usize,
    pub eof_calls: usize,
}

impl<'a> FaultySource<'a> {
    pub fn new(data: &'a [u8], mode: FaultMode) -> Self {
        Self {
            data,
            mode,
            calls: 0,
            eof_calls: 0,
        }
    }

    fn take(&mut self, buf: &mut [u8], max: usize) -> ReadOutcome {
        if self.data.is_empty() {
            self.eof_calls += 1;
            return ReadOutcome::Eof;
        }
        let n = buf.len().min(max).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        ReadOutcome::Read(n)
    }
}

impl Source for FaultySource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        self.calls += 1;
        match self.mode {
            FaultMode::ShortReads(max) => Ok(self.take(buf, max.max(1))),
            FaultMode::InterruptedEvery(n) if n != 0 && self.calls % n == 0 => {
                Err(std::io::Error::from(std::io::ErrorKind::Interrupted).into())
            }
            FaultMode::EmptyEvery(n) if n != 0 && self.calls % n == 0 => Ok(ReadOutcome::Read(0)),
            FaultMode::InterruptedEvery(_) | FaultMode::EmptyEvery(_) => Ok(self.take(buf, usize::MAX)),
            FaultMode::OverReport => match self.take(buf, usize::MAX) {
                ReadOutcome::Read(n) => Ok(ReadOutcome::Read(n + 1)),
                eof => Ok(eof),
            },
        }
    }
}

/// A sink that accepts at most `max` bytes per call and records the size of
/// every write it sees.
pub struct ShortSink {
    max: usize,
    pub data: Vec<u8>,
    pub writes: Vec<usize>,
    pub flushes: usize,
}

impl ShortSink {
    pub fn new(max: usize) -> Self {
        Self {
            max: max.max(1),
            data: Vec::new(),
            writes: Vec::new(),
            flushes: 0,
        }
    }
}

impl Sink for ShortSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.writes.push(buf.len());
        let n = buf.len().min(self.max);
        self.data.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> Result<usize> {
        self.flushes += 1;
        Ok(0)
    }
}

/// A sink that refuses everything once `budget` bytes have been accepted.
pub struct FailingSink {
    budget: usize,
    pub data: Vec<u8>,
}

impl FailingSink {
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            data: Vec::new(),
        }
    }
}

impl Sink for FailingSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.budget == 0 {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed").into());
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        self.data.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> Result<usize> {
        Ok(0)
    }
}

/// Reads `src` to the end with a fixed request size.
pub fn drain<S: Source>(src: &mut S, chunk: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; chunk];
    loop {
        match src.read(&mut buf)? {
            ReadOutcome::Read(n) => out.extend_from_slice(&buf[..n]),
            ReadOutcome::Eof => return Ok(out),
        }
    }
}

/// Reads `src` to the end, cycling through the given request sizes.
pub fn drain_schedule<S: Source>(src: &mut S, sizes: &[usize]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let max = sizes.iter().copied().max().unwrap_or(1).max(1);
    let mut buf = vec![0u8; max];
    for &size in sizes.iter().cycle() {
        match src.read(&mut buf[..size.max(1)])? {
            ReadOutcome::Read(n) => out.extend_from_slice(&buf[..n]),
            ReadOutcome::Eof => break,
        }
    }
    Ok(out)
}

pub fn is_interrupted(err: &Error) -> bool {
    matches!(err, Error::Io(e) if e.kind() == std::io::ErrorKind::Interrupted)
}
