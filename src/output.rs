//! JSON Lines output with an optional sample stream.

use crate::error::Result;
use crate::model::Record;
use std::io::Write;

/// Writes one JSON record per line and mirrors a prefix to a sample stream.
pub struct RecordWriter<W: Write> {
    main: W,
    sample: Option<W>,
    sample_size: usize,
    written: u64,
    sampled: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Creates a writer without a sample stream.
    pub fn new(main: W) -> Self {
        Self {
            main,
            sample: None,
            sample_size: 0,
            written: 0,
            sampled: 0,
        }
    }

    /// Mirrors the first `size` records to `sample`.
    pub fn with_sample(mut self, sample: W, size: usize) -> Self {
        self.sample = Some(sample);
        self.sample_size = size;
        self
    }

    /// Appends one record.
    pub fn write(&mut self, record: &Record) -> Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.main, "{line}")?;
        self.written += 1;

        if self.sampled < self.sample_size {
            if let Some(sample) = self.sample.as_mut() {
                writeln!(sample, "{line}")?;
                self.sampled += 1;
            }
        }
        Ok(())
    }

    /// Records written to the main stream.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Records mirrored to the sample stream.
    pub fn sampled(&self) -> usize {
        self.sampled
    }

    /// Flushes both streams.
    pub fn flush(&mut self) -> Result<()> {
        self.main.flush()?;
        if let Some(sample) = self.sample.as_mut() {
            sample.flush()?;
        }
        Ok(())
    }

    /// Returns the underlying streams.
    pub fn into_inner(self) -> (W, Option<W>) {
        (self.main, self.sample)
    }
}
