//! crates/codec/src/writer.rs

use std::io::Write;

use crate::error::CodecResult;
use crate::separators::Separators;

/// Serializes session records to a script or record sink.
#[derive(Debug)]
pub struct SessionWriter<W> {
    inner: W,
    separators: Separators,
    records: u64,
}

impl<W: Write> SessionWriter<W> {
    /// Wraps `inner`, framing records with `separators`.
    pub const fn new(inner: W, separators: Separators) -> Self {
        Self {
            inner,
            separators,
            records: 0,
        }
    }

    /// Writes one framed record and flushes the sink.
    pub fn write_record(&mut self, request: &[u8], response: &[u8]) -> CodecResult<()> {
        self.inner.write_all(self.separators.request())?;
        self.inner.write_all(request)?;
        self.inner.write_all(self.separators.response())?;
        self.inner.write_all(response)?;
        self.inner.flush()?;
        self.records += 1;
        tracing::trace!(
            target: "bat::codec",
            record = self.records,
            request = request.len(),
            response = response.len(),
            "record written"
        );
        Ok(())
    }

    /// Number of records written so far.
    #[must_use]
    pub const fn records(&self) -> u64 {
        self.records
    }

    /// Mutable access to the sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Returns the sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
