use std::io::Write;

use crate::error::Result;
use crate::inspector::record::TopLevelRecord;

/// Destination for emitted records, fed one record at a time in source order.
pub trait RecordSink {
    fn emit(&mut self, record: &TopLevelRecord) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl RecordSink for Vec<TopLevelRecord> {
    fn emit(&mut self, record: &TopLevelRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    w: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }

    pub fn into_inner(self) -> W {
        self.w
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn emit(&mut self, record: &TopLevelRecord) -> Result<()> {
        serde_json::to_writer(&mut self.w, record)?;
        self.w.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.w.flush()?;
        Ok(())
    }
}

/// Writes the human-readable rendering of each record.
pub struct TextSink<W: Write> {
    w: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }

    pub fn into_inner(self) -> W {
        self.w
    }
}

impl<W: Write> RecordSink for TextSink<W> {
    fn emit(&mut self, record: &TopLevelRecord) -> Result<()> {
        writeln!(self.w, "{} (+{})", record.summary, record.offset)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.w.flush()?;
        Ok(())
    }
}
