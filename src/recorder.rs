use anyhow::Context;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub const LEDGER_HEADER: &str = "Date,TxHash,NumOfNotes";

/// Append-only CSV ledger, one row per submitted batch. Every write is
/// flushed immediately so an aborted run leaves a valid prefix behind.
pub struct LedgerRecorder<W: Write> {
    out: W,
}

impl LedgerRecorder<File> {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Cannot create output file {}", path.display()))?;
        Ok(LedgerRecorder { out: file })
    }
}

impl<W: Write> LedgerRecorder<W> {
    pub fn new(out: W) -> Self {
        LedgerRecorder { out }
    }

    pub fn write_header(&mut self) -> anyhow::Result<()> {
        self.out
            .write_all(format!("{LEDGER_HEADER}\n").as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    pub fn append_row(
        &mut self,
        timestamp_ms: u128,
        tx_hash: &str,
        note_count: usize,
    ) -> anyhow::Result<()> {
        self.out
            .write_all(format!("{timestamp_ms},{tx_hash},{note_count}\n").as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Millisecond epoch timestamp for ledger rows.
pub fn unix_millis() -> anyhow::Result<u128> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is set before the unix epoch")?
        .as_millis())
}
