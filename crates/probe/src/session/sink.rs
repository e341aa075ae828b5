//! Log sink: the optional file copy of every emitted record.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::common::{CaptureError, Result};

/// An open log file. Every write is flushed before returning, so records
/// survive the host debugger being killed.
#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LogSink {
    /// Creates (or truncates) the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| CaptureError::SinkOpen {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "log sink opened");
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Path the sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `text` and flushes it to the file.
    pub fn write_record(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and closes the file, returning its path.
    ///
    /// If the final flush fails, unwritten bytes are discarded and the file
    /// is closed anyway.
    pub fn close(mut self) -> Result<PathBuf> {
        if let Err(e) = self.writer.flush() {
            let _ = self.abandon();
            return Err(e.into());
        }
        info!(path = %self.path.display(), "log sink closed");
        Ok(self.path)
    }

    /// Closes the file without flushing, dropping any buffered bytes.
    pub fn abandon(self) -> PathBuf {
        let Self { path, writer } = self;
        let (_file, unwritten) = writer.into_parts();
        let dropped = unwritten.map_or(0, |buf| buf.len());
        warn!(path = %path.display(), dropped, "log sink abandoned");
        path
    }
}

#[cfg(test)]
impl LogSink {
    /// Buffers `text` without flushing it.
    pub(crate) fn stage(&mut self, text: &str) {
        let _ = self.writer.write(text.as_bytes());
    }
}
