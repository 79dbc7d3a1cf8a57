//! Durable append-only record writer.
//!
//! One open append-mode handle is reused for the whole run. Every append
//! writes the line, flushes, and then asks for a storage-level sync:
//! a failed write or flush is reported as [`SamplerError::LogWrite`], while
//! a failed sync is best-effort only (some filesystems cannot guarantee it)
//! and never fails the append.

use crate::error::{SamplerError, SamplerResult};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Append-only writer for the data log.
pub struct RecordWriter {
    file: File,
    path: PathBuf,
}

impl RecordWriter {
    /// Open `path` for append, creating it (and its parent directory,
    /// best-effort) if needed.
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            // Best-effort: the open below reports the real error if the
            // directory still does not exist.
            let _ = tokio::fs::create_dir_all(parent).await;
        }
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .await?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Open the configured log path, falling back exactly once to the fixed
    /// secondary path. Returns the writer and the path actually in use.
    pub async fn open_with_fallback(
        primary: &Path,
        fallback: &Path,
    ) -> SamplerResult<(Self, PathBuf)> {
        match Self::open(primary).await {
            Ok(writer) => Ok((writer, primary.to_path_buf())),
            Err(primary_err) => {
                warn!(
                    path = %primary.display(),
                    error = %primary_err,
                    "cannot open log, trying fallback"
                );
                match Self::open(fallback).await {
                    Ok(writer) => Ok((writer, fallback.to_path_buf())),
                    Err(source) => Err(SamplerError::LogOpen {
                        primary: primary.to_path_buf(),
                        fallback: fallback.to_path_buf(),
                        source,
                    }),
                }
            }
        }
    }

    /// The path this writer appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record line (the trailing newline is added here), flush,
    /// and sync to storage.
    pub async fn append(&mut self, line: &str) -> SamplerResult<()> {
        self.file
            .write_all(line.as_bytes())
            .await
            .map_err(SamplerError::LogWrite)?;
        self.file
            .write_all(b"\n")
            .await
            .map_err(SamplerError::LogWrite)?;
        self.file.flush().await.map_err(SamplerError::LogWrite)?;
        if let Err(err) = self.file.sync_all().await {
            debug!(error = %err, "storage sync not guaranteed for this append");
        }
        Ok(())
    }

    /// Final flush and sync, consuming the writer.
    pub async fn close(mut self) -> SamplerResult<()> {
        self.file.flush().await.map_err(SamplerError::LogWrite)?;
        if let Err(err) = self.file.sync_all().await {
            debug!(error = %err, "storage sync not guaranteed on close");
        }
        Ok(())
    }
}
