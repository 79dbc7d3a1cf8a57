//! Custom error types for the sampler.
//!
//! `SamplerError` covers two very different failure classes and the loop
//! treats them accordingly:
//!
//! - **Startup-fatal**: `DeviceOpen` and `LogOpen` abort the process before
//!   the loop starts, each with its own exit code (see [`SamplerError::exit_code`]).
//! - **Transient**: `DeviceRead`, `ShortRead` and `LogWrite` are per-iteration
//!   failures; the loop logs a warning and retries after the configured
//!   interval, indefinitely.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for results using the sampler error type.
pub type SamplerResult<T> = std::result::Result<T, SamplerError>;

/// All failure modes of the sampling agent.
#[derive(Error, Debug)]
pub enum SamplerError {
    /// The configured device could not be opened for reading. Fatal.
    #[error("cannot open device {}: {source}", path.display())]
    DeviceOpen {
        /// Path of the device that failed to open.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Neither the configured log path nor the fixed fallback could be
    /// opened for append. Fatal.
    #[error("cannot open log {} or fallback {}: {source}", primary.display(), fallback.display())]
    LogOpen {
        /// The configured log path.
        primary: PathBuf,
        /// The fixed fallback path that was also tried.
        fallback: PathBuf,
        /// OS error from the fallback attempt.
        source: std::io::Error,
    },

    /// The device read call itself failed. Transient.
    #[error("device read error: {0}")]
    DeviceRead(#[source] std::io::Error),

    /// The device returned fewer bytes than one full sample (including
    /// zero, i.e. unexpected end of stream). Transient; the partial data
    /// is discarded.
    #[error("short read from device: {got} of {want} bytes")]
    ShortRead {
        /// Bytes actually returned.
        got: usize,
        /// Bytes required for one sample.
        want: usize,
    },

    /// Writing or flushing a record failed. Transient; the loop continues.
    #[error("log write error: {0}")]
    LogWrite(#[source] std::io::Error),
}

impl SamplerError {
    /// Whether the loop should swallow this error and retry next interval.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SamplerError::DeviceRead(_)
                | SamplerError::ShortRead { .. }
                | SamplerError::LogWrite(_)
        )
    }

    /// Process exit code for startup-fatal errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            SamplerError::DeviceOpen { .. } => 2,
            SamplerError::LogOpen { .. } => 3,
            // Transient errors never terminate the process; if one ever
            // reaches the exit path, report a generic failure.
            _ => 1,
        }
    }
}
