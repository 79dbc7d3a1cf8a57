//! Run configuration and command-line surface.
//!
//! The configuration is immutable for the process lifetime once parsed.
//! Only three knobs exist: the sampling interval, the log path and the
//! device path. Everything else (the fallback log path, the sample size)
//! is fixed.

use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

/// Default seconds between samples.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;
/// Default append-only log path.
pub const DEFAULT_LOG_PATH: &str = "/tmp/daq-sampler.log";
/// Fixed fallback log path, tried exactly once when the configured path
/// cannot be opened for append.
pub const FALLBACK_LOG_PATH: &str = "/var/tmp/daq-sampler.log";
/// Default byte-producing source.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/urandom";

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "daq-sampler")]
#[command(about = "Sample a byte device on a fixed interval and append durable hex records")]
pub struct Cli {
    /// Seconds between samples (invalid or non-positive values fall back to the default)
    #[arg(long, default_value = "5", allow_negative_numbers = true)]
    pub interval: String,

    /// Path of the append-only output log
    #[arg(long, default_value = DEFAULT_LOG_PATH)]
    pub logfile: PathBuf,

    /// Path of the byte-producing source device
    #[arg(long, default_value = DEFAULT_DEVICE_PATH)]
    pub device: PathBuf,
}

/// Validated run configuration, immutable after startup.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Seconds between samples; also the wait after a transient failure.
    pub interval_secs: u64,
    /// Append-only output log path (before any fallback).
    pub log_path: PathBuf,
    /// Byte-producing source device path.
    pub device_path: PathBuf,
}

impl SamplerConfig {
    /// Build the run configuration from parsed arguments.
    ///
    /// A non-numeric or non-positive `--interval` is not an error: it logs
    /// a warning and falls back to [`DEFAULT_INTERVAL_SECS`]. Only flags
    /// the parser does not recognize abort startup.
    pub fn from_cli(cli: Cli) -> Self {
        let interval_secs = match cli.interval.parse::<i64>() {
            Ok(secs) if secs > 0 => secs as u64,
            Ok(secs) => {
                warn!(
                    given = secs,
                    default = DEFAULT_INTERVAL_SECS,
                    "interval must be positive, using default"
                );
                DEFAULT_INTERVAL_SECS
            }
            Err(_) => {
                warn!(
                    given = %cli.interval,
                    default = DEFAULT_INTERVAL_SECS,
                    "interval is not a number, using default"
                );
                DEFAULT_INTERVAL_SECS
            }
        };
        Self {
            interval_secs,
            log_path: cli.logfile,
            device_path: cli.device,
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            device_path: PathBuf::from(DEFAULT_DEVICE_PATH),
        }
    }
}
