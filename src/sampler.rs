//! The sampling loop: read, encode, append, sleep, repeat.
//!
//! The loop is a single sequential task with three states. RUNNING reads one
//! sample and appends its record; SLEEPING waits out the configured interval
//! in one-second increments, checking the shutdown flag between increments;
//! STOPPED flushes the log one last time and returns. Transient failures
//! (short read, read error, write error) are warned about on the diagnostic
//! stream and retried after a full interval. There is no retry counter and
//! no backoff: a long-lived monitoring agent must not die from sensor
//! hiccups, and repeated-failure timing stays observable and predictable.

use crate::clock;
use crate::device::SampleSource;
use crate::encode;
use crate::error::SamplerResult;
use crate::writer::RecordWriter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Granularity of shutdown checks while sleeping out the interval.
const SLEEP_INCREMENT: Duration = Duration::from_secs(1);

/// Cooperative stop request shared between the signal watcher and the loop.
///
/// Set at most once per run and never cleared. Relaxed ordering is enough:
/// there is exactly one writer and one reader, and the flag carries no other
/// data, so no mutual exclusion is required.
#[derive(Clone, Debug, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    /// Create an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Idempotent.
    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The sampling loop orchestrator.
///
/// Owns the sample source and the record writer exclusively for the run.
pub struct Sampler<S> {
    source: S,
    writer: RecordWriter,
    interval_secs: u64,
    shutdown: ShutdownFlag,
}

impl<S: SampleSource> Sampler<S> {
    /// Assemble a loop from already-acquired resources.
    pub fn new(source: S, writer: RecordWriter, interval_secs: u64, shutdown: ShutdownFlag) -> Self {
        Self {
            source,
            writer,
            interval_secs,
            shutdown,
        }
    }

    /// Drive the loop until shutdown is requested, then flush and release
    /// the log. The only error this returns is a failed final flush.
    pub async fn run(mut self) -> SamplerResult<()> {
        while !self.shutdown.is_requested() {
            self.step().await;
            self.sleep_interval().await;
        }
        info!("shutdown requested, flushing log");
        self.writer.close().await
        // The device handle (self.source) drops here with the sampler.
    }

    /// One RUNNING entry: read a sample and append its record.
    ///
    /// Every failure in here is transient by contract: warn and return, so
    /// the caller waits a full interval before the next attempt.
    async fn step(&mut self) {
        let sample = match self.source.read_sample().await {
            Ok(sample) => sample,
            Err(err) => {
                warn!(error = %err, "sample discarded");
                return;
            }
        };
        let line = format!(
            "{} | {}",
            clock::now_timestamp(),
            encode::encode_sample(&sample)
        );
        match self.writer.append(&line).await {
            Ok(()) => debug!(record = %line, "record appended"),
            Err(err) => warn!(error = %err, "failed to append record"),
        }
    }

    /// Sleep out the configured interval one second at a time, bailing out
    /// as soon as shutdown is requested.
    async fn sleep_interval(&self) {
        for _ in 0..self.interval_secs {
            if self.shutdown.is_requested() {
                return;
            }
            tokio::time::sleep(SLEEP_INCREMENT).await;
        }
    }
}
