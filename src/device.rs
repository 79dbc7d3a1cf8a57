//! Sample sources: the real device and a scripted mock.
//!
//! The loop only ever talks to a [`SampleSource`], so integration tests can
//! drive it with a [`ScriptedSource`] that plays back programmed outcomes
//! instead of a physical device.

use crate::encode::{Sample, SAMPLE_LEN};
use crate::error::{SamplerError, SamplerResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Capability: produce one fixed-size sample per call.
///
/// # Contract
/// - `read_sample` issues a single read request; it never retries or
///   buffers partial data to completion.
/// - A full sample is the only success; anything else is a transient error
///   the caller handles (short read, end of stream, OS error).
#[async_trait]
pub trait SampleSource: Send {
    /// Read exactly one sample from the source.
    async fn read_sample(&mut self) -> SamplerResult<Sample>;
}

/// The real sample source: a pre-opened read handle on a device file.
///
/// Owned exclusively by the sampling loop for the process lifetime.
pub struct DeviceSource {
    file: File,
}

impl DeviceSource {
    /// Open the device for reading. Failure here is startup-fatal.
    pub async fn open(path: &Path) -> SamplerResult<Self> {
        let file = File::open(path)
            .await
            .map_err(|source| SamplerError::DeviceOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { file })
    }
}

#[async_trait]
impl SampleSource for DeviceSource {
    async fn read_sample(&mut self) -> SamplerResult<Sample> {
        let mut buf: Sample = [0; SAMPLE_LEN];
        // One read request. A partial result is discarded, not completed
        // with further reads; the source is a fixed-record device.
        let got = self
            .file
            .read(&mut buf)
            .await
            .map_err(SamplerError::DeviceRead)?;
        if got != SAMPLE_LEN {
            // 0 bytes (EOF) counts as a short read too: the source is
            // expected to be an infinite stream.
            return Err(SamplerError::ShortRead {
                got,
                want: SAMPLE_LEN,
            });
        }
        Ok(buf)
    }
}

// =============================================================================
// ScriptedSource - programmable mock for tests
// =============================================================================

/// Programmed outcome for one [`ScriptedSource`] read.
#[derive(Debug, Clone)]
pub enum ScriptedRead {
    /// Return these bytes as a full sample.
    Bytes(Sample),
    /// Fail as a short read that returned this many bytes.
    Short(usize),
    /// Fail with an OS-level read error of this kind.
    Error(ErrorKind),
}

/// Mock sample source that plays back a queue of programmed outcomes.
///
/// Once the queue is exhausted, every further read repeats the configured
/// exhausted behavior (an unexpected-EOF short read by default), so a loop
/// left running past its script never fabricates extra records. Every read
/// request is counted, so tests can assert how often (and therefore how
/// closely spaced) the loop retried.
pub struct ScriptedSource {
    script: VecDeque<ScriptedRead>,
    exhausted: ScriptedRead,
    attempts: Arc<AtomicUsize>,
}

impl ScriptedSource {
    /// Play back `reads` in order, then short-read forever.
    pub fn new(reads: Vec<ScriptedRead>) -> Self {
        Self {
            script: reads.into(),
            exhausted: ScriptedRead::Short(0),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Repeat a single behavior on every read.
    pub fn always(behavior: ScriptedRead) -> Self {
        Self {
            script: VecDeque::new(),
            exhausted: behavior,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle onto the number of read attempts issued so far.
    /// Clone it before handing the source to the loop.
    pub fn attempts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }
}

#[async_trait]
impl SampleSource for ScriptedSource {
    async fn read_sample(&mut self) -> SamplerResult<Sample> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        let next = self
            .script
            .pop_front()
            .unwrap_or_else(|| self.exhausted.clone());
        match next {
            ScriptedRead::Bytes(sample) => Ok(sample),
            ScriptedRead::Short(got) => Err(SamplerError::ShortRead {
                got,
                want: SAMPLE_LEN,
            }),
            ScriptedRead::Error(kind) => Err(SamplerError::DeviceRead(kind.into())),
        }
    }
}
