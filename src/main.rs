//! CLI entry point for daq-sampler.
//!
//! Parses the three flags (`--interval`, `--logfile`, `--device`), acquires
//! the device and log handles, installs the SIGINT/SIGTERM watcher, and runs
//! the sampling loop until shutdown.
//!
//! # Exit codes
//!
//! - `0` normal shutdown, or `--help`
//! - `1` argument parse error (usage is printed to stderr)
//! - `2` device open failure
//! - `3` log open failure, including the fallback path

use clap::Parser;
use daq_sampler::config::{Cli, SamplerConfig, FALLBACK_LOG_PATH};
use daq_sampler::device::DeviceSource;
use daq_sampler::error::SamplerResult;
use daq_sampler::sampler::{Sampler, ShutdownFlag};
use daq_sampler::trace;
use daq_sampler::writer::RecordWriter;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap prints help to stdout (exit 0) and errors to stderr
            // with usage (exit 1) - exactly the external contract.
            let code = u8::from(err.use_stderr());
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    trace::init();
    let config = SamplerConfig::from_cli(cli);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("fatal: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

/// Acquire resources, run the loop, release. Errors returned here are the
/// startup-fatal ones; everything transient is handled inside the loop.
async fn run(config: SamplerConfig) -> SamplerResult<()> {
    let source = DeviceSource::open(&config.device_path).await?;
    let (writer, log_path) =
        RecordWriter::open_with_fallback(&config.log_path, Path::new(FALLBACK_LOG_PATH)).await?;

    info!(
        device = %config.device_path.display(),
        log = %log_path.display(),
        interval_secs = config.interval_secs,
        "sampler started"
    );

    let shutdown = ShutdownFlag::new();
    spawn_signal_watcher(shutdown.clone());

    let sampler = Sampler::new(source, writer, config.interval_secs, shutdown);
    if let Err(err) = sampler.run().await {
        // The run itself succeeded; only the final flush did not.
        warn!(error = %err, "final log flush failed");
    }

    info!("sampler stopped");
    Ok(())
}

/// Watch for SIGINT and SIGTERM and latch the shutdown flag.
///
/// The loop polls the flag rather than being preempted: an in-flight read
/// finishes first, and a sleeping loop wakes within one second.
fn spawn_signal_watcher(shutdown: ShutdownFlag) {
    tokio::spawn(async move {
        wait_for_termination().await;
        info!("termination signal received, stopping after current step");
        shutdown.request();
    });
}

async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(err) => {
            warn!(error = %err, "cannot install SIGTERM handler, watching SIGINT only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}
