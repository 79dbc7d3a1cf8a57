//! # daq-sampler Core Library
//!
//! This crate is the core library for the `daq-sampler` binary, a long-lived
//! agent that reads one fixed-size sample from a byte device on a fixed
//! interval and appends a timestamped, hex-encoded record to an append-only
//! log file. Keeping the logic in a library lets the integration tests drive
//! the full sampling loop against mock sources without a real device.
//!
//! ## Crate Structure
//!
//! - **`config`**: Run configuration and the command-line surface
//!   (`--interval`, `--logfile`, `--device`), with the defaults and the
//!   fixed fallback log path.
//! - **`error`**: The `SamplerError` enum, splitting startup-fatal failures
//!   (with their process exit codes) from transient per-iteration failures.
//! - **`clock`**: Fixed-width UTC timestamp formatting with nanosecond
//!   precision.
//! - **`encode`**: The `Sample` type and its lowercase hex encoding.
//! - **`device`**: The `SampleSource` trait, the real device implementation,
//!   and a scripted mock for tests.
//! - **`writer`**: The durable append-only record writer (write, flush,
//!   storage sync) with primary/fallback open logic.
//! - **`sampler`**: The sampling loop itself plus the cooperative
//!   `ShutdownFlag` set by the signal watcher.
//! - **`trace`**: Diagnostic log initialization; diagnostics always go to
//!   stderr, never into the data log.

pub mod clock;
pub mod config;
pub mod device;
pub mod encode;
pub mod error;
pub mod sampler;
pub mod trace;
pub mod writer;
