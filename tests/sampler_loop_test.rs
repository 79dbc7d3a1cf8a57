//! End-to-end tests driving the sampling loop with scripted sources.
//!
//! These exercise the whole read -> encode -> append -> sleep cycle against
//! a real temp file, with only the device mocked out.

use daq_sampler::device::{ScriptedRead, ScriptedSource};
use daq_sampler::sampler::{Sampler, ShutdownFlag};
use daq_sampler::writer::RecordWriter;
use regex::Regex;
use std::io::ErrorKind;
use std::time::Duration;
use tokio::time::timeout;

/// Full record layout: fixed-width UTC timestamp, separator, hex sample.
const RECORD_PATTERN: &str =
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{9}Z \| 0x[0-9a-f]{16}$";

/// Run the loop against `source` for roughly `run_for`, then request
/// shutdown and return the data log contents.
async fn run_sampler(source: ScriptedSource, interval_secs: u64, run_for: Duration) -> String {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.log");
    let writer = RecordWriter::open(&path).await.unwrap();

    let shutdown = ShutdownFlag::new();
    let sampler = Sampler::new(source, writer, interval_secs, shutdown.clone());
    let handle = tokio::spawn(sampler.run());

    tokio::time::sleep(run_for).await;
    shutdown.request();
    timeout(Duration::from_secs(2), handle)
        .await
        .expect("loop did not stop within the shutdown latency bound")
        .expect("loop task panicked")
        .expect("final flush failed");

    std::fs::read_to_string(&path).unwrap()
}

#[tokio::test]
async fn one_successful_iteration_appends_one_record() {
    let source = ScriptedSource::new(vec![ScriptedRead::Bytes([
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
    ])]);
    let contents = run_sampler(source, 1, Duration::from_millis(300)).await;

    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1, "expected exactly one record: {contents:?}");
    assert!(lines[0].ends_with("0x0011223344556677"));
    assert!(Regex::new(RECORD_PATTERN).unwrap().is_match(lines[0]));
}

#[tokio::test]
async fn failing_source_never_writes_records_but_loop_survives() {
    let source = ScriptedSource::always(ScriptedRead::Error(ErrorKind::TimedOut));
    let attempts = source.attempts();
    // Long enough for a retry after the first failure.
    let contents = run_sampler(source, 1, Duration::from_millis(1200)).await;
    assert!(contents.is_empty(), "unexpected records: {contents:?}");

    // One attempt per configured interval: two failures fit in 1.2s with a
    // 1s interval. Anything more would mean the loop retried without
    // waiting out the interval.
    let issued = attempts.load(std::sync::atomic::Ordering::Relaxed);
    assert!(
        (2..=3).contains(&issued),
        "expected interval-spaced retries, got {issued} attempts"
    );
}

#[tokio::test]
async fn short_reads_discard_partial_data() {
    let source = ScriptedSource::always(ScriptedRead::Short(3));
    let contents = run_sampler(source, 1, Duration::from_millis(300)).await;
    assert!(contents.is_empty(), "partial sample was logged: {contents:?}");
}

#[tokio::test]
async fn records_append_in_chronological_order() {
    let source = ScriptedSource::new(vec![
        ScriptedRead::Bytes([1; 8]),
        ScriptedRead::Bytes([2; 8]),
        ScriptedRead::Bytes([3; 8]),
    ]);
    let contents = run_sampler(source, 1, Duration::from_millis(2400)).await;

    let record = Regex::new(RECORD_PATTERN).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert!(lines.len() >= 2, "expected several records: {contents:?}");

    let mut timestamps = Vec::new();
    for line in &lines {
        assert!(record.is_match(line), "bad record: {line}");
        let (ts, _) = line.split_once(" | ").unwrap();
        timestamps.push(ts.parse::<chrono::DateTime<chrono::Utc>>().unwrap());
    }
    // The fixed-width layout makes string order equal time order too.
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn shutdown_during_sleep_is_observed_within_a_second() {
    let dir = tempfile::tempdir().unwrap();
    let writer = RecordWriter::open(&dir.path().join("samples.log"))
        .await
        .unwrap();

    // An hour-long interval: only the per-second flag checks can end this.
    let source = ScriptedSource::always(ScriptedRead::Short(0));
    let shutdown = ShutdownFlag::new();
    let sampler = Sampler::new(source, writer, 3600, shutdown.clone());
    let handle = tokio::spawn(sampler.run());

    tokio::time::sleep(Duration::from_millis(200)).await;
    let requested_at = std::time::Instant::now();
    shutdown.request();

    timeout(Duration::from_millis(1500), handle)
        .await
        .expect("loop slept past the shutdown request")
        .expect("loop task panicked")
        .expect("final flush failed");
    assert!(requested_at.elapsed() <= Duration::from_millis(1500));
}

#[tokio::test]
async fn append_failure_does_not_stop_the_loop() {
    // /dev/full accepts opens but fails every write with ENOSPC.
    let full = std::path::Path::new("/dev/full");
    if !full.exists() {
        return;
    }
    let writer = RecordWriter::open(full).await.unwrap();

    let source = ScriptedSource::new(vec![
        ScriptedRead::Bytes([0x01; 8]),
        ScriptedRead::Bytes([0x02; 8]),
    ]);
    let attempts = source.attempts();
    let shutdown = ShutdownFlag::new();
    let sampler = Sampler::new(source, writer, 1, shutdown.clone());
    let handle = tokio::spawn(sampler.run());

    tokio::time::sleep(Duration::from_millis(1300)).await;
    shutdown.request();
    let outcome = timeout(Duration::from_secs(2), handle)
        .await
        .expect("loop did not stop after append failures")
        .expect("loop task panicked");
    // Whether the final flush on /dev/full reports an error is up to the
    // device; what matters is that the loop kept sampling and shut down.
    let _ = outcome;

    let issued = attempts.load(std::sync::atomic::Ordering::Relaxed);
    assert!(
        issued >= 2,
        "loop stopped reading after a failed append: {issued} attempts"
    );
}

#[tokio::test]
async fn records_land_in_fallback_when_primary_is_unwritable() {
    let dir = tempfile::tempdir().unwrap();
    // A directory path cannot be opened for append.
    let primary = dir.path().to_path_buf();
    let fallback = dir.path().join("fallback.log");

    let (writer, in_use) = RecordWriter::open_with_fallback(&primary, &fallback)
        .await
        .unwrap();
    assert_eq!(in_use, fallback);

    let source = ScriptedSource::new(vec![ScriptedRead::Bytes([0xab; 8])]);
    let shutdown = ShutdownFlag::new();
    let sampler = Sampler::new(source, writer, 1, shutdown.clone());
    let handle = tokio::spawn(sampler.run());

    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown.request();
    timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let contents = std::fs::read_to_string(&fallback).unwrap();
    assert!(contents.trim_end().ends_with("0xabababababababab"));
}
