//! Test harness helpers.

use tracing_subscriber::EnvFilter;
use velocity_playback::{PlaybackEvent, PlaybackState, Transition};

/// Set up test logging with the specified filter.
///
/// This initializes the tracing subscriber for tests. Should be called
/// at the beginning of tests that need logging.
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// Set up test logging with default filter (warn level).
pub fn setup_test_logging_default() {
    setup_test_logging("warn");
}

/// Apply `n` ticks and return the transitions they produced.
pub fn tick_n(state: &mut PlaybackState, n: usize) -> Vec<Transition> {
    (0..n).map(|_| state.apply(PlaybackEvent::Tick)).collect()
}

/// Assert two percentages are equal within `1e-9`.
///
/// # Panics
///
/// Panics when the values differ by more than the tolerance.
pub fn assert_percent(actual: f64, expected: f64) {
    let delta = (actual - expected).abs();
    assert!(
        delta <= 1e-9,
        "expected {expected}% but got {actual}% (delta={delta})"
    );
}
