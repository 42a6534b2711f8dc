use std::time::Duration;

use jiff::{SignedDuration, Span, SpanRelativeTo};
use waypath_core::viewport::ViewportSize;

/// Accepts whole seconds (`10`), jiff's friendly format (`150ms`, `1m 30s`)
/// or ISO 8601 (`PT10S`). Negative durations are rejected.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();

    if let Ok(seconds) = input.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    }

    let signed = input
        .parse::<SignedDuration>()
        .or_else(|_| {
            input
                .parse::<Span>()
                .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
        })
        .map_err(|_| format!("Invalid duration '{input}'"))?;

    Duration::try_from(signed).map_err(|_| format!("Duration '{input}' must not be negative"))
}

/// Parses `WIDTHxHEIGHT`, e.g. `1280x720`.
pub fn parse_viewport(input: &str) -> Result<ViewportSize, String> {
    let (width, height) = input
        .split_once(['x', 'X'])
        .ok_or_else(|| String::from("Expected WIDTHxHEIGHT"))?;

    let width: f64 = width.trim().parse().map_err(|_| "Invalid width")?;
    let height: f64 = height.trim().parse().map_err(|_| "Invalid height")?;

    if width <= 0.0 || height <= 0.0 {
        return Err(String::from("Viewport must not be empty"));
    }

    Ok(ViewportSize { width, height })
}
