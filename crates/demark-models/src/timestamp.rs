//! `MM:SS` timestamp parsing and formatting.
//!
//! The vision service reports sample instants as `MM:SS` strings with
//! integer-second granularity. Minutes are unbounded; seconds are
//! zero-padded to two digits. Parsing and formatting round-trip exactly
//! for non-negative integer seconds.

use crate::error::{ModelError, ModelResult};

/// Parse an `MM:SS` timestamp to elapsed seconds.
///
/// Exactly two `:`-separated non-negative integer fields are accepted.
pub fn parse_timestamp(ts: &str) -> ModelResult<u64> {
    let ts = ts.trim();
    let (mins, secs) = ts
        .split_once(':')
        .ok_or_else(|| ModelError::invalid_timestamp(ts))?;

    if secs.contains(':') {
        return Err(ModelError::invalid_timestamp(ts));
    }

    let mins: u64 = mins
        .parse()
        .map_err(|_| ModelError::invalid_timestamp(ts))?;
    let secs: u64 = secs
        .parse()
        .map_err(|_| ModelError::invalid_timestamp(ts))?;

    if secs >= 60 {
        return Err(ModelError::invalid_timestamp(ts));
    }

    Ok(mins * 60 + secs)
}

/// Format elapsed seconds as an `MM:SS` timestamp.
///
/// Seconds are taken modulo 60; minutes absorb the overflow and are not
/// capped, so `3725` formats as `"62:05"`.
pub fn format_timestamp(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
