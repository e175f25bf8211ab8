//! Decode the three APRS timestamp encodings.
//!
//! A timestamped position carries exactly 7 bytes ahead of the position
//! report; the trailing byte selects the format:
//! - `DDHHMMz`   day/hour/minute, UTC, current month and year
//! - `DDHHMM/`   local time — unsupported, decodes to no timestamp
//! - `HHMMSSh`   hour/minute/second, UTC, current date
//! - `MMDDHHMM`  month/day/hour/minute, UTC, current year (8 bytes, no marker)

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

/// Decode a timestamp prefix. `now` supplies the assumed month/year (and is
/// the documented fallback when a `z` timestamp fails to parse), which keeps
/// the month-boundary cases testable.
pub fn decode_timestamp(s: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    match s.chars().last() {
        Some('z') => {
            let parsed = (|| {
                let day = parse2(s, 0)?;
                let hour = parse2(s, 2)?;
                let minute = parse2(s, 4)?;
                Utc.with_ymd_and_hms(now.year(), now.month(), day, hour, minute, 0)
                    .single()
            })();
            // Unparsable zulu stamps fall back to the decode moment
            Some(parsed.unwrap_or(now))
        }
        // Local time is undecodable on the receive side
        Some('/') => None,
        Some('h') => {
            let hour = parse2(s, 0)?;
            let minute = parse2(s, 2)?;
            let second = parse2(s, 4)?;
            Utc.with_ymd_and_hms(now.year(), now.month(), now.day(), hour, minute, second)
                .single()
        }
        _ if s.len() == 8 => {
            let month = parse2(s, 0)?;
            let day = parse2(s, 2)?;
            let hour = parse2(s, 4)?;
            let minute = parse2(s, 6)?;
            Utc.with_ymd_and_hms(now.year(), month, day, hour, minute, 0)
                .single()
        }
        _ => None,
    }
}

fn parse2(s: &str, at: usize) -> Option<u32> {
    s.get(at..at + 2)?.parse().ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
