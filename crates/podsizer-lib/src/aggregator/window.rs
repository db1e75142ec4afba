//! Trailing one-day query windows

use crate::models::QueryWindow;
use chrono::{DateTime, Duration, Utc};

/// Width of every query window
pub const WINDOW_SECS: i64 = 86_400;

/// `days` consecutive one-day windows ending at `now`, most recent first
///
/// Window `d` covers `[now - (d+1)*24h, now - d*24h)`, so together they tile
/// `[now - days*24h, now)`.
pub fn daily_windows(now: DateTime<Utc>, days: u32) -> Vec<QueryWindow> {
    let width = Duration::seconds(WINDOW_SECS);
    (0..days)
        .map(|offset| {
            let end = now - width * offset as i32;
            QueryWindow {
                start: end - width,
                end,
            }
        })
        .collect()
}

/// The last 24 hours before `now`
pub fn trailing_day(now: DateTime<Utc>) -> QueryWindow {
    QueryWindow {
        start: now - Duration::seconds(WINDOW_SECS),
        end: now,
    }
}
