use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::Milestone;

pub const DAY_MS: f64 = 86_400_000.0;
/// Share of the raw extent added after the last milestone.
pub const PADDING_RATIO: f64 = 0.05;
/// Padding used when the raw extent is zero.
pub const MIN_PADDING_MS: f64 = 30.0 * DAY_MS;

/// The shared time axis of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Jan 1, 00:00 UTC of the earliest start year (ms since epoch).
    pub start_ms: f64,
    pub end_ms: f64,
}

/// A January 1 marker on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearTick {
    pub year: i32,
    pub at_ms: f64,
    pub pct: f64,
}

/// Horizontal placement of one milestone, in percent of the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub left_pct: f64,
    pub right_pct: f64,
    /// No end date: drawn as an open marker at `left_pct`.
    pub open_ended: bool,
}

impl Span {
    pub fn width_pct(&self) -> f64 {
        self.right_pct - self.left_pct
    }

    /// Width to draw with, clamped to a visual floor. Never feeds back into
    /// the stored percentages.
    pub fn display_width_pct(&self, min_width_pct: f64) -> f64 {
        self.width_pct().max(min_width_pct)
    }
}

impl TimeRange {
    /// Normalize the range over every displayed milestone.
    pub fn from_milestones<'a, I>(milestones: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Milestone>,
    {
        Self::from_spans(
            milestones
                .into_iter()
                .map(|m| (m.start_ms(), m.end_or_start_ms())),
        )
    }

    /// Normalize the range over `(start, end_or_start)` pairs in ms.
    pub fn from_spans<I>(spans: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut spans = spans.into_iter().peekable();
        spans.peek()?;

        let (min_start, max_end) = spans.fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min_start, max_end), (start, end)| (min_start.min(start), max_end.max(end)),
        );

        let mut padding = (max_end - min_start) * PADDING_RATIO;
        if !(padding > 0.0) {
            padding = MIN_PADDING_MS;
        }

        let start_ms = year_start_ms(year_of_ms(min_start));
        // End-before-start data can pull the end behind the origin.
        let end_ms = (max_end + padding).max(start_ms + MIN_PADDING_MS);
        Some(Self { start_ms, end_ms })
    }

    pub fn total_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    pub fn start_year(&self) -> i32 {
        year_of_ms(self.start_ms)
    }

    /// Convert an instant to a percentage offset from the range start.
    pub fn pct(&self, at_ms: f64) -> f64 {
        (at_ms - self.start_ms) / self.total_ms() * 100.0
    }

    pub fn position(&self, milestone: &Milestone) -> Span {
        Span {
            left_pct: self.pct(milestone.start_ms()),
            right_pct: self.pct(milestone.end_or_start_ms()),
            open_ended: milestone.is_open_ended(),
        }
    }

    /// The start year, then every later Jan 1 up to and including the end.
    pub fn year_ticks(&self) -> Vec<YearTick> {
        let first = self.start_year();
        let mut ticks = vec![YearTick {
            year: first,
            at_ms: self.start_ms,
            pct: 0.0,
        }];
        let mut year = first + 1;
        loop {
            let at_ms = year_start_ms(year);
            if !(at_ms <= self.end_ms) {
                break;
            }
            ticks.push(YearTick {
                year,
                at_ms,
                pct: self.pct(at_ms),
            });
            year += 1;
        }
        ticks
    }
}

/// Jan 1, 00:00 UTC of `year`, in ms.
pub fn year_start_ms(year: i32) -> f64 {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|d| d.and_time(NaiveTime::MIN).and_utc().timestamp_millis() as f64)
        .unwrap_or(f64::NAN)
}

/// Calendar year (UTC) containing the instant.
pub fn year_of_ms(ms: f64) -> i32 {
    DateTime::from_timestamp_millis(ms as i64)
        .map(|dt| dt.year())
        .unwrap_or(1970)
}
