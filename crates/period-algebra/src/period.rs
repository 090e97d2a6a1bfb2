//! A single closed span of time and its pairwise operations.
//!
//! A [`Period`] is `[start, end]` with `start <= end`. Both edges are inclusive
//! for merging and containment: two periods that touch at a single instant are
//! merged into one. Subtraction only removes a positive-length overlap, so a
//! subtrahend that merely touches an edge leaves the period intact.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{PeriodError, Result};

/// Naive formats accepted by [`parse_timestamp`], interpreted as UTC.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Fixed-width layout of a naive timestamp; `d` stands for an ASCII digit.
const NAIVE_LAYOUT: &[u8] = b"dddd-dd-ddTdd:dd:dd";

/// An immutable time span `[start, end]`.
///
/// Ordering is by `start`, then by `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Whether a [`Period::merge`] call combined the two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    /// The operands overlapped or touched and were combined.
    Merged,
    /// The operands were disjoint; the receiver was returned unchanged.
    NotMerged,
}

/// The value returned by [`Period::merge`].
///
/// The outcome is transient: it lives on this wrapper only and never becomes
/// part of the [`Period`] itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Merge {
    pub period: Period,
    pub outcome: MergeOutcome,
}

impl Merge {
    pub fn is_merged(&self) -> bool {
        self.outcome == MergeOutcome::Merged
    }
}

/// Wire shape of a period before validation.
#[derive(Deserialize)]
struct RawPeriod {
    start: String,
    end: String,
}

impl TryFrom<RawPeriod> for Period {
    type Error = PeriodError;

    fn try_from(raw: RawPeriod) -> Result<Self> {
        Period::parse(&raw.start, &raw.end)
    }
}

impl Period {
    /// Create a period from two instants.
    ///
    /// # Errors
    /// Returns `PeriodError::StartAfterEnd` if `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        check_order(start, end)?;
        Ok(Self { start, end })
    }

    /// Create a period from two timestamp strings.
    ///
    /// Accepts RFC 3339 (e.g. "2024-09-08T22:00:00+02:00") and naive local time
    /// (e.g. "2024-09-08T22:00:00" or "2024-09-08T22:00"), which is read as UTC.
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidTimestamp` if either string is malformed and
    /// `PeriodError::StartAfterEnd` if the parsed start comes after the end.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_timestamp(start)?;
        let end = parse_timestamp(end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Length of the period in whole minutes, rounded down.
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True when the two periods share a span of positive length.
    ///
    /// Periods that only touch at one instant do not overlap, and neither does
    /// a zero-length period lying inside another.
    pub fn overlaps(&self, other: &Period) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    /// True when `other` lies entirely within this period, edges included.
    pub fn contains(&self, other: &Period) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Combine this period with `other` if their closed ranges intersect.
    ///
    /// Touching at a single instant counts as intersecting. Disjoint operands
    /// yield this period unchanged with [`MergeOutcome::NotMerged`].
    pub fn merge(&self, other: &Period) -> Merge {
        if self.start <= other.end && other.start <= self.end {
            Merge {
                period: Period {
                    start: self.start.min(other.start),
                    end: self.end.max(other.end),
                },
                outcome: MergeOutcome::Merged,
            }
        } else {
            Merge {
                period: *self,
                outcome: MergeOutcome::NotMerged,
            }
        }
    }

    /// Remove the overlapping portion of `other` from this period.
    ///
    /// Shorthand for [`Period::subtract_with_minimum`] with no minimum duration.
    pub fn subtract(&self, other: &Period) -> Vec<Period> {
        self.subtract_keeping(other, Duration::zero())
    }

    /// Remove the overlapping portion of `other` from this period, keeping only
    /// fragments at least `minimum_duration_mins` long.
    ///
    /// Returns zero, one or two fragments in chronological order:
    /// - `other` covers this period: nothing is left.
    /// - no overlap (including a zero-length `other`): this period unchanged.
    /// - overlap at the start: `[other.end, self.end]`.
    /// - overlap at the end: `[self.start, other.start]`.
    /// - `other` strictly inside: `[self.start, other.start]` and `[other.end, self.end]`.
    ///
    /// # Errors
    /// Returns `PeriodError::OutOfRange` if `minimum_duration_mins` is negative.
    pub fn subtract_with_minimum(
        &self,
        other: &Period,
        minimum_duration_mins: i64,
    ) -> Result<Vec<Period>> {
        let minimum = non_negative_minutes("minimum_duration_mins", minimum_duration_mins)?;
        Ok(self.subtract_keeping(other, minimum))
    }

    /// Subtraction with an already validated minimum fragment length.
    pub(crate) fn subtract_keeping(&self, other: &Period, minimum: Duration) -> Vec<Period> {
        let mut fragments = if other.contains(self) {
            Vec::new()
        } else if !self.overlaps(other) {
            vec![*self]
        } else if other.start <= self.start {
            vec![Period {
                start: other.end,
                end: self.end,
            }]
        } else if other.end >= self.end {
            vec![Period {
                start: self.start,
                end: other.start,
            }]
        } else {
            vec![
                Period {
                    start: self.start,
                    end: other.start,
                },
                Period {
                    start: other.end,
                    end: self.end,
                },
            ]
        };
        fragments.retain(|fragment| fragment.duration() >= minimum);
        trace!("{} minus {} -> {} fragment(s)", self, other, fragments.len());
        fragments
    }

    /// Split this period into consecutive chunks of `divisor_mins` minutes.
    ///
    /// The final chunk is truncated to `end` when the remaining span is shorter
    /// than the divisor. A zero-length period yields no chunks.
    ///
    /// # Errors
    /// Returns `PeriodError::OutOfRange` if `divisor_mins` is zero or negative.
    pub fn divide_by_length(&self, divisor_mins: i64) -> Result<Vec<Period>> {
        if divisor_mins <= 0 {
            return Err(PeriodError::OutOfRange {
                parameter: "divisor_mins",
                value: divisor_mins,
            });
        }
        let step = saturating_minutes(divisor_mins);

        let mut chunks = Vec::new();
        let mut cursor = self.start;
        while cursor < self.end {
            let next = cursor
                .checked_add_signed(step)
                .map_or(self.end, |next| next.min(self.end));
            chunks.push(Period {
                start: cursor,
                end: next,
            });
            cursor = next;
        }
        Ok(chunks)
    }

    /// Pull the end of this period back by `duration_mins` minutes.
    ///
    /// The end never moves before `start`; trimming by the full duration or more
    /// yields a zero-length period at `start`.
    ///
    /// # Errors
    /// Returns `PeriodError::OutOfRange` if `duration_mins` is negative.
    pub fn trim_end(&self, duration_mins: i64) -> Result<Period> {
        let trim = non_negative_minutes("duration_mins", duration_mins)?;
        let end = self
            .end
            .checked_sub_signed(trim)
            .map_or(self.start, |end| end.max(self.start));
        Ok(Period {
            start: self.start,
            end,
        })
    }

    /// Check whether `[start, end]` lasts at least `duration_mins` minutes.
    ///
    /// # Errors
    /// Returns `PeriodError::OutOfRange` if `duration_mins` is negative and
    /// `PeriodError::StartAfterEnd` if `start > end`.
    pub fn is_not_less_than_duration(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duration_mins: i64,
    ) -> Result<bool> {
        let duration = non_negative_minutes("duration", duration_mins)?;
        check_order(start, end)?;
        Ok(end - start >= duration)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Parse an ISO 8601 timestamp into `DateTime<Utc>`.
///
/// RFC 3339 strings keep their offset; naive strings are interpreted as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let rfc3339_error = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e,
    };
    let invalid = || PeriodError::InvalidTimestamp {
        value: value.to_string(),
        reason: rfc3339_error.to_string(),
    };

    // chrono accepts unpadded fields such as "2024-09-8"; only zero-padded
    // input is well formed.
    if !has_naive_layout(value) {
        return Err(invalid());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(invalid)
}

/// True for `YYYY-MM-DDTHH:MM`, `YYYY-MM-DDTHH:MM:SS` and the latter with a
/// `.fff` fraction of any length.
fn has_naive_layout(value: &str) -> bool {
    let bytes = value.as_bytes();
    let (head, fraction) = bytes.split_at(bytes.len().min(NAIVE_LAYOUT.len()));

    let head_matches = matches!(head.len(), 16 | 19)
        && head.iter().zip(NAIVE_LAYOUT).all(|(&byte, &expected)| {
            if expected == b'd' {
                byte.is_ascii_digit()
            } else {
                byte == expected
            }
        });

    let fraction_matches = match fraction.split_first() {
        None => true,
        Some((b'.', digits)) => !digits.is_empty() && digits.iter().all(u8::is_ascii_digit),
        Some(_) => false,
    };

    head_matches && fraction_matches
}

fn check_order(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if start > end {
        return Err(PeriodError::StartAfterEnd { start, end });
    }
    Ok(())
}

pub(crate) fn non_negative_minutes(parameter: &'static str, value: i64) -> Result<Duration> {
    if value < 0 {
        return Err(PeriodError::OutOfRange { parameter, value });
    }
    Ok(saturating_minutes(value))
}

// Values beyond the representable range behave as "longer than any period".
fn saturating_minutes(value: i64) -> Duration {
    Duration::try_minutes(value).unwrap_or(Duration::MAX)
}
