//! Ordered collections of periods and their list-wide operations.
//!
//! Every aggregate drives the [`Period`] primitives over each stored element
//! and collects the results into a fresh [`PeriodList`]. Stored order is the
//! processing order; only [`PeriodList::merge_multiple`] sorts chronologically.

use std::ops::Index;

use chrono::Duration;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::period::{non_negative_minutes, Period};

/// An insertion-ordered list of periods. Duplicates and overlaps are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodList {
    periods: Vec<Period>,
}

impl PeriodList {
    pub fn new(periods: Vec<Period>) -> Self {
        Self { periods }
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Period> {
        self.periods.get(index)
    }

    /// Read-only view of every stored period, in stored order.
    pub fn get_all(&self) -> &[Period] {
        &self.periods
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Period> {
        self.periods.iter()
    }

    /// Visit every period with its index, in stored order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&Period, usize),
    {
        for (index, period) in self.periods.iter().enumerate() {
            visit(period, index);
        }
    }

    pub fn into_vec(self) -> Vec<Period> {
        self.periods
    }

    /// True when a single stored period fully contains `period`.
    ///
    /// A period covered only by the union of several stored periods is not
    /// contained.
    pub fn contains(&self, period: &Period) -> bool {
        self.periods.iter().any(|stored| stored.contains(period))
    }

    /// Subtract every period in `subtrahends` from every stored period.
    ///
    /// Shorthand for [`PeriodList::subtract_multiple_with_minimum`] with no
    /// minimum duration.
    pub fn subtract_multiple<S: AsRef<[Period]>>(&self, subtrahends: S) -> PeriodList {
        self.subtract_each(subtrahends.as_ref(), Duration::zero())
    }

    /// Subtract every period in `subtrahends` from every stored period,
    /// discarding fragments shorter than `minimum_duration_mins`.
    ///
    /// Subtrahends are applied one after another. The minimum is enforced after
    /// every step, so a fragment dropped early is never brought back by a later
    /// subtrahend. The surviving fragments of each stored period are emitted in
    /// stored order.
    ///
    /// # Errors
    /// Returns `PeriodError::OutOfRange` if `minimum_duration_mins` is negative.
    pub fn subtract_multiple_with_minimum<S: AsRef<[Period]>>(
        &self,
        subtrahends: S,
        minimum_duration_mins: i64,
    ) -> Result<PeriodList> {
        let minimum = non_negative_minutes("minimum_duration_mins", minimum_duration_mins)?;
        Ok(self.subtract_each(subtrahends.as_ref(), minimum))
    }

    fn subtract_each(&self, subtrahends: &[Period], minimum: Duration) -> PeriodList {
        let mut remaining = Vec::with_capacity(self.periods.len());

        for period in &self.periods {
            let mut fragments = vec![*period];
            for subtrahend in subtrahends {
                fragments = fragments
                    .iter()
                    .flat_map(|fragment| fragment.subtract_keeping(subtrahend, minimum))
                    .collect();
            }
            remaining.extend(fragments);
        }

        debug!(
            "subtracted {} period(s) from {} period(s), {} fragment(s) remain",
            subtrahends.len(),
            self.periods.len(),
            remaining.len()
        );
        PeriodList::new(remaining)
    }

    /// Union of the stored periods.
    ///
    /// Shorthand for [`PeriodList::merge_multiple_with`] with nothing added.
    pub fn merge_multiple(&self) -> PeriodList {
        self.merge_multiple_with::<&[Period]>(&[])
    }

    /// Union of the stored periods together with `additional`.
    ///
    /// Periods are sorted by start (then end) and swept left to right; any
    /// period that overlaps or touches the running cluster extends it. The
    /// result is chronological, non-overlapping and non-adjacent.
    pub fn merge_multiple_with<S: AsRef<[Period]>>(&self, additional: S) -> PeriodList {
        let additional = additional.as_ref();
        let mut sorted: Vec<Period> = self.periods.iter().chain(additional).copied().collect();
        sorted.sort();

        let mut merged: Vec<Period> = Vec::with_capacity(sorted.len());
        for period in sorted {
            if let Some(last) = merged.last_mut() {
                let merge = last.merge(&period);
                if merge.is_merged() {
                    *last = merge.period;
                    continue;
                }
            }
            merged.push(period);
        }

        debug!(
            "merged {} period(s) into {}",
            self.periods.len() + additional.len(),
            merged.len()
        );
        PeriodList::new(merged)
    }

    /// Split every stored period into chunks of `divisor_mins` minutes.
    ///
    /// # Errors
    /// Returns `PeriodError::OutOfRange` if `divisor_mins` is zero or negative.
    pub fn divide_all_by_length(&self, divisor_mins: i64) -> Result<PeriodList> {
        let mut chunks = Vec::new();
        for period in &self.periods {
            chunks.extend(period.divide_by_length(divisor_mins)?);
        }
        Ok(PeriodList::new(chunks))
    }

    /// Pull the end of every stored period back by `duration_mins` minutes.
    ///
    /// # Errors
    /// Returns `PeriodError::OutOfRange` if `duration_mins` is negative.
    pub fn trim_all_end(&self, duration_mins: i64) -> Result<PeriodList> {
        self.periods
            .iter()
            .map(|period| period.trim_end(duration_mins))
            .collect()
    }
}

impl From<Vec<Period>> for PeriodList {
    fn from(periods: Vec<Period>) -> Self {
        Self::new(periods)
    }
}

impl FromIterator<Period> for PeriodList {
    fn from_iter<I: IntoIterator<Item = Period>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl AsRef<[Period]> for PeriodList {
    fn as_ref(&self) -> &[Period] {
        &self.periods
    }
}

impl Index<usize> for PeriodList {
    type Output = Period;

    fn index(&self, index: usize) -> &Period {
        &self.periods[index]
    }
}

impl<'a> IntoIterator for &'a PeriodList {
    type Item = &'a Period;
    type IntoIter = std::slice::Iter<'a, Period>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

impl IntoIterator for PeriodList {
    type Item = Period;
    type IntoIter = std::vec::IntoIter<Period>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.into_iter()
    }
}
