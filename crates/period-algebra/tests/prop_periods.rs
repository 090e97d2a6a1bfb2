//! Property-based tests for period operations using proptest.
//!
//! These tests verify invariants that should hold for *any* valid period,
//! not just the specific examples in `period_tests.rs` and `period_list_tests.rs`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use period_algebra::{MergeOutcome, Period, PeriodError, PeriodList};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
}

/// A period within one week, expressed as minute offsets from `base()`.
fn arb_period() -> impl Strategy<Value = Period> {
    (0i64..10_080, 0i64..600).prop_map(|(offset, length)| {
        let start = base() + Duration::minutes(offset);
        Period::new(start, start + Duration::minutes(length)).unwrap()
    })
}

fn arb_periods() -> impl Strategy<Value = Vec<Period>> {
    prop::collection::vec(arb_period(), 0..20)
}

fn total_minutes(periods: &[Period]) -> i64 {
    periods.iter().map(Period::duration_minutes).sum()
}

/// Minutes of `a` that `b` removes.
fn overlap_minutes(a: &Period, b: &Period) -> i64 {
    let start = a.start().max(b.start());
    let end = a.end().min(b.end());
    if start < end {
        (end - start).num_minutes()
    } else {
        0
    }
}

proptest! {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn construction_rejects_every_reversed_pair(offset in 0i64..10_080, gap in 1i64..600) {
        let end = base() + Duration::minutes(offset);
        let start = end + Duration::minutes(gap);
        let is_start_after_end = matches!(
            Period::new(start, end),
            Err(PeriodError::StartAfterEnd { .. })
        );
        prop_assert!(is_start_after_end);
    }

    // -----------------------------------------------------------------------
    // subtract
    // -----------------------------------------------------------------------

    #[test]
    fn subtract_conserves_minutes(p in arb_period(), q in arb_period()) {
        let fragments = p.subtract(&q);
        prop_assert!(fragments.len() <= 2);
        prop_assert_eq!(
            total_minutes(&fragments) + overlap_minutes(&p, &q),
            p.duration_minutes()
        );
        for fragment in &fragments {
            prop_assert!(p.contains(fragment));
            prop_assert!(!fragment.overlaps(&q));
        }
    }

    #[test]
    fn subtract_without_overlap_is_identity(p in arb_period(), q in arb_period()) {
        prop_assume!(!p.overlaps(&q) && !q.contains(&p));
        prop_assert_eq!(p.subtract(&q), vec![p]);
    }

    #[test]
    fn subtract_zero_length_period_removes_nothing(
        p in arb_period(),
        offset in 0i64..600,
        minimum in 0i64..300,
    ) {
        let instant_at = p.start() + Duration::minutes(offset.min(p.duration_minutes()));
        let instant = Period::new(instant_at, instant_at).unwrap();
        prop_assume!(!instant.contains(&p));

        prop_assert!(!p.overlaps(&instant));
        prop_assert_eq!(p.subtract(&instant), vec![p]);
        let filtered = p.subtract_with_minimum(&instant, minimum).unwrap();
        if p.duration() >= Duration::minutes(minimum) {
            prop_assert_eq!(filtered, vec![p]);
        } else {
            prop_assert!(filtered.is_empty());
        }
    }

    #[test]
    fn subtract_covering_period_is_empty(p in arb_period(), before in 0i64..60, after in 0i64..60) {
        let cover = Period::new(
            p.start() - Duration::minutes(before),
            p.end() + Duration::minutes(after),
        ).unwrap();
        prop_assert!(p.subtract(&cover).is_empty());
    }

    #[test]
    fn subtract_minimum_only_drops_short_fragments(
        p in arb_period(),
        q in arb_period(),
        minimum in 0i64..300,
    ) {
        let unfiltered = p.subtract(&q);
        let filtered = p.subtract_with_minimum(&q, minimum).unwrap();
        let expected: Vec<Period> = unfiltered
            .into_iter()
            .filter(|f| f.duration() >= Duration::minutes(minimum))
            .collect();
        prop_assert_eq!(filtered, expected);
    }

    // -----------------------------------------------------------------------
    // divide_by_length
    // -----------------------------------------------------------------------

    #[test]
    fn divide_reconstructs_span(p in arb_period(), divisor in 1i64..120) {
        let chunks = p.divide_by_length(divisor).unwrap();
        let length = p.duration_minutes();

        prop_assert_eq!(chunks.len() as i64, (length + divisor - 1) / divisor);
        prop_assert_eq!(total_minutes(&chunks), length);

        let mut cursor = p.start();
        for (index, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.start(), cursor);
            if index + 1 < chunks.len() {
                prop_assert_eq!(chunk.duration_minutes(), divisor);
            } else {
                prop_assert!(chunk.duration_minutes() <= divisor);
            }
            cursor = chunk.end();
        }
        if !chunks.is_empty() {
            prop_assert_eq!(cursor, p.end());
        }
    }

    // -----------------------------------------------------------------------
    // trim_end
    // -----------------------------------------------------------------------

    #[test]
    fn trim_end_never_crosses_start(p in arb_period(), trim in 0i64..900) {
        let trimmed = p.trim_end(trim).unwrap();
        prop_assert_eq!(trimmed.start(), p.start());
        prop_assert!(trimmed.end() >= p.start());
        if trim >= p.duration_minutes() {
            prop_assert_eq!(trimmed.end(), p.start());
        } else {
            prop_assert_eq!(trimmed.end(), p.end() - Duration::minutes(trim));
        }
    }

    // -----------------------------------------------------------------------
    // merge / merge_multiple
    // -----------------------------------------------------------------------

    #[test]
    fn merge_is_symmetric_in_span(p in arb_period(), q in arb_period()) {
        let pq = p.merge(&q);
        let qp = q.merge(&p);
        prop_assert_eq!(pq.outcome, qp.outcome);
        if pq.outcome == MergeOutcome::Merged {
            prop_assert_eq!(pq.period, qp.period);
            prop_assert!(pq.period.contains(&p) && pq.period.contains(&q));
        } else {
            prop_assert_eq!(pq.period, p);
            prop_assert_eq!(qp.period, q);
        }
    }

    #[test]
    fn merge_multiple_is_sorted_and_separated(periods in arb_periods()) {
        let merged = PeriodList::new(periods.clone()).merge_multiple();

        for pair in merged.get_all().windows(2) {
            prop_assert!(pair[0].end() < pair[1].start());
        }
        for original in &periods {
            prop_assert!(merged.contains(original));
        }
    }

    // -----------------------------------------------------------------------
    // PeriodList
    // -----------------------------------------------------------------------

    #[test]
    fn list_contains_matches_any_single_period(periods in arb_periods(), q in arb_period()) {
        let list = PeriodList::new(periods.clone());
        prop_assert_eq!(list.contains(&q), periods.iter().any(|p| p.contains(&q)));
    }

    #[test]
    fn subtract_multiple_leaves_no_overlap(
        periods in arb_periods(),
        subtrahends in arb_periods(),
        minimum in 0i64..60,
    ) {
        let list = PeriodList::new(periods);
        let remaining = list.subtract_multiple_with_minimum(&subtrahends, minimum).unwrap();

        for fragment in &remaining {
            // The minimum is applied per subtraction step; no steps, no filter.
            if !subtrahends.is_empty() {
                prop_assert!(fragment.duration() >= Duration::minutes(minimum));
            }
            prop_assert!(list.contains(fragment));
            for subtrahend in &subtrahends {
                prop_assert!(!fragment.overlaps(subtrahend));
            }
        }
    }

    #[test]
    fn trim_all_end_preserves_length(periods in arb_periods(), trim in 0i64..120) {
        let list = PeriodList::new(periods);
        prop_assert_eq!(list.trim_all_end(trim).unwrap().len(), list.len());
    }
}
