//! # period-algebra
//!
//! Deterministic set-like operations over spans of time.
//!
//! A [`Period`] is a closed span `[start, end]`; a [`PeriodList`] is an ordered
//! collection of them. Together they cover the interval arithmetic behind
//! scheduling, availability and calendar-overlap computations: merging,
//! subtracting busy time, cutting a span into equal slots, trimming, and
//! containment checks. Every operation is pure and returns new values.
//!
//! ## Modules
//!
//! - [`period`] — A single span and its pairwise operations
//! - [`period_list`] — Ordered lists of spans and list-wide operations
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use period_algebra::{Period, PeriodList};
//!
//! let open_hours = PeriodList::new(vec![
//!     Period::parse("2024-09-08T09:00:00", "2024-09-08T12:00:00").unwrap(),
//! ]);
//! let meetings = [Period::parse("2024-09-08T10:00:00", "2024-09-08T11:00:00").unwrap()];
//!
//! let free = open_hours.subtract_multiple(meetings);
//! assert_eq!(free.len(), 2);
//! ```

pub mod error;
pub mod period;
pub mod period_list;

pub use error::PeriodError;
pub use period::{parse_timestamp, Merge, MergeOutcome, Period};
pub use period_list::PeriodList;
