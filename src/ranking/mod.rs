//! Pre-sorted ranking views over a repositories snapshot.
//!
//! A [`RepositoryViewSet`] holds one fully sorted sequence per
//! [`Criterion`]. Every sequence uses the same comparator: order value
//! descending, ties broken by name ascending. "Bottom N" queries are then
//! a tail slice, with no re-sorting per request.

pub mod entry;
pub mod views;

pub use entry::{Criterion, OrderValue, RankedEntry, render_entries};
pub use views::{RepositoryViewSet, compare_entries};
