//! Building the four ranking views from one repositories snapshot.

use std::cmp::Ordering;

use serde::Deserialize;
use serde_json::Value;

use super::entry::{Criterion, OrderValue, RankedEntry};
use crate::{ProxyError, Result};

const NAME_FIELD: &str = "full_name";

/// The fields of an upstream repository record the views need.
///
/// Every field is optional at parse time so that an absent (or null)
/// field is reported as [`ProxyError::MissingField`] rather than as a
/// generic parse failure.
#[derive(Debug, Deserialize)]
struct RepositoryRecord {
    full_name: Option<String>,
    forks_count: Option<i64>,
    stargazers_count: Option<i64>,
    open_issues_count: Option<i64>,
    updated_at: Option<String>,
}

impl RepositoryRecord {
    /// Records must be JSON objects; serde would otherwise also accept a
    /// positional array for a derived struct.
    fn from_value(value: Value, index: usize) -> Result<Self> {
        if !value.is_object() {
            return Err(ProxyError::MalformedResponse(format!(
                "record {index} is not a JSON object"
            )));
        }
        serde_json::from_value(value).map_err(|e| {
            ProxyError::MalformedResponse(format!("record {index} is malformed: {e}"))
        })
    }

    fn name(&self, index: usize) -> Result<&str> {
        match self.full_name.as_deref() {
            None => Err(ProxyError::MissingField {
                field: NAME_FIELD,
                index,
            }),
            Some("") => Err(ProxyError::MalformedResponse(format!(
                "record {index} has an empty {NAME_FIELD}"
            ))),
            Some(name) => Ok(name),
        }
    }

    fn order(&self, criterion: Criterion, index: usize) -> Result<OrderValue> {
        let value = match criterion {
            Criterion::Forks => self.forks_count.map(OrderValue::Count),
            Criterion::Stars => self.stargazers_count.map(OrderValue::Count),
            Criterion::OpenIssues => self.open_issues_count.map(OrderValue::Count),
            Criterion::LastUpdated => self.updated_at.clone().map(OrderValue::Timestamp),
        };
        value.ok_or(ProxyError::MissingField {
            field: criterion.field(),
            index,
        })
    }
}

/// Ranking comparator shared by every view: order value descending, then
/// name ascending.
pub fn compare_entries(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.order.cmp(&a.order).then_with(|| a.name.cmp(&b.name))
}

/// Four fully sorted views over the same repositories snapshot.
///
/// Built in one go by [`RepositoryViewSet::build`] and never mutated
/// afterwards; a refresh replaces the whole set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryViewSet {
    by_forks: Vec<RankedEntry>,
    by_stars: Vec<RankedEntry>,
    by_open_issues: Vec<RankedEntry>,
    by_last_updated: Vec<RankedEntry>,
}

impl RepositoryViewSet {
    /// Parse a JSON array of repository records and build all four views.
    ///
    /// Fails with [`ProxyError::MalformedResponse`] if `raw` is not an
    /// array of objects with correctly typed fields, and with
    /// [`ProxyError::MissingField`] if any record lacks a required field.
    pub fn build(raw: &str) -> Result<Self> {
        let values: Vec<Value> = serde_json::from_str(raw).map_err(|e| {
            ProxyError::MalformedResponse(format!("expected an array of repositories: {e}"))
        })?;
        let records = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| RepositoryRecord::from_value(value, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            by_forks: rank(&records, Criterion::Forks)?,
            by_stars: rank(&records, Criterion::Stars)?,
            by_open_issues: rank(&records, Criterion::OpenIssues)?,
            by_last_updated: rank(&records, Criterion::LastUpdated)?,
        })
    }

    /// Assemble a view set from already ordered sequences.
    ///
    /// The sequences are taken as given; no sorting is applied.
    pub fn from_sorted(
        by_forks: Vec<RankedEntry>,
        by_stars: Vec<RankedEntry>,
        by_open_issues: Vec<RankedEntry>,
        by_last_updated: Vec<RankedEntry>,
    ) -> Self {
        Self {
            by_forks,
            by_stars,
            by_open_issues,
            by_last_updated,
        }
    }

    /// The full sequence for one criterion.
    pub fn ordered_by(&self, criterion: Criterion) -> &[RankedEntry] {
        match criterion {
            Criterion::Forks => &self.by_forks,
            Criterion::Stars => &self.by_stars,
            Criterion::OpenIssues => &self.by_open_issues,
            Criterion::LastUpdated => &self.by_last_updated,
        }
    }

    /// The last `limit` entries of a sequence, in their existing order.
    ///
    /// Sequences are sorted descending, so these are the `limit` smallest
    /// (or oldest) repositories.
    pub fn bottom(&self, criterion: Criterion, limit: usize) -> &[RankedEntry] {
        let entries = self.ordered_by(criterion);
        &entries[entries.len().saturating_sub(limit)..]
    }

    /// Number of repositories in the snapshot.
    pub fn len(&self) -> usize {
        self.by_forks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn rank(records: &[RepositoryRecord], criterion: Criterion) -> Result<Vec<RankedEntry>> {
    let mut entries = records
        .iter()
        .enumerate()
        .map(|(index, record)| -> Result<RankedEntry> {
            Ok(RankedEntry::new(
                record.name(index)?,
                record.order(criterion, index)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    entries.sort_by(compare_entries);
    Ok(entries)
}
