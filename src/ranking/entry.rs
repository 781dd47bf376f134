//! Ranked entries, their order values, and the four ranking criteria.

use std::fmt;

/// The value a repository is ranked by under one criterion.
///
/// Counts compare numerically. Timestamps compare as raw strings, which
/// orders correctly because the upstream emits fixed-width, zero-padded
/// ISO-8601 values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderValue {
    Count(i64),
    Timestamp(String),
}

impl fmt::Display for OrderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderValue::Count(n) => write!(f, "{n}"),
            OrderValue::Timestamp(s) => write_quoted(f, s),
        }
    }
}

/// One repository under one ranking criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankedEntry {
    pub name: String,
    pub order: OrderValue,
}

impl RankedEntry {
    pub fn new(name: impl Into<String>, order: OrderValue) -> Self {
        Self {
            name: name.into(),
            order,
        }
    }

    /// Entry ordered by an integer count.
    pub fn count(name: impl Into<String>, n: i64) -> Self {
        Self::new(name, OrderValue::Count(n))
    }

    /// Entry ordered by a timestamp string.
    pub fn timestamp(name: impl Into<String>, ts: impl Into<String>) -> Self {
        Self::new(name, OrderValue::Timestamp(ts.into()))
    }
}

/// Renders as a two-element JSON array: `["name", 200]` or
/// `["name", "2022-02-15"]`.
impl fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_quoted(f, &self.name)?;
        write!(f, ", {}]", self.order)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    // Serializing a &str cannot fail
    match serde_json::to_string(s) {
        Ok(quoted) => f.write_str(&quoted),
        Err(_) => Err(fmt::Error),
    }
}

/// Render a sequence of entries as `[e1, e2, ...]`, or `[]` when empty.
pub fn render_entries(entries: &[RankedEntry]) -> String {
    let rendered: Vec<String> = entries.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

/// The four fixed ranking criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Forks,
    Stars,
    OpenIssues,
    LastUpdated,
}

impl Criterion {
    /// All criteria, in view-set order.
    pub const ALL: [Criterion; 4] = [
        Criterion::Forks,
        Criterion::Stars,
        Criterion::OpenIssues,
        Criterion::LastUpdated,
    ];

    /// Look up a criterion by its public name (`forks`, `stars`,
    /// `open_issues`, `last_updated`). Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Public name used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Forks => "forks",
            Criterion::Stars => "stars",
            Criterion::OpenIssues => "open_issues",
            Criterion::LastUpdated => "last_updated",
        }
    }

    /// Repository record field the criterion ranks by.
    pub fn field(&self) -> &'static str {
        match self {
            Criterion::Forks => "forks_count",
            Criterion::Stars => "stargazers_count",
            Criterion::OpenIssues => "open_issues_count",
            Criterion::LastUpdated => "updated_at",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
