use std::cmp::Ordering;
use std::fmt;

use super::model::Record;

// ---------------------------------------------------------------------------
// Sort key / direction
// ---------------------------------------------------------------------------

/// Columns the table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Date,
    Revenue,
    NetIncome,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Date, SortKey::Revenue, SortKey::NetIncome];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Date => "Date",
            SortKey::Revenue => "Revenue",
            SortKey::NetIncome => "Net Income",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header marker shown next to the active column.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "△",
            SortDirection::Descending => "▽",
        }
    }
}

// ---------------------------------------------------------------------------
// SortSpec
// ---------------------------------------------------------------------------

/// Active sort column and direction. `key: None` keeps input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: Some(SortKey::Date),
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    pub fn unsorted() -> Self {
        Self {
            key: None,
            direction: SortDirection::Ascending,
        }
    }

    /// Column-header click: re-selecting the active key flips the direction,
    /// any other key starts ascending.
    pub fn select(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.toggled();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Ascending;
        }
    }

    /// Direction of `key` if it is the active column.
    pub fn direction_for(&self, key: SortKey) -> Option<SortDirection> {
        (self.key == Some(key)).then_some(self.direction)
    }
}

// ---------------------------------------------------------------------------
// Sort engine
// ---------------------------------------------------------------------------

/// Ascending comparison of two records on `key`.
///
/// Dates compare as text, which orders ISO dates correctly. Numbers compare
/// by value, so `-0` and `0` are equal. NaN never reaches here (`Record`
/// figures are finite). Missing numbers compare as `Greater` so they end up
/// last when ascending.
fn compare_ascending(a: &Record, b: &Record, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Revenue | SortKey::NetIncome => match (a.numeric(key), b.numeric(key)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn compare(a: &Record, b: &Record, spec: &SortSpec, key: SortKey) -> Ordering {
    let missing_a = key != SortKey::Date && a.numeric(key).is_none();
    let missing_b = key != SortKey::Date && b.numeric(key).is_none();
    if missing_a || missing_b {
        // Records without a value trail in both directions.
        return missing_a.cmp(&missing_b);
    }
    match spec.direction {
        SortDirection::Ascending => compare_ascending(a, b, key),
        SortDirection::Descending => compare_ascending(b, a, key),
    }
}

/// A new vector ordered by `spec`. The sort is stable, so records with equal
/// keys keep their input order in either direction.
pub fn apply(records: &[Record], spec: &SortSpec) -> Vec<Record> {
    let mut out = records.to_vec();
    if let Some(key) = spec.key {
        out.sort_by(|a, b| compare(a, b, spec, key));
    }
    out
}
