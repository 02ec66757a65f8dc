use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::FilterInputError;

use super::model::Record;

/// A user-set bound. Bounds are whole, non-negative numbers.
pub type Bound = u64;

// ---------------------------------------------------------------------------
// FilterAxis – the six bounds a user can set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterAxis {
    StartYear,
    EndYear,
    MinRevenue,
    MaxRevenue,
    MinNetIncome,
    MaxNetIncome,
}

impl FilterAxis {
    pub const ALL: [FilterAxis; 6] = [
        FilterAxis::StartYear,
        FilterAxis::EndYear,
        FilterAxis::MinRevenue,
        FilterAxis::MaxRevenue,
        FilterAxis::MinNetIncome,
        FilterAxis::MaxNetIncome,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterAxis::StartYear => "Start Year",
            FilterAxis::EndYear => "End Year",
            FilterAxis::MinRevenue => "Min Revenue",
            FilterAxis::MaxRevenue => "Max Revenue",
            FilterAxis::MinNetIncome => "Min Net Income",
            FilterAxis::MaxNetIncome => "Max Net Income",
        }
    }

    /// Year axes take a plain `YYYY`; the others are money amounts.
    pub fn is_year(self) -> bool {
        matches!(self, FilterAxis::StartYear | FilterAxis::EndYear)
    }

    fn is_lower(self) -> bool {
        matches!(
            self,
            FilterAxis::StartYear | FilterAxis::MinRevenue | FilterAxis::MinNetIncome
        )
    }

    /// The record's value on this axis, as compared against a bound.
    fn value_of(self, record: &Record) -> Option<f64> {
        match self {
            FilterAxis::StartYear | FilterAxis::EndYear => record.year().map(f64::from),
            FilterAxis::MinRevenue | FilterAxis::MaxRevenue => record.revenue,
            FilterAxis::MinNetIncome | FilterAxis::MaxNetIncome => record.net_income,
        }
    }
}

impl fmt::Display for FilterAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// FilterSpec – current bounds, all unset by default
// ---------------------------------------------------------------------------

/// The six optional bounds. `None` means "no constraint on this axis".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub start_year: Option<Bound>,
    pub end_year: Option<Bound>,
    pub min_revenue: Option<Bound>,
    pub max_revenue: Option<Bound>,
    pub min_net_income: Option<Bound>,
    pub max_net_income: Option<Bound>,
}

impl FilterSpec {
    pub fn get(&self, axis: FilterAxis) -> Option<Bound> {
        *self.slot(axis)
    }

    pub fn set(&mut self, axis: FilterAxis, bound: Option<Bound>) {
        *self.slot_mut(axis) = bound;
    }

    #[must_use]
    pub fn with(mut self, axis: FilterAxis, bound: Bound) -> Self {
        self.set(axis, Some(bound));
        self
    }

    /// Per-field replace: axes absent from the patch are left alone.
    pub fn merge(&mut self, patch: &FilterPatch) {
        for (&axis, &bound) in &patch.changes {
            self.set(axis, bound);
        }
    }

    pub fn active_count(&self) -> usize {
        FilterAxis::ALL
            .iter()
            .filter(|&&axis| self.get(axis).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    fn slot(&self, axis: FilterAxis) -> &Option<Bound> {
        match axis {
            FilterAxis::StartYear => &self.start_year,
            FilterAxis::EndYear => &self.end_year,
            FilterAxis::MinRevenue => &self.min_revenue,
            FilterAxis::MaxRevenue => &self.max_revenue,
            FilterAxis::MinNetIncome => &self.min_net_income,
            FilterAxis::MaxNetIncome => &self.max_net_income,
        }
    }

    fn slot_mut(&mut self, axis: FilterAxis) -> &mut Option<Bound> {
        match axis {
            FilterAxis::StartYear => &mut self.start_year,
            FilterAxis::EndYear => &mut self.end_year,
            FilterAxis::MinRevenue => &mut self.min_revenue,
            FilterAxis::MaxRevenue => &mut self.max_revenue,
            FilterAxis::MinNetIncome => &mut self.min_net_income,
            FilterAxis::MaxNetIncome => &mut self.max_net_income,
        }
    }
}

/// A partial [`FilterSpec`]: each entry sets or clears exactly one axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    changes: BTreeMap<FilterAxis, Option<Bound>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, axis: FilterAxis, bound: Bound) -> Self {
        self.changes.insert(axis, Some(bound));
        self
    }

    #[must_use]
    pub fn clear(mut self, axis: FilterAxis) -> Self {
        self.changes.insert(axis, None);
        self
    }

    #[must_use]
    pub fn with(mut self, axis: FilterAxis, bound: Option<Bound>) -> Self {
        self.changes.insert(axis, bound);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Input normalization
// ---------------------------------------------------------------------------

/// Drop every character that is not an ASCII digit.
///
/// Applied to bound fields on every keystroke, so letters, signs and
/// separators never survive in the text buffer.
pub fn sanitize_input(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Turn user text into a bound. Blank text means "unset".
///
/// Digit grouping with `,`, `_` or spaces is accepted (`1,000,000`).
pub fn parse_bound(raw: &str) -> Result<Option<Bound>, FilterInputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.starts_with('-') {
        return Err(FilterInputError::Negative);
    }
    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(FilterInputError::NotNumeric(trimmed.to_string()));
    }
    digits
        .parse::<Bound>()
        .map(Some)
        .map_err(|_| FilterInputError::OutOfRange(trimmed.to_string()))
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Whether `record` satisfies every bound set in `spec`.
///
/// Bounds are inclusive. A set bound on an axis the record cannot be
/// evaluated on (bad date, missing figure) fails that axis; unset axes
/// never look at the record.
pub fn passes(record: &Record, spec: &FilterSpec) -> bool {
    FilterAxis::ALL.iter().all(|&axis| {
        let Some(bound) = spec.get(axis) else {
            return true;
        };
        let Some(value) = axis.value_of(record) else {
            return false;
        };
        let ord = cmp_bound(value, bound);
        if axis.is_lower() {
            ord != Ordering::Less
        } else {
            ord != Ordering::Greater
        }
    })
}

/// Exact ordering of a finite record value against an integer bound.
///
/// Casting the bound to `f64` would round anything above 2^53.
fn cmp_bound(value: f64, bound: Bound) -> Ordering {
    const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;
    if value < 0.0 {
        return Ordering::Less;
    }
    if value >= TWO_POW_64 {
        return Ordering::Greater;
    }
    let whole = value.trunc() as u64;
    match whole.cmp(&bound) {
        Ordering::Equal if value.fract() != 0.0 => Ordering::Greater,
        ord => ord,
    }
}

/// Records that pass `spec`, in their original relative order.
pub fn apply(records: &[Record], spec: &FilterSpec) -> Vec<Record> {
    let kept: Vec<Record> = records
        .iter()
        .filter(|r| passes(r, spec))
        .cloned()
        .collect();
    log::debug!(
        "filter kept {}/{} records ({} bounds active)",
        kept.len(),
        records.len(),
        spec.active_count()
    );
    kept
}
