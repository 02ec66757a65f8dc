use crate::error::RetrievalError;

use super::filter::{self, Bound, FilterAxis, FilterPatch, FilterSpec};
use super::model::Record;
use super::sort::{self, SortKey, SortSpec};

// ---------------------------------------------------------------------------
// View status handed to the rendering layer
// ---------------------------------------------------------------------------

/// What the table should show right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewStatus<'a> {
    /// No retrieval has succeeded yet.
    Pending,
    /// Filtered and sorted records. May be empty.
    Ready(&'a [Record]),
}

impl<'a> ViewStatus<'a> {
    pub fn records(self) -> Option<&'a [Record]> {
        match self {
            ViewStatus::Pending => None,
            ViewStatus::Ready(records) => Some(records),
        }
    }
}

/// Identifies one retrieval. Only the most recently issued ticket may
/// populate the raw data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDisposition {
    /// The records replaced the raw data.
    Applied,
    /// The retrieval failed; raw data is unchanged.
    Failed,
    /// A newer retrieval was started since; the outcome was dropped.
    Stale,
}

// ---------------------------------------------------------------------------
// ViewController
// ---------------------------------------------------------------------------

/// Owns the raw records, the filter and sort settings, and the view derived
/// from them. Every setter recomputes before returning, so the view read
/// back is never older than the settings.
#[derive(Debug, Default)]
pub struct ViewController {
    raw: Option<Vec<Record>>,
    filter: FilterSpec,
    sort: SortSpec,
    view: Vec<Record>,
    generation: u64,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_view(&self) -> ViewStatus<'_> {
        match self.raw {
            None => ViewStatus::Pending,
            Some(_) => ViewStatus::Ready(&self.view),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.raw.is_none()
    }

    /// Number of records before filtering (0 while pending).
    pub fn raw_len(&self) -> usize {
        self.raw.as_ref().map_or(0, Vec::len)
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Merge a partial filter update and recompute.
    pub fn set_filter(&mut self, patch: &FilterPatch) {
        if patch.is_empty() {
            return;
        }
        self.filter.merge(patch);
        self.recompute();
    }

    pub fn set_bound(&mut self, axis: FilterAxis, bound: Option<Bound>) {
        self.set_filter(&FilterPatch::new().with(axis, bound));
    }

    pub fn clear_filters(&mut self) {
        self.filter = FilterSpec::default();
        self.recompute();
    }

    /// Header click on `key`: flip direction if already active, else ascending.
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort.select(key);
        self.recompute();
    }

    pub fn clear_sort(&mut self) {
        self.sort = SortSpec::unsorted();
        self.recompute();
    }

    /// Replace the raw records. Filters and sort stay as they are.
    pub fn set_raw_data(&mut self, records: Vec<Record>) {
        log::info!("raw data replaced: {} records", records.len());
        self.raw = Some(records);
        self.recompute();
    }

    /// Start a retrieval. Any ticket issued earlier becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Whether a retrieval started with `ticket` is still the newest one.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Hand over a retrieval outcome.
    ///
    /// Outcomes from superseded tickets are discarded. A failure never
    /// touches the raw data: the view keeps reporting pending or the
    /// previously loaded records.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<Record>, RetrievalError>,
    ) -> FetchDisposition {
        if !self.is_current(ticket) {
            log::warn!(
                "discarding outcome of stale retrieval #{} (current #{})",
                ticket.0,
                self.generation
            );
            return FetchDisposition::Stale;
        }
        match outcome {
            Ok(records) => {
                self.set_raw_data(records);
                FetchDisposition::Applied
            }
            Err(e) => {
                log::warn!("retrieval #{} failed: {e}", ticket.0);
                FetchDisposition::Failed
            }
        }
    }

    /// Filter, then sort, then store. Does nothing while pending.
    fn recompute(&mut self) {
        let Some(raw) = &self.raw else {
            return;
        };
        let filtered = filter::apply(raw, &self.filter);
        self.view = sort::apply(&filtered, &self.sort);
        log::debug!("view recomputed: {}/{} records", self.view.len(), raw.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sort::SortDirection;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("2020-01-01", 100.0, 10.0),
            Record::new("2021-01-01", 50.0, 5.0),
            Record::new("2019-01-01", 200.0, 20.0),
        ]
    }

    fn dates(status: ViewStatus<'_>) -> Vec<String> {
        status
            .records()
            .unwrap_or_default()
            .iter()
            .map(|r| r.date.clone())
            .collect()
    }

    #[test]
    fn pending_until_data_arrives() {
        let mut vc = ViewController::new();
        assert_eq!(vc.current_view(), ViewStatus::Pending);
        vc.set_bound(FilterAxis::StartYear, Some(2020));
        vc.set_sort(SortKey::Revenue);
        assert!(vc.is_pending());

        vc.set_raw_data(sample());
        assert_eq!(dates(vc.current_view()), ["2021-01-01", "2020-01-01"]);
    }

    #[test]
    fn empty_result_is_not_pending() {
        let mut vc = ViewController::new();
        vc.set_raw_data(sample());
        vc.set_bound(FilterAxis::MinRevenue, Some(1000));
        assert_eq!(vc.current_view(), ViewStatus::Ready(&[]));
        assert!(!vc.is_pending());
    }

    #[test]
    fn default_view_is_date_descending() {
        let mut vc = ViewController::new();
        vc.set_raw_data(sample());
        assert_eq!(
            dates(vc.current_view()),
            ["2021-01-01", "2020-01-01", "2019-01-01"]
        );
    }

    #[test]
    fn set_sort_on_default_key_toggles_to_ascending_then_back() {
        let mut vc = ViewController::new();
        vc.set_raw_data(sample());
        vc.set_sort(SortKey::Date);
        assert_eq!(vc.sort().direction, SortDirection::Ascending);
        assert_eq!(
            dates(vc.current_view()),
            ["2019-01-01", "2020-01-01", "2021-01-01"]
        );
        vc.set_sort(SortKey::Date);
        assert_eq!(vc.sort().direction, SortDirection::Descending);
    }

    #[test]
    fn clear_sort_restores_input_order() {
        let mut vc = ViewController::new();
        vc.set_raw_data(sample());
        vc.set_sort(SortKey::Revenue);
        assert_eq!(
            dates(vc.current_view()),
            ["2021-01-01", "2020-01-01", "2019-01-01"]
        );

        vc.clear_sort();
        assert_eq!(vc.sort().key, None);
        assert_eq!(
            dates(vc.current_view()),
            ["2020-01-01", "2021-01-01", "2019-01-01"]
        );

        vc.set_sort(SortKey::NetIncome);
        assert_eq!(vc.sort().direction, SortDirection::Ascending);
    }

    #[test]
    fn new_raw_data_keeps_filters_and_sort() {
        let mut vc = ViewController::new();
        vc.set_raw_data(sample());
        vc.set_filter(&FilterPatch::new().set(FilterAxis::MaxNetIncome, 10));
        vc.set_sort(SortKey::Revenue);

        vc.set_raw_data(vec![
            Record::new("2022-01-01", 30.0, 3.0),
            Record::new("2023-01-01", 20.0, 30.0),
            Record::new("2024-01-01", 10.0, 1.0),
        ]);
        assert_eq!(vc.filter().max_net_income, Some(10));
        assert_eq!(dates(vc.current_view()), ["2024-01-01", "2022-01-01"]);
    }

    #[test]
    fn clearing_a_bound_restores_records() {
        let mut vc = ViewController::new();
        vc.set_raw_data(sample());
        vc.set_bound(FilterAxis::EndYear, Some(2019));
        assert_eq!(dates(vc.current_view()), ["2019-01-01"]);
        vc.set_bound(FilterAxis::EndYear, None);
        assert_eq!(vc.current_view().records().map(<[Record]>::len), Some(3));
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let mut vc = ViewController::new();
        let first = vc.begin_fetch();
        let second = vc.begin_fetch();

        let applied = vc.complete_fetch(second, Ok(sample()));
        assert_eq!(applied, FetchDisposition::Applied);

        let stale = vc.complete_fetch(first, Ok(vec![Record::new("1999-01-01", 1.0, 1.0)]));
        assert_eq!(stale, FetchDisposition::Stale);
        assert_eq!(vc.raw_len(), 3);
    }

    #[test]
    fn failed_fetch_keeps_previous_state() {
        let mut vc = ViewController::new();
        let ticket = vc.begin_fetch();
        let outcome = vc.complete_fetch(ticket, Err(RetrievalError::Status(500)));
        assert_eq!(outcome, FetchDisposition::Failed);
        assert!(vc.is_pending());

        vc.set_raw_data(sample());
        let retry = vc.begin_fetch();
        vc.complete_fetch(retry, Err(RetrievalError::Disconnected));
        assert_eq!(vc.raw_len(), 3);
        assert!(!vc.is_pending());
    }
}
