use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::config::Config;
use crate::data::fetch::{self, FetchOutcome, FileProvider, HttpProvider, RecordProvider};
use crate::data::filter::{FilterAxis, parse_bound, sanitize_input};
use crate::data::sort::SortKey;
use crate::data::view::{FetchDisposition, FetchTicket, ViewController};
use crate::error::RetrievalError;
use crate::ui::format::group_digits;

// ---------------------------------------------------------------------------
// Record source
// ---------------------------------------------------------------------------

/// Where the raw records come from; remembered so "Reload" can repeat it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(String),
    File(PathBuf),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Raw records, filter/sort settings and the derived view.
    pub view: ViewController,

    /// Text currently shown in each bound field.
    pub inputs: BTreeMap<FilterAxis, String>,

    /// Last retrieval source, if any.
    pub source: Option<Source>,

    /// Retrieval status / error shown in the top bar.
    pub status_message: Option<String>,

    /// Last rejected bound input, shown under the filter fields until the
    /// next accepted edit.
    pub input_error: Option<String>,

    /// Whether a retrieval is in flight.
    pub loading: bool,

    config: Config,
    fetch_tx: Sender<FetchOutcome>,
    fetch_rx: Receiver<FetchOutcome>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel();
        let source = config
            .api_url
            .clone()
            .map(Source::Http)
            .or_else(|| config.data_file.clone().map(Source::File));
        Self {
            view: ViewController::new(),
            inputs: FilterAxis::ALL.iter().map(|&a| (a, String::new())).collect(),
            source,
            status_message: None,
            input_error: None,
            loading: false,
            config,
            fetch_tx,
            fetch_rx,
        }
    }

    // -- retrieval --------------------------------------------------------

    /// Start retrieving from `source` in the background. Results of any
    /// retrieval still running will be discarded when they arrive.
    pub fn load_from(&mut self, source: Source) {
        let ticket = self.view.begin_fetch();
        let spawned = match &source {
            Source::Http(url) => match HttpProvider::new(url.clone(), self.config.timeout) {
                Ok(provider) => self.spawn(provider, ticket),
                Err(e) => Err(e),
            },
            Source::File(path) => self.spawn(FileProvider::new(path.clone()), ticket),
        };

        self.source = Some(source);
        match spawned {
            Ok(()) => {
                self.loading = true;
                self.status_message = None;
            }
            Err(e) => {
                let message = format!("Error fetching data: {e}");
                self.view.complete_fetch(ticket, Err(e));
                self.loading = false;
                self.status_message = Some(message);
            }
        }
    }

    fn spawn<P: RecordProvider>(
        &self,
        provider: P,
        ticket: FetchTicket,
    ) -> Result<(), RetrievalError> {
        fetch::spawn_fetch(provider, ticket, self.fetch_tx.clone())
            .map(|_| ())
            .map_err(|e| RetrievalError::Load(anyhow::Error::new(e).context("spawning fetch thread")))
    }

    /// Repeat the last retrieval, if there was one.
    pub fn reload(&mut self) {
        if let Some(source) = self.source.clone() {
            self.load_from(source);
        }
    }

    /// Drain finished retrievals. Returns true if anything changed.
    pub fn poll_fetch(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.fetch_rx.try_recv() {
            changed |= self.accept(outcome);
        }
        changed
    }

    fn accept(&mut self, outcome: FetchOutcome) -> bool {
        let ticket = outcome.ticket;
        let message = outcome.result.as_ref().err().map(ToString::to_string);
        match self.view.complete_fetch(ticket, outcome.result) {
            FetchDisposition::Stale => false,
            FetchDisposition::Applied => {
                self.loading = false;
                self.status_message = None;
                true
            }
            FetchDisposition::Failed => {
                self.loading = false;
                self.status_message = message.map(|m| format!("Error fetching data: {m}"));
                true
            }
        }
    }

    // -- filters ----------------------------------------------------------

    /// Take new text for a bound field: keep only digits, store the bound,
    /// and reformat the field (money with thousands separators).
    pub fn edit_bound(&mut self, axis: FilterAxis, text: &str) {
        let digits = sanitize_input(text);
        match parse_bound(&digits) {
            Ok(bound) => {
                self.view.set_bound(axis, bound);
                let shown = if axis.is_year() {
                    digits
                } else {
                    group_digits(&digits)
                };
                self.inputs.insert(axis, shown);
                self.input_error = None;
            }
            Err(e) => {
                log::warn!("rejected {axis} input: {e}");
                self.input_error = Some(format!("{axis}: {e}"));
            }
        }
    }

    pub fn clear_filters(&mut self) {
        self.view.clear_filters();
        self.input_error = None;
        for text in self.inputs.values_mut() {
            text.clear();
        }
    }

    // -- sorting ----------------------------------------------------------

    pub fn sort_by(&mut self, key: SortKey) {
        self.view.set_sort(key);
    }
}
