//! Record retrieval off the UI thread.
//!
//! A provider runs once on a background thread and reports exactly one
//! [`FetchOutcome`] through an `mpsc` channel. The UI thread polls the
//! channel and hands the outcome to the
//! [`ViewController`](super::view::ViewController), which drops it if a
//! newer retrieval has been started in the meantime.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::RetrievalError;

use super::loader;
use super::model::Record;
use super::view::FetchTicket;

/// Something that can produce the raw record list.
pub trait RecordProvider: Send + 'static {
    fn fetch(&self) -> Result<Vec<Record>, RetrievalError>;

    /// Short human-readable origin, for logs and the status bar.
    fn describe(&self) -> String;
}

/// The single message a retrieval thread sends back.
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Record>, RetrievalError>,
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// GETs a JSON record list from a URL.
pub struct HttpProvider {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RetrievalError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("finviewer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl RecordProvider for HttpProvider {
    fn fetch(&self) -> Result<Vec<Record>, RetrievalError> {
        log::debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status(status.as_u16()));
        }
        let body = response.text()?;
        loader::parse_json(&body).map_err(|e| RetrievalError::Decode(format!("{e:#}")))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// ---------------------------------------------------------------------------
// Local file
// ---------------------------------------------------------------------------

pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordProvider for FileProvider {
    fn fetch(&self) -> Result<Vec<Record>, RetrievalError> {
        loader::load_file(&self.path).map_err(RetrievalError::Load)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// Background thread
// ---------------------------------------------------------------------------

/// Run `provider` once on a new thread and send the outcome on `tx`.
///
/// A closed receiver is not an error: the window may have been closed while
/// the request was in flight.
pub fn spawn_fetch<P: RecordProvider>(
    provider: P,
    ticket: FetchTicket,
    tx: Sender<FetchOutcome>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("finviewer-fetch".into())
        .spawn(move || {
            log::info!("Fetching records from {}", provider.describe());
            let result = provider.fetch();
            if let Err(e) = &result {
                log::error!("Retrieval from {} failed: {e}", provider.describe());
            }
            if tx.send(FetchOutcome { ticket, result }).is_err() {
                log::debug!("fetch receiver dropped before delivery");
            }
        })
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    use super::*;
    use crate::data::view::{FetchDisposition, ViewController};

    struct Canned(Vec<Record>);

    impl RecordProvider for Canned {
        fn fetch(&self) -> Result<Vec<Record>, RetrievalError> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "canned".into()
        }
    }

    struct Broken;

    impl RecordProvider for Broken {
        fn fetch(&self) -> Result<Vec<Record>, RetrievalError> {
            Err(RetrievalError::Status(503))
        }

        fn describe(&self) -> String {
            "broken".into()
        }
    }

    #[test]
    fn worker_delivers_exactly_one_outcome() {
        let mut vc = ViewController::new();
        let (tx, rx) = mpsc::channel();
        let ticket = vc.begin_fetch();
        let handle = spawn_fetch(Canned(vec![Record::new("2020-01-01", 1.0, 1.0)]), ticket, tx)
            .unwrap();
        handle.join().unwrap();

        let outcome = rx.recv().unwrap();
        assert!(rx.try_recv().is_err());
        assert_eq!(vc.complete_fetch(outcome.ticket, outcome.result), FetchDisposition::Applied);
        assert_eq!(vc.raw_len(), 1);
    }

    #[test]
    fn failing_provider_reports_error() {
        let mut vc = ViewController::new();
        let (tx, rx) = mpsc::channel();
        let ticket = vc.begin_fetch();
        spawn_fetch(Broken, ticket, tx).unwrap().join().unwrap();

        let outcome = rx.recv().unwrap();
        assert!(matches!(outcome.result, Err(RetrievalError::Status(503))));
        assert_eq!(vc.complete_fetch(outcome.ticket, outcome.result), FetchDisposition::Failed);
        assert!(vc.is_pending());
    }

    /// Answer one request on a loopback port with `status` and `body`.
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/financials")
    }

    fn loopback_provider(url: String) -> HttpProvider {
        HttpProvider {
            client: reqwest::blocking::Client::builder()
                .no_proxy()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap(),
            url,
        }
    }

    #[test]
    fn http_error_status_is_reported() {
        let provider = loopback_provider(serve_once("500 Internal Server Error", "oops"));
        assert!(matches!(provider.fetch(), Err(RetrievalError::Status(500))));
    }

    #[test]
    fn http_json_body_is_decoded() {
        let body = r#"[{"date": "2023-09-30", "revenue": 383285000000, "netIncome": "96995000000"},
                       {"date": "2022-09-24", "revenue": 394328000000, "netIncome": 99803000000}]"#;
        let records = loopback_provider(serve_once("200 OK", body)).fetch().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].net_income, Some(96_995_000_000.0));
        assert_eq!(records[1].date, "2022-09-24");
    }

    #[test]
    fn http_body_that_is_not_a_list_is_a_decode_error() {
        let provider = loopback_provider(serve_once("200 OK", r#"{"error": "limit reached"}"#));
        assert!(matches!(provider.fetch(), Err(RetrievalError::Decode(_))));
    }

    #[test]
    fn file_provider_reports_missing_file() {
        let provider = FileProvider::new("/definitely/not/here.json");
        assert!(matches!(provider.fetch(), Err(RetrievalError::Load(_))));
    }
}
