use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::charset::decode_page;
use super::transport::{Fetched, Transport, UreqTransport};
use crate::core::{ApodDate, CompiledSchema, PageOutcome, extract};
use crate::error::AppError;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const DEFAULT_RETRIES: usize = 2;
const RETRY_BACKOFF_MS: u64 = 250;

/// Archive client: builds page URLs, fetches pages and images, and runs the
/// extractor. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub(crate) struct ApodClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    schema: Arc<CompiledSchema>,
    attempts: usize,
    backoff: Duration,
}

impl ApodClient {
    pub(crate) fn new(
        base_url: &str,
        timeout: Option<Duration>,
        retries: usize,
        schema: CompiledSchema,
    ) -> Self {
        Self::with_transport(Arc::new(UreqTransport::new(timeout)), base_url, retries, schema)
    }

    /// `retries` counts repeats after the first attempt.
    pub(crate) fn with_transport(
        transport: Arc<dyn Transport>,
        base_url: &str,
        retries: usize,
        schema: CompiledSchema,
    ) -> Self {
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            transport,
            base_url,
            schema: Arc::new(schema),
            attempts: retries.saturating_add(1),
            backoff: Duration::from_millis(RETRY_BACKOFF_MS),
        }
    }

    #[cfg(test)]
    pub(crate) fn without_backoff(mut self) -> Self {
        self.backoff = Duration::ZERO;
        self
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn page_url(&self, date: ApodDate) -> String {
        format!("{}ap{}.html", self.base_url, date.fragment().as_str())
    }

    /// Fetch the day's page. Any non-200 status means the archive has no
    /// entry for that date.
    pub(crate) fn fetch_page(&self, date: ApodDate) -> Result<String, AppError> {
        let url = self.page_url(date);
        let fetched = self.get_with_retry(&url)?;
        if fetched.status != 200 {
            return Err(AppError::MissingEntry {
                date: date.to_string(),
                status: fetched.status,
            });
        }
        Ok(decode_page(&fetched.body, fetched.content_type.as_deref()))
    }

    /// Parse page HTML that was fetched or saved earlier for `date`.
    pub(crate) fn parse_page(&self, date: ApodDate, html: &str) -> Result<PageOutcome, AppError> {
        extract(html, date, &self.page_url(date), &self.base_url, &self.schema)
    }

    /// Fetch and parse the day's page.
    pub(crate) fn load(&self, date: ApodDate) -> Result<PageOutcome, AppError> {
        let html = self.fetch_page(date)?;
        let outcome = self.parse_page(date, &html)?;
        debug!(%date, no_image = matches!(outcome, PageOutcome::NoImage(_)), "page parsed");
        Ok(outcome)
    }

    pub(crate) fn fetch_image(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let fetched = self.get_with_retry(url)?;
        if fetched.status != 200 {
            return Err(AppError::ImageUnavailable {
                url: url.to_string(),
                status: fetched.status,
            });
        }
        debug!(url, bytes = fetched.body.len(), "image fetched");
        Ok(fetched.body)
    }

    /// Transport failures are retried with linear backoff; HTTP statuses are
    /// returned to the caller as-is.
    fn get_with_retry(&self, url: &str) -> Result<Fetched, AppError> {
        let mut last_error = String::new();
        for attempt in 0..self.attempts {
            debug!(url, attempt = attempt + 1, "GET");
            match self.transport.get(url) {
                Ok(fetched) => return Ok(fetched),
                Err(e) => {
                    warn!(url, attempt = attempt + 1, error = %e, "request failed");
                    last_error = e;
                }
            }

            if attempt + 1 < self.attempts {
                std::thread::sleep(self.backoff * (attempt as u32 + 1));
            }
        }

        Err(AppError::Network {
            url: url.to_string(),
            attempts: self.attempts,
            message: last_error,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;

    use super::*;
    use crate::core::ExtractionSchema;

    /// Canned responses keyed by URL; unknown URLs fail like a DNS error.
    #[derive(Default)]
    pub(crate) struct FakeTransport {
        responses: Mutex<HashMap<String, Vec<Result<Fetched, String>>>>,
        pub(crate) calls: AtomicUsize,
    }

    impl FakeTransport {
        /// Queue a response; the last queued one is repeated once the queue drains.
        pub(crate) fn respond(&self, url: &str, response: Result<Fetched, String>) {
            self.responses
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default()
                .push(response);
        }

        pub(crate) fn ok(&self, url: &str, body: &[u8]) {
            self.respond(
                url,
                Ok(Fetched {
                    status: 200,
                    content_type: None,
                    body: body.to_vec(),
                }),
            );
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, url: &str) -> Result<Fetched, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            let Some(queue) = responses.get_mut(url) else {
                return Err(format!("dns error: {url}"));
            };
            if queue.len() > 1 {
                queue.remove(0)
            } else {
                queue[0].clone()
            }
        }
    }

    pub(crate) fn client(transport: Arc<FakeTransport>) -> ApodClient {
        ApodClient::with_transport(
            transport,
            "https://apod.nasa.gov/apod",
            2,
            ExtractionSchema::default().compile().unwrap(),
        )
        .without_backoff()
    }

    pub(crate) fn date(y: i32, m: u32, d: u32) -> ApodDate {
        ApodDate::from_ymd(y, m, d, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()).unwrap()
    }

    const PAGE: &str = include_str!("../../tests/fixtures/ap230704.html");
    const PAGE_URL: &str = "https://apod.nasa.gov/apod/ap230704.html";

    #[test]
    fn page_url_uses_fragment_and_normalized_base() {
        let client = client(Arc::new(FakeTransport::default()));
        assert_eq!(client.base_url(), "https://apod.nasa.gov/apod/");
        assert_eq!(client.page_url(date(2023, 7, 4)), PAGE_URL);
        assert_eq!(
            client.page_url(date(2000, 1, 1)),
            "https://apod.nasa.gov/apod/ap000101.html"
        );
    }

    #[test]
    fn load_fetches_and_extracts() {
        let transport = Arc::new(FakeTransport::default());
        transport.ok(PAGE_URL, PAGE.as_bytes());
        let outcome = client(transport).load(date(2023, 7, 4)).unwrap();
        let PageOutcome::Image(record) = outcome else {
            panic!("expected an image record");
        };
        assert_eq!(record.title, "Fireworks over Mount Rushmore");
        assert_eq!(record.page_url, PAGE_URL);
    }

    #[test]
    fn non_200_page_is_missing_entry() {
        let transport = Arc::new(FakeTransport::default());
        transport.respond(
            PAGE_URL,
            Ok(Fetched {
                status: 404,
                content_type: Some("text/html".to_string()),
                body: b"Not Found".to_vec(),
            }),
        );
        let err = client(transport.clone()).load(date(2023, 7, 4)).unwrap_err();
        assert!(matches!(err, AppError::MissingEntry { status: 404, .. }));
        // Status responses are not retried
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transport_errors_are_retried_then_reported() {
        let transport = Arc::new(FakeTransport::default());
        let err = client(transport.clone()).fetch_page(date(2023, 7, 4)).unwrap_err();
        assert!(matches!(err, AppError::Network { attempts: 3, .. }));
        assert!(err.is_retryable());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn zero_retries_is_a_single_attempt() {
        let transport = Arc::new(FakeTransport::default());
        let client = ApodClient::with_transport(
            transport.clone(),
            "https://apod.nasa.gov/apod",
            0,
            ExtractionSchema::default().compile().unwrap(),
        );
        let err = client.fetch_page(date(2023, 7, 4)).unwrap_err();
        assert!(matches!(err, AppError::Network { attempts: 1, .. }));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transient_error_recovers_on_retry() {
        let transport = Arc::new(FakeTransport::default());
        transport.respond(PAGE_URL, Err("connection reset".to_string()));
        transport.ok(PAGE_URL, PAGE.as_bytes());
        let html = client(transport.clone()).fetch_page(date(2023, 7, 4)).unwrap();
        assert!(html.contains("Fireworks over Mount Rushmore"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_image_is_reported_with_status() {
        let url = "https://apod.nasa.gov/apod/image/2307/missing.jpg";
        let transport = Arc::new(FakeTransport::default());
        transport.respond(
            url,
            Ok(Fetched {
                status: 403,
                content_type: None,
                body: Vec::new(),
            }),
        );
        let err = client(transport).fetch_image(url).unwrap_err();
        assert!(matches!(err, AppError::ImageUnavailable { status: 403, .. }));
    }

    #[test]
    fn latin1_page_is_decoded_without_replacement_characters() {
        let transport = Arc::new(FakeTransport::default());
        transport.ok(PAGE_URL, b"<b> Caf\xe9 \xc5ngstr\xf6m</b>");
        let html = client(transport).fetch_page(date(2023, 7, 4)).unwrap();
        assert_eq!(html, "<b> Caf\u{e9} \u{c5}ngstr\u{f6}m</b>");
        assert!(!html.contains('\u{fffd}'));
    }

    #[test]
    fn declared_charset_reaches_extracted_title() {
        let page = PAGE
            .replace("Fireworks over Mount Rushmore </b> <br>", "Caf\u{e9} at Ångström Ridge </b> <br>");
        let (latin1, _, unmappable) = encoding_rs::WINDOWS_1252.encode(&page);
        assert!(!unmappable);
        let transport = Arc::new(FakeTransport::default());
        transport.respond(
            PAGE_URL,
            Ok(Fetched {
                status: 200,
                content_type: Some("text/html; charset=ISO-8859-1".to_string()),
                body: latin1.into_owned(),
            }),
        );
        let PageOutcome::Image(record) = client(transport).load(date(2023, 7, 4)).unwrap() else {
            panic!("expected an image record");
        };
        assert_eq!(record.title, "Caf\u{e9} at Ångström Ridge");
    }
}
