use std::time::Duration;

const USER_AGENT: &str = concat!("apodview/", env!("CARGO_PKG_VERSION"));

/// Full-resolution originals can be tens of megabytes
const MAX_BODY_BYTES: u64 = 128 * 1024 * 1024;

/// Status, content type and body of a completed GET
#[derive(Debug, Clone)]
pub(crate) struct Fetched {
    pub(crate) status: u16,
    pub(crate) content_type: Option<String>,
    pub(crate) body: Vec<u8>,
}

/// A single HTTP GET. Errors are transport failures only (DNS, connect,
/// timeout, truncated body); any HTTP status is a successful `Fetched`.
pub(crate) trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<Fetched, String>;
}

pub(crate) struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `None` lets requests run without a deadline.
    pub(crate) fn new(timeout: Option<Duration>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<Fetched, String> {
        let response = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let mut body = response.into_body();
        let body = body
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(|e| e.to_string())?;
        Ok(Fetched {
            status,
            content_type,
            body,
        })
    }
}
