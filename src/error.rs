use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYY-MM-DD, YYYYMMDD, today or yesterday)")]
    InvalidDate { input: String },

    #[error("The date {date} is out of range. Please enter a date between June 16, 1995 and {today}.")]
    DateOutOfRange { date: String, today: String },

    #[error("No APOD entry for {date} (HTTP {status})")]
    MissingEntry { date: String, status: u16 },

    #[error("Could not read data for this date: {reason}")]
    MalformedPage { reason: String },

    #[error("Invalid selector \"{selector}\" in extraction schema: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Network error fetching {url} after {attempts} attempt(s): {message}")]
    Network {
        url: String,
        attempts: usize,
        message: String,
    },

    #[error("Image at {url} is unavailable (HTTP {status})")]
    ImageUnavailable { url: String, status: u16 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Browser(#[from] BrowserError),
}

impl AppError {
    /// Whether repeating the same request may succeed
    pub(crate) fn is_retryable(&self) -> bool {
        matches!(self, AppError::Network { .. })
    }
}

#[derive(Debug, Error)]
pub(crate) enum BrowserError {
    #[error("No browser launcher found ({0}). Open the page manually.")]
    NotFound(&'static str),

    #[error("Failed to launch browser: {0}")]
    Spawn(std::io::Error),

    #[error("Browser launcher exited with {0}")]
    Failed(std::process::ExitStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display_date() {
        let e = AppError::InvalidDate {
            input: "abc".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Invalid date "abc" (expected YYYY-MM-DD, YYYYMMDD, today or yesterday)"#
        );
    }

    #[test]
    fn app_error_display_out_of_range() {
        let e = AppError::DateOutOfRange {
            date: "1995-06-15".to_string(),
            today: "2026-10-18".to_string(),
        };
        assert!(e.to_string().contains("1995-06-15 is out of range"));
        assert!(e.to_string().contains("June 16, 1995 and 2026-10-18"));
    }

    #[test]
    fn app_error_display_malformed() {
        let e = AppError::MalformedPage {
            reason: "no title".to_string(),
        };
        assert_eq!(e.to_string(), "Could not read data for this date: no title");
    }

    #[test]
    fn only_network_errors_are_retryable() {
        let network = AppError::Network {
            url: "https://apod.nasa.gov/apod/ap230704.html".to_string(),
            attempts: 3,
            message: "dns failure".to_string(),
        };
        assert!(network.is_retryable());

        let missing = AppError::MissingEntry {
            date: "2023-07-04".to_string(),
            status: 404,
        };
        assert!(!missing.is_retryable());
    }

    #[test]
    fn browser_error_not_found() {
        assert_eq!(
            BrowserError::NotFound("xdg-open").to_string(),
            "No browser launcher found (xdg-open). Open the page manually."
        );
    }

    #[test]
    fn app_error_from_browser_error() {
        let browser = BrowserError::NotFound("open");
        let app: AppError = browser.into();
        assert_eq!(
            app.to_string(),
            "No browser launcher found (open). Open the page manually."
        );
    }
}
