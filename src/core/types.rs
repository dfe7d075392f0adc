use serde::Serialize;

use super::date::ApodDate;

/// Fields scraped from one day's page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ApodRecord {
    pub(crate) date: ApodDate,
    pub(crate) title: String,
    pub(crate) explanation: String,
    /// Inline low-resolution copy, used for the preview
    pub(crate) compressed_image_url: String,
    /// Linked original, fetched only for downloads
    pub(crate) full_res_image_url: String,
    pub(crate) page_url: String,
}

/// The day's entry is not an image (usually a video)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct NoImageSignal {
    pub(crate) page_url: String,
    /// Title, when the page still carries one
    pub(crate) title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PageOutcome {
    Image(ApodRecord),
    NoImage(NoImageSignal),
}

impl PageOutcome {
    pub(crate) fn page_url(&self) -> &str {
        match self {
            PageOutcome::Image(record) => &record.page_url,
            PageOutcome::NoImage(signal) => &signal.page_url,
        }
    }
}
