//! Page model: archive dates, the extraction schema and the scraper itself.

pub(crate) mod date;
pub(crate) mod extract;
pub(crate) mod schema;
pub(crate) mod types;

pub(crate) use date::{ApodDate, apod_today};
pub(crate) use extract::extract;
pub(crate) use schema::{CompiledSchema, ExtractionSchema};
pub(crate) use types::{ApodRecord, NoImageSignal, PageOutcome};
