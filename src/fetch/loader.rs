//! Off-thread page loads with stale-result suppression.
//!
//! Each date selection becomes a request with a fresh id. The fetch runs on
//! the rayon pool and its outcome is sent back over a channel; only the
//! outcome of the most recent request is ever accepted.

use std::sync::mpsc::Sender;

use tracing::debug;

use super::client::ApodClient;
use crate::core::{ApodDate, PageOutcome};
use crate::error::AppError;

pub(crate) type RequestId = u64;

/// Completed page load
#[derive(Debug)]
pub(crate) struct Loaded {
    pub(crate) id: RequestId,
    pub(crate) date: ApodDate,
    pub(crate) outcome: Result<PageOutcome, AppError>,
}

pub(crate) struct Loader<T> {
    client: ApodClient,
    tx: Sender<T>,
    latest: RequestId,
}

impl<T> Loader<T>
where
    T: From<Loaded> + Send + 'static,
{
    pub(crate) fn new(client: ApodClient, tx: Sender<T>) -> Self {
        Self {
            client,
            tx,
            latest: 0,
        }
    }

    /// Start loading `date`. Any request still in flight becomes stale.
    pub(crate) fn request(&mut self, date: ApodDate) -> RequestId {
        self.latest += 1;
        let id = self.latest;
        let client = self.client.clone();
        let tx = self.tx.clone();
        debug!(id, %date, "page load requested");

        rayon::spawn(move || {
            let outcome = client.load(date);
            // The receiver is gone when the session has ended
            let _ = tx.send(T::from(Loaded { id, date, outcome }));
        });
        id
    }

    /// Make every in-flight request stale.
    pub(crate) fn cancel(&mut self) {
        self.latest += 1;
    }

    /// Pass through the result of the latest request; drop anything older.
    pub(crate) fn accept(&self, loaded: Loaded) -> Option<Loaded> {
        if loaded.id == self.latest {
            Some(loaded)
        } else {
            debug!(id = loaded.id, latest = self.latest, date = %loaded.date, "discarding stale result");
            None
        }
    }

    pub(crate) fn client(&self) -> &ApodClient {
        &self.client
    }
}
