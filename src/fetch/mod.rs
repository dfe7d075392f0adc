mod charset;
mod client;
mod loader;
mod transport;

pub(crate) use client::{ApodClient, DEFAULT_RETRIES, DEFAULT_TIMEOUT};
pub(crate) use loader::{Loaded, Loader};

#[cfg(test)]
pub(crate) use client::tests as testing;
