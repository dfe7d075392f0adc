//! Image handling for the compressed preview and full-resolution downloads.

mod preview;
mod save;

pub(crate) use preview::write_preview;
pub(crate) use save::{default_save_dir, save_jpeg};

#[cfg(test)]
pub(crate) use save::tests::png_bytes;
