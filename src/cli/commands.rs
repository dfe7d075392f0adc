//! CLI subcommand definitions

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the picture of the day: title, explanation and image links
    Show {
        /// Date (YYYY-MM-DD, YYYYMMDD, today, yesterday); defaults to today
        date: Option<String>,
        /// Parse a saved copy of the page instead of fetching it
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,
        /// Write the image, scaled to preview height, to this file
        #[arg(long, value_name = "FILE")]
        preview: Option<PathBuf>,
    },
    /// Download the full-resolution image as a 300 DPI JPEG
    Download {
        /// Date (YYYY-MM-DD, YYYYMMDD, today, yesterday); defaults to today
        date: Option<String>,
        /// Destination directory (default: <Pictures>/APOD)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Open the day's page in the default browser
    Open {
        /// Date (YYYY-MM-DD, YYYYMMDD, today, yesterday); defaults to today
        date: Option<String>,
    },
    /// Print the URL of the day's page
    Url {
        /// Date (YYYY-MM-DD, YYYYMMDD, today, yesterday); defaults to today
        date: Option<String>,
    },
    /// Pick dates at a prompt and act on the result (default)
    Interactive,
}
