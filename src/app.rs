use std::fs;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::{Cli, Commands};
use crate::consts::PREVIEW_HEIGHT;
use crate::core::{ApodDate, ApodRecord, CompiledSchema, NoImageSignal, PageOutcome, apod_today};
use crate::error::AppError;
use crate::fetch::ApodClient;
use crate::interactive::run_interactive;
use crate::media::{default_save_dir, save_jpeg, write_preview};
use crate::output::{output_outcome_json, render_outcome};
use crate::utils::open_url;

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) client: ApodClient,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(cli: &'a Cli, schema: CompiledSchema) -> Self {
        let client = ApodClient::new(cli.base_url(), cli.timeout(), cli.retries(), schema);
        Self { cli, client }
    }

    pub(crate) fn save_dir(&self, explicit: Option<&Path>) -> Result<PathBuf, AppError> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.cli.save_dir.clone())
            .or_else(default_save_dir)
            .ok_or_else(|| {
                AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no pictures or home directory; pass --dir",
                ))
            })
    }
}

fn resolve_date(input: Option<&str>) -> Result<ApodDate, AppError> {
    match input {
        Some(text) => ApodDate::parse(text, apod_today()),
        None => Ok(ApodDate::today()),
    }
}

/// Print an outcome as a table or JSON
pub(crate) fn print_outcome(
    ctx: &CommandContext<'_>,
    date: ApodDate,
    outcome: &PageOutcome,
) -> Result<(), AppError> {
    if ctx.cli.json {
        println!("{}", output_outcome_json(date, outcome)?);
    } else {
        println!("{}", render_outcome(date, outcome, ctx.cli.use_color()));
    }
    Ok(())
}

/// Fetch the full-resolution image and save it
pub(crate) fn download_record(
    ctx: &CommandContext<'_>,
    record: &ApodRecord,
    dir: &Path,
) -> Result<PathBuf, AppError> {
    let bytes = ctx.client.fetch_image(&record.full_res_image_url)?;
    let fallback = format!("apod-{}", record.date.fragment());
    save_jpeg(&bytes, &record.title, &fallback, dir)
}

/// Fetch the compressed image and write it scaled to the preview height
fn preview_record(
    ctx: &CommandContext<'_>,
    record: &ApodRecord,
    path: &Path,
) -> Result<(u32, u32), AppError> {
    let bytes = ctx.client.fetch_image(&record.compressed_image_url)?;
    write_preview(&bytes, PREVIEW_HEIGHT, path)
}

#[derive(Debug, PartialEq, Eq)]
enum BrowserChoice {
    Open,
    Skip,
    Ask,
}

fn browser_choice(cli: &Cli, stdin_is_terminal: bool) -> BrowserChoice {
    if cli.yes {
        BrowserChoice::Open
    } else if cli.json || !stdin_is_terminal {
        BrowserChoice::Skip
    } else {
        BrowserChoice::Ask
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Offer the page of a video day in the browser. Declining is not an error.
fn offer_browser(ctx: &CommandContext<'_>, signal: &NoImageSignal) -> Result<(), AppError> {
    match browser_choice(ctx.cli, std::io::stdin().is_terminal()) {
        BrowserChoice::Open => open_url(&signal.page_url)?,
        BrowserChoice::Skip => debug!("not prompting for browser: non-interactive"),
        BrowserChoice::Ask => {
            eprint!("APOD has uploaded a video. Open link in browser? [y/N] ");
            std::io::stderr().flush()?;
            let mut answer = String::new();
            std::io::stdin().lock().read_line(&mut answer)?;
            if is_yes(&answer) {
                open_url(&signal.page_url)?;
            }
        }
    }
    Ok(())
}

fn handle_show(
    ctx: &CommandContext<'_>,
    date: Option<&str>,
    html: Option<&Path>,
    preview: Option<&Path>,
) -> Result<(), AppError> {
    let date = resolve_date(date)?;
    let outcome = match html {
        Some(path) => {
            debug!(path = %path.display(), "reading saved page");
            ctx.client.parse_page(date, &fs::read_to_string(path)?)?
        }
        None => ctx.client.load(date)?,
    };
    print_outcome(ctx, date, &outcome)?;

    match &outcome {
        PageOutcome::Image(record) => {
            if let Some(path) = preview {
                let (width, height) = preview_record(ctx, record, path)?;
                eprintln!("Preview written to {} ({width}x{height})", path.display());
            }
        }
        PageOutcome::NoImage(signal) => offer_browser(ctx, signal)?,
    }
    Ok(())
}

fn handle_download(
    ctx: &CommandContext<'_>,
    date: Option<&str>,
    dir: Option<&Path>,
) -> Result<(), AppError> {
    let date = resolve_date(date)?;
    let dir = ctx.save_dir(dir)?;
    match ctx.client.load(date)? {
        PageOutcome::Image(record) => {
            let path = download_record(ctx, &record, &dir)?;
            info!(%date, path = %path.display(), "download complete");
            println!("{}", path.display());
        }
        PageOutcome::NoImage(signal) => {
            eprintln!("No image to download for {date}: APOD has uploaded a video.");
            offer_browser(ctx, &signal)?;
        }
    }
    Ok(())
}

/// Dispatch the parsed command line
pub(crate) fn run(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    match &ctx.cli.command {
        Some(Commands::Show {
            date,
            html,
            preview,
        }) => handle_show(ctx, date.as_deref(), html.as_deref(), preview.as_deref()),
        Some(Commands::Download { date, dir }) => {
            handle_download(ctx, date.as_deref(), dir.as_deref())
        }
        Some(Commands::Open { date }) => {
            let date = resolve_date(date.as_deref())?;
            open_url(&ctx.client.page_url(date))?;
            Ok(())
        }
        Some(Commands::Url { date }) => {
            let date = resolve_date(date.as_deref())?;
            println!("{}", ctx.client.page_url(date));
            Ok(())
        }
        Some(Commands::Interactive) | None => run_interactive(ctx),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use clap::Parser;

    use super::*;
    use crate::fetch::testing::{FakeTransport, client, date};
    use crate::media::png_bytes;

    pub(crate) const FULL_RES: &str = "https://apod.nasa.gov/apod/image/2307/full.png";
    pub(crate) const COMPRESSED: &str = "https://apod.nasa.gov/apod/image/2307/small.png";

    pub(crate) fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("apodview").chain(args.iter().copied()))
    }

    pub(crate) fn record(title: &str) -> ApodRecord {
        ApodRecord {
            date: date(2023, 7, 4),
            title: title.to_string(),
            explanation: "Yes, but have you ever seen fireworks like this?".to_string(),
            compressed_image_url: COMPRESSED.to_string(),
            full_res_image_url: FULL_RES.to_string(),
            page_url: "https://apod.nasa.gov/apod/ap230704.html".to_string(),
        }
    }

    /// Serves a 40x20 full-resolution image and a 20x10 compressed one.
    pub(crate) fn image_transport() -> Arc<FakeTransport> {
        let transport = Arc::new(FakeTransport::default());
        transport.ok(FULL_RES, &png_bytes(40, 20));
        transport.ok(COMPRESSED, &png_bytes(20, 10));
        transport
    }

    #[test]
    fn download_saves_full_res_under_sanitized_title() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli(&[]);
        let ctx = CommandContext {
            cli: &cli,
            client: client(image_transport()),
        };

        let path = download_record(&ctx, &record("M31: Andromeda?"), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("M31 Andromeda.jpg"));
        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (40, 20));
    }

    #[test]
    fn download_of_untitled_record_uses_date_stem() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli(&[]);
        let ctx = CommandContext {
            cli: &cli,
            client: client(image_transport()),
        };

        let path = download_record(&ctx, &record(":"), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "apod-230704.jpg");
    }

    #[test]
    fn download_reports_unavailable_image() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli(&[]);
        let ctx = CommandContext {
            cli: &cli,
            client: client(Arc::new(FakeTransport::default())),
        };

        let err = download_record(&ctx, &record("T"), dir.path()).unwrap_err();
        assert!(err.is_retryable());
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn preview_scales_compressed_image() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli(&[]);
        let ctx = CommandContext {
            cli: &cli,
            client: client(image_transport()),
        };
        let path = dir.path().join("preview.png");

        let (width, height) = preview_record(&ctx, &record("T"), &path).unwrap();
        assert_eq!((width, height), (2 * PREVIEW_HEIGHT, PREVIEW_HEIGHT));
        let written = image::open(&path).unwrap();
        assert_eq!(written.height(), PREVIEW_HEIGHT);
    }

    #[test]
    fn browser_choice_follows_flags_and_terminal() {
        assert_eq!(browser_choice(&cli(&["--yes"]), false), BrowserChoice::Open);
        assert_eq!(browser_choice(&cli(&["--yes", "--json"]), true), BrowserChoice::Open);
        assert_eq!(browser_choice(&cli(&["--json"]), true), BrowserChoice::Skip);
        assert_eq!(browser_choice(&cli(&[]), false), BrowserChoice::Skip);
        assert_eq!(browser_choice(&cli(&[]), true), BrowserChoice::Ask);
    }

    #[test]
    fn only_explicit_yes_opens_the_browser() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
