//! Prompt loop that stands in for the date picker.
//!
//! Input lines and finished page loads arrive on one channel, so a new date
//! can be entered while an earlier one is still loading; the earlier result
//! is then discarded by the loader.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Sender};

use chrono::NaiveDate;
use tracing::debug;

use crate::app::{CommandContext, download_record, print_outcome};
use crate::core::{ApodDate, PageOutcome, apod_today};
use crate::error::AppError;
use crate::fetch::{ApodClient, Loaded, Loader};
use crate::utils::open_url;

const WELCOME: &str = "Welcome to the Astronomy Picture of the Day.\n\
Enter the date you want to see the picture of (YYYY-MM-DD, today, yesterday).\n\
Type `help` for commands.";

const HELP: &str = "Commands:\n  \
<date>     load the entry for a date (YYYY-MM-DD, YYYYMMDD, today, yesterday)\n  \
download   save the full-resolution image of the current entry\n  \
open       open the current entry's page in the browser\n  \
retry      repeat the last request\n  \
quit       exit";

#[derive(Debug)]
enum Event {
    Line(String),
    Eof,
    Loaded(Loaded),
}

impl From<Loaded> for Event {
    fn from(loaded: Loaded) -> Self {
        Event::Loaded(loaded)
    }
}

#[derive(Debug, PartialEq)]
enum PromptCommand {
    Select(ApodDate),
    Download,
    Open,
    Retry,
    Help,
    Quit,
    Empty,
}

fn parse_prompt(line: &str, today: NaiveDate) -> Result<PromptCommand, AppError> {
    let command = match line.trim().to_ascii_lowercase().as_str() {
        "" => PromptCommand::Empty,
        "download" | "d" => PromptCommand::Download,
        "open" | "o" => PromptCommand::Open,
        "retry" | "r" => PromptCommand::Retry,
        "help" | "h" | "?" => PromptCommand::Help,
        "quit" | "exit" | "q" => PromptCommand::Quit,
        other => PromptCommand::Select(ApodDate::parse(other, today)?),
    };
    Ok(command)
}

fn spawn_stdin_reader(tx: Sender<Event>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Event::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::Eof);
    });
}

fn prompt() {
    print!("apod> ");
    let _ = std::io::stdout().flush();
}

/// State the prompt acts on. `current` always belongs to `requested`.
#[derive(Default)]
struct Session {
    requested: Option<ApodDate>,
    current: Option<(ApodDate, PageOutcome)>,
}

impl Session {
    /// A new request discards the record of the previous one.
    fn begin(&mut self, date: ApodDate) {
        self.requested = Some(date);
        self.current = None;
    }

    fn page_to_open(&self, client: &ApodClient) -> Option<String> {
        match (&self.current, self.requested) {
            (Some((_, outcome)), _) => Some(outcome.page_url().to_string()),
            (None, Some(date)) => Some(client.page_url(date)),
            (None, None) => None,
        }
    }
}

pub(crate) fn run_interactive(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let (tx, rx) = mpsc::channel::<Event>();
    spawn_stdin_reader(tx.clone());
    let mut loader = Loader::new(ctx.client.clone(), tx);
    let mut session = Session::default();

    println!("{WELCOME}");
    prompt();

    while let Ok(event) = rx.recv() {
        match event {
            Event::Eof => break,
            Event::Line(line) => match parse_prompt(&line, apod_today()) {
                Ok(PromptCommand::Quit) => break,
                Ok(command) => handle_command(ctx, &mut loader, &mut session, command),
                Err(e) => eprintln!("{e}"),
            },
            Event::Loaded(loaded) => {
                let Some(loaded) = loader.accept(loaded) else {
                    continue;
                };
                handle_loaded(ctx, &mut session, loaded);
            }
        }
        prompt();
    }

    loader.cancel();
    println!();
    Ok(())
}

fn handle_command(
    ctx: &CommandContext<'_>,
    loader: &mut Loader<Event>,
    session: &mut Session,
    command: PromptCommand,
) {
    match command {
        PromptCommand::Select(date) => {
            session.begin(date);
            loader.request(date);
            println!("Loading {date}...");
        }
        PromptCommand::Retry => match session.requested {
            Some(date) => {
                session.begin(date);
                loader.request(date);
                println!("Retrying {date}...");
            }
            None => println!("Nothing to retry yet. Enter a date first."),
        },
        PromptCommand::Download => match &session.current {
            Some((_, PageOutcome::Image(record))) => {
                let result = ctx
                    .save_dir(None)
                    .and_then(|dir| download_record(ctx, record, &dir));
                match result {
                    Ok(path) => println!("Saved {}", path.display()),
                    Err(e) => eprintln!("{e}"),
                }
            }
            Some((_, PageOutcome::NoImage(_))) => {
                println!("This entry is a video; use `open` to view it in the browser.")
            }
            None if session.requested.is_some() => {
                println!("The selected date has not loaded. Wait for it or type `retry`.")
            }
            None => println!("No picture loaded yet. Enter a date first."),
        },
        PromptCommand::Open => match session.page_to_open(loader.client()) {
            Some(url) => {
                if let Err(e) = open_url(&url) {
                    eprintln!("{e}");
                }
            }
            None => println!("No date selected yet."),
        },
        PromptCommand::Help => println!("{HELP}"),
        PromptCommand::Empty | PromptCommand::Quit => {}
    }
}

fn handle_loaded(ctx: &CommandContext<'_>, session: &mut Session, loaded: Loaded) {
    debug!(id = loaded.id, date = %loaded.date, "applying result");
    match loaded.outcome {
        Ok(outcome) => {
            if let Err(e) = print_outcome(ctx, loaded.date, &outcome) {
                eprintln!("{e}");
            }
            if matches!(outcome, PageOutcome::NoImage(_)) {
                println!("APOD has uploaded a video. Type `open` to view it in your browser.");
            }
            session.current = Some((loaded.date, outcome));
        }
        Err(e) => {
            eprintln!("{e}");
            if e.is_retryable() {
                println!("Type `retry` to try again.");
            }
        }
    }
}
