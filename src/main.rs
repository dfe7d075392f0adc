mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod fetch;
mod interactive;
mod media;
mod output;
mod utils;

use clap::Parser;
use tracing::{debug, warn};

use app::CommandContext;
use cli::Cli;
use config::{Config, ConfigSource};
use utils::init_logging;

fn main() {
    let (config, source) = Config::load();
    let cli = Cli::parse().with_config(&config);
    init_logging(cli.debug);

    match &source {
        ConfigSource::File(path) => debug!(path = %path.display(), "loaded config"),
        ConfigSource::Invalid { path, error } => {
            warn!(path = %path.display(), %error, "failed to parse config, using defaults");
        }
        ConfigSource::Defaults => {}
    }

    let result = config
        .schema
        .compile()
        .and_then(|schema| app::run(&CommandContext::new(&cli, schema)));

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
