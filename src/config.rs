use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::core::ExtractionSchema;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    #[serde(default)]
    pub(crate) save_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    #[serde(default)]
    pub(crate) retries: Option<usize>,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) schema: ExtractionSchema,
}

/// Where the effective config came from; logged once logging is up
#[derive(Debug)]
pub(crate) enum ConfigSource {
    Defaults,
    File(PathBuf),
    Invalid { path: PathBuf, error: String },
}

impl Config {
    pub(crate) fn load() -> (Self, ConfigSource) {
        Self::load_from(&Self::get_config_paths())
    }

    fn load_from(paths: &[PathBuf]) -> (Self, ConfigSource) {
        // First readable file wins; a file that fails to parse stops the search
        for path in paths {
            if path.exists()
                && let Ok(content) = fs::read_to_string(path)
            {
                return match toml::from_str::<Config>(&content) {
                    Ok(config) => (config, ConfigSource::File(path.clone())),
                    Err(e) => (
                        Self::default(),
                        ConfigSource::Invalid {
                            path: path.clone(),
                            error: e.to_string(),
                        },
                    ),
                };
            }
        }

        (Self::default(), ConfigSource::Defaults)
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/apodview/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("apodview").join("config.toml"));
        }

        // 2. Platform config dir, e.g. ~/Library/Application Support/apodview/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("apodview").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.apodview.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".apodview.toml"));
        }

        paths
    }
}
