use std::time::Duration;

use config::{Config, ConfigError, Environment};
use once_cell::sync::Lazy;
use serde::Deserialize;

static DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DbConfig {
    pub location: String,
    /// how long a connection waits on a locked database, as a humantime string (e.g. `5s`, `750ms`)
    #[serde(rename = "busytimeout")]
    pub busy_timeout: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// one of `off`, `error`, `warn`, `info`, `debug`, `trace`
    pub level: String,
    /// when set, logs are written to this file in addition to stdout
    pub file: Option<String>,
}

/// config properties for the whole of this application
#[derive(Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct TagExplorerConfig {
    pub database: DbConfig,
    pub log: LogConfig,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            location: "./tag_explorer.sqlite".to_string(),
            busy_timeout: "5s".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl DbConfig {
    /// parses [`DbConfig::busy_timeout`], falling back to 5 seconds if it isn't a valid duration
    pub fn busy_timeout(&self) -> Duration {
        match humantime::parse_duration(self.busy_timeout.trim()) {
            Ok(duration) => duration,
            Err(e) => {
                log::warn!(
                    "Invalid database busy timeout {:?} ({e}), using {}",
                    self.busy_timeout,
                    humantime::format_duration(DEFAULT_BUSY_TIMEOUT)
                );
                DEFAULT_BUSY_TIMEOUT
            }
        }
    }
}

impl LogConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level
            .trim()
            .parse::<log::LevelFilter>()
            .unwrap_or(log::LevelFilter::Info)
    }
}

/// Parses the config file located at ./TagExplorer.toml if it exists, then applies
/// `TAG_EXPLORER_<SECTION>__<KEY>` environment overrides on top of it.
/// If the file exists but cannot be parsed, the application will panic
pub fn parse_config() -> TagExplorerConfig {
    let builder = Config::builder()
        .add_source(config::File::with_name("./TagExplorer.toml").required(false))
        .add_source(
            Environment::with_prefix("TAG_EXPLORER")
                .prefix_separator("_")
                .separator("__"),
        )
        .build();
    let settings = match builder {
        Ok(settings) => settings,
        // a broken config file is unrecoverable
        Err(ConfigError::FileParse { uri, cause }) => {
            panic!("Failed to parse config file {uri:?}. Exception is {cause}")
        }
        Err(e) => panic!("Failed to load config. Exception is {e}"),
    };
    match settings.try_deserialize() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Config values could not be read ({e}). Continuing with defaults...");
            TagExplorerConfig::default()
        }
    }
}

/// global variable for config, that way it doesn't need to be repeatedly parsed
pub static TAG_EXPLORER_CONFIG: Lazy<TagExplorerConfig> = Lazy::new(parse_config);
