// Configuration loading and parsing (statline.toml).

use crate::stats::Stat;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the single configuration file under `config/` and `defaults/`.
pub const CONFIG_FILE_NAME: &str = "statline.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

/// Everything a query needs. Passed explicitly to every query call.
#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataPaths,
    pub fields: FieldSchema,
    pub eligibility: Eligibility,
    pub query: QueryConfig,
    pub output: OutputConfig,
}

/// Raw deserialization target for statline.toml. Only `[data]` is required.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data: DataPaths,
    #[serde(default)]
    fields: FieldSchema,
    #[serde(default)]
    eligibility: Eligibility,
    #[serde(default)]
    query: QueryConfig,
    #[serde(default)]
    output: OutputConfig,
}

// ---------------------------------------------------------------------------
// statline.toml sections
// ---------------------------------------------------------------------------

/// Locations and dialect of the two delimited input files.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// Biographical ("master") records, one row per player.
    pub master: PathBuf,
    /// Batting records, one row per player per season.
    pub batting: PathBuf,
    #[serde(default = "default_separator")]
    pub separator: char,
    #[serde(default = "default_quote")]
    pub quote: char,
}

fn default_separator() -> char {
    ','
}

fn default_quote() -> char {
    '"'
}

/// Maps each semantic role to the column header that carries it in the
/// source files. Defaults follow the Lahman database headers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldSchema {
    pub player_id: String,
    pub year: String,
    pub at_bats: String,
    pub hits: String,
    pub doubles: String,
    pub triples: String,
    pub home_runs: String,
    pub walks: String,
    pub first_name: String,
    pub last_name: String,
    /// Counting-stat columns shown alongside each ranked player.
    pub stat_fields: Vec<String>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self {
            player_id: "playerID".into(),
            year: "yearID".into(),
            at_bats: "AB".into(),
            hits: "H".into(),
            doubles: "2B".into(),
            triples: "3B".into(),
            home_runs: "HR".into(),
            walks: "BB".into(),
            first_name: "nameFirst".into(),
            last_name: "nameLast".into(),
            stat_fields: ["AB", "H", "2B", "3B", "HR", "BB"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl FieldSchema {
    /// The six counting-stat columns the stat functions read, keyed by role.
    pub fn counting_fields(&self) -> [(&'static str, &str); 6] {
        [
            ("at_bats", self.at_bats.as_str()),
            ("hits", self.hits.as_str()),
            ("doubles", self.doubles.as_str()),
            ("triples", self.triples.as_str()),
            ("home_runs", self.home_runs.as_str()),
            ("walks", self.walks.as_str()),
        ]
    }

    fn named_fields(&self) -> [(&'static str, &str); 10] {
        let [ab, h, d, t, hr, bb] = self.counting_fields();
        [
            ("player_id", self.player_id.as_str()),
            ("year", self.year.as_str()),
            ab,
            h,
            d,
            t,
            hr,
            bb,
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
        ]
    }
}

/// Minimum playing time for a rate stat to count. Below it the stat is 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Eligibility {
    pub min_at_bats: u32,
}

impl Default for Eligibility {
    fn default() -> Self {
        Self { min_at_bats: 500 }
    }
}

/// Parameters of the reference report run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub year: i32,
    pub num_players: usize,
    pub stats: Vec<Stat>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            year: 2016,
            num_players: 5,
            stats: Stat::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/statline.toml` relative to `base_dir`.
///
/// Relative data paths are resolved against `base_dir`. This does not copy
/// defaults; prefer `load_config()` for the binary.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE_NAME);
    let text = read_file(&path)?;
    let mut config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    config.data.master = resolve(base_dir, &config.data.master);
    config.data.batting = resolve(base_dir, &config.data.batting);

    Ok(config)
}

/// Parse a statline.toml document without touching the filesystem.
pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    let file: ConfigFile = toml::from_str(text)?;
    Ok(Config {
        data: file.data,
        fields: file.fields,
        eligibility: file.eligibility,
        query: file.query,
        output: file.output,
    })
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            // Never overwrite a user's edited config.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let data = &config.data;
    if data.master.as_os_str().is_empty() {
        return Err(invalid("data.master", "must not be empty"));
    }
    if data.batting.as_os_str().is_empty() {
        return Err(invalid("data.batting", "must not be empty"));
    }
    if !data.separator.is_ascii() {
        return Err(invalid(
            "data.separator",
            format!("must be a single ASCII character, got {:?}", data.separator),
        ));
    }
    if !data.quote.is_ascii() {
        return Err(invalid(
            "data.quote",
            format!("must be a single ASCII character, got {:?}", data.quote),
        ));
    }
    if data.separator == data.quote {
        return Err(invalid("data.quote", "must differ from data.separator"));
    }

    let fields = &config.fields;
    for (role, column) in fields.named_fields() {
        if column.trim().is_empty() {
            return Err(invalid(&format!("fields.{role}"), "must not be empty"));
        }
    }
    for (role, column) in fields.counting_fields() {
        if !fields.stat_fields.iter().any(|f| f == column) {
            return Err(invalid(
                "fields.stat_fields",
                format!("must include the {role} column `{column}`"),
            ));
        }
    }

    if config.eligibility.min_at_bats == 0 {
        return Err(invalid("eligibility.min_at_bats", "must be > 0"));
    }

    if config.query.num_players == 0 {
        return Err(invalid("query.num_players", "must be > 0"));
    }
    if config.query.stats.is_empty() {
        return Err(invalid("query.stats", "must name at least one stat"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
