//! Configuration loading for compest services
//!
//! Resolution priority for every setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: the resolver logs a warning and
//! carries on with the remaining tiers. A TOML file that exists but does not
//! parse is a configuration error.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable names
pub const ENV_CONFIG: &str = "COMPEST_CONFIG";
pub const ENV_BIND: &str = "COMPEST_BIND";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_PROVIDER: &str = "PROVIDER";
pub const ENV_COMPS_FILE: &str = "COMPEST_COMPS_FILE";
pub const ENV_REFERENCE_DATE: &str = "COMPEST_REFERENCE_DATE";
pub const ENV_LOG_LEVEL: &str = "COMPEST_LOG_LEVEL";

/// Compiled defaults
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5740";
pub const DEFAULT_PROVIDER: &str = "synthetic";
pub const DEFAULT_RADIUS_KM: f64 = 3.0;
pub const DEFAULT_RECENCY_DAYS: u32 = 180;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Comp search window handed to the comp source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

fn default_days() -> u32 {
    DEFAULT_RECENCY_DAYS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            days: DEFAULT_RECENCY_DAYS,
        }
    }
}

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// On-disk TOML configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub database_url: Option<String>,
    pub provider: Option<String>,
    pub comps_file: Option<PathBuf>,
    /// `YYYY-MM-DD`
    pub reference_date: Option<String>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub database_url: Option<String>,
    pub provider: Option<String>,
    pub comps_file: Option<PathBuf>,
    pub reference_date: Option<String>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_address: String,
    /// Present: SQLite result store. Absent: in-memory store.
    pub database_url: Option<String>,
    pub provider: String,
    pub comps_file: Option<PathBuf>,
    pub search: SearchConfig,
    /// Pinned recency reference date; `None` means "UTC today" per request
    pub reference_date: Option<NaiveDate>,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_url: None,
            provider: DEFAULT_PROVIDER.to_string(),
            comps_file: None,
            search: SearchConfig::default(),
            reference_date: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Resolves [`ServiceConfig`] across CLI, environment, TOML and defaults
pub struct ConfigResolver {
    config_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// `explicit_path` is the `--config` argument, if any
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        Self {
            config_path: explicit_path,
        }
    }

    /// Config file the resolver will read, if one can be located
    pub fn config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            return Some(path.clone());
        }
        if let Ok(path) = std::env::var(ENV_CONFIG) {
            return Some(PathBuf::from(path));
        }
        default_config_file()
    }

    /// Load the TOML tier; a missing file yields the empty config
    pub fn load_toml(&self) -> Result<TomlConfig> {
        let Some(path) = self.config_file() else {
            debug!("No config directory on this platform; using defaults");
            return Ok(TomlConfig::default());
        };

        if !path.exists() {
            // An explicitly requested file that is missing deserves a warning;
            // the default location is allowed to be absent.
            if self.config_path.is_some() || std::env::var(ENV_CONFIG).is_ok() {
                warn!("Config file not found: {} (using defaults)", path.display());
            } else {
                debug!("No config file at {}", path.display());
            }
            return Ok(TomlConfig::default());
        }

        debug!("Loading config file {}", path.display());
        TomlConfig::from_file(&path)
    }

    /// Resolve every setting
    pub fn resolve(&self, overrides: ConfigOverrides) -> Result<ServiceConfig> {
        let toml = self.load_toml()?;
        merge(overrides, toml)
    }
}

/// Apply the CLI > ENV > TOML > default priority to each setting
pub fn merge(overrides: ConfigOverrides, toml: TomlConfig) -> Result<ServiceConfig> {
    let defaults = ServiceConfig::default();

    let bind_address = pick(overrides.bind_address, ENV_BIND, toml.bind_address)
        .unwrap_or(defaults.bind_address);
    let database_url = pick(overrides.database_url, ENV_DATABASE_URL, toml.database_url)
        .filter(|url| !url.trim().is_empty());
    let provider = pick(overrides.provider, ENV_PROVIDER, toml.provider)
        .map(|p| p.trim().to_lowercase())
        .unwrap_or(defaults.provider);
    let comps_file = pick(
        overrides.comps_file.map(|p| p.to_string_lossy().into_owned()),
        ENV_COMPS_FILE,
        toml.comps_file.map(|p| p.to_string_lossy().into_owned()),
    )
    .map(PathBuf::from);
    let reference_date = pick(overrides.reference_date, ENV_REFERENCE_DATE, toml.reference_date)
        .map(|s| {
            crate::time::parse_date(&s)
                .map_err(|e| Error::Config(format!("Invalid reference_date '{}': {}", s, e)))
        })
        .transpose()?;
    let log_level = pick(overrides.log_level, ENV_LOG_LEVEL, Some(toml.logging.level))
        .unwrap_or(defaults.log_level);

    let search = toml.search;
    if !(search.radius_km.is_finite() && search.radius_km > 0.0) {
        return Err(Error::Config(format!(
            "search.radius_km must be positive, got {}",
            search.radius_km
        )));
    }

    Ok(ServiceConfig {
        bind_address,
        database_url,
        provider,
        comps_file,
        search,
        reference_date,
        log_level,
    })
}

fn pick(cli: Option<String>, env_var: &str, toml: Option<String>) -> Option<String> {
    cli.or_else(|| std::env::var(env_var).ok()).or(toml)
}

/// Platform config file location: `<config_dir>/compest/config.toml`
fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("compest").join("config.toml"))
}
