//! Configuration loading and config file resolution
//!
//! All settings are startup constants; nothing here changes while the bot runs.
//!
//! Config file resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. `LINEUP_CONFIG` environment variable
//! 3. User config directory (`~/.config/lineup/config.toml` on Linux)
//! 4. System config (`/etc/lineup/config.toml`, Linux only)
//! 5. Built-in defaults (no file)

use crate::emoji::ReactionEmoji;
use crate::ids::RoleId;
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "LINEUP_CONFIG";

/// Default roster capacity
pub const DEFAULT_MAX_PARTICIPANTS: usize = 5;

/// Bootstrap configuration loaded from TOML file
#[derive(Clone, Deserialize)]
pub struct LineupConfig {
    /// Roles whose mention turns a message into an anchor
    #[serde(default)]
    pub target_role_ids: HashSet<RoleId>,

    /// Reaction that joins/leaves the lineup
    ///
    /// Default: ✅
    #[serde(default)]
    pub reaction_emoji: ReactionEmoji,

    /// Roster capacity
    ///
    /// Default: 5
    #[serde(default = "default_max_participants")]
    pub max_participants: usize,

    /// Bot token (optional here; CLI and environment take precedence)
    #[serde(default)]
    pub discord_token: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_max_participants() -> usize {
    DEFAULT_MAX_PARTICIPANTS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LineupConfig {
    fn default() -> Self {
        Self {
            target_role_ids: HashSet::new(),
            reaction_emoji: ReactionEmoji::default(),
            max_participants: DEFAULT_MAX_PARTICIPANTS,
            discord_token: None,
            logging: LoggingConfig::default(),
        }
    }
}

// Token stays out of logs.
impl fmt::Debug for LineupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineupConfig")
            .field("target_role_ids", &self.target_role_ids)
            .field("reaction_emoji", &self.reaction_emoji)
            .field("max_participants", &self.max_participants)
            .field("discord_token", &self.discord_token.as_ref().map(|_| "<redacted>"))
            .field("logging", &self.logging)
            .finish()
    }
}

impl LineupConfig {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LineupConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.max_participants == 0 {
            return Err(Error::Config(
                "max_participants must be at least 1".to_string(),
            ));
        }
        if let ReactionEmoji::Unicode(s) = &self.reaction_emoji {
            if s.trim().is_empty() {
                return Err(Error::Config("reaction_emoji must not be empty".to_string()));
            }
        }
        Ok(())
    }

    /// Settings that load fine but are probably mistakes
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.target_role_ids.is_empty() {
            warnings.push("No target_role_ids configured; no message can start a lineup".to_string());
        }
        warnings
    }

    /// Pick the bot token: explicit value (CLI/env) first, then the config file
    pub fn resolve_token(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .or(self.discord_token.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::Config(
                    "DISCORD_TOKEN is missing (use --token, DISCORD_TOKEN or discord_token)"
                        .to_string(),
                )
            })
    }

    pub fn is_target_role(&self, role: RoleId) -> bool {
        self.target_role_ids.contains(&role)
    }
}

/// Resolves and loads the config file following the priority order above
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Find the config file to use, if any
    ///
    /// Explicit paths (CLI or environment) are returned even if they do not exist so
    /// that loading reports the error; discovered default locations only when present.
    pub fn resolve_path(&self) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3/4: Default locations
        default_config_locations().into_iter().find(|p| p.exists())
    }

    /// Load configuration
    ///
    /// A missing default config file is not fatal: built-in defaults are used. An explicit
    /// file that cannot be read or parsed is an error. Nothing is logged here because
    /// loading happens before the log level is known; see [`LoadedConfig::log_summary`].
    pub fn load(&self) -> Result<LoadedConfig> {
        let source = self.resolve_path();
        let config = match &source {
            Some(path) => LineupConfig::from_file(path)?,
            None => {
                let config = LineupConfig::default();
                config.validate()?;
                config
            }
        };
        Ok(LoadedConfig { config, source })
    }
}

/// Loaded configuration plus the file it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: LineupConfig,
    /// None when built-in defaults were used
    pub source: Option<PathBuf>,
}

impl LoadedConfig {
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.source.is_none() {
            warnings.push("No config file found; using built-in defaults".to_string());
        }
        warnings.extend(self.config.warnings());
        warnings
    }

    /// Log where the configuration came from and any warnings (call once tracing is up)
    pub fn log_summary(&self) {
        if let Some(path) = &self.source {
            info!("Loaded configuration from {}", path.display());
        }
        for warning in self.warnings() {
            warn!("{}", warning);
        }
    }
}

/// Default config file locations for the platform, in lookup order
fn default_config_locations() -> Vec<PathBuf> {
    let mut locations: Vec<PathBuf> = dirs::config_dir()
        .map(|d| d.join("lineup").join("config.toml"))
        .into_iter()
        .collect();

    if cfg!(target_os = "linux") {
        locations.push(PathBuf::from("/etc/lineup/config.toml"));
    }

    locations
}
