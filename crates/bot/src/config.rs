//! Bot configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use gotvalis_core::CombatConfig;
use gotvalis_runtime::RuntimeConfig;

/// Process-level settings for the bot.
#[derive(Clone, Debug)]
pub struct BotConfig {
    /// Directory of the JSON entity store.
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub tick_interval: Duration,
    /// RON catalog replacing the built-in items.
    pub items_file: Option<PathBuf>,
    pub offense_cooldown_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        let dirs = ProjectDirs::from("", "", "gotvalis");
        Self {
            data_dir: dirs
                .as_ref()
                .map(|d| d.data_dir().join("entities"))
                .unwrap_or_else(|| PathBuf::from("data/entities")),
            log_dir: dirs
                .as_ref()
                .map(|d| d.cache_dir().join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs")),
            tick_interval: RuntimeConfig::default().tick_interval,
            items_file: None,
            offense_cooldown_secs: 0,
        }
    }
}

impl BotConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GOTVALIS_DATA_DIR` - Entity store directory (default: platform data dir)
    /// - `GOTVALIS_LOG_DIR` - Log directory (default: platform cache dir)
    /// - `GOTVALIS_TICK_SECONDS` - Status-effect sweep period (default: 30)
    /// - `GOTVALIS_ITEMS_FILE` - RON item catalog override (default: built-in)
    /// - `GOTVALIS_OFFENSE_COOLDOWN_SECONDS` - Seconds between attacks (default: 0, off)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("GOTVALIS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("GOTVALIS_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(secs) = parse::<u64>(&lookup, "GOTVALIS_TICK_SECONDS") {
            config.tick_interval = Duration::from_secs(secs.max(1));
        }
        config.items_file = lookup("GOTVALIS_ITEMS_FILE").map(PathBuf::from);
        if let Some(secs) = parse::<u64>(&lookup, "GOTVALIS_OFFENSE_COOLDOWN_SECONDS") {
            config.offense_cooldown_secs = secs;
        }

        config
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            combat: CombatConfig::default().with_offense_cooldown(self.offense_cooldown_secs),
            tick_interval: self.tick_interval,
            ..RuntimeConfig::default()
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
