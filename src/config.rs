//! Configuration loading and validation.
//!
//! The adapter reads one human-owned `config.toml`. The bot token itself
//! never lives in the file: the file names the environment variable that
//! holds it.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::l10n::{FixedLocale, LanguageCodeLocale, LocaleResolver, LocaleTag};
use crate::types::Channel;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Telegram bot settings.
    pub telegram: TelegramConfig,

    /// Locale selection.
    #[serde(default)]
    pub locale: LocaleConfig,

    /// Temp file placement.
    #[serde(default)]
    pub files: FilesConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telegram-specific configuration.
#[derive(Debug, Deserialize)]
pub struct TelegramConfig {
    /// Environment variable name holding the bot token.
    #[serde(default = "default_bot_token_env")]
    pub bot_token_env: String,

    /// Channel tag this adapter answers for.
    pub channel: Channel,
}

/// How the presenter locale is picked for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleStrategy {
    /// Always [`LocaleConfig::default`].
    Fixed,
    /// Russian for `ru*` language codes, otherwise [`LocaleConfig::default`].
    LanguageCode,
}

/// Locale selection settings.
#[derive(Debug, Deserialize)]
pub struct LocaleConfig {
    /// Selection strategy.
    #[serde(default = "default_locale_strategy")]
    pub strategy: LocaleStrategy,

    /// Fixed locale, or fallback for the language-code strategy.
    #[serde(default = "default_locale", rename = "default")]
    pub default_locale: LocaleTag,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            strategy: default_locale_strategy(),
            default_locale: default_locale(),
        }
    }
}

impl LocaleConfig {
    /// Build the configured resolver.
    pub fn resolver(&self) -> Box<dyn LocaleResolver> {
        match self.strategy {
            LocaleStrategy::Fixed => Box::new(FixedLocale(self.default_locale)),
            LocaleStrategy::LanguageCode => Box::new(LanguageCodeLocale {
                fallback: self.default_locale,
            }),
        }
    }
}

/// Where per-chat temp files are written.
#[derive(Debug, Deserialize)]
pub struct FilesConfig {
    /// Directory for config documents awaiting upload.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    /// Directory for rotated JSON logs. Console-only when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

// Default value functions for serde

fn default_bot_token_env() -> String {
    "TELEGRAM_BRIDGE_TOKEN".to_owned()
}
fn default_locale_strategy() -> LocaleStrategy {
    LocaleStrategy::Fixed
}
fn default_locale() -> LocaleTag {
    LocaleTag::Ru
}
fn default_temp_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Load the config from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Read the bot token from the environment variable named in `telegram`.
///
/// # Errors
///
/// Returns an error if the variable is unset or empty.
pub fn resolve_bot_token(telegram: &TelegramConfig) -> anyhow::Result<String> {
    let var = &telegram.bot_token_env;
    match std::env::var(var) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_owned()),
        Ok(_) => Err(anyhow::anyhow!("environment variable {var} is empty")),
        Err(e) => Err(anyhow::anyhow!("cannot read bot token from {var}: {e}")),
    }
}

/// Resolve the default config directory (`~/.telegram-bridge/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".telegram-bridge"))
}

/// Resolve the default config file (`~/.telegram-bridge/config.toml`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
