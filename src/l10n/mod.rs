//! Localization: per-locale presenters and locale resolution.
//!
//! A [`Presenter`] turns a [`Scene`] into display text and supplies button
//! labels for keyboards. The [`LocaleRegistry`] owns one presenter per
//! [`LocaleTag`] and picks one for a user through a [`LocaleResolver`]
//! strategy, so locale policy can change without touching dispatch.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{ChatUser, Scene};

pub mod en;
pub mod ru;

pub use en::PresenterEn;
pub use ru::PresenterRu;

// ---------------------------------------------------------------------------
// Locale tags
// ---------------------------------------------------------------------------

/// Supported UI locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleTag {
    /// English.
    En,
    /// Russian.
    Ru,
}

impl LocaleTag {
    /// Lowercase tag, as used in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocaleTag {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            _ => Err(UnknownLocale(s.to_owned())),
        }
    }
}

/// Returned when a locale tag is not supported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

/// Keyboard buttons a presenter must label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Request configuration files.
    GetConfigs,
    /// Open the device picker.
    Instructions,
    /// Return to the main menu.
    Back,
    /// iPhone instructions.
    Iphone,
    /// macOS instructions.
    Mac,
    /// Android instructions.
    Android,
    /// Windows instructions.
    Windows,
    /// Acknowledge an administrative notice.
    Acknowledge,
}

/// Locale-specific text rendering.
pub trait Presenter: Send + Sync {
    /// Locale this presenter renders.
    fn locale(&self) -> LocaleTag;

    /// Display text for a scene (Markdown).
    fn text(&self, scene: &Scene) -> String;

    /// Label for a keyboard button.
    fn button(&self, button: Button) -> String;
}

// ---------------------------------------------------------------------------
// Resolution strategies
// ---------------------------------------------------------------------------

/// Chooses a locale for a user.
pub trait LocaleResolver: Send + Sync {
    /// Locale to render for `user`.
    fn resolve(&self, user: &ChatUser) -> LocaleTag;
}

/// Always the same locale, whatever the client reports.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocale(pub LocaleTag);

impl Default for FixedLocale {
    fn default() -> Self {
        Self(LocaleTag::Ru)
    }
}

impl LocaleResolver for FixedLocale {
    fn resolve(&self, _user: &ChatUser) -> LocaleTag {
        self.0
    }
}

/// Russian for clients whose language code mentions `ru`, otherwise the fallback.
#[derive(Debug, Clone, Copy)]
pub struct LanguageCodeLocale {
    /// Locale for users without a Russian language code.
    pub fallback: LocaleTag,
}

impl Default for LanguageCodeLocale {
    fn default() -> Self {
        Self {
            fallback: LocaleTag::En,
        }
    }
}

impl LocaleResolver for LanguageCodeLocale {
    fn resolve(&self, user: &ChatUser) -> LocaleTag {
        match user.language_code.as_deref() {
            Some(code) if code.to_ascii_lowercase().contains("ru") => LocaleTag::Ru,
            _ => self.fallback,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Presenters keyed by locale, plus the strategy that picks between them.
///
/// Read-only after construction; shared across concurrent dispatches.
pub struct LocaleRegistry {
    presenters: HashMap<LocaleTag, Arc<dyn Presenter>>,
    resolver: Box<dyn LocaleResolver>,
    fallback: Arc<dyn Presenter>,
}

impl LocaleRegistry {
    /// Registry with the bundled English and Russian presenters.
    pub fn with_builtin(resolver: Box<dyn LocaleResolver>) -> Self {
        let ru: Arc<dyn Presenter> = Arc::new(PresenterRu);
        let en: Arc<dyn Presenter> = Arc::new(PresenterEn);
        let mut presenters = HashMap::new();
        presenters.insert(LocaleTag::Ru, Arc::clone(&ru));
        presenters.insert(LocaleTag::En, en);
        Self {
            presenters,
            resolver,
            fallback: ru,
        }
    }

    /// Registry with explicit presenters. `fallback` answers for locales
    /// missing from `presenters`.
    pub fn new(
        presenters: HashMap<LocaleTag, Arc<dyn Presenter>>,
        resolver: Box<dyn LocaleResolver>,
        fallback: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            presenters,
            resolver,
            fallback,
        }
    }

    /// Presenter for a locale, or the fallback.
    pub fn get(&self, locale: LocaleTag) -> Arc<dyn Presenter> {
        self.presenters
            .get(&locale)
            .map_or_else(|| Arc::clone(&self.fallback), Arc::clone)
    }

    /// Presenter for a user, chosen by the resolver.
    pub fn presenter_for(&self, user: &ChatUser) -> Arc<dyn Presenter> {
        self.get(self.resolver.resolve(user))
    }
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::with_builtin(Box::new(FixedLocale::default()))
    }
}

impl fmt::Debug for LocaleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleRegistry")
            .field("locales", &self.presenters.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
