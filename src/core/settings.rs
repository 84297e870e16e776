use std::fmt;
use std::str::FromStr;

use crate::core::store::{keys, KeyValueStore, StoreError};

pub const DEFAULT_BASE_URL: &str = "https://ai.alokahub.com/";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Respond using markdown.";
pub const MAX_TOKENS: u32 = 4096;

/// Models offered by default; the first one is used when nothing else is configured.
pub const BUILTIN_MODELS: &[&str] = &[
    "gemini-3-flash",
    "gpt-5-mini",
    "claude-4.5-haiku",
    "deepseek-v3.2",
];

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_BASE_URL: &str = "OPENAI_BASE_URL";

/// How images from earlier turns are sent back to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryImages {
    /// Earlier images are replaced by a short text marker.
    #[default]
    Placeholder,
    /// Earlier images are sent again in full on every turn.
    Resend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Si,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

macro_rules! string_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    other => Err(format!(
                        "invalid {}: {other} (expected one of: {})",
                        stringify!($ty).to_ascii_lowercase(),
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

string_enum!(HistoryImages { Placeholder => "placeholder", Resend => "resend" });
string_enum!(Language { En => "en", Si => "si" });
string_enum!(Theme { Light => "light", Dark => "dark" });

/// Connection settings. Changed only through [`Settings::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub system_prompt: String,
    pub model: String,
    pub history_images: HistoryImages,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model: BUILTIN_MODELS[0].to_string(),
            history_images: HistoryImages::default(),
        }
    }
}

impl Settings {
    /// Reads settings from the store, falling back to the environment and then
    /// to defaults. Empty stored values count as unset.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self::load_with_env(store, |name| std::env::var(name).ok())
    }

    pub(crate) fn load_with_env(
        store: &dyn KeyValueStore,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let stored = |key: &str| store.get(key).filter(|value| !value.trim().is_empty());
        let from_env = |name: &str| env(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let history_images = match stored(keys::HISTORY_IMAGES).map(|raw| raw.parse()) {
            Some(Ok(policy)) => policy,
            Some(Err(err)) => {
                tracing::warn!("ignoring stored history image policy: {err}");
                defaults.history_images
            }
            None => defaults.history_images,
        };

        Self {
            base_url: stored(keys::BASE_URL)
                .or_else(|| from_env(ENV_BASE_URL))
                .unwrap_or(defaults.base_url),
            api_key: stored(keys::API_KEY).or_else(|| from_env(ENV_API_KEY)),
            system_prompt: stored(keys::SYSTEM_PROMPT).unwrap_or(defaults.system_prompt),
            model: stored(keys::MODEL).unwrap_or(defaults.model),
            history_images,
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.set(keys::BASE_URL, &self.base_url)?;
        match &self.api_key {
            Some(api_key) => store.set(keys::API_KEY, api_key)?,
            None => store.remove(keys::API_KEY)?,
        }
        store.set(keys::SYSTEM_PROMPT, &self.system_prompt)?;
        store.set(keys::MODEL, &self.model)?;
        store.set(keys::HISTORY_IMAGES, self.history_images.as_str())?;
        Ok(())
    }

    /// Writes the default system prompt if the store has none yet. The base
    /// URL is left unset so `OPENAI_BASE_URL` can still apply at load time.
    pub fn seed_defaults(store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        if store.get(keys::SYSTEM_PROMPT).is_none() {
            store.set(keys::SYSTEM_PROMPT, DEFAULT_SYSTEM_PROMPT)?;
        }
        Ok(())
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && !self.base_url.trim().is_empty()
    }

    /// API key with all but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            None => "(not set)".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                if chars.len() <= 4 {
                    "*".repeat(chars.len())
                } else {
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("{}{tail}", "*".repeat(chars.len() - 4))
                }
            }
        }
    }
}

/// Interface preferences that persist alongside the connection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub language: Language,
    pub theme: Theme,
    pub sidebar_collapsed: bool,
}

impl Preferences {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let language = store
            .get(keys::LANG)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let theme = store
            .get(keys::THEME)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let sidebar_collapsed = store.get(keys::SIDEBAR_COLLAPSED).as_deref() == Some("true");

        Self {
            language,
            theme,
            sidebar_collapsed,
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.set(keys::LANG, self.language.as_str())?;
        store.set(keys::THEME, self.theme.as_str())?;
        store.set(
            keys::SIDEBAR_COLLAPSED,
            if self.sidebar_collapsed { "true" } else { "false" },
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_store_yields_defaults() {
        let store = MemoryStore::new();
        let settings = Settings::load_with_env(&store, no_env);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.model, "gemini-3-flash");
        assert!(!settings.has_credentials());
    }

    #[test]
    fn stored_values_win_over_environment() {
        let mut store = MemoryStore::new();
        store.set(keys::API_KEY, "stored-key").expect("set");

        let settings = Settings::load_with_env(&store, |name| match name {
            "OPENAI_API_KEY" => Some("env-key".to_string()),
            "OPENAI_BASE_URL" => Some("https://env.example/v1".to_string()),
            _ => None,
        });

        assert_eq!(settings.api_key.as_deref(), Some("stored-key"));
        assert_eq!(settings.base_url, "https://env.example/v1");
    }

    #[test]
    fn blank_stored_key_counts_as_unset() {
        let mut store = MemoryStore::new();
        store.set(keys::API_KEY, "  ").expect("set");
        let settings = Settings::load_with_env(&store, no_env);
        assert_eq!(settings.api_key, None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            base_url: "https://proxy.example/".to_string(),
            api_key: Some("sk-test-1234".to_string()),
            system_prompt: "Answer in haiku.".to_string(),
            model: "gpt-5-mini".to_string(),
            history_images: HistoryImages::Resend,
        };
        settings.save(&mut store).expect("save");
        assert_eq!(Settings::load_with_env(&store, no_env), settings);

        let cleared = Settings {
            api_key: None,
            ..settings
        };
        cleared.save(&mut store).expect("save");
        assert_eq!(store.get(keys::API_KEY), None);
    }

    #[test]
    fn seeded_store_still_takes_base_url_from_environment() {
        let mut store = MemoryStore::new();
        Settings::seed_defaults(&mut store).expect("seed");
        assert_eq!(store.get(keys::BASE_URL), None);

        let settings = Settings::load_with_env(&store, |name| {
            (name == "OPENAI_BASE_URL").then(|| "https://env.example/v1".to_string())
        });
        assert_eq!(settings.base_url, "https://env.example/v1");
        assert_eq!(Settings::load_with_env(&store, no_env).base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn seed_defaults_keeps_existing_values() {
        let mut store = MemoryStore::new();
        store.set(keys::BASE_URL, "https://mine.example").expect("set");
        Settings::seed_defaults(&mut store).expect("seed");
        assert_eq!(store.get(keys::BASE_URL).as_deref(), Some("https://mine.example"));
        assert_eq!(
            store.get(keys::SYSTEM_PROMPT).as_deref(),
            Some(DEFAULT_SYSTEM_PROMPT)
        );
    }

    #[test]
    fn invalid_history_policy_falls_back() {
        let mut store = MemoryStore::new();
        store.set(keys::HISTORY_IMAGES, "sometimes").expect("set");
        let settings = Settings::load_with_env(&store, no_env);
        assert_eq!(settings.history_images, HistoryImages::Placeholder);
    }

    #[test]
    fn masked_api_key_shows_tail_only() {
        let mut settings = Settings::default();
        assert_eq!(settings.masked_api_key(), "(not set)");
        settings.api_key = Some("sk-abcdef".to_string());
        assert_eq!(settings.masked_api_key(), "*****cdef");
        settings.api_key = Some("abc".to_string());
        assert_eq!(settings.masked_api_key(), "***");
    }

    #[test]
    fn preferences_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(Preferences::load(&store), Preferences::default());

        let prefs = Preferences {
            language: Language::Si,
            theme: Theme::Dark,
            sidebar_collapsed: true,
        };
        prefs.save(&mut store).expect("save");
        assert_eq!(Preferences::load(&store), prefs);
        assert_eq!(store.get(keys::SIDEBAR_COLLAPSED).as_deref(), Some("true"));
    }

    #[test]
    fn enum_parsing_is_case_insensitive() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(" SI ".parse::<Language>(), Ok(Language::Si));
        let err = "fr".parse::<Language>().expect_err("unknown language");
        assert_eq!(err, "invalid language: fr (expected one of: en, si)");
    }
}
