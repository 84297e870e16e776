//! Handlers for each stored setting.

use std::fmt::Display;
use std::str::FromStr;

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{
    format_bool, mutate_preferences, mutate_settings, parse_bool,
};
use crate::cli::settings::SettingHandler;
use crate::core::session::ChatSession;
use crate::core::settings::{
    HistoryImages, Language, Settings, Theme, BUILTIN_MODELS, DEFAULT_BASE_URL,
    DEFAULT_SYSTEM_PROMPT,
};

/// Free-text connection settings that fall back to a default when unset.
pub struct TextHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    default: fn() -> String,
    get: fn(&Settings) -> &str,
    set_field: fn(&mut Settings, String),
}

impl SettingHandler for TextHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], session: &mut ChatSession) -> Result<String, SettingError> {
        let value = args.join(" ").trim().to_string();
        if value.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let set_field = self.set_field;
        let stored = value.clone();
        mutate_settings(session, move |settings| set_field(settings, stored))?;
        Ok(format!("✅ Set {} to: {value}", self.key))
    }

    fn unset(&self, session: &mut ChatSession) -> Result<String, SettingError> {
        let set_field = self.set_field;
        let default = (self.default)();
        let stored = default.clone();
        mutate_settings(session, move |settings| set_field(settings, stored))?;
        Ok(format!("✅ Reset {} to default: {default}", self.key))
    }

    fn format(&self, session: &ChatSession) -> String {
        format!("  {}: {}", self.key, (self.get)(session.settings()))
    }
}

pub fn base_url_handler() -> TextHandler {
    TextHandler {
        key: "base-url",
        hint: "To set the API endpoint, give its base URL:",
        example: "alokahub set base-url https://ai.alokahub.com/",
        default: || DEFAULT_BASE_URL.to_string(),
        get: |s| s.base_url.as_str(),
        set_field: |s, v| s.base_url = v,
    }
}

pub fn system_prompt_handler() -> TextHandler {
    TextHandler {
        key: "system-prompt",
        hint: "To set the system prompt, give the full text:",
        example: "alokahub set system-prompt You are a concise assistant.",
        default: || DEFAULT_SYSTEM_PROMPT.to_string(),
        get: |s| s.system_prompt.as_str(),
        set_field: |s, v| s.system_prompt = v,
    }
}

pub fn model_handler() -> TextHandler {
    TextHandler {
        key: "model",
        hint: "To set the default model, give its identifier:",
        example: "alokahub set model gpt-5-mini",
        default: || BUILTIN_MODELS[0].to_string(),
        get: |s| s.model.as_str(),
        set_field: |s, v| s.model = v,
    }
}

pub struct ApiKeyHandler;

impl SettingHandler for ApiKeyHandler {
    fn key(&self) -> &'static str {
        "api-key"
    }

    fn set(&self, args: &[String], session: &mut ChatSession) -> Result<String, SettingError> {
        let key = args.join("").trim().to_string();
        if key.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set the API key, paste it after the setting name:",
                example: "alokahub set api-key sk-...",
            });
        }

        mutate_settings(session, move |settings| settings.api_key = Some(key))?;
        Ok(format!(
            "✅ Set api-key to: {}",
            session.settings().masked_api_key()
        ))
    }

    fn unset(&self, session: &mut ChatSession) -> Result<String, SettingError> {
        mutate_settings(session, |settings| settings.api_key = None)?;
        Ok("✅ Unset api-key".to_string())
    }

    fn format(&self, session: &ChatSession) -> String {
        format!("  api-key: {}", session.settings().masked_api_key())
    }
}

/// Settings that take one of a fixed set of values.
pub struct ChoiceHandler<T> {
    key: &'static str,
    choices: &'static str,
    get: fn(&ChatSession) -> T,
    apply: fn(&mut ChatSession, T) -> Result<(), SettingError>,
}

impl<T> SettingHandler for ChoiceHandler<T>
where
    T: FromStr<Err = String> + Display + Default + 'static,
{
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], session: &mut ChatSession) -> Result<String, SettingError> {
        let input = args.join(" ");
        if input.trim().is_empty() {
            return Err(SettingError::InvalidValue {
                key: self.key,
                message: format!("expected one of: {}", self.choices),
            });
        }

        let value: T = input.parse().map_err(|message| SettingError::InvalidValue {
            key: self.key,
            message,
        })?;
        let display = value.to_string();
        (self.apply)(session, value)?;
        Ok(format!("✅ Set {} to: {display}", self.key))
    }

    fn unset(&self, session: &mut ChatSession) -> Result<String, SettingError> {
        let default = T::default();
        let display = default.to_string();
        (self.apply)(session, default)?;
        Ok(format!("✅ Reset {} to default: {display}", self.key))
    }

    fn format(&self, session: &ChatSession) -> String {
        format!("  {}: {}", self.key, (self.get)(session))
    }
}

pub fn history_images_handler() -> ChoiceHandler<HistoryImages> {
    ChoiceHandler {
        key: "history-images",
        choices: "placeholder, resend",
        get: |session| session.settings().history_images,
        apply: |session, value| mutate_settings(session, |s| s.history_images = value),
    }
}

pub fn language_handler() -> ChoiceHandler<Language> {
    ChoiceHandler {
        key: "language",
        choices: "en, si",
        get: |session| session.preferences().language,
        apply: |session, value| mutate_preferences(session, |p| p.language = value),
    }
}

pub fn theme_handler() -> ChoiceHandler<Theme> {
    ChoiceHandler {
        key: "theme",
        choices: "light, dark",
        get: |session| session.preferences().theme,
        apply: |session, value| mutate_preferences(session, |p| p.theme = value),
    }
}

pub struct SidebarCollapsedHandler;

impl SettingHandler for SidebarCollapsedHandler {
    fn key(&self) -> &'static str {
        "sidebar-collapsed"
    }

    fn set(&self, args: &[String], session: &mut ChatSession) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To collapse the sidebar by default, specify on or off:",
                example: "alokahub set sidebar-collapsed on",
            });
        }

        let input = args.join(" ");
        let value = parse_bool(&input).ok_or(SettingError::InvalidBoolean(input))?;
        mutate_preferences(session, |p| p.sidebar_collapsed = value)?;
        Ok(format!("✅ Set sidebar-collapsed to: {}", format_bool(value)))
    }

    fn unset(&self, session: &mut ChatSession) -> Result<String, SettingError> {
        mutate_preferences(session, |p| p.sidebar_collapsed = false)?;
        Ok("✅ Unset sidebar-collapsed (will use default: off)".to_string())
    }

    fn format(&self, session: &ChatSession) -> String {
        format!(
            "  sidebar-collapsed: {}",
            format_bool(session.preferences().sidebar_collapsed)
        )
    }
}
