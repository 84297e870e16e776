//! Helper functions for settings operations.

use crate::core::session::ChatSession;
use crate::core::settings::{Preferences, Settings};

use super::error::SettingError;

/// Applies `f` to a copy of the current settings and persists the result.
pub fn mutate_settings<F>(session: &mut ChatSession, f: F) -> Result<(), SettingError>
where
    F: FnOnce(&mut Settings),
{
    let mut settings = session.settings().clone();
    f(&mut settings);
    session.save_settings(settings)?;
    Ok(())
}

/// Applies `f` to a copy of the current preferences and persists the result.
pub fn mutate_preferences<F>(session: &mut ChatSession, f: F) -> Result<(), SettingError>
where
    F: FnOnce(&mut Preferences),
{
    let mut preferences = session.preferences();
    f(&mut preferences);
    session.save_preferences(preferences)?;
    Ok(())
}

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Format a boolean value for display.
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
