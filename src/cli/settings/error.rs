//! Error types for settings operations.

use std::fmt;

use crate::core::store::StoreError;

/// Errors that can occur when modifying stored settings.
#[derive(Debug)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// The value is not one of the accepted choices.
    InvalidValue { key: &'static str, message: String },
    /// The provided value could not be parsed as a boolean.
    InvalidBoolean(String),
    /// Required arguments are missing.
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
    /// An error occurred while persisting the change.
    Store(StoreError),
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown setting: {key}");
                eprintln!("   Run 'alokahub show' to list settings.");
            }
            SettingError::InvalidValue { key, message } => {
                eprintln!("❌ Invalid value for {key}: {message}");
            }
            SettingError::InvalidBoolean(input) => {
                eprintln!("❌ Invalid boolean value: {input}");
                eprintln!("   Use 'on' or 'off' (also accepts true/false, yes/no)");
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
            SettingError::Store(err) => {
                eprintln!("❌ Failed to save settings: {err}");
            }
        }
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown setting: {key}"),
            SettingError::InvalidValue { key, message } => {
                write!(f, "Invalid value for {key}: {message}")
            }
            SettingError::InvalidBoolean(input) => write!(f, "Invalid boolean value: {input}"),
            SettingError::MissingArgs { hint, .. } => write!(f, "{hint}"),
            SettingError::Store(err) => write!(f, "Store error: {err}"),
        }
    }
}

impl std::error::Error for SettingError {}

impl From<StoreError> for SettingError {
    fn from(err: StoreError) -> Self {
        SettingError::Store(err)
    }
}
