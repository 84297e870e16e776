//! Settings management for the `set`, `unset` and `show` commands.
//!
//! Each stored value has a [`SettingHandler`]. Connection settings and
//! interface preferences share the same registry so `alokahub show` can list
//! everything in one place.

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::session::ChatSession;

/// Trait for handling a stored setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the key accepted on the command line.
    fn key(&self) -> &'static str;

    /// Set the value from the words following the key.
    ///
    /// Returns a success message to display, or an error.
    fn set(&self, args: &[String], session: &mut ChatSession) -> Result<String, SettingError>;

    /// Reset the value to its default.
    fn unset(&self, session: &mut ChatSession) -> Result<String, SettingError>;

    /// Format the current value for display in `alokahub show` output.
    fn format(&self, session: &ChatSession) -> String;
}
