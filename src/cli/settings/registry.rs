//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{
    base_url_handler, history_images_handler, language_handler, model_handler,
    system_prompt_handler, theme_handler, ApiKeyHandler, SidebarCollapsedHandler,
};
use super::SettingHandler;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `alokahub show` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(base_url_handler()));
        registry.register(Box::new(ApiKeyHandler));
        registry.register(Box::new(model_handler()));
        registry.register(Box::new(system_prompt_handler()));
        registry.register(Box::new(history_images_handler()));
        registry.register(Box::new(language_handler()));
        registry.register(Box::new(theme_handler()));
        registry.register(Box::new(SidebarCollapsedHandler));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    /// Get a handler by key.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// Get all keys in display order.
    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
