//! Model listing functionality

use crate::core::session::ChatSession;
use crate::core::settings::BUILTIN_MODELS;

pub(crate) fn format_models(session: &ChatSession) -> String {
    let saved_default = session.settings().model.as_str();
    let mut output = String::from("Built-in models:\n");

    for model in BUILTIN_MODELS {
        let marker = if *model == saved_default { "*" } else { " " };
        output.push_str(&format!("{marker} {model}\n"));
    }

    if !BUILTIN_MODELS.contains(&saved_default) {
        output.push_str(&format!("* {saved_default} (custom)\n"));
    }
    if session.model() != saved_default {
        output.push_str(&format!("\nThis run uses: {}\n", session.model()));
    }
    output.push_str("\nChange the default with 'alokahub set model <MODEL>'.\n");
    output
}

pub fn list_models(session: &ChatSession) {
    print!("{}", format_models(session));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::Settings;
    use crate::core::store::MemoryStore;

    fn session() -> ChatSession {
        ChatSession::load(Box::new(MemoryStore::new())).expect("session loads")
    }

    #[test]
    fn default_model_is_marked() {
        let output = format_models(&session());
        assert!(output.contains("* gemini-3-flash\n"));
        assert!(output.contains("  gpt-5-mini\n"));
        assert!(!output.contains("This run uses"));
    }

    #[test]
    fn custom_default_and_override_are_listed() {
        let mut session = session();
        let settings = Settings {
            model: "my-finetune".to_string(),
            ..session.settings().clone()
        };
        session.save_settings(settings).expect("save");
        session.set_model("deepseek-v3.2");

        let output = format_models(&session);
        assert!(output.contains("* my-finetune (custom)\n"));
        assert!(output.contains("This run uses: deepseek-v3.2"));
    }
}
