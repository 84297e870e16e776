use serde::{Deserialize, Serialize};

pub const ERROR_PREFIX: &str = "**Error:**";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(format!("invalid message role: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One unit of a multimodal message, in the chat-completions wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(value: impl Into<String>) -> Self {
        ContentPart::Text { text: value.into() }
    }

    /// `url` is expected to be a base64 data URL.
    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ContentPart::ImageUrl { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    pub fn parts(&self) -> Option<&[ContentPart]> {
        match self {
            MessageContent::Text(_) => None,
            MessageContent::Parts(parts) => Some(parts),
        }
    }
}

/// A single conversation turn. Messages are never edited once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn new(role: Role, content: MessageContent) -> Self {
        Self { role, content }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, MessageContent::Text(content.into()))
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self::new(Role::User, MessageContent::Parts(parts))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, MessageContent::Text(content.into()))
    }

    /// Synthetic assistant turn used to surface a failed request in the transcript.
    pub fn assistant_error(message: impl AsRef<str>) -> Self {
        Self::assistant(format!("{ERROR_PREFIX} {}", message.as_ref()))
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    pub fn image_count(&self) -> usize {
        self.content
            .parts()
            .map(|parts| parts.iter().filter(|part| part.is_image()).count())
            .unwrap_or(0)
    }

    /// Text of the message with image parts left out.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_parts_use_wire_shape() {
        let message = Message::user_parts(vec![
            ContentPart::text("Hello"),
            ContentPart::image("data:image/png;base64,AAAA"),
        ]);

        let value = serde_json::to_value(&message).expect("serialize message");
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "Hello"},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
                ]
            })
        );
    }

    #[test]
    fn plain_text_content_stays_a_string() {
        let value = serde_json::to_value(Message::assistant("Hi")).expect("serialize");
        assert_eq!(value, json!({"role": "assistant", "content": "Hi"}));

        let parsed: Message =
            serde_json::from_value(json!({"role": "system", "content": "Be brief"}))
                .expect("parse");
        assert_eq!(parsed, Message::system("Be brief"));
    }

    #[test]
    fn invalid_roles_are_rejected() {
        assert!(Role::try_from("app/info").is_err());
        let parsed = serde_json::from_str::<Message>(r#"{"role":"tool","content":"x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn assistant_error_is_prefixed() {
        assert_eq!(
            Message::assistant_error("bad key").content,
            MessageContent::Text("**Error:** bad key".to_string())
        );
    }

    #[test]
    fn text_skips_images() {
        let message = Message::user_parts(vec![
            ContentPart::text("first"),
            ContentPart::image("data:image/gif;base64,R0lG"),
            ContentPart::text("second"),
        ]);
        assert_eq!(message.text(), "first\nsecond");
        assert_eq!(message.image_count(), 1);
    }
}
