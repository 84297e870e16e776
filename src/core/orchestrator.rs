//! Builds the outbound request for one user turn.

use crate::api::ChatRequest;
use crate::core::attachment::{partition, Attachment};
use crate::core::message::{ContentPart, Message, MessageContent};
use crate::core::settings::{HistoryImages, Settings, MAX_TOKENS};

/// Text sent in place of an earlier turn's image when images are not resent.
pub const OMITTED_IMAGE_MARKER: &str = "[image omitted]";

/// Combines typed text with text attachments. Each document is introduced by
/// its file name; the typed text follows under a `User Message:` label.
pub fn combined_text(text: &str, documents: &[&Attachment]) -> String {
    if documents.is_empty() {
        return text.to_string();
    }

    let context = documents
        .iter()
        .map(|doc| format!("[File: {}]\n{}", doc.name, doc.payload))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{context}\n\nUser Message: {text}")
}

/// Builds the new user turn: the combined text part (if any) followed by one
/// image part per image attachment. Returns `None` when there is nothing to send.
pub fn compose_user_message(text: &str, attachments: &[Attachment]) -> Option<Message> {
    let text = text.trim();
    if text.is_empty() && attachments.is_empty() {
        return None;
    }

    let (images, documents) = partition(attachments);
    let mut parts = Vec::with_capacity(images.len() + 1);

    let combined = combined_text(text, &documents);
    if !combined.is_empty() {
        parts.push(ContentPart::text(combined));
    }
    parts.extend(images.iter().map(|image| ContentPart::image(image.payload.clone())));

    Some(Message::user_parts(parts))
}

/// Copy of an earlier turn with its images swapped for a text marker.
fn without_images(message: &Message) -> Message {
    match &message.content {
        MessageContent::Parts(parts) if parts.iter().any(ContentPart::is_image) => {
            let parts = parts
                .iter()
                .map(|part| match part {
                    ContentPart::ImageUrl { .. } => ContentPart::text(OMITTED_IMAGE_MARKER),
                    other => other.clone(),
                })
                .collect();
            Message::new(message.role, MessageContent::Parts(parts))
        }
        _ => message.clone(),
    }
}

/// `[system, ...history, new_message]`, capped at [`MAX_TOKENS`].
pub fn build_request(
    settings: &Settings,
    model: &str,
    history: &[Message],
    new_message: Message,
) -> ChatRequest {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(settings.system_prompt.clone()));
    match settings.history_images {
        HistoryImages::Resend => messages.extend(history.iter().cloned()),
        HistoryImages::Placeholder => messages.extend(history.iter().map(without_images)),
    }
    messages.push(new_message);

    ChatRequest {
        model: model.to_string(),
        messages,
        max_tokens: MAX_TOKENS,
    }
}
