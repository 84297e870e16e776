#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Payload is a base64 data URL.
    Image,
    /// Payload is extracted plain text.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub kind: AttachmentKind,
    pub payload: String,
}

impl Attachment {
    pub fn image(name: impl Into<String>, data_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttachmentKind::Image,
            payload: data_url.into(),
        }
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttachmentKind::Text,
            payload: text.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind == AttachmentKind::Image
    }
}

/// Files waiting to be sent with the next user turn.
#[derive(Debug, Default, Clone)]
pub struct PendingAttachments {
    items: Vec<Attachment>,
}

impl PendingAttachments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attachment: Attachment) {
        self.items.push(attachment);
    }

    /// Removes the first attachment with the given name.
    pub fn remove(&mut self, name: &str) -> Option<Attachment> {
        let index = self.items.iter().position(|item| item.name == name)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn take(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.items.iter()
    }
}

/// Splits attachments into (images, documents), keeping their relative order.
pub fn partition(attachments: &[Attachment]) -> (Vec<&Attachment>, Vec<&Attachment>) {
    attachments.iter().partition(|item| item.is_image())
}
