use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

pub type ChatId = i64;
pub type MessageId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    Plain,
    Markdown,
}

/// Minimal surface a chat transport has to offer for replies and transient
/// notices.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        format: MessageFormat,
    ) -> Result<MessageId, DeliveryError>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId)
        -> Result<(), DeliveryError>;
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("transport rejected request: {0}")]
    Rejected(String),
}

/// Message size limits, measured in UTF-16 code units because that is how
/// Telegram counts its 4096-unit cap. Emoji take two units each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryLimits {
    /// Largest message (header included) sent as one unit.
    pub single_max: usize,
    /// Largest body chunk once a reply has to be split.
    pub chunk_max: usize,
}

impl Default for DeliveryLimits {
    fn default() -> Self {
        Self {
            single_max: 4000,
            chunk_max: 3500,
        }
    }
}

impl DeliveryLimits {
    /// `chunk_max` has to fit any single character, so it is at least 2.
    pub fn new(single_max: usize, chunk_max: usize) -> Option<Self> {
        if chunk_max < 2 || chunk_max > single_max {
            return None;
        }
        Some(Self {
            single_max,
            chunk_max,
        })
    }
}

pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryPlan {
    Single(String),
    Split { header: String, chunks: Vec<String> },
}

impl DeliveryPlan {
    pub fn build(header: &str, body: &str, limits: DeliveryLimits) -> Self {
        let total = utf16_len(header) + utf16_len(body);
        if total <= limits.single_max {
            return Self::Single(format!("{header}{body}"));
        }

        // An oversized header is cut like the body; its overflow goes out
        // ahead of the body chunks.
        let mut header_parts = split_body(header, limits.chunk_max).into_iter();
        let first = header_parts.next().unwrap_or_default();
        Self::Split {
            header: first,
            chunks: header_parts
                .chain(split_body(body, limits.chunk_max))
                .collect(),
        }
    }

    pub fn units(&self) -> Vec<&str> {
        match self {
            Self::Single(text) => vec![text.as_str()],
            Self::Split { header, chunks } => std::iter::once(header.as_str())
                .filter(|header| !header.is_empty())
                .chain(chunks.iter().map(String::as_str))
                .collect(),
        }
    }
}

/// Greedy split preferring newline boundaries. A window without any newline
/// is hard-cut at `chunk_max` UTF-16 units, always on a character boundary.
/// Concatenating the result yields `body` unchanged.
pub fn split_body(body: &str, chunk_max: usize) -> Vec<String> {
    let chunk_max = chunk_max.max(1);
    let mut chunks = Vec::new();
    let mut rest = body;

    while !rest.is_empty() {
        let Some(window_end) = window_end(rest, chunk_max) else {
            chunks.push(rest.to_owned());
            break;
        };

        let window = &rest[..window_end];
        let cut = match window.rfind('\n') {
            Some(index) if index > 0 => index + 1,
            _ => window_end,
        };

        chunks.push(rest[..cut].to_owned());
        rest = &rest[cut..];
    }

    chunks
}

/// Byte offset where `text` first exceeds `max_units`, or `None` when all
/// of it fits. Never zero: a lone character wider than the window is taken
/// whole.
fn window_end(text: &str, max_units: usize) -> Option<usize> {
    let mut units = 0;
    for (index, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > max_units {
            return Some(if index == 0 { ch.len_utf8() } else { index });
        }
    }
    None
}

/// Handle to a transient "processing" notice. Released at most once;
/// failures to remove it are logged and otherwise ignored.
#[derive(Debug)]
pub struct Placeholder {
    chat_id: ChatId,
    message_id: Option<MessageId>,
}

impl Placeholder {
    pub async fn post<T>(transport: &T, chat_id: ChatId, text: &str) -> Self
    where
        T: ChatTransport + ?Sized,
    {
        let message_id = match transport
            .send_message(chat_id, text, MessageFormat::Markdown)
            .await
        {
            Ok(message_id) => Some(message_id),
            Err(error) => {
                warn!(chat_id, error = %error, "failed to post processing notice");
                None
            }
        };

        Self {
            chat_id,
            message_id,
        }
    }

    pub fn is_active(&self) -> bool {
        self.message_id.is_some()
    }

    pub async fn release<T>(&mut self, transport: &T)
    where
        T: ChatTransport + ?Sized,
    {
        let Some(message_id) = self.message_id.take() else {
            return;
        };

        if let Err(error) = transport.delete_message(self.chat_id, message_id).await {
            warn!(
                chat_id = self.chat_id,
                message_id,
                error = %error,
                "failed to remove processing notice"
            );
        }
    }
}

/// Removes the placeholder, then sends every unit in order. The first failed
/// send aborts the rest.
pub async fn deliver<T>(
    transport: &T,
    chat_id: ChatId,
    placeholder: &mut Placeholder,
    plan: &DeliveryPlan,
) -> Result<usize, DeliveryError>
where
    T: ChatTransport + ?Sized,
{
    placeholder.release(transport).await;

    let units = plan.units();
    let total = units.len();
    for (index, unit) in units.into_iter().enumerate() {
        if let Err(error) = transport
            .send_message(chat_id, unit, MessageFormat::Plain)
            .await
        {
            warn!(
                chat_id,
                unit = index,
                total,
                error = %error,
                "delivery aborted"
            );
            return Err(error);
        }
    }

    debug!(chat_id, units = total, "reply delivered");
    Ok(total)
}
