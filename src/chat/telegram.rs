//! Telegram Bot API transport: long-polling `getUpdates` plus the two calls
//! replies need, `sendMessage` and `deleteMessage`.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::{
    chat::ChatBot,
    config::TelegramConfig,
    delivery::{ChatId, ChatTransport, DeliveryError, MessageFormat, MessageId},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    endpoint: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().build().map_err(|error| {
            DeliveryError::Transport(format!("failed to build Telegram HTTP client: {error}"))
        })?;

        Ok(Self {
            client,
            endpoint: format!("{}/bot{}", config.api_url, config.token),
            poll_timeout: config.poll_timeout,
        })
    }

    pub async fn get_me(&self) -> Result<BotUser, DeliveryError> {
        self.call("getMe", &serde_json::json!({}), REQUEST_TIMEOUT)
            .await
    }

    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, DeliveryError> {
        let payload = GetUpdates {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: &["message"],
        };
        // the HTTP timeout has to outlive the server-side long poll
        self.call("getUpdates", &payload, self.poll_timeout + REQUEST_TIMEOUT)
            .await
    }

    async fn call<P, R>(&self, method: &str, payload: &P, timeout: Duration) -> Result<R, DeliveryError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.endpoint))
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(|error| DeliveryError::Transport(error.without_url().to_string()))?;

        let status = response.status();
        let envelope: ApiEnvelope<R> = response.json().await.map_err(|error| {
            DeliveryError::Transport(format!(
                "{method}: status {}: {}",
                status.as_u16(),
                error.without_url()
            ))
        })?;

        match envelope {
            ApiEnvelope {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiEnvelope { description, .. } => Err(DeliveryError::Rejected(format!(
                "{method}: {}",
                description.unwrap_or_else(|| format!("status {}", status.as_u16()))
            ))),
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        format: MessageFormat,
    ) -> Result<MessageId, DeliveryError> {
        let payload = SendMessage {
            chat_id,
            text,
            parse_mode: match format {
                MessageFormat::Plain => None,
                MessageFormat::Markdown => Some("Markdown"),
            },
        };
        let sent: SentMessage = self.call("sendMessage", &payload, REQUEST_TIMEOUT).await?;
        Ok(sent.message_id)
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), DeliveryError> {
        let payload = DeleteMessage {
            chat_id,
            message_id,
        };
        let _: bool = self
            .call("deleteMessage", &payload, REQUEST_TIMEOUT)
            .await?;
        Ok(())
    }
}

/// Polls for updates until the task is dropped. Each message is handled in
/// its own task so a failing update never stalls or stops the loop.
pub async fn run_polling(bot: Arc<ChatBot<TelegramClient>>) {
    let client = bot.transport().clone();
    match client.get_me().await {
        Ok(me) => info!(
            bot_id = me.id,
            username = %me.username.as_deref().unwrap_or_default(),
            "telegram bot started"
        ),
        Err(error) => warn!(error = %error, "telegram getMe failed, polling anyway"),
    }

    let mut offset: Option<i64> = None;
    loop {
        let updates = match client.get_updates(offset).await {
            Ok(updates) => updates,
            Err(error) => {
                warn!(error = %error, "telegram getUpdates failed");
                sleep(POLL_RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            let Some((chat_id, text)) = update
                .message
                .and_then(|message| message.text.map(|text| (message.chat.id, text)))
            else {
                continue;
            };

            let bot = bot.clone();
            let update_id = update.update_id;
            tokio::spawn(async move {
                if let Err(error) = bot.handle_message(chat_id, &text).await {
                    error!(update_id, chat_id, error = %error, "failed to handle update");
                }
            });
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<R> {
    ok: bool,
    result: Option<R>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdates<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: ChatId,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct DeleteMessage {
    chat_id: ChatId,
    message_id: MessageId,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: MessageId,
}

#[derive(Debug, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub message_id: MessageId,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}
