pub mod commands;
pub mod telegram;
pub mod texts;

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    delivery::{
        deliver, ChatId, ChatTransport, DeliveryError, DeliveryLimits, DeliveryPlan,
        MessageFormat, Placeholder,
    },
    models::RequestKind,
    service::MechanicService,
    validate::{self, ValidationError},
};

use self::commands::Command;

/// Chat-command adapter over the shared [`MechanicService`].
pub struct ChatBot<T: ChatTransport> {
    transport: Arc<T>,
    service: Arc<MechanicService>,
    limits: DeliveryLimits,
}

impl<T: ChatTransport> ChatBot<T> {
    pub fn new(transport: Arc<T>, service: Arc<MechanicService>, limits: DeliveryLimits) -> Self {
        Self {
            transport,
            service,
            limits,
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub async fn handle_message(&self, chat_id: ChatId, text: &str) -> Result<(), DeliveryError> {
        let command = commands::parse(text);
        debug!(chat_id, ?command, "chat message received");

        match command {
            Command::Start => self.reply(chat_id, texts::START, MessageFormat::Markdown).await,
            Command::Help => self.reply(chat_id, texts::HELP, MessageFormat::Markdown).await,
            Command::Status => {
                let status = self.service.status().await;
                info!(chat_id, ?status, "status requested");
                self.reply(chat_id, texts::status(status), MessageFormat::Plain)
                    .await
            }
            Command::Diagnose(args) => {
                self.handle_request(chat_id, validate::diagnose(&args)).await
            }
            Command::Code(args) => self.handle_request(chat_id, validate::obd_code(&args)).await,
            Command::PartSearch(args) => {
                self.handle_request(chat_id, validate::part_search(&args))
                    .await
            }
            Command::CarInfo(args) => self.handle_request(chat_id, validate::car_info(&args)).await,
            Command::Unknown(name) => {
                debug!(chat_id, command = %name, "unknown command");
                self.reply(chat_id, texts::UNKNOWN_COMMAND, MessageFormat::Markdown)
                    .await
            }
            Command::Text => {
                self.reply(chat_id, texts::COMMAND_HINT, MessageFormat::Markdown)
                    .await
            }
        }
    }

    async fn handle_request(
        &self,
        chat_id: ChatId,
        kind: Result<RequestKind, ValidationError>,
    ) -> Result<(), DeliveryError> {
        let kind = match kind {
            Ok(kind) => kind,
            Err(error) => {
                debug!(chat_id, error = %error, "command rejected by validation");
                let text = texts::validation(&error);
                return self.reply(chat_id, &text, MessageFormat::Markdown).await;
            }
        };

        let transport = self.transport.as_ref();
        let mut placeholder =
            Placeholder::post(transport, chat_id, texts::processing_notice(&kind)).await;

        match self.service.handle(&kind).await {
            Ok(body) => {
                let plan = DeliveryPlan::build(&texts::reply_header(&kind), &body, self.limits);
                deliver(transport, chat_id, &mut placeholder, &plan).await?;
                Ok(())
            }
            Err(_) => {
                placeholder.release(transport).await;
                self.reply(chat_id, texts::failure(&kind), MessageFormat::Markdown)
                    .await
            }
        }
    }

    async fn reply(
        &self,
        chat_id: ChatId,
        text: &str,
        format: MessageFormat,
    ) -> Result<(), DeliveryError> {
        self.transport
            .send_message(chat_id, text, format)
            .await
            .map(|_| ())
    }
}
