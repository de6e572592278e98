use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use async_trait::async_trait;
use autoaid_gateway::{
    backend::mock::MockBackend,
    chat::{texts, ChatBot},
    delivery::{
        utf16_len, ChatId, ChatTransport, DeliveryError, DeliveryLimits, MessageFormat, MessageId,
    },
    metrics::AppMetrics,
    service::MechanicService,
};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Sent {
        id: MessageId,
        text: String,
        format: MessageFormat,
    },
    Deleted(MessageId),
}

#[derive(Default)]
struct RecordingTransport {
    next_id: AtomicI64,
    events: Mutex<Vec<Event>>,
    fail_deletes: bool,
}

impl RecordingTransport {
    async fn events(&self) -> Vec<Event> {
        self.events.lock().await.clone()
    }

    async fn sent_texts(&self) -> Vec<String> {
        self.events()
            .await
            .into_iter()
            .filter_map(|event| match event {
                Event::Sent { text, .. } => Some(text),
                Event::Deleted(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_message(
        &self,
        _chat_id: ChatId,
        text: &str,
        format: MessageFormat,
    ) -> Result<MessageId, DeliveryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.events.lock().await.push(Event::Sent {
            id,
            text: text.to_owned(),
            format,
        });
        Ok(id)
    }

    async fn delete_message(
        &self,
        _chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), DeliveryError> {
        self.events.lock().await.push(Event::Deleted(message_id));
        if self.fail_deletes {
            return Err(DeliveryError::Rejected(
                "Bad Request: message to delete not found".to_owned(),
            ));
        }
        Ok(())
    }
}

fn bot_with(
    backend: &MockBackend,
    transport: RecordingTransport,
    limits: DeliveryLimits,
) -> (ChatBot<RecordingTransport>, Arc<RecordingTransport>) {
    let transport = Arc::new(transport);
    let service = Arc::new(MechanicService::new(
        Arc::new(backend.clone()),
        Arc::new(AppMetrics::new()),
    ));
    (
        ChatBot::new(transport.clone(), service, limits),
        transport,
    )
}

#[tokio::test]
async fn placeholder_is_removed_before_single_reply() {
    let backend = MockBackend::replying("**Причина:** свечи");
    let (bot, transport) = bot_with(&backend, RecordingTransport::default(), DeliveryLimits::default());

    bot.handle_message(7, "/diagnose машина троит")
        .await
        .expect("handled");

    let events = transport.events().await;
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], Event::Sent { id: 1, format: MessageFormat::Markdown, .. }));
    assert_eq!(events[1], Event::Deleted(1));
    let Event::Sent { text, format, .. } = &events[2] else {
        panic!("expected final reply");
    };
    assert_eq!(*format, MessageFormat::Plain);
    assert!(text.starts_with("🚗 ДИАГНОСТИКА ПРОБЛЕМЫ"));
    assert!(text.ends_with("Причина: свечи"));
    assert_eq!(backend.generate_calls(), 1);
}

#[tokio::test]
async fn long_reply_is_split_into_header_and_ordered_chunks() {
    let body = (0..60)
        .map(|index| format!("Пункт {index}: проверить узел номер {index}"))
        .collect::<Vec<_>>()
        .join("\n");
    let backend = MockBackend::replying(body.clone());
    let limits = DeliveryLimits::new(400, 300).expect("valid limits");
    let (bot, transport) = bot_with(&backend, RecordingTransport::default(), limits);

    bot.handle_message(7, "/car_info Toyota Camry 2020")
        .await
        .expect("handled");

    let events = transport.events().await;
    assert_eq!(events[1], Event::Deleted(1));
    let replies = transport.sent_texts().await;
    let header = &replies[1];
    assert!(header.contains("📋 Модель: Toyota Camry 2020"));
    assert!(!header.contains("Пункт 0"));

    let chunks = &replies[2..];
    assert!(chunks.len() >= 2);
    assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 300));
    assert_eq!(chunks.concat(), body);
}

#[tokio::test]
async fn oversized_model_name_never_exceeds_chunk_limit() {
    let backend = MockBackend::replying("ответ 🔧");
    let limits = DeliveryLimits::new(400, 300).expect("valid limits");
    let (bot, transport) = bot_with(&backend, RecordingTransport::default(), limits);
    let model = "Toyota 🚙 ".repeat(60);

    bot.handle_message(7, &format!("/car_info {model}"))
        .await
        .expect("handled");

    let replies = transport.sent_texts().await;
    assert!(replies.len() > 3);
    assert!(replies[1..].iter().all(|reply| utf16_len(reply) <= 300));
    assert_eq!(
        replies[1..].concat(),
        format!("{}ответ 🔧", texts::reply_header(&autoaid_gateway::validate::car_info(&model).expect("valid")))
    );
}

#[tokio::test]
async fn backend_failure_removes_placeholder_then_reports() {
    let backend = MockBackend::failing();
    let (bot, transport) = bot_with(&backend, RecordingTransport::default(), DeliveryLimits::default());

    bot.handle_message(7, "/code P0301").await.expect("handled");

    let events = transport.events().await;
    assert_eq!(events.len(), 3);
    assert_eq!(events[1], Event::Deleted(1));
    let Event::Sent { text, .. } = &events[2] else {
        panic!("expected error reply");
    };
    assert_eq!(text, texts::failure(&autoaid_gateway::validate::obd_code("P0301").expect("valid")));
    assert!(!text.contains("mock backend"));
}

#[tokio::test]
async fn failed_placeholder_removal_does_not_block_reply() {
    let backend = MockBackend::replying("ответ");
    let transport = RecordingTransport {
        fail_deletes: true,
        ..RecordingTransport::default()
    };
    let (bot, transport) = bot_with(&backend, transport, DeliveryLimits::default());

    bot.handle_message(7, "/part_search колодки | BMW X5 2015")
        .await
        .expect("handled");

    let replies = transport.sent_texts().await;
    assert_eq!(replies.len(), 2);
    assert!(replies[1].contains("🔩 Деталь: колодки"));
    assert!(replies[1].ends_with("ответ"));
}

#[tokio::test]
async fn invalid_input_gets_hint_without_placeholder_or_backend_call() {
    let backend = MockBackend::default();
    let (bot, transport) = bot_with(&backend, RecordingTransport::default(), DeliveryLimits::default());

    bot.handle_message(7, "/code X9999").await.expect("handled");
    bot.handle_message(7, "/part_search фильтр Camry")
        .await
        .expect("handled");
    bot.handle_message(7, "/diagnose").await.expect("handled");

    let replies = transport.sent_texts().await;
    assert_eq!(replies.len(), 3);
    assert!(replies[0].contains("Неверный формат кода"));
    assert!(replies[1].contains("Неверный формат запроса"));
    assert!(replies[2].contains("Необходимо описание проблемы"));
    assert_eq!(backend.generate_calls(), 0);
}

#[tokio::test]
async fn unknown_command_and_plain_text_get_hints() {
    let backend = MockBackend::default();
    let (bot, transport) = bot_with(&backend, RecordingTransport::default(), DeliveryLimits::default());

    bot.handle_message(7, "/weather").await.expect("handled");
    bot.handle_message(7, "привет").await.expect("handled");

    let replies = transport.sent_texts().await;
    assert_eq!(replies, vec![texts::UNKNOWN_COMMAND, texts::COMMAND_HINT]);
    assert_eq!(backend.generate_calls(), 0);
}

#[tokio::test]
async fn status_reports_degraded_backend() {
    let backend = MockBackend::default().with_health(false);
    let (bot, transport) = bot_with(&backend, RecordingTransport::default(), DeliveryLimits::default());

    bot.handle_message(7, "/status").await.expect("handled");

    let replies = transport.sent_texts().await;
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("ИИ временно недоступен"));
}
