use crate::{
    models::{BackendStatus, RequestKind},
    validate::ValidationError,
};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

pub const START: &str = "👋 *Привет! Я AutoAid* - твой виртуальный помощник-механик!\n\n\
━━━━━━━━━━━━━━━━━━━━\n\n\
🚗 *Я помогу тебе с:*\n\n\
🔍 Диагностикой проблем автомобиля\n\
📟 Расшифровкой кодов ошибок OBD-II\n\
🔧 Подбором запчастей с ценами\n\
📋 Информацией об автомобилях\n\n\
━━━━━━━━━━━━━━━━━━━━\n\n\
💡 Используй /help для списка всех команд";

pub const HELP: &str = "🛠 *ДОСТУПНЫЕ КОМАНДЫ*

━━━━━━━━━━━━━━━━━━━━

🔍 *Диагностика проблем*
/diagnose <описание проблемы>

📝 Пример:
`/diagnose машина троит на холодную`
`/diagnose стук в передней подвеске`

━━━━━━━━━━━━━━━━━━━━

📟 *Расшифровка OBD-II кодов*
/code <код ошибки>

📝 Пример:
`/code P0420`
`/code P0301`

━━━━━━━━━━━━━━━━━━━━

🔧 *Подбор запчастей*
/part\\_search <деталь> | <авто>

📝 Пример:
`/part_search масляный фильтр | Toyota Camry 2020`
`/part_search тормозные колодки | BMW X5 2015`

━━━━━━━━━━━━━━━━━━━━

🚗 *Информация об автомобиле*
/car\\_info <марка модель год>

📝 Пример:
`/car_info Toyota Camry 2020`
`/car_info BMW X5 E70`

━━━━━━━━━━━━━━━━━━━━

📊 *Проверить статус бота*
/status

━━━━━━━━━━━━━━━━━━━━

💬 Просто отправь команду с нужными параметрами!";

pub const UNKNOWN_COMMAND: &str = "❌ *Неизвестная команда*\n\n\
━━━━━━━━━━━━━━━━━━━━\n\n\
💡 Используй /help для списка доступных команд";

pub const COMMAND_HINT: &str = "💡 *Чтобы я мог помочь, используй команды:*\n\n\
━━━━━━━━━━━━━━━━━━━━\n\n\
🔍 /diagnose - диагностика проблемы\n\
📟 /code - расшифровка кода ошибки\n\
🔧 /part\\_search - подбор запчастей\n\
🚗 /car\\_info - информация об авто\n\n\
━━━━━━━━━━━━━━━━━━━━\n\n\
📖 Или напиши /help для подробной справки";

pub fn status(status: BackendStatus) -> &'static str {
    match status {
        BackendStatus::Ok => "✅ Бот работает нормально!\n🤖 ИИ подключен и готов к работе.",
        BackendStatus::Offline => {
            "⚠️ Бот работает, но ИИ временно недоступен.\nПопробуйте позже."
        }
    }
}

pub fn validation(error: &ValidationError) -> String {
    match error {
        ValidationError::EmptyProblem => format!(
            "❌ *Необходимо описание проблемы!*\n\n{RULE}\n\n\
📝 *Формат:*\n/diagnose <описание проблемы>\n\n\
✅ *Примеры:*\n\
• `/diagnose машина не заводится в мороз`\n\
• `/diagnose стук в передней подвеске`\n\
• `/diagnose троит двигатель на холостых`"
        ),
        ValidationError::EmptyCode => format!(
            "❌ *Необходим код ошибки!*\n\n{RULE}\n\n\
📝 *Формат:*\n/code <код ошибки>\n\n\
✅ *Примеры:*\n\
• `/code P0420`\n\
• `/code P0301`\n\
• `/code C1234`"
        ),
        ValidationError::InvalidCodeFormat => format!(
            "⚠️ *Неверный формат кода!*\n\n{RULE}\n\n\
OBD-II коды имеют формат:\n\
• Первая буква: P, C, B или U\n\
• Затем 4 цифры\n\n\
✅ *Правильные примеры:*\n\
P0420, C1234, B0001, U0100"
        ),
        ValidationError::EmptyPartQuery => format!(
            "❌ *Необходимы данные для поиска!*\n\n{RULE}\n\n\
📝 *Формат:*\n/part\\_search <деталь> | <авто>\n\n\
✅ *Примеры:*\n\
• `/part_search масляный фильтр | Toyota Camry 2020`\n\
• `/part_search тормозные колодки | BMW X5 2015`\n\
• `/part_search свечи зажигания | Honda Accord 2018`"
        ),
        ValidationError::PartQueryFormat => format!(
            "⚠️ *Неверный формат запроса!*\n\n{RULE}\n\n\
📝 Используй разделитель \"|\" между деталью и авто:\n\n\
✅ *Правильно:*\n\
`/part_search масляный фильтр | Toyota Camry 2020`"
        ),
        ValidationError::EmptyPartField => format!(
            "⚠️ *Заполните оба поля!*\n\n{RULE}\n\n\
Укажи и название детали, и модель авто\n\n\
✅ *Пример:*\n\
`/part_search тормозные диски | Mazda 3 2019`"
        ),
        ValidationError::EmptyCarModel => format!(
            "❌ *Необходима модель автомобиля!*\n\n{RULE}\n\n\
📝 *Формат:*\n/car\\_info <марка модель год>\n\n\
✅ *Примеры:*\n\
• `/car_info Toyota Camry 2020`\n\
• `/car_info BMW X5 E70`\n\
• `/car_info Honda Accord 2018`\n\
• `/car_info Volkswagen Passat B8`"
        ),
        ValidationError::MalformedBody(_) => UNKNOWN_COMMAND.to_owned(),
    }
}

pub fn processing_notice(kind: &RequestKind) -> &'static str {
    match kind {
        RequestKind::Diagnose { .. } => {
            "🔄 *Анализирую проблему...*\n⏳ Это может занять некоторое время."
        }
        RequestKind::DecodeCode { .. } => "🔄 *Расшифровываю код ошибки...*\n⏳ Подождите немного!",
        RequestKind::PartSearch { .. } => {
            "🔄 *Подбираю запчасти...*\n⏳ Анализирую совместимость и цены"
        }
        RequestKind::CarInfo { .. } => {
            "🔄 *Собираю информацию об автомобиле...*\n⏳ Анализирую характеристики, цены и проблемы"
        }
    }
}

/// Title and request metadata placed above the generated body. Sent as plain
/// text together with the body, so it carries no markup.
pub fn reply_header(kind: &RequestKind) -> String {
    match kind {
        RequestKind::Diagnose { .. } => format!("🚗 ДИАГНОСТИКА ПРОБЛЕМЫ\n\n{RULE}\n\n"),
        RequestKind::DecodeCode { code } => {
            format!("📟 РАСШИФРОВКА OBD-II КОДА\n\n{RULE}\n\n🔢 Код: {code}\n\n")
        }
        RequestKind::PartSearch {
            part_name,
            car_model,
        } => format!(
            "🔧 ПОДБОР ЗАПЧАСТЕЙ\n\n{RULE}\n\n🚗 Автомобиль: {car_model}\n🔩 Деталь: {part_name}\n\n{RULE}\n\n"
        ),
        RequestKind::CarInfo { car_model } => {
            format!("🚗 ИНФОРМАЦИЯ ОБ АВТОМОБИЛЕ\n\n{RULE}\n\n📋 Модель: {car_model}\n\n{RULE}\n\n")
        }
    }
}

pub fn failure(kind: &RequestKind) -> &'static str {
    match kind {
        RequestKind::Diagnose { .. } => {
            "❌ *Ошибка при обработке запроса*\n\nУбедитесь, что Ollama запущена и попробуйте снова."
        }
        RequestKind::DecodeCode { .. } => "❌ *Ошибка при расшифровке кода*\nПопробуйте позже.",
        RequestKind::PartSearch { .. } => "❌ *Ошибка при поиске запчастей*\nПопробуйте позже.",
        RequestKind::CarInfo { .. } => "❌ *Ошибка при получении информации*\nПопробуйте позже.",
    }
}
