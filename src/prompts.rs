use crate::models::RequestKind;

const PERSONA: &str = "Ты опытный автомеханик с 20-летним стажем. \
Отвечай на русском языке, кратко и по делу, без лишних вступлений.";

pub fn build_prompt(kind: &RequestKind) -> String {
    match kind {
        RequestKind::Diagnose { problem } => diagnose_prompt(problem),
        RequestKind::DecodeCode { code } => obd_code_prompt(code),
        RequestKind::PartSearch {
            part_name,
            car_model,
        } => part_search_prompt(part_name, car_model),
        RequestKind::CarInfo { car_model } => car_info_prompt(car_model),
    }
}

fn diagnose_prompt(problem: &str) -> String {
    format!(
        "{PERSONA}\n\n\
Клиент описывает проблему с автомобилем: \"{problem}\"\n\n\
Дай ответ строго в следующей структуре:\n\
Вероятные причины: перечисли от наиболее к наименее вероятной.\n\
Что проверить: конкретные шаги диагностики.\n\
Срочность: можно ли продолжать эксплуатацию.\n\
Примерная стоимость ремонта: диапазон в рублях."
    )
}

fn obd_code_prompt(code: &str) -> String {
    format!(
        "{PERSONA}\n\n\
Расшифруй код ошибки OBD-II: {code}\n\n\
Дай ответ строго в следующей структуре:\n\
Значение кода: что означает ошибка.\n\
Возможные причины: перечисли основные.\n\
Симптомы: как проявляется неисправность.\n\
Рекомендации: что проверить и как устранить.\n\
Примерная стоимость ремонта: диапазон в рублях."
    )
}

fn part_search_prompt(part_name: &str, car_model: &str) -> String {
    format!(
        "{PERSONA}\n\n\
Подбери запчасть \"{part_name}\" для автомобиля {car_model}.\n\n\
Дай ответ строго в следующей структуре:\n\
Оригинальные номера: каталожные номера производителя, если известны.\n\
Аналоги: 3-5 проверенных производителей с примерными ценами в рублях.\n\
На что обратить внимание: совместимость по годам и комплектациям.\n\
Рекомендация: какой вариант выбрать и почему."
    )
}

fn car_info_prompt(car_model: &str) -> String {
    format!(
        "{PERSONA}\n\n\
Расскажи об автомобиле {car_model}.\n\n\
Дай ответ строго в следующей структуре:\n\
Основные характеристики: двигатели, коробки передач, привод.\n\
Типичные проблемы: слабые места модели.\n\
Стоимость обслуживания: примерные цены на ТО в рублях.\n\
Цена на вторичном рынке: диапазон в рублях.\n\
Вердикт: стоит ли покупать."
    )
}
