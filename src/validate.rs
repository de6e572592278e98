use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::models::RequestKind;

/// Rejections raised before any backend call. The display text is safe to
/// show to end users as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Необходимо описание проблемы")]
    EmptyProblem,
    #[error("Необходим код ошибки")]
    EmptyCode,
    #[error("Неверный формат кода")]
    InvalidCodeFormat,
    #[error("Необходимы данные для поиска")]
    EmptyPartQuery,
    #[error("Неверный формат запроса: используйте разделитель \"|\" между деталью и авто")]
    PartQueryFormat,
    #[error("Необходимы название детали и модель авто")]
    EmptyPartField,
    #[error("Необходима модель автомобиля")]
    EmptyCarModel,
    #[error("Некорректное тело запроса: {0}")]
    MalformedBody(String),
}

fn obd_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[PCBU][0-9]{4}$").expect("valid OBD-II pattern"))
}

pub fn diagnose(input: &str) -> Result<RequestKind, ValidationError> {
    let problem = input.trim();
    if problem.is_empty() {
        return Err(ValidationError::EmptyProblem);
    }
    Ok(RequestKind::diagnose(problem.to_owned()))
}

pub fn car_info(input: &str) -> Result<RequestKind, ValidationError> {
    let car_model = input.trim();
    if car_model.is_empty() {
        return Err(ValidationError::EmptyCarModel);
    }
    Ok(RequestKind::car_info(car_model.to_owned()))
}

/// Uppercases the input before matching, so `p0420` is accepted as `P0420`.
pub fn obd_code(input: &str) -> Result<RequestKind, ValidationError> {
    let code = input.trim().to_uppercase();
    if code.is_empty() {
        return Err(ValidationError::EmptyCode);
    }
    if !obd_code_pattern().is_match(&code) {
        return Err(ValidationError::InvalidCodeFormat);
    }
    Ok(RequestKind::decode_code(code))
}

/// Chat form: `<part> | <car>`.
pub fn part_search(query: &str) -> Result<RequestKind, ValidationError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ValidationError::EmptyPartQuery);
    }

    let fields = query.split('|').map(str::trim).collect::<Vec<_>>();
    let [part_name, car_model] = fields.as_slice() else {
        return Err(ValidationError::PartQueryFormat);
    };

    part_fields(Some(part_name), Some(car_model))
}

/// HTTP form: the two fields arrive separately.
pub fn part_fields(
    part_name: Option<&str>,
    car_model: Option<&str>,
) -> Result<RequestKind, ValidationError> {
    let part_name = part_name.map(str::trim).unwrap_or_default();
    let car_model = car_model.map(str::trim).unwrap_or_default();
    if part_name.is_empty() || car_model.is_empty() {
        return Err(ValidationError::EmptyPartField);
    }
    Ok(RequestKind::part_search(
        part_name.to_owned(),
        car_model.to_owned(),
    ))
}
