use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};

/// Trimmed, non-empty user input. Only the validators in
/// [`crate::validate`] can create one.
///
/// ```compile_fail
/// use autoaid_gateway::models::{InputText, RequestKind};
///
/// let kind = RequestKind::Diagnose {
///     problem: InputText(String::new()),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputText(String);

impl InputText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for InputText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for InputText {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for InputText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A fully validated user request. Its fields are [`InputText`], so a
/// kind with an empty field cannot be built outside this crate's
/// validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Diagnose { problem: InputText },
    DecodeCode { code: InputText },
    PartSearch { part_name: InputText, car_model: InputText },
    CarInfo { car_model: InputText },
}

impl RequestKind {
    pub(crate) fn diagnose(problem: String) -> Self {
        Self::Diagnose {
            problem: InputText(problem),
        }
    }

    pub(crate) fn decode_code(code: String) -> Self {
        Self::DecodeCode {
            code: InputText(code),
        }
    }

    pub(crate) fn part_search(part_name: String, car_model: String) -> Self {
        Self::PartSearch {
            part_name: InputText(part_name),
            car_model: InputText(car_model),
        }
    }

    pub(crate) fn car_info(car_model: String) -> Self {
        Self::CarInfo {
            car_model: InputText(car_model),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Diagnose { .. } => "diagnose",
            Self::DecodeCode { .. } => "code",
            Self::PartSearch { .. } => "part_search",
            Self::CarInfo { .. } => "car_info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub raw_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnoseRequest {
    #[serde(default)]
    pub problem: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeRequest {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartSearchRequest {
    #[serde(default)]
    pub part_name: Option<String>,
    #[serde(default)]
    pub car_model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInfoRequest {
    #[serde(default)]
    pub car_model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub result: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Ok,
    Offline,
}

impl BackendStatus {
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: BackendStatus,
}
