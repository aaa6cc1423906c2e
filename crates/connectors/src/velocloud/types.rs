use model::{core::timestamp::Timestamp, core::window::TimeWindow, records::record::LogRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login used to open a portal session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Operator accounts log in through a different route.
    pub operator: bool,
}

impl Credentials {
    pub fn enterprise(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
            operator: false,
        }
    }

    pub fn operator(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            operator: true,
            ..Credentials::enterprise(username, password)
        }
    }

    pub(crate) fn login_path(&self) -> &'static str {
        if self.operator {
            "login/operatorLogin"
        } else {
            "login/enterpriseLogin"
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("operator", &self.operator)
            .finish()
    }
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageRequest {
    pub enterprise_id: i64,
    pub interval: Interval,
}

#[derive(Debug, Serialize)]
pub(crate) struct Interval {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl PageRequest {
    pub fn new(enterprise_id: i64, window: &TimeWindow) -> Self {
        PageRequest {
            enterprise_id,
            interval: Interval {
                start: window.start(),
                end: window.end(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageResponse {
    #[serde(default)]
    pub data: Option<Vec<LogRecord>>,
    #[serde(default, rename = "metaData")]
    pub meta_data: Option<MetaData>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MetaData {
    #[serde(default)]
    pub more: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message.as_deref().unwrap_or("unknown error");
        match self.code {
            Some(code) => write!(f, "{message} (code {code})"),
            None => f.write_str(message),
        }
    }
}
