use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The JSON envelope every `/newsletter` response is wrapped in.
///
/// The HTTP status of the response mirrors `status_code`.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn success(message: &str, data: Value) -> Self {
        Self {
            status_code: 200,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(status_code: u16, message: &str, error: Option<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            data: None,
            error,
        }
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;

    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}
