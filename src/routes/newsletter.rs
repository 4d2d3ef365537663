use crate::clients::crm_client::{CrmClient, UpstreamError};
use crate::domain::{SubscriptionRequest, ValidationError};
use crate::notifications::NotificationSender;
use crate::utils::{ApiResponse, error_chain_fmt};
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, post, web};
use serde_json::{Map, Value};

pub const SUCCESS_MESSAGE: &str = "Registration completed successfully";
pub const INVALID_DATA_MESSAGE: &str = "Dados inválidos";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[post("/newsletter")]
#[tracing::instrument(
    name = "Registering a newsletter subscription",
    skip(request, body, crm_client, notification_sender),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn post(
    request: HttpRequest,
    body: Result<web::Bytes, actix_web::Error>,
    crm_client: web::Data<CrmClient>,
    notification_sender: web::Data<NotificationSender>,
) -> Result<HttpResponse, SubscribeError> {
    // Oversized or truncated bodies are reported like any other bad payload.
    let body = body.map_err(|e| ValidationError::UnreadablePayload(e.to_string()))?;
    let payload = decode_payload(request.content_type(), &body)?;
    let subscription = SubscriptionRequest::validate(&payload)?;
    tracing::Span::current().record(
        "subscriber_email",
        tracing::field::display(&subscription.email),
    );

    // Emails only go out once the CRM knows about the lead.
    let lead = crm_client.create_lead(&subscription.email).await?;

    let outcome = notification_sender.notify(&subscription.email).await;
    if !outcome.all_sent() {
        tracing::warn!(
            confirmation_sent = outcome.confirmation_sent,
            notification_sent = outcome.notification_sent,
            "Subscription registered but some emails could not be delivered."
        );
    }

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(ApiResponse::success(SUCCESS_MESSAGE, lead)))
}

/// Turns a JSON or form body into an untyped field map.
///
/// Media types are compared case-insensitively.
pub fn decode_payload(content_type: &str, body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    match content_type.to_ascii_lowercase().as_str() {
        "application/json" => serde_json::from_slice::<Map<String, Value>>(body)
            .map_err(|e| ValidationError::UnreadablePayload(e.to_string())),
        "application/x-www-form-urlencoded" => {
            let fields: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
                .map_err(|e| ValidationError::UnreadablePayload(e.to_string()))?;
            Ok(fields
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect())
        }
        other => Err(ValidationError::UnreadablePayload(format!(
            "unsupported content type `{}`",
            other
        ))),
    }
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(#[from] ValidationError),
    #[error("Failed to register the lead with the CRM.")]
    UpstreamError(#[from] UpstreamError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::UpstreamError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            SubscribeError::ValidationError(_) => {
                ApiResponse::failure(400, INVALID_DATA_MESSAGE, None)
            }
            SubscribeError::UpstreamError(e) => {
                ApiResponse::failure(500, INTERNAL_ERROR_MESSAGE, Some(e.to_string()))
            }
        };

        HttpResponse::build(self.status_code())
            .content_type(ContentType::json())
            .json(body)
    }
}
