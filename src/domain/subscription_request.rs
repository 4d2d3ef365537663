use crate::domain::SubscriberEmail;
use serde_json::{Map, Value};

/// A signup that passed validation.
#[derive(Debug)]
pub struct SubscriptionRequest {
    pub email: SubscriberEmail,
}

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("The request body could not be decoded: {0}")]
    UnreadablePayload(String),
    #[error("The `email` field is missing.")]
    MissingEmail,
    #[error("The `email` field must be a string.")]
    EmailIsNotAString,
    #[error("{0}")]
    InvalidEmail(String),
}

impl SubscriptionRequest {
    pub fn validate(payload: &Map<String, Value>) -> Result<Self, ValidationError> {
        let email = match payload.get("email") {
            Some(Value::String(email)) => email.to_owned(),
            Some(_) => return Err(ValidationError::EmailIsNotAString),
            None => return Err(ValidationError::MissingEmail),
        };
        let email = SubscriberEmail::parse(email).map_err(ValidationError::InvalidEmail)?;

        Ok(Self { email })
    }
}
