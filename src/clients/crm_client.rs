use crate::domain::SubscriberEmail;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;

/// Pushes newsletter signups to the CRM lead-capture endpoint.
#[derive(Debug)]
pub struct CrmClient {
    pub lead_url: String,
    http_client: Client,
}

impl CrmClient {
    pub fn new(
        lead_url: String,
        timeout: std::time::Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            lead_url,
            http_client,
        })
    }

    /// Creates one lead per call. The CRM does not deduplicate, two calls
    /// with the same address produce two leads.
    #[tracing::instrument(name = "Creating CRM lead", skip(self))]
    pub async fn create_lead(&self, email: &SubscriberEmail) -> Result<Value, UpstreamError> {
        let request_body = CreateLeadRequest {
            email_address: email.as_ref(),
        };
        let body = self
            .http_client
            .post(&self.lead_url)
            .header(ACCEPT, "application/json")
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(decode_lead_body(&body))
    }
}

// Bodies that are empty or not JSON become `null`.
fn decode_lead_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CreateLeadRequest<'a> {
    email_address: &'a str,
}

#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct UpstreamError(#[from] reqwest::Error);
