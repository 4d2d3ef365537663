use crate::clients::crm_client::CrmClient;
use crate::domain::SubscriberEmail;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub crm: CrmSettings,
    pub email: EmailSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub mode: Environment,
    // Comma-separated. Empty means any origin is accepted.
    #[serde(default)]
    pub allowed_origins: String,
}

impl ApplicationSettings {
    pub fn allowed_origins(&self) -> Vec<String> {
        split_list(&self.allowed_origins)
            .map(String::from)
            .collect()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct CrmSettings {
    pub lead_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl CrmSettings {
    pub fn client(&self) -> Result<CrmClient, reqwest::Error> {
        CrmClient::new(
            self.lead_url.clone(),
            self.timeout(),
            self.accept_invalid_certs,
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct EmailSettings {
    pub smtp_host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_user: String,
    pub smtp_password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub smtp_debug_level: u8,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    pub sender_email: String,
    pub sender_name: String,
    // Comma-separated list of administrator addresses.
    pub admin_emails: String,
    pub site_url: String,
    pub site_name: String,
}

impl EmailSettings {
    pub fn admin_recipients(&self) -> Result<Vec<SubscriberEmail>, String> {
        split_list(&self.admin_emails)
            .map(|address| SubscriberEmail::parse(address.to_string()))
            .collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// The runtime mode of the application.
///
/// `Development` talks plain SMTP without authentication, any other mode
/// uses implicit TLS.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `development` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Message(e.to_string()))?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `development` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "development".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .set_default("email.sender_email", "no-reply@example.com")?
        .set_default("email.sender_name", "Newsletter")?
        .set_default("email.admin_emails", "admin@example.com")?
        .set_default("email.site_url", "https://example.com")?
        .set_default("email.site_name", "Nosso Site")?
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_EMAIL__SMTP_HOST=smtp.example.com` would set `Settings.email.smtp_host`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override("application.mode", environment.as_str())?
        .build()?;

    settings.try_deserialize::<Settings>()
}
