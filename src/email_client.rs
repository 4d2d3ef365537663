use crate::configuration::{EmailSettings, Environment};
use crate::domain::SubscriberEmail;
use crate::utils::error_chain_fmt;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

#[derive(Debug, Clone)]
pub struct EmailData {
    pub recipients: Vec<SubscriberEmail>,
    pub subject: String,
    pub html_content: String,
    pub text_content: String,
}

#[derive(thiserror::Error)]
pub enum EmailError {
    #[error("An email needs at least one recipient.")]
    NoRecipients,
    #[error("Failed to parse an email address.")]
    InvalidAddress(#[from] lettre::address::AddressError),
    #[error("Failed to build the email message.")]
    InvalidMessage(#[from] lettre::error::Error),
    #[error("Failed to deliver the email through the SMTP server.")]
    Transport(#[from] lettre::transport::smtp::Error),
}

impl std::fmt::Debug for EmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Outbound mail delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, email: EmailData) -> Result<(), EmailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    debug_level: u8,
}

impl SmtpMailer {
    /// Plain SMTP without authentication in development, implicit TLS with
    /// credentials otherwise.
    pub fn new(settings: &EmailSettings, mode: Environment) -> Result<Self, EmailError> {
        let sender = Mailbox::new(
            Some(settings.sender_name.clone()),
            settings.sender_email.parse()?,
        );
        let builder = if mode.is_development() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.smtp_host.as_str())
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)?.credentials(
                Credentials::new(
                    settings.smtp_user.clone(),
                    settings.smtp_password.expose_secret().clone(),
                ),
            )
        };
        let transport = builder
            .port(settings.smtp_port)
            .timeout(Some(settings.timeout()))
            .build();

        Ok(Self {
            transport,
            sender,
            debug_level: settings.smtp_debug_level,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(
        name = "Sending email over SMTP",
        skip(self, email),
        fields(subject = %email.subject, recipients = email.recipients.len())
    )]
    async fn send_email(&self, email: EmailData) -> Result<(), EmailError> {
        let message = build_message(&self.sender, email)?;
        let response = self.transport.send(message).await?;

        if self.debug_level > 0 {
            tracing::info!(
                smtp.code = %response.code(),
                smtp.reply = response.first_line().unwrap_or_default(),
                "SMTP server accepted the message."
            );
        }

        Ok(())
    }
}

fn build_message(sender: &Mailbox, email: EmailData) -> Result<Message, EmailError> {
    if email.recipients.is_empty() {
        return Err(EmailError::NoRecipients);
    }

    let mut builder = Message::builder()
        .from(sender.clone())
        .subject(email.subject);
    for recipient in &email.recipients {
        builder = builder.to(Mailbox::new(None, recipient.as_ref().parse()?));
    }
    let message = builder.multipart(MultiPart::alternative_plain_html(
        email.text_content,
        email.html_content,
    ))?;

    Ok(message)
}
