mod templates;

use crate::domain::SubscriberEmail;
use crate::email_client::{EmailData, EmailError, Mailer};
use chrono::Local;
use std::sync::Arc;

pub use templates::{CONFIRMATION_SUBJECT, NOTIFICATION_SUBJECT};

/// Sends the emails that follow a successful signup.
#[derive(Clone)]
pub struct NotificationSender {
    mailer: Arc<dyn Mailer>,
    admin_recipients: Vec<SubscriberEmail>,
    site_url: String,
    site_name: String,
}

/// Which of the two signup emails went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationOutcome {
    pub confirmation_sent: bool,
    pub notification_sent: bool,
}

impl NotificationOutcome {
    pub fn all_sent(&self) -> bool {
        self.confirmation_sent && self.notification_sent
    }
}

impl NotificationSender {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        admin_recipients: Vec<SubscriberEmail>,
        site_url: String,
        site_name: String,
    ) -> Self {
        Self {
            mailer,
            admin_recipients,
            site_url,
            site_name,
        }
    }

    /// Best-effort: a failed send is logged and reported in the outcome,
    /// it never interrupts the other send.
    pub async fn notify(&self, subscriber: &SubscriberEmail) -> NotificationOutcome {
        let confirmation_sent = match self.send_confirmation_email(subscriber).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Failed to send the confirmation email."
                );
                false
            }
        };
        let notification_sent = match self.send_notification_email(subscriber).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Failed to send the admin notification email."
                );
                false
            }
        };

        NotificationOutcome {
            confirmation_sent,
            notification_sent,
        }
    }

    #[tracing::instrument(name = "Sending subscription confirmation email", skip(self))]
    pub async fn send_confirmation_email(
        &self,
        recipient: &SubscriberEmail,
    ) -> Result<(), EmailError> {
        self.mailer
            .send_email(EmailData {
                recipients: vec![recipient.clone()],
                subject: CONFIRMATION_SUBJECT.into(),
                html_content: templates::confirmation_html(&self.site_url, &self.site_name),
                text_content: templates::CONFIRMATION_TEXT.into(),
            })
            .await
    }

    #[tracing::instrument(name = "Sending new subscriber notification to admins", skip(self))]
    pub async fn send_notification_email(
        &self,
        subscriber: &SubscriberEmail,
    ) -> Result<(), EmailError> {
        if self.admin_recipients.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        let subscribed_at = Local::now().naive_local();
        self.mailer
            .send_email(EmailData {
                recipients: self.admin_recipients.clone(),
                subject: NOTIFICATION_SUBJECT.into(),
                html_content: templates::notification_html(subscriber.as_ref(), &subscribed_at),
                text_content: templates::notification_text(subscriber.as_ref()),
            })
            .await
    }
}
