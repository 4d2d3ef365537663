use crate::clients::crm_client::CrmClient;
use crate::configuration::Settings;
use crate::email_client::{Mailer, SmtpMailer};
use crate::notifications::NotificationSender;
use crate::routes::{health_check, index, newsletter};
use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::header::{self, HeaderName};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::{Context, anyhow};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let mailer = SmtpMailer::new(&configuration.email, configuration.application.mode)
            .context("Failed to configure the SMTP transport.")?;

        Self::build_with_mailer(configuration, Arc::new(mailer)).await
    }

    /// Same as [`Application::build`] with a caller-supplied mail transport.
    pub async fn build_with_mailer(
        configuration: Settings,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, anyhow::Error> {
        let crm_client = configuration
            .crm
            .client()
            .context("Failed to build the CRM client.")?;
        let admin_recipients = configuration
            .email
            .admin_recipients()
            .map_err(|e| anyhow!(e))
            .context("Invalid administrator email list.")?;
        let notification_sender = NotificationSender::new(
            mailer,
            admin_recipients,
            configuration.email.site_url.clone(),
            configuration.email.site_name.clone(),
        );
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            crm_client,
            notification_sender,
            configuration.application.allowed_origins(),
        )?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn run(
    listener: TcpListener,
    crm_client: CrmClient,
    notification_sender: NotificationSender,
    allowed_origins: Vec<String>,
) -> Result<Server, anyhow::Error> {
    let crm_client = Data::new(crm_client);
    let notification_sender = Data::new(notification_sender);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors(&allowed_origins))
            .wrap(TracingLogger::default())
            .service(index::get)
            .service(health_check::get)
            .service(newsletter::post)
            .app_data(crm_client.clone())
            .app_data(notification_sender.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

// With no configured origin every origin is accepted and echoed back, which
// keeps credentialed requests valid.
fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .supports_credentials()
        .max_age(3600);

    if allowed_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}
