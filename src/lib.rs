pub mod clients;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod notifications;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
