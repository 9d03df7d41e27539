use std::{net::SocketAddr, sync::Arc};

use dotenvy::dotenv;
use jobs::spawn_all_jobs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod app;
pub mod constants;
pub mod database;
pub mod jobs;
pub mod models;
pub mod notifier;
pub mod utils;

#[cfg(test)]
use mockall_double::double;

#[cfg_attr(test, double)]
use database::AppDatabase;
#[cfg_attr(test, double)]
use notifier::NotificationClient;

pub async fn start_reminder_service() {
    // load .env before anything reads the environment
    dotenv().ok();
    initialize_logging();
    let db_client = AppDatabase::new()
        .await
        .expect("Unable to accquire database client");
    let notification_client = Arc::new(NotificationClient::new());
    spawn_all_jobs(Arc::new(db_client), notification_client);
    start_server().await;
}

fn initialize_logging() {
    // RUST_LOG overrides the default filter when present
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or("salonbook_reminders=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

async fn start_server() {
    // PORT env var decides where we listen, 3000 when absent
    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = app::build();
    tracing::debug!("Starting the app in: {addr}");
    axum::Server::bind(&addr).serve(app).await.unwrap();
}
