//! # TaskFlow Notifier
//!
//! Batch job that emails reminders for tasks due within the next 24 hours.
//! Each eligible task is notified at most once; delivery failures are
//! logged and retried on the next scheduled run.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskflow-notifier
//! ```
//!
//! The job performs one pass and exits; scheduling (e.g. cron or a systemd
//! timer) is external.

use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskflow_notifier::config::Config;
use taskflow_notifier::dispatcher::Dispatcher;
use taskflow_notifier::mailer::HttpMailer;
use taskflow_shared::db::pool::{close_pool, create_pool, DatabaseConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskflow_notifier=info,taskflow_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskFlow Notifier v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    let mailer = Arc::new(HttpMailer::new(
        config.mail.relay_url.clone(),
        config.mail.relay_token.clone(),
    ));

    let dispatcher = Dispatcher::new(pool.clone(), mailer, config.mail.from_address.clone());

    let report = dispatcher.run(Utc::now()).await?;

    tracing::info!(
        examined = report.examined,
        notified = report.notified.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Notification run complete"
    );

    close_pool(pool).await;

    Ok(())
}
