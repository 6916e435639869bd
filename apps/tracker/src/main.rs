use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tracker::config::Config;
use tracker::models::user::Credentials;
use tracker::{HttpTransport, SessionManager, Transport, Workspace};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tracker v{} against {}", env!("CARGO_PKG_VERSION"), config.api_url);

    let transport: Arc<dyn Transport> = Arc::new(
        HttpTransport::new(config.api_url.clone()).context("Failed to build HTTP client")?,
    );

    let mut sessions = SessionManager::new(transport.clone());
    let session = sessions
        .login(&Credentials::new(config.username.clone(), config.password.clone()))
        .await
        .with_context(|| format!("Login failed for '{}'", config.username))?;

    let mut workspace = Workspace::new(transport);
    workspace
        .load_all(&session)
        .await
        .context("Failed to load collections")?;

    let summary = workspace.dashboard(Local::now().date_naive());
    println!("{}", serde_json::to_string_pretty(&summary)?);

    println!("\nCover letters by language:");
    for (language, count) in workspace.language_tally() {
        println!("  {language}: {count}");
    }

    println!("\nApplications:");
    for view in workspace.application_views() {
        let application = view.application;
        let status = application
            .status
            .as_ref()
            .map_or(tracker::aggregate::UNSPECIFIED, |s| s.label());
        println!(
            "  #{} {} [{}] resume: {} / cover letter: {}",
            application.id,
            application.title,
            status,
            view.resume.map_or("none", |r| r.display_title()),
            view.cover_letter.map_or("none", |c| c.title.as_str()),
        );
    }

    if let Err(e) = sessions.logout().await {
        warn!("Logout failed: {e}");
    }
    Ok(())
}
