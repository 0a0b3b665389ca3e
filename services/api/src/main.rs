use std::time::Duration;

use anyhow::Context as _;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use skillshare_api::config::ApiConfig;
use skillshare_api::infra::google::GoogleOAuthClient;
use skillshare_api::reminder::ReminderTask;
use skillshare_api::router::build_router;
use skillshare_api::state::AppState;
use skillshare_api::usecase::reminder::SendRemindersUseCase;
use skillshare_api::usecase::token::TokenSettings;
use skillshare_api_migration::Migrator;
use skillshare_core::shutdown::shutdown_signal;
use skillshare_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // a missing .env is fine
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ApiConfig::from_env().context("load configuration")?;
    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET_KEY is not set, using the development secret");
    }

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    if config.run_migrations {
        Migrator::up(&db, None).await.context("run migrations")?;
        info!("database migrations applied");
    }

    let google = match &config.google {
        Some(google) => Some(
            GoogleOAuthClient::new(
                google.client_id.clone(),
                google.client_secret.clone(),
                google.redirect_url.clone(),
            )
            .context("build google oauth client")?,
        ),
        None => {
            tracing::warn!("GOOGLE_CLIENT_ID / GOOGLE_CLIENT_SECRET not set, google login disabled");
            None
        }
    };

    let state = AppState {
        db,
        tokens: TokenSettings {
            secret: config.jwt_secret.clone(),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        },
        google,
        secure_cookies: config.frontend_url.starts_with("https://"),
        frontend_url: config.frontend_url.clone(),
        frontend_oauth_callback_url: config.frontend_oauth_callback_url.clone(),
    };

    // Reminder sweep
    let reminder_state = state.clone();
    let window = config.reminder_window;
    let reminders = ReminderTask::spawn(
        Duration::from_secs(config.reminder_interval_secs.max(1)),
        move |now| {
            let usecase = SendRemindersUseCase {
                sessions: reminder_state.session_repo(),
                notifications: reminder_state.notification_repo(),
                window,
            };
            async move { usecase.execute(now).await }
        },
    );

    // HTTP server
    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("bind {http_addr}"))?;

    info!("skillshare api listening on {http_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    reminders.shutdown().await;
    info!("shutdown complete");
    Ok(())
}
