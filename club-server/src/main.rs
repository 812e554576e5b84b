use std::net::SocketAddr;
use std::time::Duration;

use club_server::api;
use club_server::config::Config;
use club_server::services::badges;
use club_server::state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "club_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        env = %config.environment,
        timezone = %config.timezone,
        "Starting club-server"
    );

    let state = AppState::new(&config).await?;

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    // In-process badge snapshot; the job is idempotent so it can run hourly
    if config.badge_job_interval_secs > 0 {
        let pool = state.pool.clone();
        let tz = state.tz;
        let every = Duration::from_secs(config.badge_job_interval_secs);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                if let Err(e) = badges::run_badge_job(&pool, tz).await {
                    let e: shared::AppError = e.into();
                    tracing::error!(code = ?e.code, "Badge job failed: {}", e.message);
                }
            }
        });
    }

    let app = api::build_app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("club-server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
