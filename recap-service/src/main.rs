use recap_flow::RecapConfig;
use recap_service::create_app;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing; `LOG_FORMAT=pretty` for development, JSON otherwise.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "recap_service=debug,recap_flow=debug,tower_http=debug".into());

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = RecapConfig::from_env();
    for key in config.missing_credentials() {
        warn!("{key} not set; recap requests will fail until it is configured");
    }

    let app = create_app(&config);
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    let addr = listener.local_addr()?;

    info!("TV Recap Service starting on {}", addr);
    info!("Health check endpoint: http://{}/health", addr);
    info!("Recap endpoint: POST http://{}/recap", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
