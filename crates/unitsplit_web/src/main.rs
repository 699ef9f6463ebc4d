use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use unitsplit_web::conf::C_LOG_FILTER_DEFAULT;
use unitsplit_web::{AppState, Config, build_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(C_LOG_FILTER_DEFAULT)),
        )
        .init();

    tracing::info!("Starting unitsplit service");

    let config = Config::from_env()?;
    tracing::info!(
        uploads = %config.dir_uploads.display(),
        outputs = %config.dir_outputs.display(),
        max_upload_bytes = config.max_upload_bytes,
        "Loaded configuration"
    );

    let dirs = config.storage_dirs();
    dirs.ensure()?;
    let app = build_router(AppState::new(dirs, config.max_upload_bytes));

    let addr = config.addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
