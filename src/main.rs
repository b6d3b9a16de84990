// Social Portal server

use tokio::net::TcpListener;
use tracing::info;

use social_portal::{app_state::AppState, config::Config, http::api_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    let address = config.server_address();

    // Initialize application state
    let app_state = AppState::new(config).await?;

    // Build the application router
    let app = api_router(app_state);

    info!("Social portal server starting on http://{}", address);

    let listener = TcpListener::bind(&address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
