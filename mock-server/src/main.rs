use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "2019".to_string());
    let origin = std::env::var("CADDY_ADMIN_ORIGIN").ok();
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, origin = origin.as_deref().unwrap_or("-"), "mock admin API listening");
    mock_server::run_with_state(listener, mock_server::AdminState::new(origin)).await
}
