use std::net::SocketAddr;

use tracing::{info, Level};

use bingo_maker_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let data_dir = std::env::var("BINGO_DATA_DIR").unwrap_or_else(|_| "./data".to_string());
    let public_origin = std::env::var("BINGO_PUBLIC_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let addr: SocketAddr = std::env::var("BINGO_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;

    info!("Setting up backend (data dir: {})", data_dir);
    let state = initialize_backend(&data_dir, public_origin).await?;

    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
