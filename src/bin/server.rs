use std::sync::Arc;

use bingo::env_config;
use bingo::server::create_router;

#[tokio::main]
async fn main() {
    env_logger::init();
    let port = env_config::server_port();
    println!("Starting bingo oracle server...");

    let ctx = env_config::load_context(None).unwrap_or_else(|e| {
        eprintln!("Failed to load scoring config: {}", e);
        std::process::exit(1);
    });
    let sizes: Vec<usize> = ctx.tables.iter().map(|t| t.len()).collect();
    println!("Combination tables ready: {:?} (budget {})", sizes, ctx.tables.budget());

    let app = create_router(Arc::new(ctx));

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind port {}: {}", port, e);
            std::process::exit(1);
        }
    };
    println!("Server is running on port {}. Press Ctrl+C to stop.", port);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }

    println!("\nStopping server...");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Failed to install Ctrl+C handler: {}", e);
    }
}
