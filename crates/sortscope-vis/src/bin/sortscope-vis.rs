//! Sortscope Visualization Server
//!
//! Generate a sequence and serve the visualization frontend.
//!
//! Usage: `sortscope-vis [size] [port]`; everything else comes from
//! `SORTSCOPE_*` environment variables.

use sortscope_vis::{VisConfig, VisServer};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sortscope_vis=info,sortscope_steps=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = VisConfig::from_env()?;

    let args: Vec<String> = env::args().collect();
    if let Some(size) = args.get(1).and_then(|s| s.parse().ok()) {
        config.size = size;
    }
    if let Some(port) = args.get(2).and_then(|s| s.parse().ok()) {
        config = config.with_port(port);
    }

    println!("Sortscope Visualizer");
    println!("====================");
    println!();
    println!("  Elements:  {}", config.size);
    println!("  Algorithm: {}", config.algorithm);
    println!("  Speed:     {}", config.speed.value());
    println!();
    println!("Starting visualization server on http://{}", config.addr);
    println!();

    let server = VisServer::new(&config).with_speed(config.speed).await;
    server.serve().await?;

    Ok(())
}
