use tca9548a_mux::{init_tracing, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug for per-transaction logs
    init_tracing();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());
    tracing::info!("[main] configuration path: {}", config_path);

    run(&config_path).await
}
