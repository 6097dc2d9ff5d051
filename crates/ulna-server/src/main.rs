//! Ulna Server CLI
//!
//! Starts the splint advisory HTTP server.

use std::env;
use std::process;
use ulna_server::{start_server, ServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        ServerConfig::from_file(config_path)?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        // Defaults plus environment overrides
        ServerConfig::from_env()?
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Ulna Server - Upper-Extremity Splint Advisory Service");
    println!();
    println!("USAGE:");
    println!("    ulna-server [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    ulna-server --config config/server.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default '127.0.0.1')");
    println!("    - bind_port: Port number (default 8080)");
    println!("    - data_dir: Directory for JSONL case logs (default 'data')");
    println!("    - cors_origins: Allowed CORS origins");
    println!("    - openai_api_key: Model credential; omit for rule-based derivation");
    println!("    - openai_model: Model name (default 'gpt-4o-mini')");
    println!("    - model_timeout_secs: Model call timeout (default 30)");
    println!();
    println!("    Environment variables override file values: ULNA_BIND_ADDRESS,");
    println!("    ULNA_BIND_PORT, ULNA_DATA_DIR, CORS_ORIGINS, OPENAI_API_KEY,");
    println!("    OPENAI_MODEL, MANUFACTURING_SITE_URL, BOT_VERIFY_KEY");
    println!();
}
