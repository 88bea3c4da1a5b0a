//! Standalone bot server binary
//!
//! Usage: cargo run -p ginga_bot --bin ginga-bot-server

use ginga_bot::{BotServer, ValueSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = ginga_bot::init_logging() {
        eprintln!("Warning: logging already initialised: {err}");
    }

    let resolved = ginga_bot::load_with_sources()?;
    let mut settings = resolved.settings;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: --host requires a value");
                    std::process::exit(2);
                };
                settings.host = value.clone();
                i += 2;
            }
            "--port" | "-p" => {
                let Some(port) = args.get(i + 1).and_then(|v| v.parse().ok()) else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(2);
                };
                settings.port = port;
                i += 2;
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_help();
                std::process::exit(2);
            }
        }
    }

    if resolved.sources.admin_id == ValueSource::Default {
        tracing::warn!("no admin_id configured; admin commands are disabled");
    }
    tracing::info!(
        database = %settings.database_path.display(),
        host = %settings.host,
        port = settings.port,
        "starting ginga bot server"
    );

    let handle = BotServer::new(&settings)?.start().await?;
    println!("Bot server running at http://{}", handle.address());
    println!("   Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down");
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");

    Ok(())
}

fn print_help() {
    println!("Ginga casino bot server");
    println!();
    println!("Usage: ginga-bot-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>    Host to bind to (overrides settings)");
    println!("  --port, -p <PORT>    Port to bind to (overrides settings)");
    println!("  --help               Show this help message");
    println!();
    println!("Settings are read from the TOML file named by GINGA_CONFIG and");
    println!("GINGA_* environment variables.");
}
