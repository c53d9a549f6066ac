use std::sync::Arc;

use clap::Parser;
use log::info;
use mentor_bot::bot::TelegramBot;
use mentor_bot::config::AppConfig;
use mentor_bot::context::AppContext;
use mentor_bot::db::Database;
use mentor_bot::api;

#[derive(Parser)]
#[command(name = "mentor-bot")]
#[command(about = "AI Mentor Telegram bot with a read-only REST API", version)]
struct Args {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // initialize rustls crypto provider
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // load .env file if it exists
    if let Err(e) = dotenvy::dotenv() {
        match e {
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            _ => {
                eprintln!("warning: failed to load .env file: {}", e);
            }
        }
    }

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let _args = Args::parse();

    let config = AppConfig::from_env()?;

    let database = Database::connect(&config.database)?;
    let ctx = AppContext::new(Arc::new(database));

    let bot = TelegramBot::new(&config.bot_token, ctx.clone());
    let server = api::serve(ctx, config.http_port);

    info!("Starting bot and HTTP server on port {}...", config.http_port);

    tokio::select! {
        _ = bot.run() => info!("Bot dispatcher stopped, shutting down"),
        result = server => result?,
    }

    Ok(())
}
