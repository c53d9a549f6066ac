use clap::Parser;
use mentor_bot::config::DatabaseConfig;
use mentor_bot::db::{Database, Store};
use std::error::Error;

#[derive(Parser)]
#[command(name = "check_db")]
#[command(about = "Check that the configured database is reachable")]
struct Cli {
    /// also print row counts of users, messages and questions
    #[arg(long)]
    tables: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    dotenvy::dotenv().ok();
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = DatabaseConfig::from_env()?;
    let database = Database::connect(&config)?;

    if let Err(e) = database.ping().await {
        eprintln!("❌ Error connecting to database: {}", e);
        std::process::exit(1);
    }
    println!(
        "✅ Database connection successful ({}:{}/{})",
        config.host, config.port, config.dbname
    );

    if cli.tables {
        let counts = [
            ("users", database.list_users().await),
            ("messages", database.list_messages().await),
            ("questions", database.list_questions().await),
        ];
        for (table, rows) in counts {
            match rows {
                Ok(rows) => println!("{:<10} {} rows", table, rows.len()),
                Err(e) => println!("{:<10} unavailable: {}", table, e),
            }
        }
    }

    Ok(())
}
