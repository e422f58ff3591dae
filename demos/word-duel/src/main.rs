//! Word Duel room server.
//!
//! Run with: `cargo run --package word-duel -- --port 5000`
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wordduel::prelude::*;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[clap(short, long, default_value = "5000")]
    port: u16,

    /// Word list file, one word per line (`#` starts a comment)
    #[clap(short, long)]
    words: Option<PathBuf>,

    /// Answer "Player slot already taken" instead of replacing the holder
    #[clap(long)]
    reject_taken_slots: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let words = match &args.words {
        Some(path) => {
            let list = WordList::from_lines(&tokio::fs::read_to_string(path).await?)?;
            tracing::info!(path = %path.display(), words = list.len(), "loaded word list");
            list
        }
        None => WordList::builtin(),
    };

    let address = format!("{}:{}", args.host, args.port);
    let server = WordDuelServerBuilder::new()
        .bind(&address)
        .coordinator_config(CoordinatorConfig {
            reject_taken_slots: args.reject_taken_slots,
        })
        .build(words)
        .await?;

    tracing::info!(%address, "listening");
    server.run().await?;
    Ok(())
}
