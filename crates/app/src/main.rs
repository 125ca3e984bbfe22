use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use services::{AppServices, Clock, load_module};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

mod command;
mod db_url;
mod player;

use command::Command;
use db_url::{normalize_sqlite_url, prepare_sqlite_file};
use player::{Player, Step};

#[derive(Parser)]
#[command(name = "learn")]
#[command(about = "Work through a lesson module in the terminal, earning coins as you go")]
#[command(version)]
struct Cli {
    /// SQLite database holding progress (`sqlite::memory:` keeps nothing)
    #[arg(long = "db", env = "LEARN_DB_URL", default_value = "sqlite://progress.sqlite3")]
    db_url: String,

    /// Module JSON file to play instead of the bundled module
    #[arg(long, env = "LEARN_MODULE_PATH")]
    module: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let module = load_module(cli.module.as_deref()).context("loading lesson module")?;
    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;
    info!(db = %db_url, module = %module.id(), "starting player");

    let services = AppServices::new_sqlite(&db_url, Clock::default(), module)
        .await
        .context("opening progress database")?;
    run(Player::new(services)).await
}

async fn run(mut player: Player) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut out = String::new();
    player.render_status(&mut out)?;
    out.push('\n');
    player.render_lesson(&mut out)?;
    out.push_str("\nType `help` for commands.\n> ");
    stdout.write_all(out.as_bytes()).await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let mut out = String::new();
        let step = match line.parse::<Command>() {
            Ok(command) => player.execute(command, &mut out).await?,
            Err(err) => {
                out.push_str(&format!("! {err}\n"));
                Step::Continue
            }
        };
        if step == Step::Quit {
            break;
        }
        out.push_str("> ");
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}
