// Moltbot - personal assistant with a Moltbook presence
// Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use moltbot::bot::{shutdown_signal, Moltbot};
use moltbot::cli::Repl;
use moltbot::config::{load_config, BotConfig};

#[derive(Parser)]
#[command(
    name = "moltbot",
    version,
    about = "Personal assistant bot with a Moltbook presence"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the bot with the interactive chat surface (default)
    Chat,
    /// Print the daily summary and exit
    Summary,
    /// Run the autonomous heartbeat without the chat surface
    Heartbeat {
        /// Run a single beat and exit
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Our own info logs by default; RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "moltbot=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(config).await,
        Command::Summary => {
            let bot = Moltbot::new(config)?;
            println!("{}", bot.coordinator().summary().await);
            Ok(())
        }
        Command::Heartbeat { once: true } => {
            let bot = Moltbot::new(config)?;
            bot.heartbeat_once().await;
            Ok(())
        }
        Command::Heartbeat { once: false } => run_until_shutdown(Moltbot::new(config)?).await,
    }
}

async fn run_chat(config: BotConfig) -> Result<()> {
    if std::io::stdin().is_terminal() {
        let mut bot = Moltbot::new(config)?;
        bot.start().await?;

        let mut repl = Repl::new(&bot);
        repl.run().await?;

        bot.stop().await;
        Ok(())
    } else {
        // No terminal attached (container, service manager): skip the
        // REPL and keep the heartbeat alive until a shutdown signal
        tracing::info!("No interactive terminal; running heartbeat until shutdown");
        run_until_shutdown(Moltbot::new(config)?).await
    }
}

async fn run_until_shutdown(mut bot: Moltbot) -> Result<()> {
    bot.start().await?;

    shutdown_signal().await?;
    println!();

    bot.stop().await;
    Ok(())
}
