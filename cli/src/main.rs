mod api;
mod render;
mod watch;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use protocol::Mode;

use crate::api::{ApiError, GameApi, HttpApi};

#[derive(Parser, Debug)]
#[command(name = "redlight", about = "Redlight game API client and watcher")]
struct Cli {
    #[arg(long, env = "REDLIGHT_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the server and render the game state until Ctrl+C.
    Watch {
        /// Ask the server to go IDLE when the watcher exits.
        #[arg(long, default_value_t = false)]
        idle_on_exit: bool,
    },
    /// Fetch the current game state once.
    Status,
    /// Begin a round if none is running.
    Start,
    /// Reset to a fresh GREEN round.
    Restart,
    /// Stop the game: set mode to IDLE.
    Idle,
    /// Write a specific mode (GREEN, RED, or IDLE).
    SetMode { mode: Mode },
    /// Report a penalty (ends the game during RED).
    Penalty,
    /// Health-check the server.
    Ping,
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let api = HttpApi::new(&cli.base_url);

    match cli.command {
        Command::Watch { idle_on_exit } => {
            watch::run(Arc::new(api), idle_on_exit).await;
            Ok(())
        }
        Command::Status => {
            let state = api.gamestate().await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
            Ok(())
        }
        Command::Start => {
            api.start().await?;
            println!("ok");
            Ok(())
        }
        Command::Restart => {
            api.restart().await?;
            println!("ok");
            Ok(())
        }
        Command::Idle => {
            // A standalone process owns no toggle timer; the running watcher
            // observes IDLE on its next poll and stops its own.
            api.set_mode(Mode::Idle).await?;
            println!("ok");
            Ok(())
        }
        Command::SetMode { mode } => {
            api.set_mode(mode).await?;
            println!("ok");
            Ok(())
        }
        Command::Penalty => {
            api.penalty().await?;
            println!("ok");
            Ok(())
        }
        Command::Ping => {
            api.ping().await?;
            println!("ok");
            Ok(())
        }
    }
}
