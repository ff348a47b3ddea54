mod input;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input as Prompt;
use huddle_client::{
    CallSession, Collaborators, HttpRoomAllocator, SampleDevices, SessionConfig, SessionHandle,
    StaticIdentity, TransportConfig, WebRtcConnector, WsRelayChannel,
};
use huddle_core::{IceServerConfig, Username};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::input::{HELP, Input};

#[derive(Parser)]
#[command(name = "huddle", about = "Join a huddle call from the terminal")]
struct Cli {
    /// Base URL of the huddle-server.
    #[arg(long, env = "HUDDLE_SERVER", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Name to join as; prompted for when absent.
    #[arg(short, long, env = "HUDDLE_USERNAME")]
    username: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new room and join it.
    Create,
    /// Join an existing room by code.
    Join { code: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let username = match cli.username {
        Some(name) if !name.trim().is_empty() => name.trim().to_owned(),
        _ => Prompt::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username")?,
    };
    let username = Username::from(username);

    let allocator = HttpRoomAllocator::new(cli.server.as_str());
    let ice_servers = allocator.ice_servers().await.unwrap_or_else(|e| {
        warn!("Using default ICE servers: {}", e);
        IceServerConfig::default_stun()
    });

    let (relay, relay_rx) = WsRelayChannel::connect(&relay_url(&cli.server), &username)
        .await
        .context("Failed to connect to the relay")?;

    let collaborators = Collaborators {
        identity: Arc::new(StaticIdentity::new(username.clone())),
        relay: Arc::new(relay),
        allocator: Arc::new(allocator),
        devices: Arc::new(SampleDevices::new(username.as_str())),
        connector: Arc::new(WebRtcConnector::new(TransportConfig { ice_servers })),
    };
    let (session, mut ui_rx) = CallSession::new(collaborators, SessionConfig::default())?;
    let handle = session.spawn(relay_rx);

    tokio::spawn(async move {
        while let Some(event) = ui_rx.recv().await {
            println!("{}", render::event(&event));
        }
    });

    let code = match cli.command {
        Commands::Create => handle.create_room().await,
        Commands::Join { code } => handle.join_room(code).await,
    };
    let code = match code {
        Ok(code) => code,
        Err(e) => {
            handle.logout().await;
            return Err(e).context("Could not enter the room");
        }
    };

    println!(
        "{} {}  {}",
        "Room code:".bold(),
        code.as_str().green().bold(),
        "(type /help for commands)".dimmed()
    );

    let result = prompt_loop(&handle).await;
    handle.logout().await;
    result
}

async fn prompt_loop(handle: &SessionHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        if handle.is_closed() {
            println!("{}", "Session ended".red());
            return Ok(());
        }

        let outcome = match Input::parse(&line) {
            Input::Empty => Ok(()),
            Input::Chat(text) => handle.send_chat(text).await,
            Input::Mute => handle.set_audio_enabled(false).await.map(drop),
            Input::Unmute => handle.set_audio_enabled(true).await.map(drop),
            Input::VideoOn => handle.set_video_enabled(true).await.map(drop),
            Input::VideoOff => handle.set_video_enabled(false).await.map(drop),
            Input::Participants => {
                println!("{}", render::participants(&handle.participants().await));
                Ok(())
            }
            Input::Help => {
                println!("{}", HELP.dimmed());
                Ok(())
            }
            Input::Unknown(command) => {
                println!("{} /{}", "Unknown command".yellow(), command);
                Ok(())
            }
            Input::Leave => break,
        };

        if let Err(e) = outcome {
            println!("{} {}", "error:".red().bold(), e);
        }
    }

    if let Err(e) = handle.leave_room().await {
        warn!("Leaving the room failed: {}", e);
    }
    Ok(())
}

/// `http://host` becomes `ws://host`, `https://host` becomes `wss://host`.
fn relay_url(server: &str) -> String {
    match server.split_once("://") {
        Some(("https", rest)) => format!("wss://{}", rest),
        Some((_, rest)) => format!("ws://{}", rest),
        None => format!("ws://{}", server),
    }
}
