//! Listen command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::{info, warn};

use accord_client::SessionBuilder;
use accord_core::{ApiUrl, Event, EventListener, SessionToken};

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Email address to authenticate with
    #[arg(long, conflicts_with = "token")]
    pub identifier: Option<String>,

    /// Account password
    #[arg(long, requires = "identifier")]
    pub password: Option<String>,

    /// Second-factor code, for accounts protected by one
    #[arg(long)]
    pub code: Option<String>,

    /// A pre-issued session token, instead of credentials
    #[arg(long)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long)]
    pub api: String,

    /// Output events as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not reconnect after an unexpected disconnect
    #[arg(long)]
    pub no_reconnect: bool,

    /// Seconds to wait for the session to become ready
    #[arg(long, default_value_t = 30)]
    pub ready_timeout: u64,
}

pub async fn run(args: ListenArgs) -> Result<()> {
    let api = ApiUrl::new(&args.api).context("Invalid API URL")?;

    let mut builder = SessionBuilder::new(api)
        .reconnect(!args.no_reconnect)
        .shutdown_hook(false)
        .add_listener(Arc::new(Printer { json: args.json }));

    if let Some(token) = &args.token {
        builder = builder
            .token(SessionToken::new(token))
            .context("Token login rejected")?;
    } else {
        let identifier = args
            .identifier
            .context("Supply --identifier and --password, or --token")?;
        let password = args
            .password
            .context("Supply --password alongside --identifier")?;
        builder = builder.identifier(identifier).secret(password);
        if let Some(code) = &args.code {
            builder = builder.second_factor(code);
        }
    }

    eprintln!("{}", "Connecting...".dimmed());

    let session = builder
        .build_and_wait(Duration::from_secs(args.ready_timeout))
        .await
        .context("Failed to connect")?;
    info!(api = %args.api, "session ready");

    eprintln!("{}", "Connected. Press Ctrl+C to stop.".dimmed());
    eprintln!();

    tokio::signal::ctrl_c().await?;
    session.close();

    Ok(())
}

struct Printer {
    json: bool,
}

impl EventListener for Printer {
    fn on_event(&self, event: &Event) {
        if matches!(event, Event::Disconnect) {
            warn!("gateway connection lost");
        }
        if self.json {
            let _ = print_json(event);
            return;
        }
        match event {
            Event::Ready(data) => {
                println!(
                    "{} logged in as {}",
                    "READY".green(),
                    data.user.username.bold()
                );
            }
            Event::MessageCreate(msg) => {
                println!(
                    "{} [{}] {}: {}",
                    "MESSAGE".cyan(),
                    msg.channel_id.dimmed(),
                    msg.author_id.as_deref().unwrap_or("?"),
                    msg.content
                );
            }
            Event::MessageUpdate(msg) => {
                println!(
                    "{} [{}] {}",
                    "EDIT".yellow(),
                    msg.channel_id.dimmed(),
                    msg.content
                );
            }
            Event::MessageDelete(msg) => {
                println!("{} [{}] {}", "DELETE".red(), msg.channel_id.dimmed(), msg.id);
            }
            Event::MessageBulkDelete(bulk) => {
                println!(
                    "{} [{}] {} messages",
                    "BULK DELETE".red(),
                    bulk.channel_id.dimmed(),
                    bulk.ids.len()
                );
            }
            Event::UserUpdate(profile) => {
                println!("{} {}", "USER".magenta(), profile.username);
            }
            Event::GuildCreate(guild) => {
                println!("{} {}", "GUILD UP".green(), guild.name);
            }
            Event::GuildDelete(guild) => {
                println!("{} {}", "GUILD DOWN".red(), guild.name);
            }
            Event::ChannelCreate(channel) => {
                println!(
                    "{} {}",
                    "CHANNEL UP".green(),
                    channel.name.as_deref().unwrap_or(&channel.id)
                );
            }
            Event::ChannelDelete(channel) => {
                println!(
                    "{} {}",
                    "CHANNEL DOWN".red(),
                    channel.name.as_deref().unwrap_or(&channel.id)
                );
            }
            Event::Disconnect => {
                eprintln!("{}", "DISCONNECTED".red());
            }
            Event::Unknown { kind } => {
                eprintln!("{} {}", "UNKNOWN".dimmed(), kind);
            }
        }
    }
}

fn print_json(event: &Event) -> Result<()> {
    let value = match event {
        Event::Ready(data) => serde_json::json!({"kind": "ready", "data": data}),
        Event::MessageCreate(msg) => serde_json::json!({"kind": "message_create", "data": msg}),
        Event::MessageUpdate(msg) => serde_json::json!({"kind": "message_update", "data": msg}),
        Event::MessageDelete(msg) => serde_json::json!({"kind": "message_delete", "data": msg}),
        Event::MessageBulkDelete(bulk) => {
            serde_json::json!({"kind": "message_bulk_delete", "data": bulk})
        }
        Event::UserUpdate(profile) => serde_json::json!({"kind": "user_update", "data": profile}),
        Event::GuildCreate(guild) => serde_json::json!({"kind": "guild_create", "data": guild}),
        Event::GuildDelete(guild) => serde_json::json!({"kind": "guild_delete", "data": guild}),
        Event::ChannelCreate(channel) => {
            serde_json::json!({"kind": "channel_create", "data": channel})
        }
        Event::ChannelDelete(channel) => {
            serde_json::json!({"kind": "channel_delete", "data": channel})
        }
        Event::Disconnect => serde_json::json!({"kind": "disconnect"}),
        Event::Unknown { kind } => serde_json::json!({"kind": "unknown", "type": kind}),
    };
    crate::output::json(&value)
}
