//! # sparkwire-dbtool
//!
//! Operator tool for a node's channel store. Opening the store applies any
//! pending schema migrations, so `migrate` is also the way to upgrade a
//! database without starting the node.
//!
//! ```text
//! sparkwire-dbtool migrate
//! sparkwire-dbtool channels
//! sparkwire-dbtool htlcs <channel-id-hex> <commitment-number>
//! sparkwire-dbtool relays <channel-id-hex>
//! ```
//!
//! The database location comes from `SPARKWIRE_DB_PATH` (see `StoreConfig`).

use anyhow::{bail, Context};
use sparkwire_shared::ChannelId;
use sparkwire_store::{Database, SchemaAction, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: sparkwire-dbtool <migrate | channels | htlcs <channel-id> <commitment-number> | relays <channel-id>>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Migrate,
    Channels,
    Htlcs {
        channel_id: ChannelId,
        commitment_number: u64,
    },
    Relays {
        channel_id: ChannelId,
    },
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let parse_channel_id = |s: &str| {
        ChannelId::from_hex(s).with_context(|| format!("invalid channel id: {s}"))
    };

    match args {
        [cmd] if cmd == "migrate" => Ok(Command::Migrate),
        [cmd] if cmd == "channels" => Ok(Command::Channels),
        [cmd, id, n] if cmd == "htlcs" => Ok(Command::Htlcs {
            channel_id: parse_channel_id(id)?,
            commitment_number: n
                .parse()
                .with_context(|| format!("invalid commitment number: {n}"))?,
        }),
        [cmd, id] if cmd == "relays" => Ok(Command::Relays {
            channel_id: parse_channel_id(id)?,
        }),
        _ => bail!(USAGE),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sparkwire_store=debug")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let config = StoreConfig::from_env();
    info!(?config, "Loaded configuration");

    let db = Database::open(&config).context("failed to open channel store")?;
    run(&db, command)?;
    db.close().context("failed to close channel store")?;

    Ok(())
}

fn run(db: &Database, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Migrate => {
            for (db_name, action) in &db.migration_report().actions {
                let line = match action {
                    SchemaAction::Created { version } => format!("created at v{version}"),
                    SchemaAction::Upgraded { from, to } => format!("upgraded v{from} -> v{to}"),
                    SchemaAction::UpToDate { version } => format!("up to date at v{version}"),
                };
                println!("{db_name}: {line}");
            }
        }
        Command::Channels => {
            let summaries = db.channel_summaries()?;
            for s in &summaries {
                let status = if s.is_closed { "closed" } else { "active" };
                println!("{} {status} {} bytes", s.channel_id, s.data_len);
            }
            println!("{} channel(s)", summaries.len());
        }
        Command::Htlcs {
            channel_id,
            commitment_number,
        } => {
            let mut infos = db.list_htlc_infos(channel_id, commitment_number)?;
            infos.sort();
            for info in &infos {
                println!("{} expires at {}", info.payment_hash, info.cltv_expiry);
            }
            println!("{} htlc(s) in commitment {commitment_number}", infos.len());
        }
        Command::Relays { channel_id } => {
            let relays = db.list_pending_relay(channel_id)?;
            for relay in &relays {
                println!("htlc {} ({} bytes)", relay.htlc_id, relay.data.len());
            }
            println!("{} pending relay command(s)", relays.len());
        }
    }
    Ok(())
}
