// crates/bridgectl/src/main.rs
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand};

use bridge_core::{LegacyId, TopicCatalog};

#[derive(Parser)]
#[command(version, about = "Bridge control: inspect legacy ids and the topic catalog")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Legacy id <-> backend timestamp / record key
    Id {
        #[command(subcommand)]
        cmd: IdCmd,
    },
    /// List topic slugs and names
    Topics,
}

#[derive(Subcommand)]
enum IdCmd {
    /// Print the timestamp, clock id and record key of a legacy id
    Decode { id: String },
    /// Build a legacy id from an RFC 3339 timestamp
    Encode {
        #[arg(long)]
        at: String,
        #[arg(long, default_value_t = 0)]
        clock: u16,
    },
    /// Legacy id of a record key (TID)
    FromKey { key: String },
    /// Post URI a legacy id points at
    Uri {
        id: String,
        #[arg(long)]
        did: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    for line in run(cli.cmd)? {
        println!("{line}");
    }
    Ok(())
}

fn run(cmd: Cmd) -> Result<Vec<String>> {
    let out = match cmd {
        Cmd::Id { cmd } => match cmd {
            IdCmd::Decode { id } => {
                let id: LegacyId = id.parse().with_context(|| format!("decoding {id:?}"))?;
                vec![
                    format!("id        {id}"),
                    format!(
                        "time      {}",
                        id.decode_to_bound().to_rfc3339_opts(SecondsFormat::Micros, true)
                    ),
                    format!("clock_id  {}", id.clock_id()),
                    format!("rkey      {}", id.to_record_key()),
                ]
            }
            IdCmd::Encode { at, clock } => {
                let at: DateTime<Utc> = DateTime::parse_from_rfc3339(&at)
                    .with_context(|| format!("parsing timestamp {at:?}"))?
                    .with_timezone(&Utc);
                vec![LegacyId::encode(at, clock)?.to_string()]
            }
            IdCmd::FromKey { key } => vec![LegacyId::from_record_key(&key)?.to_string()],
            IdCmd::Uri { id, did } => {
                let id: LegacyId = id.parse()?;
                vec![id.post_uri(&did)]
            }
        },
        Cmd::Topics => TopicCatalog::builtin()
            .iter()
            .map(|(slug, name)| format!("{slug:<12} {name}"))
            .collect(),
    };
    Ok(out)
}
