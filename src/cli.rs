use anyhow::{bail, Context, Result};
use chrono::Utc;

use crate::board::pipeline::build_snapshot;
use crate::config::{AppConfig, ResponseShape};
use crate::http::handlers::SnapshotBody;
use crate::tracker::linear::LinearFactory;
use crate::tracker::TrackerFactory;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Serve { bind: Option<String> },
    /// `None` uses the configured shape.
    Snapshot { shape: Option<ResponseShape> },
    Help,
}

/// Parse CLI args.
///
/// Supported forms:
///   cycleboard
///   cycleboard serve [--bind 127.0.0.1:3000]
///   cycleboard snapshot [--merge-variables]
///   cycleboard help
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some(first) = args.first() else {
        return Ok(Command::Serve { bind: None });
    };
    let rest = &args[1..];

    match first.as_str() {
        "serve" => {
            let mut bind = None;
            let mut i = 0;
            while i < rest.len() {
                match rest[i].as_str() {
                    "-b" | "--bind" => {
                        i += 1;
                        match rest.get(i) {
                            Some(addr) => bind = Some(addr.clone()),
                            None => bail!("Missing value for --bind flag"),
                        }
                    }
                    other => bail!("Unknown argument for serve: {other}"),
                }
                i += 1;
            }
            Ok(Command::Serve { bind })
        }
        "snapshot" => {
            let mut shape = None;
            for arg in rest {
                match arg.as_str() {
                    "--merge-variables" => shape = Some(ResponseShape::MergeVariables),
                    "--top-level" => shape = Some(ResponseShape::TopLevel),
                    other => bail!("Unknown argument for snapshot: {other}"),
                }
            }
            Ok(Command::Snapshot { shape })
        }
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => bail!("Unknown command: {other}\n\nRun `cycleboard help` for usage."),
    }
}

/// Fetch one snapshot with the configured key and print it as JSON.
pub async fn print_snapshot(config: &AppConfig, shape: Option<ResponseShape>) -> Result<()> {
    let Some(api_key) = config.linear.api_key.as_deref() else {
        bail!("No Linear API key. Set LINEAR_API_KEY or linear.api_key in ~/.cycleboard/config.toml");
    };

    let tracker = LinearFactory::new(config.linear.endpoint.clone()).connect(api_key);
    let snapshot = build_snapshot(tracker.as_ref(), Utc::now()).await?;
    let body = SnapshotBody::new(&snapshot, shape.unwrap_or(config.response.shape));
    let json = serde_json::to_string_pretty(&body).context("Failed to serialize snapshot")?;
    println!("{json}");
    Ok(())
}

pub fn print_help() {
    println!("cycleboard — cycle-aware Linear issue feed for e-ink displays\n");
    println!("USAGE:");
    println!("  cycleboard                 Run the HTTP server");
    println!("  cycleboard serve           Run the HTTP server");
    println!("  cycleboard snapshot        Fetch one snapshot and print it");
    println!();
    println!("SERVE OPTIONS:");
    println!("  -b, --bind <addr>          Listen address (default 0.0.0.0:3000)");
    println!();
    println!("SNAPSHOT OPTIONS:");
    println!("  --merge-variables          Wrap fields under merge_variables");
    println!("  --top-level                Keep fields at the top level");
    println!();
    println!("ENVIRONMENT:");
    println!("  LINEAR_API_KEY             Fallback key when a request carries none");
    println!("  CYCLEBOARD_CONFIG          Config file (default ~/.cycleboard/config.toml)");
    println!("  CYCLEBOARD_BIND            Listen address override");
    println!("  RUST_LOG                   Log filter");
}
