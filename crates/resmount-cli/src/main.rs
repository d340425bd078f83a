//! resmount command-line front end.
//!
//! Loads a RON mount table and runs one resource operation against it.
//!
//! Usage:
//!   resmount mounts
//!   resmount cat /data/notes.txt
//!   resmount put /data/notes.txt --text "hello"
//!   resmount --config ./mounts.ron ls /docs
//!
//! Targets may carry query parameters: `/data/x.txt?rev=2`.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use resmount_core::{Payload, ResourceSystem, SystemConfig, split_target};

/// Path-addressed access to mounted resources.
#[derive(Parser, Debug)]
#[command(name = "resmount")]
#[command(about = "Route resource operations through a configured mount table")]
struct Args {
    /// Mount table (RON). Defaults to $RESMOUNT_CONFIG, then ./mounts.ron, then built-in mounts
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured mounts
    Mounts,
    /// Print the real location a target resolves to
    Get { target: String },
    /// Print a target's contents
    Cat { target: String },
    /// List a directory-like target
    Ls { target: String },
    /// Write text or a local file's bytes to a target
    Put {
        target: String,
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print whether a target exists
    Exists { target: String },
    /// Remove a target
    Rm { target: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays clean for `cat`
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("resmount: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = SystemConfig::discover(args.config.as_deref()).context("loading mount table")?;
    let system = config.build().await.context("building resource system")?;
    tracing::debug!(mounts = config.mounts.len(), command = ?args.command, "resource system ready");

    let mut stdout = std::io::stdout().lock();
    let result = execute(&system, args.command, &mut stdout).await;

    // Temp stores are released even when the command failed
    let closed = system.shutdown().await.context("closing providers");
    result.and(closed)
}

async fn execute(system: &ResourceSystem, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Mounts => {
            for mount in system.mounts().await {
                writeln!(out, "{}\t{}", mount.prefix, mount.kind)?;
            }
        }
        Command::Get { target } => {
            let (path, query) = split_target(&target);
            let resource = system
                .get(path, &query)
                .await?
                .with_context(|| format!("{path}: no mount"))?;
            writeln!(out, "{resource}")?;
        }
        Command::Cat { target } => {
            let (path, query) = split_target(&target);
            let resource = system
                .get(path, &query)
                .await?
                .with_context(|| format!("{path}: no mount"))?;
            let data = tokio::fs::read(&resource)
                .await
                .with_context(|| format!("reading {resource}"))?;
            out.write_all(&data)?;
        }
        Command::Ls { target } => {
            let (path, query) = split_target(&target);
            let entries = system
                .list(path, &query)
                .await?
                .with_context(|| format!("{path}: no mount"))?;
            for entry in entries {
                writeln!(out, "{entry}")?;
            }
        }
        Command::Put { target, text, file } => {
            let (path, query) = split_target(&target);
            let payload = match (text, file) {
                (Some(text), _) => Payload::Text(text),
                (None, Some(file)) => Payload::Binary(
                    tokio::fs::read(&file)
                        .await
                        .with_context(|| format!("reading {}", file.display()))?,
                ),
                (None, None) => bail!("put needs --text or --file"),
            };
            system.set(path, payload, &query).await?;
        }
        Command::Exists { target } => {
            let (path, query) = split_target(&target);
            writeln!(out, "{}", system.exists(path, &query).await?)?;
        }
        Command::Rm { target } => {
            let (path, query) = split_target(&target);
            system.remove(path, &query).await?;
        }
    }
    Ok(())
}
