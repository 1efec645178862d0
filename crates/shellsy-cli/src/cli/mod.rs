//! CLI for Shellsy: a clap root whose subcommands come from the [`Registry`].

mod commands;
mod registry;

pub use registry::{Context, Registry, ShellCommand};

use anyhow::{anyhow, Context as _, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use shellsy_core::config;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Global flags shared by every subcommand.
#[derive(Debug, Parser)]
#[command(name = "shellsy")]
#[command(about = "A general extendable command line tool")]
#[command(long_about = "Shellsy is a small command line tool made extensible through pluggable subcommands.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Config file to use instead of ~/.config/shellsy/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also log to stderr (-v for info, -vv for debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// A parsed command line: global flags plus the chosen subcommand and its matches.
#[derive(Debug)]
pub struct Invocation {
    pub cli: Cli,
    pub name: String,
    pub matches: ArgMatches,
}

/// The full clap command tree: `Cli` flags plus one subcommand per registry entry.
pub fn build_command(registry: &Registry) -> clap::Command {
    registry.iter().fold(
        Cli::command()
            .subcommand_required(true)
            .arg_required_else_help(true),
        |root, command| {
            root.subcommand(command.args(clap::Command::new(command.name()).about(command.about())))
        },
    )
}

pub fn parse_from<I, T>(registry: &Registry, args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command(registry).try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| clap::Error::new(clap::error::ErrorKind::MissingSubcommand))?;
    Ok(Invocation {
        cli,
        name: name.to_string(),
        matches: sub.clone(),
    })
}

/// Load config and run the chosen command to completion on a blocking task.
pub async fn run(registry: Arc<Registry>, invocation: Invocation) -> Result<()> {
    let cfg = config::resolve(invocation.cli.config.as_deref())?;
    let command = registry
        .get(&invocation.name)
        .ok_or_else(|| {
            let known: Vec<_> = registry.names().collect();
            anyhow!(
                "unknown command '{}' (available: {})",
                invocation.name,
                known.join(", ")
            )
        })?;
    tracing::debug!(command = command.name(), "dispatching");

    let ctx = Context::new(cfg, registry);
    let matches = invocation.matches;
    tokio::task::spawn_blocking(move || {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        command.execute(&ctx, &matches, &mut out)?;
        out.flush()?;
        Ok::<_, anyhow::Error>(())
    })
    .await
    .context("command task join")??;

    Ok(())
}

#[cfg(test)]
mod tests;
