//! `shellsy version` – print the version line.

use anyhow::Result;
use clap::ArgMatches;
use shellsy_core::version;
use std::io::Write;

use crate::cli::{Context, ShellCommand};

pub struct VersionCommand;

impl ShellCommand for VersionCommand {
    fn name(&self) -> &'static str {
        "version"
    }

    fn about(&self) -> &'static str {
        "Print the version number of Shellsy"
    }

    fn execute(&self, _ctx: &Context, _matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", version::version_string())?;
        Ok(())
    }
}
