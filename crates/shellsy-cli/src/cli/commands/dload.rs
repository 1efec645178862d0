//! `shellsy dload <url> <destination>` – download a URL to a file.

use anyhow::Result;
use clap::{ArgMatches, Args, FromArgMatches};
use shellsy_core::download::{self, DownloadOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::cli::{Context, ShellCommand};

#[derive(Debug, Args)]
pub struct DloadArgs {
    /// Direct HTTP/HTTPS URL to download.
    pub url: String,

    /// File to write, or an existing directory to save into.
    pub destination: PathBuf,

    /// Fail instead of replacing an existing file.
    #[arg(long)]
    pub no_clobber: bool,

    /// Expected SHA-256 of the body (hex). The download is discarded on mismatch.
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<String>,
}

pub struct DloadCommand;

impl ShellCommand for DloadCommand {
    fn name(&self) -> &'static str {
        "dload"
    }

    fn about(&self) -> &'static str {
        "Download from a web url"
    }

    fn args(&self, cmd: clap::Command) -> clap::Command {
        DloadArgs::augment_args(cmd)
    }

    fn execute(&self, ctx: &Context, matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
        let args = DloadArgs::from_arg_matches(matches)?;
        let opts = DownloadOptions {
            no_clobber: args.no_clobber,
            expected_sha256: args.sha256,
            ..DownloadOptions::from_config(&ctx.config)
        };

        let report = download::download_to_path(&args.url, &args.destination, &opts)?;
        writeln!(out, "Downloaded {} bytes to {}", report.bytes, report.path.display())?;
        if let Some(digest) = report.sha256 {
            writeln!(out, "sha256 {} OK", digest)?;
        }
        Ok(())
    }
}
