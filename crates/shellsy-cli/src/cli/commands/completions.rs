//! `shellsy completions <shell>` – print a shell completion script.

use anyhow::Result;
use clap::{ArgMatches, Args, FromArgMatches};
use clap_complete::Shell;
use std::io::Write;

use crate::cli::{self, Context, ShellCommand};

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    pub shell: Shell,
}

pub struct CompletionsCommand;

impl ShellCommand for CompletionsCommand {
    fn name(&self) -> &'static str {
        "completions"
    }

    fn about(&self) -> &'static str {
        "Generate a shell completion script"
    }

    fn args(&self, cmd: clap::Command) -> clap::Command {
        CompletionsArgs::augment_args(cmd)
    }

    fn execute(&self, ctx: &Context, matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
        let args = CompletionsArgs::from_arg_matches(matches)?;
        let mut command = cli::build_command(&ctx.registry);
        clap_complete::generate(args.shell, &mut command, "shellsy", out);
        Ok(())
    }
}
