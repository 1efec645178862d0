//! Name → command map, built once at start-up.

use anyhow::{bail, Result};
use clap::ArgMatches;
use shellsy_core::config::ShellsyConfig;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use super::commands;

/// What every command gets besides its own arguments.
#[derive(Clone)]
pub struct Context {
    pub config: Arc<ShellsyConfig>,
    pub registry: Arc<Registry>,
}

impl Context {
    pub fn new(config: ShellsyConfig, registry: Arc<Registry>) -> Self {
        Self {
            config: Arc::new(config),
            registry,
        }
    }
}

/// A named, independently invocable unit registered under the root dispatcher.
pub trait ShellCommand: Send + Sync {
    fn name(&self) -> &'static str;

    /// One-line description shown in `--help`.
    fn about(&self) -> &'static str;

    /// Declare this command's arguments on its clap subcommand.
    fn args(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Run the command. Blocking; results go to `out`.
    fn execute(&self, ctx: &Context, matches: &ArgMatches, out: &mut dyn Write) -> Result<()>;
}

#[derive(Default)]
pub struct Registry {
    commands: BTreeMap<&'static str, Arc<dyn ShellCommand>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in command.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(commands::VersionCommand)?;
        registry.register(commands::DloadCommand)?;
        registry.register(commands::ExtrateCommand)?;
        registry.register(commands::CompletionsCommand)?;
        Ok(registry)
    }

    /// Add a command. Names are unique; a second registration under the same name is an error.
    pub fn register<C: ShellCommand + 'static>(&mut self, command: C) -> Result<()> {
        let name = command.name();
        if self.commands.contains_key(name) {
            bail!("command '{name}' is already registered");
        }
        self.commands.insert(name, Arc::new(command));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ShellCommand>> {
        self.commands.get(name).cloned()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ShellCommand>> + '_ {
        self.commands.values()
    }
}
