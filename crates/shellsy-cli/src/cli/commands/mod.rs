//! Built-in commands. Each command is in its own file.

mod completions;
mod dload;
mod extrate;
mod version;

pub use completions::CompletionsCommand;
pub use dload::DloadCommand;
pub use extrate::ExtrateCommand;
pub use version::VersionCommand;

#[cfg(test)]
pub use completions::CompletionsArgs;
#[cfg(test)]
pub use dload::DloadArgs;
#[cfg(test)]
pub use extrate::{render_rates, ExtrateArgs};
