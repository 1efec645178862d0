use shellsy_core::logging;

mod cli;

use crate::cli::Registry;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let registry = match Registry::builtin() {
        Ok(r) => Arc::new(r),
        Err(err) => {
            eprintln!("shellsy error: {:#}", err);
            std::process::exit(1);
        }
    };

    // Usage errors print clap's message and exit with status 2.
    let invocation = cli::parse_from(&registry, std::env::args_os()).unwrap_or_else(|e| e.exit());

    // Log to the XDG state dir; fall back to stderr if that is not writable.
    let verbose = invocation.cli.verbose;
    if let Err(err) = logging::init_logging(verbose) {
        logging::init_logging_stderr(verbose);
        tracing::warn!("file logging unavailable: {:#}", err);
    }

    if let Err(err) = cli::run(registry, invocation).await {
        tracing::error!("{:#}", err);
        eprintln!("shellsy error: {:#}", err);
        std::process::exit(1);
    }
}
