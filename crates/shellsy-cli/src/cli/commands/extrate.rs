//! `shellsy extrate <currency>` – latest exchange rates for a base currency.

use anyhow::Result;
use clap::{ArgMatches, Args, FromArgMatches};
use shellsy_core::exchange_rate::{CurrencyCode, ExchangeRateClient, RateTable};
use std::io::Write;

use crate::cli::{Context, ShellCommand};

#[derive(Debug, Args)]
pub struct ExtrateArgs {
    /// Base currency code, e.g. USD.
    pub currency: CurrencyCode,

    /// Only show this target currency (repeatable).
    #[arg(long = "to", value_name = "CODE")]
    pub targets: Vec<CurrencyCode>,
}

pub struct ExtrateCommand;

impl ShellCommand for ExtrateCommand {
    fn name(&self) -> &'static str {
        "extrate"
    }

    fn about(&self) -> &'static str {
        "The exchange rate of the given currency"
    }

    fn args(&self, cmd: clap::Command) -> clap::Command {
        ExtrateArgs::augment_args(cmd)
    }

    fn execute(&self, ctx: &Context, matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
        let args = ExtrateArgs::from_arg_matches(matches)?;
        let client = ExchangeRateClient::from_config(&ctx.config)?;
        let table = client.latest(&args.currency)?;
        render_rates(&table, &args.targets, out)
    }
}

/// Header line, then one `CODE<TAB>rate` line per selected currency.
pub fn render_rates(table: &RateTable, targets: &[CurrencyCode], out: &mut dyn Write) -> Result<()> {
    let rows = table.select(targets)?;
    match table.updated.as_deref() {
        Some(updated) => writeln!(out, "1 {} = (updated {})", table.base, updated)?,
        None => writeln!(out, "1 {} =", table.base)?,
    }
    for (code, rate) in rows {
        writeln!(out, "{}\t{}", code, rate)?;
    }
    Ok(())
}
