use std::io;

use anyhow::Result;
use clap::Args;
use tablesurvey::{config::Config, export};

use super::inputarg::InputArgs;

/// Extracts the table from a PDF and prints it as CSV.
#[derive(Args, Debug)]
pub struct Command {
    #[command(flatten)]
    input: InputArgs,
}

/// Runs the subcommand.
pub fn run(cmd: &Command, cfg: &Config) -> Result<()> {
    let table = cmd.input.extract_table(cfg)?;
    export::write_csv(&table, io::stdout().lock())
}
