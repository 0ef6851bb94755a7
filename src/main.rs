//! CLI entry point for building reaction-rule statistics

use clap::Parser;
use rxnstats::io::cli::{Cli, CommandRunner};
use rxnstats::io::logging::init_logging;

fn main() -> rxnstats::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    CommandRunner::new(cli).process()
}
