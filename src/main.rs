//! CLI entry point for batch scoring and perturbation experiments

use clap::Parser;
use seamscore::io::cli::{Cli, CommandRunner};
use seamscore::io::logging::init_tracing;

fn main() -> seamscore::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());
    let mut runner = CommandRunner::new(cli);
    runner.run()
}
