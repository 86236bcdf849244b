use std::process::ExitCode;

use clap::Parser;
use phototerm_tui::Cli;
use phototerm_tui::run_main;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    run_main(cli)
}
