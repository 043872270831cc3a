mod cli;

use watersteg::{batch, config, console::Console, logging};
use watersteg_tools::{SystemRunner, ToolRegistry};

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(cli.verbose);
    let console = Console::new(cli.quiet);

    match run(&cli, &console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            console.error(format!("{e:#}: the program has to stop."));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, console: &Console) -> Result<()> {
    let config = config::load_config_or_default(cli.config_path().as_deref())?;
    let options = cli.run_options();

    let tools = ToolRegistry::discover(&config.tools);
    let runner = SystemRunner::new().echo_commands(cli.debug);

    let report = batch::run(&options, &config, &tools, &runner, console)?;
    if !report.failures.is_empty() {
        tracing::warn!(
            "{} transformation(s) reported a tool failure",
            report.failures.len()
        );
    }

    Ok(())
}
