#![forbid(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;
use navtrap_core::logging::{self, LogFormat};
use navtrap_demo::{Cli, DemoError, parse_script, render, run};

fn log_format() -> LogFormat {
    #[cfg(feature = "json-logs")]
    {
        LogFormat::Json
    }
    #[cfg(not(feature = "json-logs"))]
    {
        LogFormat::Compact
    }
}

fn execute(cli: &Cli) -> Result<String, DemoError> {
    let config = cli.drawer_config()?;
    let steps = parse_script(&cli.keys)?;
    tracing::debug!(steps = steps.len(), links = cli.links, ?config, "starting walkthrough");
    let transcript = run(config, cli.nav_links(), &steps);
    render(&transcript, cli.format)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(log_format(), "warn");

    match execute(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "walkthrough failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
