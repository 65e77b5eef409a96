use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use std::io;
use std::process::ExitCode;

use cohere::{run, Cli, RequestFailed};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    if let Some(shell) = cli.generate {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "cohere-cli", &mut io::stdout());
        return Ok(());
    }

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    run(&cli, command).await
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<RequestFailed>() {
        Some(failed) => {
            eprintln!("{}", failed.to_string().red());
            if let Some(body) = failed.body() {
                eprintln!("{}", body);
            }
        }
        None => eprintln!("{}", format!("{:#}", err).red()),
    }
}
