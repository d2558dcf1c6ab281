mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

const SESSION_CLEAR_WAIT: std::time::Duration = std::time::Duration::from_secs(2);

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a session
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "unigate", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let ctx = config::open_session(&cli.global).await?;
            tracing::debug!(command = ?cmd, profile = %ctx.profile_name, "dispatching command");
            let result = commands::dispatch(cmd, &ctx, &cli.global).await;

            // The 401 handler clears the store on a background task; let it
            // finish before the runtime shuts down.
            if matches!(result, Err(CliError::SessionExpired)) {
                ctx.session.cache().settled(None, SESSION_CLEAR_WAIT).await;
            }
            result
        }
    }
}
