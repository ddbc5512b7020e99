//! Argument parsing and command dispatch
//!
//! [`execute`] is the whole program minus the process exit: it returns the
//! failure instead of reporting it, so the binary decides how errors reach
//! the user.

use anyhow::{anyhow, bail, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::io::IsTerminal;
use tracing::debug;

use super::commands::{Cli, Commands};
use super::handlers::{generate_completion, handle_config, handle_init, handle_version};

/// Parse `args` (program name first) and run the selected command.
///
/// `--help` and `--version` print to stdout and succeed, except after `init`,
/// which ignores every argument. Every other parse failure becomes a
/// single-line error without usage text.
pub fn execute<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{}", err);
                return Ok(());
            }
            _ => return Err(anyhow!(parse_error_message(&err))),
        },
    };

    // `init` ignores its arguments, the global verbose flag included.
    let verbose = cli.verbose && !matches!(cli.command, Some(Commands::Init { .. }));
    init_tracing(verbose);
    dispatch(cli)
}

/// Run the command selected on an already parsed command line.
pub fn dispatch(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        bail!("no command given");
    };
    debug!("Dispatching {:?}", command);

    match command {
        Commands::Init { args } => handle_init(&args),
        Commands::Config(args) => handle_config(&args),
        Commands::Version => handle_version(),
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(())
        }
    }
}

/// Reduce a clap error to its first line, without the `error: ` prefix.
pub fn parse_error_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let line = rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("invalid arguments");

    line.strip_prefix("error: ").unwrap_or(line).to_string()
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber is already installed when execute runs more than once in
    // one process.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .try_init();
}
