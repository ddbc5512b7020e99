//! CLI command and subcommand definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// mimus command line
#[derive(Parser, Debug)]
#[command(name = "mimus")]
#[command(
    version,
    about = "Create mock services with ease",
    long_about = "mimus describes mock services in YAML config files and runs them.\n\n\
                  Services can be grouped into stacks, built from templates and \
                  shared between projects through imports."
)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a mimus project
    #[command(disable_help_flag = true)]
    Init {
        #[arg(
            num_args = 0..,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            hide = true
        )]
        args: Vec<String>,
    },

    /// Validate and view the mimus config file
    Config(ConfigArgs),

    /// Show the mimus version information
    Version,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config file path (default: $MIMUS_CONFIG, ./mimus.yml, ~/.config/mimus/mimus.yml)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Only print the names of the resolved services
    #[arg(long)]
    pub services: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// YAML output
    Yaml,
    /// JSON output
    Json,
}
