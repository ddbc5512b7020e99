//! Command execution handlers

use anyhow::Result;
use mimus_core::{resolve_config_path, Config, MimusError};
use tracing::debug;

use crate::format::{format_service_names, format_services};

use super::commands::*;

/// Handle init command
///
/// Project scaffolding has not been designed yet, so this always fails.
pub fn handle_init(_args: &[String]) -> Result<()> {
    Err(MimusError::NotImplemented.into())
}

/// Handle config command
pub fn handle_config(args: &ConfigArgs) -> Result<()> {
    let path = resolve_config_path(args.file.as_deref());
    debug!("Loading config from {}", path.display());

    let config = Config::load(&path)?;
    let services = config.services()?;
    debug!(
        "Resolved {} service(s) from {} file(s)",
        services.len(),
        config.files().len()
    );

    let output = if args.services {
        format_service_names(&services)
    } else {
        format_services(&services, args.format)?
    };

    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}

/// Handle version command
pub fn handle_version() -> Result<()> {
    println!("{}", version_string());
    Ok(())
}

/// Program name and version, e.g. `mimus 0.1.0`
pub fn version_string() -> String {
    format!("mimus {}", env!("CARGO_PKG_VERSION"))
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_not_implemented() {
        let err = handle_init(&[]).unwrap_err();
        assert_eq!(err.to_string(), "not implemented");
        assert!(matches!(
            err.downcast_ref::<MimusError>(),
            Some(MimusError::NotImplemented)
        ));

        let err = handle_init(&["--force".to_string(), "demo".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "not implemented");
    }

    #[test]
    fn test_version_string() {
        assert_eq!(
            version_string(),
            format!("mimus {}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_config_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConfigArgs {
            file: Some(dir.path().join("absent.yml")),
            services: false,
            format: OutputFormat::Table,
        };

        let err = handle_config(&args).unwrap_err();
        assert!(err.to_string().starts_with("Cannot read config file"));
    }
}
