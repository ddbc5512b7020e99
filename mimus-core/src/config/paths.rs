//! Config file path resolution
//!
//! Uses the XDG config directory when available, with a fallback under `/etc`.

use std::path::{Path, PathBuf};

/// Environment variable naming the config file to load.
pub const CONFIG_ENV: &str = "MIMUS_CONFIG";

/// File name looked up in the working directory and the config directory.
pub const CONFIG_FILE_NAME: &str = "mimus.yml";

/// Returns the per-user config file path.
///
/// - Linux/macOS: `~/.config/mimus/mimus.yml`
/// - Fallback: `/etc/mimus/mimus.yml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("mimus")
        .join(CONFIG_FILE_NAME)
}

/// Picks the config file to load.
///
/// Priority: explicit path > `MIMUS_CONFIG` > `./mimus.yml` (if present) >
/// [`default_config_path`].
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return local;
    }

    default_config_path()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_is_yaml() {
        let path = default_config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("yml"));
        assert!(path.ends_with("mimus/mimus.yml"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_config_path(Some(Path::new("/tmp/custom.yml")));
        assert_eq!(path, PathBuf::from("/tmp/custom.yml"));
    }
}
