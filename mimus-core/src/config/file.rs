//! A single parsed config file

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::items::{ImportItem, RawService, RawStack, ServiceItem, StackItem};
use crate::error::ConfigError;

/// Version written by this release.
pub const CURRENT_VERSION: i64 = 0;

/// Versions this release knows how to read.
pub const SUPPORTED_VERSIONS: &[i64] = &[0];

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfigFile {
    #[serde(default, deserialize_with = "present")]
    version: Option<serde_yaml::Value>,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    stacks: Vec<RawStack>,
    #[serde(default)]
    services: Vec<RawService>,
}

// Keeps an explicit `version: null` apart from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_yaml::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_yaml::Value::deserialize(deserializer).map(Some)
}

/// Imports, stacks and services defined by one file.
///
/// `base_dir` is the directory relative imports are resolved against. For a
/// file on disk it is the file's parent, but in-memory configs may use any
/// directory.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub version: i64,
    pub imports: Vec<ImportItem>,
    pub stacks: Vec<StackItem>,
    pub services: Vec<ServiceItem>,
    pub base_dir: PathBuf,
    /// `None` when parsed from a string rather than a file
    pub file: Option<PathBuf>,
}

impl ConfigFile {
    /// Parse and validate one YAML document.
    pub fn from_yaml(
        content: &str,
        base_dir: &Path,
        file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let raw = Self::load_raw(content).map_err(|e| {
            ConfigError::new(format!("Invalid config: {}", e)).in_file(file)
        })?;

        let version = match raw.version {
            None => CURRENT_VERSION,
            Some(value) => value
                .as_i64()
                .ok_or_else(|| ConfigError::new("Invalid version, expected an integer").in_file(file))?,
        };
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(
                ConfigError::new(format!("Unsupported config version {}", version)).in_file(file),
            );
        }

        let imports = raw
            .imports
            .iter()
            .map(|import| ImportItem::resolve(import, base_dir, file))
            .collect::<Result<Vec<_>, _>>()?;

        let stacks = raw
            .stacks
            .into_iter()
            .map(|stack| StackItem::from_raw(stack, file))
            .collect::<Result<Vec<_>, _>>()?;

        let services = raw
            .services
            .into_iter()
            .map(|service| ServiceItem::from_raw(service, file))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version,
            imports,
            stacks,
            services,
            base_dir: base_dir.to_path_buf(),
            file: file.map(Path::to_path_buf),
        })
    }

    // Empty, comment-only and null documents are an empty config.
    fn load_raw(content: &str) -> Result<RawConfigFile, serde_yaml::Error> {
        let blank = content
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#') || line == "---");
        if blank {
            return Ok(RawConfigFile::default());
        }

        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if value.is_null() {
            return Ok(RawConfigFile::default());
        }
        serde_yaml::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        for content in ["", "# nothing here\n", "---\n"] {
            let config = ConfigFile::from_yaml(content, Path::new("."), None).unwrap();
            assert_eq!(config.version, CURRENT_VERSION);
            assert!(config.imports.is_empty());
            assert!(config.stacks.is_empty());
            assert!(config.services.is_empty());
            assert!(config.file.is_none());
        }
    }

    #[test]
    fn test_parse_stacks_and_services() {
        let yaml = r#"
version: 0
stacks:
  - name: backend
    services: [db, api]
services:
  - stack: backend
  - name: db
    host: localhost
    port: 5432
  - name: api
    protocol: http
    protocol_attrs:
      tls: false
  - name: api-v2
    template: api
    port: 8081
"#;

        let config = ConfigFile::from_yaml(yaml, Path::new("."), None).unwrap();

        assert_eq!(config.stacks.len(), 1);
        assert_eq!(config.stacks[0].name, "backend");
        assert_eq!(config.stacks[0].services, vec!["db", "api"]);

        assert_eq!(config.services.len(), 4);
        assert!(matches!(config.services[0], ServiceItem::Stack(_)));
        assert!(matches!(config.services[1], ServiceItem::Basic(_)));
        assert!(matches!(config.services[3], ServiceItem::Template(_)));

        match &config.services[2] {
            ServiceItem::Basic(api) => {
                assert_eq!(
                    api.endpoint.protocol_attrs.get("tls"),
                    Some(&serde_json::Value::Bool(false))
                );
            }
            other => panic!("Expected basic service, got {:?}", other),
        }
    }

    #[test]
    fn test_version_validation() {
        let err = ConfigError::new("Unsupported config version 2");
        assert_eq!(
            ConfigFile::from_yaml("version: 2", Path::new("."), None).unwrap_err(),
            err
        );

        for content in ["version: latest", "version: null", "version: ~", "version: 0.5"] {
            let err = ConfigFile::from_yaml(content, Path::new("."), None).unwrap_err();
            assert_eq!(err.reason, "Invalid version, expected an integer");
        }

        let config = ConfigFile::from_yaml("services: []", Path::new("."), None).unwrap();
        assert_eq!(config.version, CURRENT_VERSION);
    }

    #[test]
    fn test_unknown_top_level_key() {
        let err = ConfigFile::from_yaml("servces: []", Path::new("."), None).unwrap_err();
        assert!(err.reason.starts_with("Invalid config:"));
        assert!(err.reason.contains("servces"));
    }

    #[test]
    fn test_missing_import_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("mimus.yml");

        let err = ConfigFile::from_yaml("imports: [missing.yml]", dir.path(), Some(&file))
            .unwrap_err();

        assert_eq!(err.reason, "Import 'missing.yml' should point to a file");
        assert_eq!(err.file, Some(file));
    }

    #[test]
    fn test_imports_resolve_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("shared")).unwrap();
        std::fs::write(dir.path().join("shared/common.yml"), "").unwrap();

        let config =
            ConfigFile::from_yaml("imports: [shared/common.yml]", dir.path(), None).unwrap();

        assert_eq!(config.imports.len(), 1);
        assert_eq!(
            config.imports[0].path,
            dir.path().join("shared/common.yml").canonicalize().unwrap()
        );
    }
}
