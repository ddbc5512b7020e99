//! Configuration items: imports, stacks and service definitions
//!
//! Items are deserialized into loose `Raw*` shapes first, then validated into
//! the typed items below so every problem is reported as a [`ConfigError`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Protocol specific settings attached to a service.
pub type ProtocolAttrs = BTreeMap<String, serde_json::Value>;

/// A reference to another config file, resolved against the importing
/// file's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportItem {
    /// Canonical path of the imported file
    pub path: PathBuf,
    /// File containing the import statement
    pub file: Option<PathBuf>,
}

impl ImportItem {
    pub(crate) fn resolve(
        raw: &str,
        base_dir: &Path,
        file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let candidate = base_dir.join(raw);
        if !candidate.is_file() {
            return Err(
                ConfigError::new(format!("Import '{}' should point to a file", raw)).in_file(file),
            );
        }

        let path = candidate.canonicalize().map_err(|e| {
            ConfigError::new(format!("Cannot resolve import '{}': {}", raw, e)).in_file(file)
        })?;

        Ok(Self {
            path,
            file: file.map(Path::to_path_buf),
        })
    }
}

/// A named group of services, referenced from a service list with `stack:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackItem {
    pub name: String,
    /// Names of the services the stack pulls in, in order
    pub services: Vec<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawStack {
    name: String,
    #[serde(default)]
    services: Vec<String>,
}

impl StackItem {
    pub(crate) fn from_raw(raw: RawStack, file: Option<&Path>) -> Result<Self, ConfigError> {
        if raw.name.is_empty() {
            return Err(ConfigError::new("stack name should be a non-empty string").in_file(file));
        }

        Ok(Self {
            name: raw.name,
            services: raw.services,
            file: file.map(Path::to_path_buf),
        })
    }
}

/// Where and how a service is reachable.
///
/// Zero values (empty strings, port 0, no attributes) mean "unset", which is
/// what lets templated services overlay only the fields they name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Endpoint {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    pub port: u16,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub protocol_attrs: ProtocolAttrs,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub handler: String,
}

impl Endpoint {
    /// Overwrite every field that is set on `other`.
    pub fn overlay(&mut self, other: &Endpoint) {
        if !other.host.is_empty() {
            self.host = other.host.clone();
        }
        if !other.path.is_empty() {
            self.path = other.path.clone();
        }
        if other.port != 0 {
            self.port = other.port;
        }
        if !other.protocol.is_empty() {
            self.protocol = other.protocol.clone();
        }
        if !other.protocol_attrs.is_empty() {
            self.protocol_attrs = other.protocol_attrs.clone();
        }
        if !other.handler.is_empty() {
            self.handler = other.handler.clone();
        }
    }
}

/// A fully resolved service. Every service item ends up as one of these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub name: String,
    #[serde(flatten)]
    pub endpoint: Endpoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Provenance, most specific first: `template:<name>` / `stack:<name>`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inherits: Vec<String>,
}

/// A service built from another named service. Set fields override the
/// template's.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateService {
    pub name: String,
    pub template: String,
    pub endpoint: Endpoint,
    pub file: Option<PathBuf>,
}

/// A `stack: <name>` entry in a service list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRef {
    pub stack: String,
    pub file: Option<PathBuf>,
}

/// One entry of a `services:` list.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceItem {
    Stack(StackRef),
    Template(TemplateService),
    Basic(Service),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawService {
    name: Option<String>,
    template: Option<String>,
    stack: Option<String>,
    host: Option<String>,
    path: Option<String>,
    port: Option<i64>,
    protocol: Option<String>,
    protocol_attrs: Option<ProtocolAttrs>,
    handler: Option<String>,
}

impl RawService {
    /// Names of the fields that are set, stack excluded.
    fn set_fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("template", self.template.is_some()),
            ("host", self.host.is_some()),
            ("path", self.path.is_some()),
            ("port", self.port.is_some()),
            ("protocol", self.protocol.is_some()),
            ("protocol_attrs", self.protocol_attrs.is_some()),
            ("handler", self.handler.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
        .collect()
    }

    fn endpoint(&mut self, file: Option<&Path>) -> Result<Endpoint, ConfigError> {
        let port = match self.port {
            None => 0,
            Some(port) => u16::try_from(port).map_err(|_| {
                ConfigError::new("port should be an int in the range of [0, 65535]").in_file(file)
            })?,
        };

        Ok(Endpoint {
            host: self.host.take().unwrap_or_default(),
            path: self.path.take().unwrap_or_default(),
            port,
            protocol: self.protocol.take().unwrap_or_default(),
            protocol_attrs: self.protocol_attrs.take().unwrap_or_default(),
            handler: self.handler.take().unwrap_or_default(),
        })
    }
}

fn non_empty(value: String, what: &str, file: Option<&Path>) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::new(format!("{} should be a non-empty string", what)).in_file(file));
    }
    Ok(value)
}

impl ServiceItem {
    /// Name under which the item can be referenced. Stack references have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            ServiceItem::Stack(_) => None,
            ServiceItem::Template(t) => Some(&t.name),
            ServiceItem::Basic(s) => Some(&s.name),
        }
    }

    pub fn file(&self) -> Option<&Path> {
        match self {
            ServiceItem::Stack(s) => s.file.as_deref(),
            ServiceItem::Template(t) => t.file.as_deref(),
            ServiceItem::Basic(s) => s.file.as_deref(),
        }
    }

    /// Classify and validate a raw `services:` entry.
    ///
    /// `stack` makes a stack reference, `name` with `template` a templated
    /// service, and `name` alone a basic service.
    pub(crate) fn from_raw(mut raw: RawService, file: Option<&Path>) -> Result<Self, ConfigError> {
        let owned_file = file.map(Path::to_path_buf);

        if let Some(stack) = raw.stack.take() {
            let extra = raw.set_fields();
            if !extra.is_empty() {
                return Err(ConfigError::new(format!(
                    "Stack reference '{}' got unexpected field(s) '{}'",
                    stack,
                    extra.join(", ")
                ))
                .in_file(file));
            }

            return Ok(ServiceItem::Stack(StackRef {
                stack: non_empty(stack, "stack", file)?,
                file: owned_file,
            }));
        }

        let Some(name) = raw.name.take() else {
            let fields = raw.set_fields();
            let reason = if fields.is_empty() {
                "Unknown service definition".to_string()
            } else {
                format!(
                    "Unknown service definition with field(s) '{}'",
                    fields.join(", ")
                )
            };
            return Err(ConfigError::new(reason).in_file(file));
        };
        let name = non_empty(name, "name", file)?;
        let endpoint = raw.endpoint(file)?;

        match raw.template.take() {
            Some(template) => Ok(ServiceItem::Template(TemplateService {
                name,
                template: non_empty(template, "template", file)?,
                endpoint,
                file: owned_file,
            })),
            None => Ok(ServiceItem::Basic(Service {
                name,
                endpoint,
                file: owned_file,
                inherits: Vec::new(),
            })),
        }
    }
}
