//! Loading a config file together with everything it imports, and resolving
//! its service list.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::file::ConfigFile;
use super::items::{Service, ServiceItem, StackItem, TemplateService};
use crate::error::{ConfigError, MimusError};

/// A root config file plus every file reachable through its imports.
///
/// Stacks and named services from all files share one namespace. Only the
/// root file's `services:` list decides what [`Config::services`] yields.
#[derive(Debug, Default)]
pub struct Config {
    /// Parsed files in discovery order; the root comes first
    files: Vec<ConfigFile>,
    stacks: HashMap<String, StackItem>,
    services: HashMap<String, ServiceItem>,
}

impl Config {
    /// Read and parse the config file at `path`, following its imports.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| MimusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        Ok(Self::parse(&content, base_dir, Some(path))?)
    }

    /// Parse `content` as the root config, following its imports.
    ///
    /// `file` names the file the content came from, if any. It must exist.
    pub fn parse(content: &str, base_dir: &Path, file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = file
            .map(|file| {
                file.canonicalize().map_err(|_| {
                    ConfigError::new("'file' should be a valid file path").in_file(Some(file))
                })
            })
            .transpose()?;
        let base_dir = base_dir
            .canonicalize()
            .unwrap_or_else(|_| base_dir.to_path_buf());

        let root = ConfigFile::from_yaml(content, &base_dir, file.as_deref())?;

        let mut parsed: HashSet<PathBuf> = root.file.iter().cloned().collect();
        let mut pending: VecDeque<_> = root.imports.iter().cloned().collect();
        let mut files = vec![root];

        // The same file may be imported any number of times; it is parsed once.
        while let Some(import) = pending.pop_front() {
            if !parsed.insert(import.path.clone()) {
                continue;
            }

            debug!("Parsing imported config {}", import.path.display());
            let content = std::fs::read_to_string(&import.path).map_err(|e| {
                ConfigError::new(format!("Cannot read imported file: {}", e))
                    .in_file(import.file.as_deref())
            })?;
            let import_dir = import.path.parent().unwrap_or_else(|| Path::new("."));

            let config = ConfigFile::from_yaml(&content, import_dir, Some(&import.path))?;
            pending.extend(config.imports.iter().cloned());
            files.push(config);
        }

        let mut config = Self {
            files,
            ..Default::default()
        };
        config.register_all()?;

        Ok(config)
    }

    fn register_all(&mut self) -> Result<(), ConfigError> {
        let stacks: Vec<_> = self.files.iter().flat_map(|f| f.stacks.clone()).collect();
        for stack in stacks {
            self.register_stack(stack)?;
        }

        let services: Vec<_> = self
            .files
            .iter()
            .flat_map(|f| f.services.iter().filter(|s| s.name().is_some()).cloned())
            .collect();
        for service in services {
            self.register_service(service)?;
        }

        debug!(
            "Registered {} stack(s) and {} named service(s) from {} file(s)",
            self.stacks.len(),
            self.services.len(),
            self.files.len()
        );
        Ok(())
    }

    fn register_stack(&mut self, stack: StackItem) -> Result<(), ConfigError> {
        match self.stacks.get(&stack.name) {
            None => {
                self.stacks.insert(stack.name.clone(), stack);
                Ok(())
            }
            Some(prev) if prev.services == stack.services => Ok(()),
            Some(prev) => Err(ConfigError::new(format!(
                "Duplicate stack name '{}' but different services lists {:?} and {:?} found in {} and {}",
                stack.name,
                prev.services,
                stack.services,
                describe(prev.file.as_deref()),
                describe(stack.file.as_deref()),
            ))),
        }
    }

    fn register_service(&mut self, service: ServiceItem) -> Result<(), ConfigError> {
        let Some(name) = service.name().map(str::to_string) else {
            return Ok(());
        };

        let Some(prev) = self.services.get(&name) else {
            self.services.insert(name, service);
            return Ok(());
        };

        let reason = match (service.file(), prev.file()) {
            (Some(file), Some(prev_file)) => format!(
                "Duplicate service name '{}' found in {} and {}",
                name,
                file.display(),
                prev_file.display()
            ),
            _ => format!("Duplicate service name '{}' found", name),
        };
        Err(ConfigError::new(reason))
    }

    /// The root file.
    pub fn root(&self) -> Option<&ConfigFile> {
        self.files.first()
    }

    /// Every parsed file, root first.
    pub fn files(&self) -> &[ConfigFile] {
        &self.files
    }

    /// Look up a stack by name.
    pub fn stack(&self, name: &str) -> Option<&StackItem> {
        self.stacks.get(name)
    }

    /// Resolve the root file's service list into concrete services.
    ///
    /// Stack references expand to the stack's services, each stack at most
    /// once. Templated services are built from their template.
    pub fn services(&self) -> Result<Vec<Service>, ConfigError> {
        let Some(root) = self.root() else {
            return Ok(Vec::new());
        };

        let mut resolved = Vec::new();
        let mut included_stacks = HashSet::new();

        for item in &root.services {
            match item {
                ServiceItem::Stack(stack_ref) => {
                    if !included_stacks.insert(stack_ref.stack.as_str()) {
                        continue;
                    }
                    resolved.extend(self.resolve_stack(&stack_ref.stack, stack_ref.file.as_deref())?);
                }
                other => resolved.push(self.resolve_named(other, &mut Vec::new())?),
            }
        }

        Ok(resolved)
    }

    fn resolve_stack(&self, name: &str, file: Option<&Path>) -> Result<Vec<Service>, ConfigError> {
        let stack = self.stacks.get(name).ok_or_else(|| {
            ConfigError::new(format!("Cannot find stack with name '{}'", name)).in_file(file)
        })?;

        stack
            .services
            .iter()
            .map(|service_name| {
                let item = self.services.get(service_name).ok_or_else(|| {
                    ConfigError::new(format!(
                        "Cannot find service '{}' for stack '{}'",
                        service_name, name
                    ))
                    .in_file(stack.file.as_deref())
                })?;

                let mut service = self.resolve_named(item, &mut Vec::new())?;
                service.inherits.insert(0, format!("stack:{}", name));
                Ok(service)
            })
            .collect()
    }

    // `chain` holds the templated services currently being resolved.
    fn resolve_named(
        &self,
        item: &ServiceItem,
        chain: &mut Vec<String>,
    ) -> Result<Service, ConfigError> {
        match item {
            ServiceItem::Basic(service) => Ok(service.clone()),
            ServiceItem::Template(templated) => self.resolve_template(templated, chain),
            ServiceItem::Stack(stack_ref) => Err(ConfigError::new(format!(
                "Stack '{}' cannot be used as a service",
                stack_ref.stack
            ))
            .in_file(stack_ref.file.as_deref())),
        }
    }

    fn resolve_template(
        &self,
        templated: &TemplateService,
        chain: &mut Vec<String>,
    ) -> Result<Service, ConfigError> {
        if chain.contains(&templated.name) {
            chain.push(templated.name.clone());
            return Err(ConfigError::new(format!(
                "Template cycle detected: {}",
                chain.join(" -> ")
            ))
            .in_file(templated.file.as_deref()));
        }

        let template = self.services.get(&templated.template).ok_or_else(|| {
            ConfigError::new(format!(
                "Cannot find template '{}' for service '{}'",
                templated.template, templated.name
            ))
            .in_file(templated.file.as_deref())
        })?;

        chain.push(templated.name.clone());
        let mut service = self.resolve_named(template, chain)?;
        chain.pop();

        service.name = templated.name.clone();
        service.endpoint.overlay(&templated.endpoint);
        service.file = templated.file.clone();
        service
            .inherits
            .insert(0, format!("template:{}", templated.template));

        Ok(service)
    }
}

fn describe(file: Option<&Path>) -> String {
    file.map(|f| f.display().to_string())
        .unwrap_or_else(|| "<input>".to_string())
}
