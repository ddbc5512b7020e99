//! Configuration for mimus mock services
//!
//! This module loads the YAML files that describe which mock services to run.
//!
//! # Architecture
//!
//! - [`ConfigFile`] - One parsed and validated file
//! - [`Config`] - A root file plus everything it imports, with a shared
//!   namespace for stacks and named services
//! - [`Service`] - A fully resolved service, produced by [`Config::services`]

mod file;
mod items;
mod loader;
mod paths;

pub use file::{ConfigFile, CURRENT_VERSION, SUPPORTED_VERSIONS};
pub use items::{
    Endpoint, ImportItem, ProtocolAttrs, Service, ServiceItem, StackItem, StackRef,
    TemplateService,
};
pub use loader::Config;
pub use paths::{default_config_path, resolve_config_path, CONFIG_ENV, CONFIG_FILE_NAME};
