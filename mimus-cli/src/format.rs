//! Output formatting utilities for the CLI
//!
//! Provides table, YAML and JSON renderings of resolved services.

use anyhow::Result;
use mimus_core::Service;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::OutputFormat;

/// Format resolved services
pub fn format_services(services: &[Service], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(services)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(services)?.trim_end().to_string()),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct ServiceRow {
                #[tabled(rename = "Name")]
                name: String,
                #[tabled(rename = "Address")]
                address: String,
                #[tabled(rename = "Protocol")]
                protocol: String,
                #[tabled(rename = "Handler")]
                handler: String,
                #[tabled(rename = "Inherits")]
                inherits: String,
            }

            let rows: Vec<ServiceRow> = services
                .iter()
                .map(|service| ServiceRow {
                    name: service.name.clone(),
                    address: format_address(service),
                    protocol: or_dash(&service.endpoint.protocol),
                    handler: or_dash(&service.endpoint.handler),
                    inherits: or_dash(&service.inherits.join(", ")),
                })
                .collect();

            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
    }
}

/// Format service names, one per line
pub fn format_service_names(services: &[Service]) -> String {
    services
        .iter()
        .map(|service| service.name.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_address(service: &Service) -> String {
    let endpoint = &service.endpoint;
    let host = if endpoint.host.is_empty() {
        "*"
    } else {
        endpoint.host.as_str()
    };
    format!("{}:{}{}", host, endpoint.port, endpoint.path)
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimus_core::config::Endpoint;

    fn sample_services() -> Vec<Service> {
        vec![
            Service {
                name: "api".to_string(),
                endpoint: Endpoint {
                    host: "localhost".to_string(),
                    path: "/api".to_string(),
                    port: 8080,
                    protocol: "http".to_string(),
                    handler: "mimus.handler.api".to_string(),
                    ..Default::default()
                },
                file: None,
                inherits: vec!["stack:backend".to_string()],
            },
            Service {
                name: "db".to_string(),
                endpoint: Endpoint {
                    port: 5432,
                    ..Default::default()
                },
                file: None,
                inherits: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_format_services_table() {
        let output = format_services(&sample_services(), OutputFormat::Table).unwrap();
        assert!(output.contains("Name"));
        assert!(output.contains("localhost:8080/api"));
        assert!(output.contains("*:5432"));
        assert!(output.contains("stack:backend"));
    }

    #[test]
    fn test_format_services_json() {
        let output = format_services(&sample_services(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed[0]["name"], "api");
        assert_eq!(parsed[0]["port"], 8080);
        assert_eq!(parsed[0]["inherits"][0], "stack:backend");
        // Unset fields are omitted
        assert!(parsed[1].get("host").is_none());
        assert!(parsed[1].get("inherits").is_none());
    }

    #[test]
    fn test_format_services_yaml() {
        let output = format_services(&sample_services(), OutputFormat::Yaml).unwrap();
        assert!(output.contains("name: api"));
        assert!(output.contains("handler: mimus.handler.api"));
        assert!(!output.ends_with('\n'));
    }

    #[test]
    fn test_format_service_names() {
        assert_eq!(format_service_names(&sample_services()), "api\ndb");
        assert_eq!(format_service_names(&[]), "");
    }
}
