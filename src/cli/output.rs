//! Scan result rendering as JSON, YAML or human-readable text

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::DevscoutConfig;
use crate::scan::ScanResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

/// One component context as presented to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentReport {
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devfile_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devfile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub root: String,
    pub components: Vec<ComponentReport>,
}

impl ScanReport {
    pub fn new(root: impl Into<String>, result: &ScanResult) -> Self {
        let components = result
            .contexts()
            .into_iter()
            .map(|context| ComponentReport {
                context: context.to_string(),
                devfile_url: result.devfile_urls.get(context).cloned(),
                devfile: result
                    .devfiles
                    .get(context)
                    .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
                dockerfile: result.dockerfiles.get(context).cloned(),
                ports: result
                    .ports
                    .get(context)
                    .map(|ports| ports.iter().copied().collect())
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            root: root.into(),
            components,
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &ScanReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize scan result to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize scan result to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(report)),
        }
    }

    pub fn format_config(&self, config: &DevscoutConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&config.to_display_map())
                .context("Failed to serialize config to YAML"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_human(&self, report: &ScanReport) -> String {
        let mut output = String::new();

        if report.components.is_empty() {
            output.push_str(&format!(
                "\u{26A0} No devfile or Dockerfile found in {}\n",
                report.root
            ));
            return output;
        }

        output.push_str(&format!(
            "\u{2713} {} component(s) in {}\n",
            report.components.len(),
            report.root
        ));
        output.push_str(&"\u{2501}".repeat(42));
        output.push_str("\n\n");

        for component in &report.components {
            output.push_str(&format!("{}\n", component.context));

            let mut lines = Vec::new();
            lines.push(format!(
                "Devfile:     {}",
                match (&component.devfile_url, &component.devfile) {
                    (Some(url), _) => url.clone(),
                    (None, Some(_)) => "(found, no source URL)".to_string(),
                    (None, None) => "(none)".to_string(),
                }
            ));
            lines.push(format!(
                "Dockerfile:  {}",
                component.dockerfile.as_deref().unwrap_or("(none)")
            ));
            if !component.ports.is_empty() {
                let ports: Vec<String> = component.ports.iter().map(|p| p.to_string()).collect();
                lines.push(format!("Ports:       {}", ports.join(", ")));
            }

            for (i, line) in lines.iter().enumerate() {
                let connector = if i == lines.len() - 1 {
                    "\u{2514}\u{2500}"
                } else {
                    "\u{251C}\u{2500}"
                };
                output.push_str(&format!("{} {}\n", connector, line));
            }
            output.push('\n');
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sample_result() -> ScanResult {
        let mut result = ScanResult::default();
        result
            .devfiles
            .insert("backend".to_string(), b"schemaVersion: 2.2.0\n".to_vec());
        result.devfile_urls.insert(
            "backend".to_string(),
            "https://raw.githubusercontent.com/org/repo/main/backend/devfile.yaml".to_string(),
        );
        result
            .dockerfiles
            .insert("frontend".to_string(), "docker/Dockerfile".to_string());
        result
            .ports
            .insert("frontend".to_string(), BTreeSet::from([8080, 3000]));
        result
    }

    #[test]
    fn test_report_groups_by_context() {
        let report = ScanReport::new("/repo", &sample_result());

        assert_eq!(report.components.len(), 2);
        let backend = &report.components[0];
        assert_eq!(backend.context, "backend");
        assert_eq!(backend.devfile.as_deref(), Some("schemaVersion: 2.2.0\n"));
        assert!(backend.dockerfile.is_none());

        let frontend = &report.components[1];
        assert_eq!(frontend.ports, vec![3000, 8080]);
    }

    #[test]
    fn test_json_output() {
        let report = ScanReport::new("/repo", &sample_result());
        let output = OutputFormatter::new(OutputFormat::Json).format(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["root"], "/repo");
        assert_eq!(value["components"][1]["dockerfile"], "docker/Dockerfile");
        assert!(value["components"][0].get("ports").is_none());
    }

    #[test]
    fn test_yaml_output() {
        let report = ScanReport::new("/repo", &sample_result());
        let output = OutputFormatter::new(OutputFormat::Yaml).format(&report).unwrap();
        assert!(output.contains("context: frontend"));
        assert!(output.contains("- 3000"));
    }

    #[test]
    fn test_human_output() {
        let report = ScanReport::new("/repo", &sample_result());
        let output = OutputFormatter::new(OutputFormat::Human).format(&report).unwrap();

        assert!(output.contains("2 component(s) in /repo"));
        assert!(output.contains("backend/devfile.yaml"));
        assert!(output.contains("Dockerfile:  docker/Dockerfile"));
        assert!(output.contains("Ports:       3000, 8080"));
    }

    #[test]
    fn test_human_output_empty() {
        let report = ScanReport::new("/repo", &ScanResult::default());
        let output = OutputFormatter::new(OutputFormat::Human).format(&report).unwrap();
        assert!(output.contains("No devfile or Dockerfile found"));
    }
}
