//! Port extraction from Dockerfiles, env files, framework config and source

use regex::Regex;
use std::collections::BTreeSet;

/// Compiled port patterns, grouped by the kind of file they apply to
pub struct PortScanner {
    expose: Regex,
    env_port: Regex,
    spring_properties: Regex,
    yaml_port: Regex,
    source: Vec<Regex>,
}

impl PortScanner {
    pub fn new() -> Self {
        Self {
            expose: Regex::new(r"(?mi)^\s*EXPOSE\s+(.+)$").expect("valid regex"),
            env_port: Regex::new(r#"(?m)^\s*(?:export\s+)?PORT\s*=\s*["']?(\d+)"#)
                .expect("valid regex"),
            spring_properties: Regex::new(r"(?m)^\s*(?:server|quarkus\.http)\.port\s*[=:]\s*(\d+)")
                .expect("valid regex"),
            yaml_port: Regex::new(r"(?m)^\s*port:\s*(\d+)\s*$").expect("valid regex"),
            source: vec![
                Regex::new(r"\.listen\(\s*(\d+)").expect("valid regex"),
                Regex::new(r#"ListenAndServe(?:TLS)?\(\s*"[^"]*:(\d+)""#).expect("valid regex"),
                Regex::new(r#"\.Run\(\s*"[^"]*:(\d+)""#).expect("valid regex"),
                Regex::new(r"\brun\([^)]*\bport\s*=\s*(\d+)").expect("valid regex"),
                Regex::new(r#"(?:bind|listen)\s*\(?\s*"(?:[\w.]+)?:(\d+)""#).expect("valid regex"),
                Regex::new(r"process\.env\.PORT\s*(?:\|\||\?\?)\s*(\d+)").expect("valid regex"),
            ],
        }
    }

    /// Whether `file_name` is a file the scanner reads at all
    pub fn is_candidate(&self, file_name: &str) -> bool {
        FileKind::of(file_name).is_some()
    }

    /// Ports found in one file, judged by its name
    pub fn scan(&self, file_name: &str, content: &str) -> BTreeSet<u16> {
        let mut ports = BTreeSet::new();

        match FileKind::of(file_name) {
            Some(FileKind::Dockerfile) => {
                for cap in self.expose.captures_iter(content) {
                    for token in cap[1].split_whitespace() {
                        let number = token.split('/').next().unwrap_or(token);
                        insert_port(&mut ports, number);
                    }
                }
            }
            Some(FileKind::Env) => self.collect(&self.env_port, content, &mut ports),
            Some(FileKind::Properties) => {
                self.collect(&self.spring_properties, content, &mut ports)
            }
            Some(FileKind::ApplicationYaml) => self.collect(&self.yaml_port, content, &mut ports),
            Some(FileKind::Source) => {
                for pattern in &self.source {
                    self.collect(pattern, content, &mut ports);
                }
            }
            None => {}
        }

        ports
    }

    fn collect(&self, pattern: &Regex, content: &str, ports: &mut BTreeSet<u16>) {
        for cap in pattern.captures_iter(content) {
            if let Some(m) = cap.get(1) {
                insert_port(ports, m.as_str());
            }
        }
    }
}

impl Default for PortScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_port(ports: &mut BTreeSet<u16>, raw: &str) {
    if let Ok(port) = raw.trim().parse::<u16>() {
        if port > 0 {
            ports.insert(port);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Dockerfile,
    Env,
    Properties,
    ApplicationYaml,
    Source,
}

impl FileKind {
    fn of(file_name: &str) -> Option<Self> {
        const SOURCE_EXTENSIONS: &[&str] = &[
            ".js", ".mjs", ".cjs", ".ts", ".py", ".go", ".java", ".kt", ".rb", ".php", ".rs", ".cs",
        ];

        let lower = file_name.to_ascii_lowercase();
        if lower == "dockerfile"
            || lower == "containerfile"
            || lower.starts_with("dockerfile.")
            || lower.ends_with(".dockerfile")
        {
            Some(FileKind::Dockerfile)
        } else if lower == ".env" || lower.starts_with(".env.") {
            Some(FileKind::Env)
        } else if lower.ends_with(".properties") {
            Some(FileKind::Properties)
        } else if lower.starts_with("application")
            && (lower.ends_with(".yml") || lower.ends_with(".yaml"))
        {
            Some(FileKind::ApplicationYaml)
        } else if SOURCE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            Some(FileKind::Source)
        } else {
            None
        }
    }
}
