//! Devfile model, parsing and inspection
//!
//! The resolution engine only needs three things from a devfile: whether it
//! parses, whether it is an ignore sentinel, and which Dockerfile its image
//! components reference. Everything else is carried through untouched.

mod dockerfile;
mod mock;
mod model;
mod parser;

pub use dockerfile::{find_dockerfile_reference, DockerfileReference};
pub(crate) use dockerfile::is_network_uri;
pub use mock::MockDevfileParser;
pub use model::{Component, Devfile, DockerfileImage, ImageComponent, Metadata};
pub use parser::{DevfileError, DevfileParser, DevfileSource, YamlDevfileParser};

/// Recognized devfile names, matched case-insensitively
pub const DEVFILE_NAMES: [&str; 4] = [
    "devfile.yaml",
    ".devfile.yaml",
    "devfile.yml",
    ".devfile.yml",
];

/// Hidden directory that may hold a devfile at the same logical depth
pub const HIDDEN_DEVFILE_DIR: &str = ".devfile";

/// Canonical devfile name inside registry sample repositories
pub const DEFAULT_DEVFILE: &str = "devfile.yaml";

pub fn is_devfile_name(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    DEVFILE_NAMES.iter().any(|name| *name == lower)
}

/// A devfile that parses but declares no components of its own (empty or
/// parent-only) carries no information about the component and is treated
/// as if it were absent.
pub fn is_ignore_sentinel(devfile: &Devfile) -> bool {
    devfile.components.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devfile_names_are_case_insensitive() {
        assert!(is_devfile_name("devfile.yaml"));
        assert!(is_devfile_name("DevFile.YAML"));
        assert!(is_devfile_name(".devfile.yaml"));
        assert!(is_devfile_name("devfile.yml"));
        assert!(is_devfile_name(".DEVFILE.yml"));
        assert!(!is_devfile_name("devfile.json"));
        assert!(!is_devfile_name("my-devfile.yaml"));
    }

    #[test]
    fn test_parent_only_devfile_is_sentinel() {
        let devfile = Devfile::from_slice(
            b"schemaVersion: 2.2.0\nparent:\n  id: nodejs\n  registryUrl: https://registry.devfile.io\n",
        )
        .unwrap();
        assert!(is_ignore_sentinel(&devfile));
    }

    #[test]
    fn test_devfile_with_components_is_not_sentinel() {
        let devfile = Devfile::from_slice(
            b"schemaVersion: 2.2.0\ncomponents:\n  - name: runtime\n    container:\n      image: node:20\n",
        )
        .unwrap();
        assert!(!is_ignore_sentinel(&devfile));
    }
}
