//! Dockerfile references declared inside devfile image components

use super::model::Devfile;

/// A Dockerfile location declared by a devfile image component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerfileReference {
    /// Network location, usable outside the component context
    Absolute(String),
    /// Path relative to the devfile, resolved later by the build
    Relative(String),
}

impl DockerfileReference {
    pub fn uri(&self) -> &str {
        match self {
            DockerfileReference::Absolute(uri) | DockerfileReference::Relative(uri) => uri,
        }
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self, DockerfileReference::Absolute(_))
    }
}

pub(crate) fn is_network_uri(uri: &str) -> bool {
    let lower = uri.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Returns the first non-empty Dockerfile URI declared by an image component
pub fn find_dockerfile_reference(devfile: &Devfile) -> Option<DockerfileReference> {
    devfile
        .image_components()
        .filter_map(|(_, image)| image.dockerfile.as_ref()?.uri.as_deref())
        .map(str::trim)
        .find(|uri| !uri.is_empty())
        .map(|uri| {
            if is_network_uri(uri) {
                DockerfileReference::Absolute(uri.to_string())
            } else {
                DockerfileReference::Relative(uri.to_string())
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devfile(yaml: &str) -> Devfile {
        Devfile::from_slice(yaml.as_bytes()).unwrap()
    }

    #[test]
    fn test_relative_reference() {
        let devfile = devfile(
            r#"
schemaVersion: 2.2.0
components:
  - name: build
    image:
      imageName: app:latest
      dockerfile:
        uri: docker/Dockerfile.jvm
"#,
        );
        assert_eq!(
            find_dockerfile_reference(&devfile),
            Some(DockerfileReference::Relative("docker/Dockerfile.jvm".to_string()))
        );
    }

    #[test]
    fn test_absolute_reference() {
        let devfile = devfile(
            r#"
schemaVersion: 2.2.0
components:
  - name: build
    image:
      dockerfile:
        uri: https://raw.githubusercontent.com/org/repo/main/Dockerfile
"#,
        );
        let reference = find_dockerfile_reference(&devfile).unwrap();
        assert!(reference.is_absolute());
        assert_eq!(
            reference.uri(),
            "https://raw.githubusercontent.com/org/repo/main/Dockerfile"
        );
    }

    #[test]
    fn test_skips_image_components_without_uri() {
        let devfile = devfile(
            r#"
schemaVersion: 2.2.0
components:
  - name: prebuilt
    image:
      imageName: quay.io/org/app:1.0
  - name: empty-uri
    image:
      dockerfile:
        uri: ""
  - name: build
    image:
      dockerfile:
        uri: Containerfile
"#,
        );
        assert_eq!(
            find_dockerfile_reference(&devfile),
            Some(DockerfileReference::Relative("Containerfile".to_string()))
        );
    }

    #[test]
    fn test_no_image_components() {
        let devfile = devfile(
            r#"
schemaVersion: 2.2.0
components:
  - name: runtime
    container:
      image: node:20
"#,
        );
        assert_eq!(find_dockerfile_reference(&devfile), None);
    }

    #[test]
    fn test_is_network_uri() {
        assert!(is_network_uri("http://example.com/Dockerfile"));
        assert!(is_network_uri("HTTPS://example.com/Dockerfile"));
        assert!(!is_network_uri("httpd/Dockerfile"));
        assert!(!is_network_uri("./Dockerfile"));
    }
}
