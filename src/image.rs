//! Container image reference parsing.
//!
//! Parses Docker pull specifications (`registry/namespace/name:tag@digest`)
//! and image stream tag names (`name:tag`). Parsing is purely syntactic;
//! nothing here resolves a reference against a registry.

use std::sync::LazyLock;

use thiserror::Error;

/// Error produced while parsing a Docker pull specification.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ImageReferenceError {
    /// The specification is empty or has more path components than
    /// `registry/namespace/name` allows.
    #[error("invalid reference format")]
    InvalidFormat,

    /// A repository path component has characters outside the allowed set.
    #[error("invalid repository component \"{0}\"")]
    InvalidComponent(String),

    /// The registry host is not a valid hostname with optional port.
    #[error("invalid registry \"{0}\"")]
    InvalidRegistry(String),

    /// The tag is not a valid tag string.
    #[error("invalid tag \"{0}\"")]
    InvalidTag(String),

    /// The digest is not `algorithm:hex`.
    #[error("invalid digest \"{0}\"")]
    InvalidDigest(String),
}

/// Parsed components of a Docker pull specification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DockerImageReference {
    pub registry: String,
    pub namespace: String,
    pub name: String,
    pub tag: String,
    /// Content digest, when the reference pins one.
    pub id: String,
}

static COMPONENT_RE: LazyLock<Option<regex::Regex>> =
    LazyLock::new(|| regex::Regex::new(r"^[a-z0-9]+(?:(?:\.|_|__|-+)[a-z0-9]+)*$").ok());

static TAG_RE: LazyLock<Option<regex::Regex>> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]{0,127}$").ok());

static DIGEST_RE: LazyLock<Option<regex::Regex>> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[0-9a-fA-F]{32,}$").ok());

static REGISTRY_RE: LazyLock<Option<regex::Regex>> = LazyLock::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?)*(:[0-9]+)?$").ok()
});

fn matches(re: &LazyLock<Option<regex::Regex>>, s: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(s))
}

/// Whether the first path component of a repository names a registry host.
/// Hosts carry a dot or port, or are the literal `localhost`.
fn is_registry_component(component: &str) -> bool {
    component.contains('.') || component.contains(':') || component == "localhost"
}

/// Parse a Docker pull specification into its components.
///
/// Accepted shapes: `name`, `namespace/name`, `registry/namespace/name`,
/// each optionally followed by `:tag` and/or `@algorithm:digest`.
pub fn parse_docker_image_reference(
    spec: &str,
) -> Result<DockerImageReference, ImageReferenceError> {
    if spec.is_empty() {
        return Err(ImageReferenceError::InvalidFormat);
    }

    let (remainder, id) = match spec.split_once('@') {
        Some((repo, digest)) => {
            if !matches(&DIGEST_RE, digest) {
                return Err(ImageReferenceError::InvalidDigest(digest.to_string()));
            }
            (repo, digest.to_string())
        }
        None => (spec, String::new()),
    };

    // A colon after the last slash separates the tag from the repository;
    // a colon before it belongs to the registry port.
    let (repo, tag) = match remainder.rfind(':') {
        Some(idx) if idx > remainder.rfind('/').unwrap_or(0) => {
            let (repo, tag) = remainder.split_at(idx);
            let tag = &tag[1..];
            if !matches(&TAG_RE, tag) {
                return Err(ImageReferenceError::InvalidTag(tag.to_string()));
            }
            (repo, tag.to_string())
        }
        _ => (remainder, String::new()),
    };

    let mut parts: Vec<&str> = repo.split('/').collect();

    let mut reference = DockerImageReference {
        tag,
        id,
        ..Default::default()
    };

    if parts.len() > 1 && is_registry_component(parts[0]) {
        let registry = parts.remove(0);
        if !matches(&REGISTRY_RE, registry) {
            return Err(ImageReferenceError::InvalidRegistry(registry.to_string()));
        }
        reference.registry = registry.to_string();
    }

    for part in &parts {
        if !matches(&COMPONENT_RE, part) {
            return Err(ImageReferenceError::InvalidComponent((*part).to_string()));
        }
    }

    match parts.as_slice() {
        [name] => reference.name = (*name).to_string(),
        [namespace, name] => {
            reference.namespace = (*namespace).to_string();
            reference.name = (*name).to_string();
        }
        _ => return Err(ImageReferenceError::InvalidFormat),
    }

    Ok(reference)
}

/// Split an image stream tag name of the form `<name>:<tag>`.
///
/// Returns `None` unless there is exactly one colon and both segments are
/// non-empty.
pub fn split_image_stream_tag(name_and_tag: &str) -> Option<(&str, &str)> {
    let mut segments = name_and_tag.split(':');
    let name = segments.next()?;
    let tag = segments.next()?;
    if segments.next().is_some() || name.is_empty() || tag.is_empty() {
        return None;
    }
    Some((name, tag))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_name() {
        let parsed = parse_docker_image_reference("busybox").expect("should parse");
        assert_eq!(parsed.name, "busybox");
        assert!(parsed.registry.is_empty());
        assert!(parsed.namespace.is_empty());
        assert!(parsed.tag.is_empty());
    }

    #[test]
    fn test_parse_namespace_and_tag() {
        let parsed = parse_docker_image_reference("library/busybox:latest").expect("should parse");
        assert_eq!(parsed.namespace, "library");
        assert_eq!(parsed.name, "busybox");
        assert_eq!(parsed.tag, "latest");
    }

    #[test]
    fn test_parse_registry_with_port() {
        let parsed =
            parse_docker_image_reference("localhost:5000/myapp/web:v1").expect("should parse");
        assert_eq!(parsed.registry, "localhost:5000");
        assert_eq!(parsed.namespace, "myapp");
        assert_eq!(parsed.name, "web");
        assert_eq!(parsed.tag, "v1");
    }

    #[test]
    fn test_parse_digest() {
        let digest = "sha256:4bc453b53cb3d914b45f4b250294236adba2c0e09ff6f03793949e7e39fd4cc1";
        let parsed = parse_docker_image_reference(&format!("registry.example.com/ns/app@{digest}"))
            .expect("should parse");
        assert_eq!(parsed.registry, "registry.example.com");
        assert_eq!(parsed.id, digest);
        assert!(parsed.tag.is_empty());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(
            parse_docker_image_reference(""),
            Err(ImageReferenceError::InvalidFormat)
        );
    }

    #[test]
    fn test_parse_rejects_deep_paths() {
        assert_eq!(
            parse_docker_image_reference("registry.example.com/a/b/c"),
            Err(ImageReferenceError::InvalidFormat)
        );
    }

    #[test]
    fn test_parse_rejects_bad_component() {
        assert!(matches!(
            parse_docker_image_reference("library/Busy_Box"),
            Err(ImageReferenceError::InvalidComponent(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_digest() {
        assert!(matches!(
            parse_docker_image_reference("app@sha256:xyz"),
            Err(ImageReferenceError::InvalidDigest(_))
        ));
    }

    #[test]
    fn test_split_image_stream_tag() {
        assert_eq!(split_image_stream_tag("app:latest"), Some(("app", "latest")));
        assert_eq!(split_image_stream_tag("app"), None);
        assert_eq!(split_image_stream_tag("app:"), None);
        assert_eq!(split_image_stream_tag(":latest"), None);
        assert_eq!(split_image_stream_tag("a:b:c"), None);
    }
}
