//! Image reference and secret reference validation.
//!
//! Build input ("from") and build output ("to") references accept
//! different kind sets, so each direction gets its own validator and each
//! error message enumerates exactly the kinds legal at that call site.

use crate::crd::{LocalObjectReference, ObjectReference};
use crate::image::{parse_docker_image_reference, split_image_stream_tag};

use super::errors::ErrorList;
use super::metadata::is_dns1123_subdomain;

/// Validate an image reference used as a build output target.
/// Legal kinds: ImageStreamTag, DockerImage.
pub fn validate_to_image_reference(reference: &ObjectReference) -> ErrorList {
    let mut errs = ErrorList::new();
    match reference.kind.as_str() {
        "ImageStreamTag" => {
            if reference.name.is_empty() {
                errs.required("name");
            } else if split_image_stream_tag(&reference.name).is_none() {
                errs.invalid(
                    "name",
                    &reference.name,
                    "ImageStreamTag object references must be in the form <name>:<tag>",
                );
            }
            if !reference.namespace.is_empty() && !is_dns1123_subdomain(&reference.namespace) {
                errs.invalid(
                    "namespace",
                    &reference.namespace,
                    "namespace must be a valid subdomain",
                );
            }
        }
        "DockerImage" => {
            if !reference.namespace.is_empty() {
                errs.invalid(
                    "namespace",
                    &reference.namespace,
                    "namespace is not valid when used with a 'DockerImage'",
                );
            }
            if let Err(err) = parse_docker_image_reference(&reference.name) {
                errs.invalid(
                    "name",
                    &reference.name,
                    format!("name is not a valid Docker pull specification: {err}"),
                );
            }
        }
        "" => errs.required("kind"),
        _ => errs.invalid(
            "kind",
            &reference.kind,
            "the target of build output must be an 'ImageStreamTag' or 'DockerImage'",
        ),
    }
    errs
}

/// Validate an image reference used as a build input.
/// Legal kinds: ImageStreamTag, DockerImage, ImageStreamImage.
pub fn validate_from_image_reference(reference: &ObjectReference) -> ErrorList {
    let mut errs = ErrorList::new();
    match reference.kind.as_str() {
        "ImageStreamTag" => {
            if reference.name.is_empty() {
                errs.required("name");
            } else if split_image_stream_tag(&reference.name).is_none() {
                errs.invalid(
                    "name",
                    &reference.name,
                    "ImageStreamTag object references must be in the form <name>:<tag>",
                );
            }
            if !reference.namespace.is_empty() && !is_dns1123_subdomain(&reference.namespace) {
                errs.invalid(
                    "namespace",
                    &reference.namespace,
                    "namespace must be a valid subdomain",
                );
            }
        }
        "DockerImage" => {
            if !reference.namespace.is_empty() {
                errs.invalid(
                    "namespace",
                    &reference.namespace,
                    "namespace is not valid when used with a 'DockerImage'",
                );
            }
            if reference.name.is_empty() {
                errs.required("name");
            } else if let Err(err) = parse_docker_image_reference(&reference.name) {
                errs.invalid(
                    "name",
                    &reference.name,
                    format!("name is not a valid Docker pull specification: {err}"),
                );
            }
        }
        "ImageStreamImage" => {
            if reference.name.is_empty() {
                errs.required("name");
            }
            if !reference.namespace.is_empty() && !is_dns1123_subdomain(&reference.namespace) {
                errs.invalid(
                    "namespace",
                    &reference.namespace,
                    "namespace must be a valid subdomain",
                );
            }
        }
        "" => errs.required("kind"),
        _ => errs.invalid(
            "kind",
            &reference.kind,
            "the source of a builder image must be an 'ImageStreamTag', 'ImageStreamImage', or 'DockerImage'",
        ),
    }
    errs
}

/// Validate an optional secret reference. When present, the name is
/// required; nothing checks the secret actually exists.
pub fn validate_secret_ref(reference: Option<&LocalObjectReference>) -> ErrorList {
    let mut errs = ErrorList::new();
    let Some(reference) = reference else {
        return errs;
    };
    if reference.name.is_empty() {
        errs.required("name");
    }
    errs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(kind: &str, name: &str, namespace: &str) -> ObjectReference {
        ObjectReference {
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: namespace.to_string(),
        }
    }

    #[test]
    fn test_to_image_stream_tag_valid() {
        let errs = validate_to_image_reference(&reference("ImageStreamTag", "app:latest", ""));
        assert!(errs.is_empty());
    }

    #[test]
    fn test_to_image_stream_tag_requires_name_and_tag() {
        let errs = validate_to_image_reference(&reference("ImageStreamTag", "app", ""));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "name");
    }

    #[test]
    fn test_to_image_stream_tag_empty_name() {
        let errs = validate_to_image_reference(&reference("ImageStreamTag", "", ""));
        assert_eq!(errs.len(), 1);
        assert!(matches!(
            errs.errors()[0],
            crate::validation::ValidationError::Required { .. }
        ));
    }

    #[test]
    fn test_to_docker_image_rejects_namespace() {
        let errs = validate_to_image_reference(&reference("DockerImage", "repo:tag", "ns"));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "namespace");
    }

    #[test]
    fn test_to_rejects_image_stream_image() {
        let errs = validate_to_image_reference(&reference("ImageStreamImage", "app@id", ""));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "kind");
    }

    #[test]
    fn test_to_empty_kind_required() {
        let errs = validate_to_image_reference(&reference("", "app:latest", ""));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "kind");
    }

    #[test]
    fn test_from_accepts_image_stream_image() {
        let errs = validate_from_image_reference(&reference("ImageStreamImage", "app@sha", "ns"));
        assert!(errs.is_empty());
    }

    #[test]
    fn test_from_docker_image_requires_name() {
        let errs = validate_from_image_reference(&reference("DockerImage", "", ""));
        assert_eq!(errs.len(), 1);
        assert!(matches!(
            errs.errors()[0],
            crate::validation::ValidationError::Required { .. }
        ));
    }

    #[test]
    fn test_from_docker_image_wraps_parse_error() {
        let errs = validate_from_image_reference(&reference("DockerImage", "reg.io/a/b/c", ""));
        assert_eq!(errs.len(), 1);
        match &errs.errors()[0] {
            crate::validation::ValidationError::Invalid { reason, .. } => {
                assert!(reason.starts_with("name is not a valid Docker pull specification:"));
            }
            other => panic!("expected invalid error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_bad_namespace() {
        let errs =
            validate_from_image_reference(&reference("ImageStreamTag", "app:latest", "Bad_NS"));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "namespace");
    }

    #[test]
    fn test_secret_ref() {
        assert!(validate_secret_ref(None).is_empty());
        assert!(
            validate_secret_ref(Some(&LocalObjectReference {
                name: "push-secret".to_string()
            }))
            .is_empty()
        );
        let errs = validate_secret_ref(Some(&LocalObjectReference::default()));
        assert_eq!(errs.len(), 1);
    }
}
