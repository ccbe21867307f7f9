//! Generic object metadata validation.
//!
//! The small shared layer the resource validators call into before their
//! own spec checks: name/namespace syntax on create, immutability on
//! update. Resource-specific name rules are passed in as a function.

use std::sync::LazyLock;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use super::errors::ErrorList;

/// Maximum length of a DNS-1123 subdomain.
const MAX_DNS1123_SUBDOMAIN_LENGTH: usize = 253;

static DNS1123_SUBDOMAIN_RE: LazyLock<Option<regex::Regex>> = LazyLock::new(|| {
    // RFC 1123 subdomain: [a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*
    regex::Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$").ok()
});

/// Check if a value is a valid DNS-1123 subdomain.
pub fn is_dns1123_subdomain(value: &str) -> bool {
    value.len() <= MAX_DNS1123_SUBDOMAIN_LENGTH
        && DNS1123_SUBDOMAIN_RE.as_ref().is_some_and(|re| re.is_match(value))
}

/// Name rule for resources addressed as DNS subdomains. Returns a reason
/// when the name is unacceptable.
pub fn name_is_dns_subdomain(name: &str) -> Option<String> {
    if is_dns1123_subdomain(name) {
        None
    } else {
        Some("name must be a valid subdomain".to_string())
    }
}

/// Minimal name rule for subresource requests: anything goes except path
/// and escape characters.
pub fn minimal_name_requirements(name: &str) -> Option<String> {
    if name.contains('/') {
        return Some("name may not contain \"/\"".to_string());
    }
    if name.contains('%') {
        return Some("name may not contain \"%\"".to_string());
    }
    None
}

/// Validate object metadata for a create operation.
///
/// `name_fn` encodes the resource-specific name rule; it returns a reason
/// when the name is unacceptable.
pub fn validate_object_meta(
    meta: &ObjectMeta,
    require_namespace: bool,
    name_fn: fn(&str) -> Option<String>,
) -> ErrorList {
    let mut errs = ErrorList::new();

    match meta.name.as_deref() {
        None | Some("") => {
            // generateName is an acceptable substitute for name.
            if meta.generate_name.as_deref().unwrap_or_default().is_empty() {
                errs.required("name");
            }
        }
        Some(name) => {
            if let Some(reason) = name_fn(name) {
                errs.invalid("name", name, reason);
            }
        }
    }

    let namespace = meta.namespace.as_deref().unwrap_or_default();
    if require_namespace {
        if namespace.is_empty() {
            errs.required("namespace");
        } else if !is_dns1123_subdomain(namespace) {
            errs.invalid("namespace", namespace, "namespace must be a valid subdomain");
        }
    } else if !namespace.is_empty() {
        errs.invalid("namespace", namespace, "namespace is not allowed on this type");
    }

    errs
}

/// Validate object metadata for an update operation. Name and namespace
/// identify the object and may never change.
pub fn validate_object_meta_update(new_meta: &ObjectMeta, old_meta: &ObjectMeta) -> ErrorList {
    let mut errs = ErrorList::new();

    if new_meta.name != old_meta.name {
        errs.invalid(
            "name",
            new_meta.name.as_deref().unwrap_or_default(),
            "field is immutable",
        );
    }
    if new_meta.namespace != old_meta.namespace {
        errs.invalid(
            "namespace",
            new_meta.namespace.as_deref().unwrap_or_default(),
            "field is immutable",
        );
    }

    errs
}
