//! Build log option validation.
//!
//! The generic pod-log option rules plus the build-specific version
//! selector.

use crate::crd::BuildLogOptions;

use super::errors::ErrorList;

/// Generic pod log option rules, applied to the fields builds share with
/// pods.
fn validate_pod_log_options(opts: &BuildLogOptions) -> ErrorList {
    let mut errs = ErrorList::new();
    if let Some(tail_lines) = opts.tail_lines {
        if tail_lines < 0 {
            errs.invalid(
                "tailLines",
                tail_lines.to_string(),
                "tailLines must be greater than or equal to 0",
            );
        }
    }
    if let Some(limit_bytes) = opts.limit_bytes {
        if limit_bytes < 1 {
            errs.invalid(
                "limitBytes",
                limit_bytes.to_string(),
                "limitBytes must be greater than 0",
            );
        }
    }
    if let Some(since_seconds) = opts.since_seconds {
        if since_seconds < 1 {
            errs.invalid(
                "sinceSeconds",
                since_seconds.to_string(),
                "sinceSeconds must be greater than 0",
            );
        }
    }
    if opts.since_seconds.is_some() && opts.since_time.is_some() {
        errs.invalid(
            "sinceSeconds",
            opts.since_seconds.unwrap_or_default().to_string(),
            "at most one of sinceTime or sinceSeconds may be specified",
        );
    }
    errs
}

/// Validate options for retrieving build logs.
pub fn validate_build_log_options(opts: &BuildLogOptions) -> ErrorList {
    let mut errs = validate_pod_log_options(opts);

    if let Some(version) = opts.version {
        if version <= 0 {
            errs.invalid(
                "version",
                version.to_string(),
                "build version must be greater than 0",
            );
        }
    }

    errs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_valid() {
        assert!(validate_build_log_options(&BuildLogOptions::default()).is_empty());
    }

    #[test]
    fn test_version_must_be_positive() {
        let opts = BuildLogOptions {
            version: Some(0),
            ..Default::default()
        };
        let errs = validate_build_log_options(&opts);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "version");

        let opts = BuildLogOptions {
            version: Some(2),
            ..Default::default()
        };
        assert!(validate_build_log_options(&opts).is_empty());
    }

    #[test]
    fn test_pod_log_bounds() {
        let opts = BuildLogOptions {
            tail_lines: Some(-1),
            limit_bytes: Some(0),
            since_seconds: Some(0),
            ..Default::default()
        };
        let errs = validate_build_log_options(&opts);
        let fields: Vec<&str> = errs.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["tailLines", "limitBytes", "sinceSeconds"]);
    }

    #[test]
    fn test_since_fields_mutually_exclusive() {
        let opts = BuildLogOptions {
            since_seconds: Some(30),
            since_time: Some("2026-01-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        let errs = validate_build_log_options(&opts);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "sinceSeconds");
    }
}
