//! Build source validation and normalization.
//!
//! Source variants are mutually exclusive per the declared type, with one
//! exception: a Dockerfile may ride along with a Git or Binary source.
//! Path-like fields (`contextDir`, `asFile`) are checked against their
//! cleaned form; [`normalize_source`] is the explicit step that commits
//! the cleaned values back, so validation itself never mutates its input.

use tracing::debug;
use url::Url;

use crate::crd::{BinaryBuildSource, BuildSource, BuildSourceType, GitBuildSource, SourceRevision};

use super::errors::ErrorList;
use super::reference::validate_secret_ref;

/// Upper bound on inline Dockerfile content, applied no matter which
/// source variant embeds it.
pub const MAX_DOCKERFILE_LENGTH_BYTES: usize = 60 * 1000;

/// Lexically clean a slash-separated path: collapse repeated separators,
/// drop `.` segments, resolve `..` against preceding segments.
fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                match segments.last() {
                    Some(&"..") | None => {
                        if !rooted {
                            segments.push("..");
                        }
                    }
                    Some(_) => {
                        segments.pop();
                    }
                }
            }
            _ => segments.push(segment),
        }
    }
    let mut cleaned = segments.join("/");
    if rooted {
        cleaned.insert(0, '/');
    }
    if cleaned.is_empty() {
        cleaned.push('.');
    }
    cleaned
}

/// Cleaned form of a context directory, or `None` when the path escapes
/// the source root. A bare `.` cleans to the empty string.
pub fn cleaned_context_dir(context_dir: &str) -> Option<String> {
    let cleaned = clean_path(context_dir);
    if cleaned.starts_with("..") {
        return None;
    }
    if cleaned == "." {
        Some(String::new())
    } else {
        Some(cleaned)
    }
}

/// Cleaned form of a binary source file name, or `None` when the value is
/// not a single bare file name.
pub fn cleaned_as_file(as_file: &str) -> Option<String> {
    let cleaned = clean_path(as_file);
    let cleaned = cleaned.strip_prefix('/').unwrap_or(&cleaned);
    if cleaned.is_empty()
        || cleaned == "."
        || cleaned.starts_with("..")
        || cleaned.contains('/')
        || cleaned.contains('\\')
    {
        return None;
    }
    Some(cleaned.to_string())
}

/// Commit the cleaned forms of `contextDir` and `asFile` back into the
/// source. Values the validators reject are left untouched, and running
/// this twice is a no-op.
pub fn normalize_source(source: &mut BuildSource) {
    if !source.context_dir.is_empty() {
        if let Some(cleaned) = cleaned_context_dir(&source.context_dir) {
            if cleaned != source.context_dir {
                debug!(from = %source.context_dir, to = %cleaned, "normalized contextDir");
                source.context_dir = cleaned;
            }
        }
    }
    if let Some(binary) = &mut source.binary {
        if !binary.as_file.is_empty() {
            if let Some(cleaned) = cleaned_as_file(&binary.as_file) {
                if cleaned != binary.as_file {
                    debug!(from = %binary.as_file, to = %cleaned, "normalized asFile");
                    binary.as_file = cleaned;
                }
            }
        }
    }
}

fn is_valid_url(uri: &str) -> bool {
    Url::parse(uri).is_ok()
}

fn is_http_scheme(uri: &str) -> bool {
    Url::parse(uri)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn has_proxy(git: &GitBuildSource) -> bool {
    !git.http_proxy.is_empty() || !git.https_proxy.is_empty()
}

/// Validate a build source against its declared type.
pub fn validate_source(source: &BuildSource) -> ErrorList {
    let mut errs = ErrorList::new();
    match &source.r#type {
        BuildSourceType::Git => {
            match &source.git {
                None => errs.required("git"),
                Some(git) => errs.merge(validate_git_source(git).prefixed("git")),
            }
            if let Some(dockerfile) = &source.dockerfile {
                errs.merge(validate_dockerfile(dockerfile));
            }
            if source.binary.is_some() {
                errs.invalid("binary", "", "may not be set when type is Git");
            }
        }
        BuildSourceType::Binary => {
            match &source.binary {
                None => errs.required("binary"),
                Some(binary) => errs.merge(validate_binary_source(binary).prefixed("binary")),
            }
            if let Some(dockerfile) = &source.dockerfile {
                errs.merge(validate_dockerfile(dockerfile));
            }
            if source.git.is_some() {
                errs.invalid("git", "", "may not be set when type is Binary");
            }
        }
        BuildSourceType::Dockerfile => {
            match &source.dockerfile {
                None => errs.required("dockerfile"),
                Some(dockerfile) => errs.merge(validate_dockerfile(dockerfile)),
            }
            // A Dockerfile source may embed one sub-source, never both.
            match (&source.git, &source.binary) {
                (Some(_), Some(_)) => {
                    errs.invalid("git", "", "may not be set when binary is also set");
                    errs.invalid("binary", "", "may not be set when git is also set");
                }
                (Some(git), None) => errs.merge(validate_git_source(git).prefixed("git")),
                (None, Some(binary)) => {
                    errs.merge(validate_binary_source(binary).prefixed("binary"));
                }
                (None, None) => {}
            }
        }
        BuildSourceType::Unset => errs.required("type"),
        BuildSourceType::Unknown(value) => {
            errs.invalid("type", value, "source type must be one of Git, Dockerfile, or Binary");
        }
    }

    errs.merge(validate_secret_ref(source.source_secret.as_ref()).prefixed("sourceSecret"));

    if !source.context_dir.is_empty() && cleaned_context_dir(&source.context_dir).is_none() {
        errs.invalid(
            "contextDir",
            &source.context_dir,
            "context dir must not be a relative path",
        );
    }

    errs
}

/// Validate a Git source. Proxied clones are restricted to http(s)
/// repository URIs; git and ssh protocols cannot pass through an HTTP
/// proxy.
pub fn validate_git_source(git: &GitBuildSource) -> ErrorList {
    let mut errs = ErrorList::new();
    if git.uri.is_empty() {
        errs.required("uri");
    } else if !is_valid_url(&git.uri) {
        errs.invalid("uri", &git.uri, "uri is not a valid url");
    }
    if !git.http_proxy.is_empty() && !is_valid_url(&git.http_proxy) {
        errs.invalid("httpproxy", &git.http_proxy, "proxy is not a valid url");
    }
    if !git.https_proxy.is_empty() && !is_valid_url(&git.https_proxy) {
        errs.invalid("httpsproxy", &git.https_proxy, "proxy is not a valid url");
    }
    if has_proxy(git) && !is_http_scheme(&git.uri) {
        errs.invalid(
            "uri",
            &git.uri,
            "only http:// and https:// GIT protocols are allowed with HTTP or HTTPS proxy set",
        );
    }
    errs
}

/// Validate a binary source: `asFile`, when set, must clean to a single
/// bare file name.
pub fn validate_binary_source(binary: &BinaryBuildSource) -> ErrorList {
    let mut errs = ErrorList::new();
    if !binary.as_file.is_empty() && cleaned_as_file(&binary.as_file).is_none() {
        errs.invalid(
            "asFile",
            &binary.as_file,
            "file name may not contain slashes or relative path segments and must be a valid POSIX filename",
        );
    }
    errs
}

/// Validate inline Dockerfile content.
pub fn validate_dockerfile(dockerfile: &str) -> ErrorList {
    let mut errs = ErrorList::new();
    if dockerfile.len() > MAX_DOCKERFILE_LENGTH_BYTES {
        errs.invalid(
            "dockerfile",
            "",
            format!("must be smaller than {MAX_DOCKERFILE_LENGTH_BYTES} bytes"),
        );
    }
    errs
}

/// Validate a source revision: the type discriminator is required.
pub fn validate_revision(revision: &SourceRevision) -> ErrorList {
    let mut errs = ErrorList::new();
    if revision.r#type.is_empty() {
        errs.required("type");
    }
    errs
}
