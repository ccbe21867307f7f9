//! build-admission library crate
//!
//! Admission-time validation for Build and BuildConfig custom resources:
//! the CRD type definitions plus the validators an admission webhook or
//! API layer calls before persisting an object. Validation is synchronous
//! and purely structural; nothing here talks to a cluster or a registry.

pub mod crd;
pub mod image;
pub mod validation;

pub use validation::{
    ErrorList, ValidationError, normalize_source, validate_build, validate_build_config,
    validate_build_config_update, validate_build_log_options, validate_build_request,
    validate_build_update,
};
