//! Custom Resource Definitions for build-admission.
//!
//! - `Build`: a one-shot request to produce a container image
//! - `BuildConfig`: a reusable template owning a BuildSpec plus triggers

mod build;
mod build_config;

pub use build::*;
pub use build_config::*;
