//! Build output validation.

use crate::crd::BuildOutput;

use super::errors::ErrorList;
use super::reference::{validate_secret_ref, validate_to_image_reference};

/// Validate a build output. An absent destination is legal at this layer;
/// a build may compute its destination elsewhere.
pub fn validate_output(output: &BuildOutput) -> ErrorList {
    let mut errs = ErrorList::new();
    if let Some(to) = &output.to {
        errs.merge(validate_to_image_reference(to).prefixed("to"));
    }
    errs.merge(validate_secret_ref(output.push_secret.as_ref()).prefixed("pushSecret"));
    errs
}
