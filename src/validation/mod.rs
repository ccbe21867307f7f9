//! Admission validation for Build and BuildConfig resources.
//!
//! Every entry point returns an [`ErrorList`] naming each violation by
//! field path; an empty list means the object is valid. Validation is
//! exhaustive rather than fail-fast: one call surfaces every independent
//! problem in the object.

pub mod errors;
pub mod log_options;
pub mod metadata;
pub mod output;
pub mod reference;
pub mod source;
pub mod spec;
pub mod strategy;
pub mod trigger;

use std::collections::HashSet;

use crate::crd::{Build, BuildConfig, BuildRequest, BuildStrategyType, BuildTriggerType};

pub use errors::{ErrorList, ValidationError};
pub use log_options::validate_build_log_options;
pub use source::normalize_source;
pub use spec::validate_build_spec;

/// Validate a Build for creation.
pub fn validate_build(build: &Build) -> ErrorList {
    let mut errs = metadata::validate_object_meta(
        &build.metadata,
        true,
        metadata::name_is_dns_subdomain,
    )
    .prefixed("metadata");
    errs.merge(validate_build_spec(&build.spec).prefixed("spec"));
    errs
}

/// Validate an update to a Build. On top of full re-validation, a build
/// whose phase already reached a terminal state may not change phase
/// again, and the spec is immutable after creation.
pub fn validate_build_update(build: &Build, older: &Build) -> ErrorList {
    let mut errs =
        metadata::validate_object_meta_update(&build.metadata, &older.metadata).prefixed("metadata");

    errs.merge(validate_build(build));

    let old_phase = older.status.as_ref().map(|s| s.phase).unwrap_or_default();
    let new_phase = build.status.as_ref().map(|s| s.phase).unwrap_or_default();
    if old_phase.is_terminal() && old_phase != new_phase {
        errs.invalid(
            "status.Phase",
            new_phase.to_string(),
            "phase cannot be updated from a terminal state",
        );
    }

    if build.spec != older.spec {
        // The spec content is deliberately not echoed back here.
        errs.invalid(
            "spec",
            "content of spec is not printed out, please refer to the \"details\"",
            "spec is immutable",
        );
    }

    errs
}

/// Validate a BuildConfig for creation.
///
/// Beyond per-trigger and spec validation, two cross-checks tie triggers
/// to the strategy: no two ImageChange triggers may watch the same image
/// stream tag, and a Docker strategy without an explicit base image needs
/// every ImageChange trigger to name one.
pub fn validate_build_config(config: &BuildConfig) -> ErrorList {
    let mut errs = metadata::validate_object_meta(
        &config.metadata,
        true,
        metadata::name_is_dns_subdomain,
    )
    .prefixed("metadata");

    let namespace = config.metadata.namespace.as_deref().unwrap_or_default();
    let strategy = &config.spec.build_spec.strategy;

    let mut from_refs: HashSet<String> = HashSet::new();
    for (i, trg) in config.spec.triggers.iter().enumerate() {
        errs.merge(trigger::validate_trigger(trg).prefixed_index(i).prefixed("triggers"));
        if !matches!(trg.r#type, BuildTriggerType::ImageChange) || trg.image_change.is_none() {
            continue;
        }
        let from = trigger::effective_trigger_from(trg, strategy);
        let from_key = trigger::ref_key(namespace, from);
        if !from_refs.insert(from_key) {
            errs.invalid(
                "triggers",
                serde_json::to_string(&config.spec.triggers).unwrap_or_default(),
                "multiple ImageChange triggers refer to the same image stream tag",
            );
        }
    }

    errs.merge(validate_build_spec(&config.spec.build_spec).prefixed("spec"));

    // An implicit-from Docker strategy receives its base image from its
    // ImageChange triggers, so each of them must carry one.
    if matches!(strategy.r#type, BuildStrategyType::Docker)
        && strategy
            .docker_strategy
            .as_ref()
            .is_some_and(|docker| docker.from.is_none())
    {
        for trg in &config.spec.triggers {
            if matches!(trg.r#type, BuildTriggerType::ImageChange)
                && trg.image_change.as_ref().is_none_or(|ic| ic.from.is_none())
            {
                errs.required("imageChange.from");
            }
        }
    }

    errs
}

/// Validate an update to a BuildConfig.
pub fn validate_build_config_update(config: &BuildConfig, older: &BuildConfig) -> ErrorList {
    let mut errs = metadata::validate_object_meta_update(&config.metadata, &older.metadata)
        .prefixed("metadata");
    errs.merge(validate_build_config(config));
    errs
}

/// Validate a request to instantiate a build.
pub fn validate_build_request(request: &BuildRequest) -> ErrorList {
    let mut errs = metadata::validate_object_meta(
        &request.metadata,
        true,
        metadata::minimal_name_requirements,
    )
    .prefixed("metadata");

    if let Some(revision) = &request.revision {
        errs.merge(source::validate_revision(revision).prefixed("revision"));
    }

    errs
}
