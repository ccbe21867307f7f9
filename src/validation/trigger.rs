//! Build trigger validation.
//!
//! Per-trigger checks live here, along with the pure helpers the
//! BuildConfig-level cross-checks use to decide which image stream tag an
//! ImageChange trigger effectively watches.

use crate::crd::{BuildStrategy, BuildStrategyType, BuildTriggerPolicy, BuildTriggerType, ObjectReference, WebHookTrigger};

use super::errors::ErrorList;
use super::reference::validate_from_image_reference;

/// Validate a single trigger declaration against its declared type.
pub fn validate_trigger(trigger: &BuildTriggerPolicy) -> ErrorList {
    let mut errs = ErrorList::new();
    match &trigger.r#type {
        BuildTriggerType::Unset => errs.required("type"),
        BuildTriggerType::GitHub => match &trigger.github {
            None => errs.required("github"),
            Some(hook) => errs.merge(validate_web_hook(hook).prefixed("github")),
        },
        BuildTriggerType::Generic => match &trigger.generic {
            None => errs.required("generic"),
            Some(hook) => errs.merge(validate_web_hook(hook).prefixed("generic")),
        },
        BuildTriggerType::ImageChange => match &trigger.image_change {
            None => errs.required("imageChange"),
            Some(image_change) => {
                if let Some(from) = &image_change.from {
                    if from.kind != "ImageStreamTag" {
                        errs.invalid(
                            "imageChange.from.kind",
                            &from.kind,
                            "only an ImageStreamTag type of reference is allowed in an ImageChange trigger.",
                        );
                    } else {
                        errs.merge(validate_from_image_reference(from).prefixed("from"));
                    }
                }
            }
        },
        // Needs no payload; firing on any config change is the payload.
        BuildTriggerType::ConfigChange => {}
        BuildTriggerType::Unknown(value) => {
            errs.invalid("type", value, "invalid trigger type");
        }
    }
    errs
}

fn validate_web_hook(hook: &WebHookTrigger) -> ErrorList {
    let mut errs = ErrorList::new();
    if hook.secret.is_empty() {
        errs.required("secret");
    }
    errs
}

/// The image reference a build strategy implicitly reads its builder or
/// base image from, when it declares one.
pub fn strategy_image_ref(strategy: &BuildStrategy) -> Option<&ObjectReference> {
    match &strategy.r#type {
        BuildStrategyType::Source => strategy.sti_strategy.as_ref().map(|s| &s.from),
        BuildStrategyType::Docker => strategy.docker_strategy.as_ref().and_then(|s| s.from.as_ref()),
        BuildStrategyType::Custom => strategy.custom_strategy.as_ref().map(|s| &s.from),
        BuildStrategyType::Unset | BuildStrategyType::Unknown(_) => None,
    }
}

/// The reference an ImageChange trigger effectively watches: its own
/// `from` when set, the strategy's image otherwise. `None` when the
/// trigger carries no ImageChange payload at all.
pub fn effective_trigger_from<'a>(
    trigger: &'a BuildTriggerPolicy,
    strategy: &'a BuildStrategy,
) -> Option<&'a ObjectReference> {
    let image_change = trigger.image_change.as_ref()?;
    image_change
        .from
        .as_ref()
        .or_else(|| strategy_image_ref(strategy))
}

/// Uniqueness key for an ImageChange trigger's watched reference:
/// `namespace/name` for an ImageStreamTag (the reference's own namespace,
/// falling back to the owning config's), a shared sentinel for anything
/// else so non-resolvable triggers also collide.
pub fn ref_key(namespace: &str, reference: Option<&ObjectReference>) -> String {
    match reference {
        Some(reference) if reference.kind == "ImageStreamTag" => {
            let ns = if reference.namespace.is_empty() {
                namespace
            } else {
                &reference.namespace
            };
            format!("{ns}/{}", reference.name)
        }
        _ => "nil".to_string(),
    }
}
