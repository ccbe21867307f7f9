//! Build strategy validation.
//!
//! Exactly one strategy payload must be present, matching the declared
//! type. Source and Custom strategies always name the image they build
//! on; a Docker strategy may leave `from` unset and have an image change
//! trigger supply the base image (cross-checked at the BuildConfig level).

use crate::crd::{
    BuildStrategy, BuildStrategyType, CustomBuildStrategy, DockerBuildStrategy,
    SourceBuildStrategy,
};

use super::errors::ErrorList;
use super::reference::{validate_from_image_reference, validate_secret_ref};

/// Validate a build strategy against its declared type.
pub fn validate_strategy(strategy: &BuildStrategy) -> ErrorList {
    let mut errs = ErrorList::new();
    match &strategy.r#type {
        BuildStrategyType::Unset => errs.required("type"),
        BuildStrategyType::Source => match &strategy.sti_strategy {
            None => errs.required("stiStrategy"),
            Some(sti) => errs.merge(validate_source_strategy(sti).prefixed("stiStrategy")),
        },
        BuildStrategyType::Docker => match &strategy.docker_strategy {
            None => errs.required("dockerStrategy"),
            Some(docker) => errs.merge(validate_docker_strategy(docker).prefixed("dockerStrategy")),
        },
        BuildStrategyType::Custom => match &strategy.custom_strategy {
            None => errs.required("customStrategy"),
            Some(custom) => errs.merge(validate_custom_strategy(custom).prefixed("customStrategy")),
        },
        BuildStrategyType::Unknown(value) => {
            errs.invalid("type", value, "type is not in the enumerated list");
        }
    }
    errs
}

fn validate_source_strategy(strategy: &SourceBuildStrategy) -> ErrorList {
    let mut errs = validate_from_image_reference(&strategy.from).prefixed("from");
    errs.merge(validate_secret_ref(strategy.pull_secret.as_ref()).prefixed("pullSecret"));
    errs
}

fn validate_docker_strategy(strategy: &DockerBuildStrategy) -> ErrorList {
    let mut errs = ErrorList::new();
    if let Some(from) = &strategy.from {
        errs.merge(validate_from_image_reference(from).prefixed("from"));
    }
    errs.merge(validate_secret_ref(strategy.pull_secret.as_ref()).prefixed("pullSecret"));
    errs
}

fn validate_custom_strategy(strategy: &CustomBuildStrategy) -> ErrorList {
    let mut errs = validate_from_image_reference(&strategy.from).prefixed("from");
    errs.merge(validate_secret_ref(strategy.pull_secret.as_ref()).prefixed("pullSecret"));
    errs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::ObjectReference;

    fn image_stream_tag(name: &str) -> ObjectReference {
        ObjectReference {
            kind: "ImageStreamTag".to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_strategy_requires_type() {
        let errs = validate_strategy(&BuildStrategy::default());
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "type");
    }

    #[test]
    fn test_strategy_unknown_type() {
        let strategy = BuildStrategy {
            r#type: BuildStrategyType::Unknown("Buildah".to_string()),
            ..Default::default()
        };
        let errs = validate_strategy(&strategy);
        assert_eq!(errs.len(), 1);
        assert!(matches!(
            errs.errors()[0],
            crate::validation::ValidationError::Invalid { .. }
        ));
    }

    #[test]
    fn test_source_strategy_requires_payload() {
        let strategy = BuildStrategy {
            r#type: BuildStrategyType::Source,
            ..Default::default()
        };
        let errs = validate_strategy(&strategy);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "stiStrategy");
    }

    #[test]
    fn test_source_strategy_requires_from_kind() {
        let strategy = BuildStrategy {
            r#type: BuildStrategyType::Source,
            sti_strategy: Some(SourceBuildStrategy::default()),
            ..Default::default()
        };
        let errs = validate_strategy(&strategy);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "stiStrategy.from.kind");
        assert!(matches!(
            errs.errors()[0],
            crate::validation::ValidationError::Required { .. }
        ));
    }

    #[test]
    fn test_source_strategy_valid() {
        let strategy = BuildStrategy {
            r#type: BuildStrategyType::Source,
            sti_strategy: Some(SourceBuildStrategy {
                from: image_stream_tag("builder:latest"),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate_strategy(&strategy).is_empty());
    }

    #[test]
    fn test_docker_strategy_from_optional() {
        let strategy = BuildStrategy {
            r#type: BuildStrategyType::Docker,
            docker_strategy: Some(DockerBuildStrategy::default()),
            ..Default::default()
        };
        assert!(validate_strategy(&strategy).is_empty());
    }

    #[test]
    fn test_docker_strategy_validates_from_when_present() {
        let strategy = BuildStrategy {
            r#type: BuildStrategyType::Docker,
            docker_strategy: Some(DockerBuildStrategy {
                from: Some(image_stream_tag("no-tag")),
                ..Default::default()
            }),
            ..Default::default()
        };
        let errs = validate_strategy(&strategy);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "dockerStrategy.from.name");
    }

    #[test]
    fn test_custom_strategy_pull_secret_name_required() {
        let strategy = BuildStrategy {
            r#type: BuildStrategyType::Custom,
            custom_strategy: Some(CustomBuildStrategy {
                from: image_stream_tag("builder:latest"),
                pull_secret: Some(crate::crd::LocalObjectReference::default()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let errs = validate_strategy(&strategy);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "customStrategy.pullSecret.name");
    }
}
