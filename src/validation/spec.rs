//! BuildSpec orchestration: source, strategy, output, revision, and the
//! source/strategy compatibility rules.

use crate::crd::{BuildSourceType, BuildSpec, BuildStrategyType};

use super::errors::ErrorList;
use super::output::validate_output;
use super::source::{validate_revision, validate_source};
use super::strategy::validate_strategy;

/// Validate one build specification.
pub fn validate_build_spec(spec: &BuildSpec) -> ErrorList {
    let mut errs = ErrorList::new();

    let has_source_type = !matches!(spec.source.r#type, BuildSourceType::Unset);

    // A Custom strategy may omit source entirely; everything else gets its
    // source validated.
    if !(matches!(spec.strategy.r#type, BuildStrategyType::Custom) && !has_source_type) {
        errs.merge(validate_source(&spec.source).prefixed("source"));
    }

    // Source-to-image builds may not declare a Dockerfile source.
    if matches!(spec.strategy.r#type, BuildStrategyType::Source)
        && matches!(spec.source.r#type, BuildSourceType::Dockerfile)
    {
        errs.invalid("source.type", "", "may not be type Dockerfile for source builds");
    }

    if let Some(revision) = &spec.revision {
        errs.merge(validate_revision(revision).prefixed("revision"));
    }

    if let Some(seconds) = spec.completion_deadline_seconds {
        if seconds <= 0 {
            errs.invalid(
                "completionDeadlineSeconds",
                seconds.to_string(),
                "completionDeadlineSeconds must be a positive integer greater than 0",
            );
        }
    }

    errs.merge(validate_output(&spec.output).prefixed("output"));
    errs.merge(validate_strategy(&spec.strategy).prefixed("strategy"));

    errs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{
        BuildOutput, BuildSource, BuildStrategy, CustomBuildStrategy, DockerBuildStrategy,
        GitBuildSource, ObjectReference, SourceBuildStrategy, SourceRevision,
    };

    fn git_source() -> BuildSource {
        BuildSource {
            r#type: BuildSourceType::Git,
            git: Some(GitBuildSource {
                uri: "https://github.com/smoketurner/app.git".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn docker_strategy() -> BuildStrategy {
        BuildStrategy {
            r#type: BuildStrategyType::Docker,
            docker_strategy: Some(DockerBuildStrategy::default()),
            ..Default::default()
        }
    }

    fn output_to(name: &str) -> BuildOutput {
        BuildOutput {
            to: Some(ObjectReference {
                kind: "ImageStreamTag".to_string(),
                name: name.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn valid_spec() -> BuildSpec {
        BuildSpec {
            source: git_source(),
            strategy: docker_strategy(),
            output: output_to("app:latest"),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_spec() {
        assert!(validate_build_spec(&valid_spec()).is_empty());
    }

    #[test]
    fn test_custom_strategy_may_omit_source() {
        let spec = BuildSpec {
            source: BuildSource::default(),
            strategy: BuildStrategy {
                r#type: BuildStrategyType::Custom,
                custom_strategy: Some(CustomBuildStrategy {
                    from: ObjectReference {
                        kind: "ImageStreamTag".to_string(),
                        name: "builder:latest".to_string(),
                        ..Default::default()
                    },
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_build_spec(&spec).is_empty());
    }

    #[test]
    fn test_custom_strategy_with_source_type_still_validates_source() {
        let mut spec = valid_spec();
        spec.strategy = BuildStrategy {
            r#type: BuildStrategyType::Custom,
            custom_strategy: Some(CustomBuildStrategy {
                from: ObjectReference {
                    kind: "ImageStreamTag".to_string(),
                    name: "builder:latest".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        };
        spec.source.git = None;
        let errs = validate_build_spec(&spec);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "source.git");
    }

    #[test]
    fn test_source_build_forbids_dockerfile_source() {
        let spec = BuildSpec {
            source: BuildSource {
                r#type: BuildSourceType::Dockerfile,
                dockerfile: Some("FROM x".to_string()),
                ..Default::default()
            },
            strategy: BuildStrategy {
                r#type: BuildStrategyType::Source,
                sti_strategy: Some(SourceBuildStrategy {
                    from: ObjectReference {
                        kind: "ImageStreamTag".to_string(),
                        name: "builder:latest".to_string(),
                        ..Default::default()
                    },
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };
        let errs = validate_build_spec(&spec);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "source.type");
    }

    #[test]
    fn test_revision_type_required() {
        let mut spec = valid_spec();
        spec.revision = Some(SourceRevision::default());
        let errs = validate_build_spec(&spec);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "revision.type");
    }

    #[test]
    fn test_completion_deadline_must_be_positive() {
        let mut spec = valid_spec();
        spec.completion_deadline_seconds = Some(0);
        let errs = validate_build_spec(&spec);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors()[0].field(), "completionDeadlineSeconds");

        spec.completion_deadline_seconds = Some(-5);
        assert_eq!(validate_build_spec(&spec).len(), 1);

        spec.completion_deadline_seconds = Some(60);
        assert!(validate_build_spec(&spec).is_empty());
    }

    #[test]
    fn test_errors_accumulate_across_sections() {
        let spec = BuildSpec {
            source: BuildSource {
                r#type: BuildSourceType::Git,
                ..Default::default()
            },
            strategy: BuildStrategy {
                r#type: BuildStrategyType::Source,
                ..Default::default()
            },
            output: BuildOutput {
                to: Some(ObjectReference {
                    kind: "DockerImage".to_string(),
                    name: "repo:tag".to_string(),
                    namespace: "ns".to_string(),
                }),
                ..Default::default()
            },
            ..Default::default()
        };
        let errs = validate_build_spec(&spec);
        let fields: Vec<&str> = errs.iter().map(|e| e.field()).collect();
        assert_eq!(
            fields,
            vec!["source.git", "output.to.namespace", "strategy.stiStrategy"]
        );
    }
}
