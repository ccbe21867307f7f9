//! BuildConfig Custom Resource Definition.
//!
//! A BuildConfig is a reusable template owning a BuildSpec plus trigger
//! declarations that spawn Builds when they fire.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::build::{BuildSpec, ObjectReference};

/// BuildConfig is a template from which Builds are instantiated.
///
/// Example:
/// ```yaml
/// apiVersion: build-operator.smoketurner.com/v1alpha1
/// kind: BuildConfig
/// metadata:
///   name: sample-app
/// spec:
///   triggers:
///     - type: GitHub
///       github:
///         secret: mysecret
///     - type: ImageChange
///       imageChange: {}
///   source:
///     type: Git
///     git:
///       uri: https://github.com/smoketurner/sample-app.git
///   strategy:
///     type: Source
///     stiStrategy:
///       from:
///         kind: ImageStreamTag
///         name: builder:latest
/// ```
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "build-operator.smoketurner.com",
    version = "v1alpha1",
    kind = "BuildConfig",
    plural = "buildconfigs",
    shortname = "bc",
    status = "BuildConfigStatus",
    namespaced,
    printcolumn = r#"{"name":"Strategy", "type":"string", "jsonPath":".spec.strategy.type"}"#,
    printcolumn = r#"{"name":"Latest", "type":"integer", "jsonPath":".status.lastVersion"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfigSpec {
    /// Conditions that cause a new Build to be spawned from this config.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<BuildTriggerPolicy>,

    /// The build specification shared with Build.
    #[serde(flatten)]
    pub build_spec: BuildSpec,
}

/// Status of a BuildConfig.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfigStatus {
    /// Sequence number of the most recently instantiated build.
    #[serde(default)]
    pub last_version: i64,
}

/// Discriminator for the build trigger variants.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum BuildTriggerType {
    /// GitHub push webhook.
    GitHub,
    /// Generic payload webhook.
    Generic,
    /// A watched base image changed.
    ImageChange,
    /// The BuildConfig itself changed.
    ConfigChange,
    /// No type declared.
    #[default]
    Unset,
    /// Tag not in the enumerated set.
    Unknown(String),
}

impl BuildTriggerType {
    pub fn as_str(&self) -> &str {
        match self {
            BuildTriggerType::GitHub => "GitHub",
            BuildTriggerType::Generic => "Generic",
            BuildTriggerType::ImageChange => "ImageChange",
            BuildTriggerType::ConfigChange => "ConfigChange",
            BuildTriggerType::Unset => "",
            BuildTriggerType::Unknown(s) => s,
        }
    }
}

impl From<String> for BuildTriggerType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "GitHub" => BuildTriggerType::GitHub,
            "Generic" => BuildTriggerType::Generic,
            "ImageChange" => BuildTriggerType::ImageChange,
            "ConfigChange" => BuildTriggerType::ConfigChange,
            "" => BuildTriggerType::Unset,
            _ => BuildTriggerType::Unknown(s),
        }
    }
}

impl From<BuildTriggerType> for String {
    fn from(t: BuildTriggerType) -> Self {
        match t {
            BuildTriggerType::Unknown(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for BuildTriggerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared condition that spawns a Build, carrying the payload matching
/// its type.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildTriggerPolicy {
    /// Trigger variant discriminator.
    #[serde(default)]
    #[schemars(with = "String")]
    pub r#type: BuildTriggerType,

    /// GitHub webhook payload. Required when type is GitHub.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<WebHookTrigger>,

    /// Generic webhook payload. Required when type is Generic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic: Option<WebHookTrigger>,

    /// Image change payload. Required when type is ImageChange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_change: Option<ImageChangeTrigger>,
}

/// Webhook trigger payload.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebHookTrigger {
    /// Shared secret the caller must present for the hook to fire.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret: String,
}

/// Image change trigger payload.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageChangeTrigger {
    /// Image ID that most recently fired this trigger.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_triggered_image_id: String,

    /// Image stream tag to watch. When absent, the image referenced by the
    /// build strategy is watched instead. Only ImageStreamTag kinds are
    /// allowed here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ObjectReference>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::crd::{BuildSourceType, BuildStrategyType};

    #[test]
    fn test_trigger_type_round_trip() {
        for tag in ["GitHub", "Generic", "ImageChange", "ConfigChange", ""] {
            let parsed = BuildTriggerType::from(tag.to_string());
            assert_eq!(String::from(parsed), tag);
        }
        let unknown = BuildTriggerType::from("Cron".to_string());
        assert_eq!(unknown, BuildTriggerType::Unknown("Cron".to_string()));
    }

    #[test]
    fn test_spec_flattens_build_spec() {
        let json = serde_json::json!({
            "triggers": [
                {"type": "GitHub", "github": {"secret": "s"}}
            ],
            "source": {"type": "Git", "git": {"uri": "https://example.com/r.git"}},
            "strategy": {"type": "Docker", "dockerStrategy": {}}
        });

        let spec: BuildConfigSpec =
            serde_json::from_value(json).expect("deserialization should succeed");
        assert_eq!(spec.triggers.len(), 1);
        assert_eq!(spec.triggers[0].r#type, BuildTriggerType::GitHub);
        assert_eq!(spec.build_spec.source.r#type, BuildSourceType::Git);
        assert_eq!(spec.build_spec.strategy.r#type, BuildStrategyType::Docker);

        // Flattened fields serialize at the top level, not under buildSpec.
        let out = serde_json::to_value(&spec).expect("serialization should succeed");
        assert!(out.get("source").is_some());
        assert!(out.get("buildSpec").is_none());
    }
}
