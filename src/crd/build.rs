//! Build Custom Resource Definition.
//!
//! Defines the Build CRD: a one-shot request to produce a container image
//! from source material plus a build strategy. The spec types here are
//! shared with BuildConfig, which embeds the same BuildSpec.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Build is a custom resource describing a single image build.
///
/// Example:
/// ```yaml
/// apiVersion: build-operator.smoketurner.com/v1alpha1
/// kind: Build
/// metadata:
///   name: my-build
/// spec:
///   source:
///     type: Git
///     git:
///       uri: https://github.com/smoketurner/sample-app.git
///   strategy:
///     type: Docker
///     dockerStrategy: {}
///   output:
///     to:
///       kind: ImageStreamTag
///       name: sample-app:latest
/// ```
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "build-operator.smoketurner.com",
    version = "v1alpha1",
    kind = "Build",
    plural = "builds",
    shortname = "bld",
    status = "BuildStatus",
    namespaced,
    printcolumn = r#"{"name":"Phase", "type":"string", "jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"Strategy", "type":"string", "jsonPath":".spec.strategy.type"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct BuildSpec {
    /// Where the build input material comes from.
    #[serde(default)]
    pub source: BuildSource,

    /// Information about the revision of the source the build will use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<SourceRevision>,

    /// How the image is produced from the source.
    #[serde(default)]
    pub strategy: BuildStrategy,

    /// Where the resulting image is pushed.
    #[serde(default)]
    pub output: BuildOutput,

    /// Optional deadline in seconds for the build to complete once started.
    /// Must be a positive integer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_deadline_seconds: Option<i64>,
}

// ============================================================================
// Source
// ============================================================================

/// Discriminator for the mutually exclusive build source variants.
///
/// Unrecognized tags are carried as `Unknown` so validation can report them
/// instead of failing deserialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum BuildSourceType {
    /// Source material is cloned from a Git repository.
    Git,
    /// Source material is an inline Dockerfile.
    Dockerfile,
    /// Source material is streamed in by the client.
    Binary,
    /// No type declared.
    #[default]
    Unset,
    /// Tag not in the enumerated set.
    Unknown(String),
}

impl BuildSourceType {
    pub fn as_str(&self) -> &str {
        match self {
            BuildSourceType::Git => "Git",
            BuildSourceType::Dockerfile => "Dockerfile",
            BuildSourceType::Binary => "Binary",
            BuildSourceType::Unset => "",
            BuildSourceType::Unknown(s) => s,
        }
    }
}

impl From<String> for BuildSourceType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Git" => BuildSourceType::Git,
            "Dockerfile" => BuildSourceType::Dockerfile,
            "Binary" => BuildSourceType::Binary,
            "" => BuildSourceType::Unset,
            _ => BuildSourceType::Unknown(s),
        }
    }
}

impl From<BuildSourceType> for String {
    fn from(t: BuildSourceType) -> Self {
        match t {
            BuildSourceType::Unknown(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for BuildSourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The input material for a build.
///
/// `type` selects the primary variant. A Dockerfile may additionally be
/// embedded alongside a Git or Binary source; Git and Binary are mutually
/// exclusive with each other.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildSource {
    /// Source variant discriminator (Git, Dockerfile, or Binary).
    #[serde(default)]
    #[schemars(with = "String")]
    pub r#type: BuildSourceType,

    /// Git repository details. Required when type is Git.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitBuildSource>,

    /// Inline Dockerfile content. Required when type is Dockerfile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,

    /// Client-streamed source details. Required when type is Binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<BinaryBuildSource>,

    /// Secret used to authenticate source checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_secret: Option<LocalObjectReference>,

    /// Subdirectory of the source tree to build from. Normalized before
    /// use; must not escape the source root.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context_dir: String,
}

/// Git repository build source.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GitBuildSource {
    /// Repository URI to clone.
    pub uri: String,

    /// Branch, tag, or commit to check out.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub r#ref: String,

    /// HTTP proxy used while cloning. Requires an http(s) repository URI.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub http_proxy: String,

    /// HTTPS proxy used while cloning. Requires an http(s) repository URI.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub https_proxy: String,
}

/// Client-streamed build source.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BinaryBuildSource {
    /// Optional file name the streamed content is written to inside the
    /// build context. Must be a bare file name with no path separators.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub as_file: String,
}

/// Information about the revision of source a build used.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceRevision {
    /// Revision variant discriminator. Required when a revision is set.
    #[serde(default)]
    pub r#type: String,

    /// Git revision details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitSourceRevision>,
}

/// Git-specific revision details.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GitSourceRevision {
    /// Commit hash that was built.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub commit: String,

    /// Author of the commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<SourceControlUser>,

    /// Committer of the commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer: Option<SourceControlUser>,

    /// Commit message.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Identity of a source control user.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceControlUser {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

// ============================================================================
// Strategy
// ============================================================================

/// Discriminator for the mutually exclusive build strategy variants.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum BuildStrategyType {
    /// Source-to-image build on top of a builder image.
    Source,
    /// Dockerfile-driven build.
    Docker,
    /// Build executed by a user-supplied builder image.
    Custom,
    /// No type declared.
    #[default]
    Unset,
    /// Tag not in the enumerated set.
    Unknown(String),
}

impl BuildStrategyType {
    pub fn as_str(&self) -> &str {
        match self {
            BuildStrategyType::Source => "Source",
            BuildStrategyType::Docker => "Docker",
            BuildStrategyType::Custom => "Custom",
            BuildStrategyType::Unset => "",
            BuildStrategyType::Unknown(s) => s,
        }
    }
}

impl From<String> for BuildStrategyType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Source" => BuildStrategyType::Source,
            "Docker" => BuildStrategyType::Docker,
            "Custom" => BuildStrategyType::Custom,
            "" => BuildStrategyType::Unset,
            _ => BuildStrategyType::Unknown(s),
        }
    }
}

impl From<BuildStrategyType> for String {
    fn from(t: BuildStrategyType) -> Self {
        match t {
            BuildStrategyType::Unknown(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for BuildStrategyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a build turns source into an image.
///
/// Exactly one payload must be set, matching the declared type.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildStrategy {
    /// Strategy variant discriminator (Source, Docker, or Custom).
    #[serde(default)]
    #[schemars(with = "String")]
    pub r#type: BuildStrategyType,

    /// Source-to-image strategy details. Required when type is Source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sti_strategy: Option<SourceBuildStrategy>,

    /// Docker strategy details. Required when type is Docker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_strategy: Option<DockerBuildStrategy>,

    /// Custom strategy details. Required when type is Custom.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_strategy: Option<CustomBuildStrategy>,
}

/// Source-to-image build strategy.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceBuildStrategy {
    /// Builder image the source is layered onto.
    #[serde(default)]
    pub from: ObjectReference,

    /// Secret used to pull the builder image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_secret: Option<LocalObjectReference>,

    /// Force the source to be rebuilt from scratch instead of reusing
    /// a previous incremental build.
    #[serde(default)]
    pub incremental: bool,
}

/// Dockerfile-driven build strategy.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DockerBuildStrategy {
    /// Image to substitute for the FROM line of the Dockerfile. Optional;
    /// when absent an image change trigger must supply the base image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ObjectReference>,

    /// Secret used to pull the base image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_secret: Option<LocalObjectReference>,

    /// Disable the layer cache for this build.
    #[serde(default)]
    pub no_cache: bool,
}

/// Build strategy executed by a user-supplied builder image.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomBuildStrategy {
    /// Builder image that runs the build.
    #[serde(default)]
    pub from: ObjectReference,

    /// Secret used to pull the builder image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_secret: Option<LocalObjectReference>,

    /// Expose the container runtime socket to the builder.
    #[serde(default)]
    pub expose_docker_socket: bool,

    /// Additional environment for the builder container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

/// A name/value environment variable pair.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

// ============================================================================
// References and output
// ============================================================================

/// Reference to an image, discriminated by kind.
///
/// The legal kind set depends on the call site: build output accepts
/// ImageStreamTag and DockerImage; build input additionally accepts
/// ImageStreamImage.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    /// Kind of the referenced object.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// Name of the referenced object. For ImageStreamTag this is
    /// `<name>:<tag>`; for DockerImage a full pull specification.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Namespace of the referenced object. Not valid for DockerImage.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

/// Reference to an object in the same namespace, by name only.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalObjectReference {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Where a build pushes its resulting image.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
    /// Destination image reference. Absence is legal; the destination may
    /// be computed elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<ObjectReference>,

    /// Secret used to push the resulting image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_secret: Option<LocalObjectReference>,
}

// ============================================================================
// Status
// ============================================================================

/// BuildPhase represents the current lifecycle phase of a Build.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum BuildPhase {
    /// Build was accepted but has not yet been scheduled.
    #[default]
    New,
    /// Build pod is being created.
    Pending,
    /// Build is executing.
    Running,
    /// Build finished and the image was pushed.
    Complete,
    /// Build failed.
    Failed,
    /// Build could not be executed due to an infrastructure error.
    Error,
    /// Build was cancelled.
    Cancelled,
}

impl BuildPhase {
    /// Whether the phase is terminal. Terminal phases never transition
    /// again; updates that change them are rejected.
    pub fn is_terminal(self) -> bool {
        match self {
            BuildPhase::Complete | BuildPhase::Failed | BuildPhase::Error | BuildPhase::Cancelled => {
                true
            }
            BuildPhase::New | BuildPhase::Pending | BuildPhase::Running => false,
        }
    }
}

impl std::fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildPhase::New => write!(f, "New"),
            BuildPhase::Pending => write!(f, "Pending"),
            BuildPhase::Running => write!(f, "Running"),
            BuildPhase::Complete => write!(f, "Complete"),
            BuildPhase::Failed => write!(f, "Failed"),
            BuildPhase::Error => write!(f, "Error"),
            BuildPhase::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Status of a Build.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatus {
    /// Current phase of the build lifecycle.
    #[serde(default)]
    pub phase: BuildPhase,

    /// Whether a cancellation of the build was requested.
    #[serde(default)]
    pub cancelled: bool,

    /// Machine-readable reason for the current phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable details about the current phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Time the build pod started running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<String>,

    /// Time the build reached a terminal phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_timestamp: Option<String>,

    /// Image reference the build pushed to, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_docker_image_reference: Option<String>,

    /// BuildConfig this build was spawned from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ObjectReference>,
}

// ============================================================================
// Subresource request types
// ============================================================================

/// A request to instantiate a build, optionally pinning the source revision.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    /// Standard object metadata; the name identifies the BuildConfig.
    #[serde(default)]
    pub metadata: k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta,

    /// Revision to build instead of the tip of the configured source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<SourceRevision>,
}

/// Options for retrieving the logs of a build, mirroring pod log options
/// plus build-specific selectors.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLogOptions {
    /// Container to stream logs from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,

    /// Follow the log stream.
    #[serde(default)]
    pub follow: bool,

    /// Return logs of the previous instantiation of the build pod.
    #[serde(default)]
    pub previous: bool,

    /// Only return logs newer than this many seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since_seconds: Option<i64>,

    /// Only return logs after this RFC 3339 time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since_time: Option<String>,

    /// Prefix each line with its timestamp.
    #[serde(default)]
    pub timestamps: bool,

    /// Only return this many lines from the end of the log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail_lines: Option<i64>,

    /// Cap the number of bytes returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_bytes: Option<i64>,

    /// Return immediately even if the build is not yet producing logs.
    #[serde(default)]
    pub nowait: bool,

    /// Version of the build to retrieve logs for. Must be greater than 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}
