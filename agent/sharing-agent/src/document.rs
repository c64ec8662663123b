/*!

Declarative sharing documents. A desired document is what a user writes (YAML or JSON); a state
document records what was last applied, together with the resource's identity, so that later
runs can read, update or delete it.

The attribute names are the ones of the `rafay_cluster_sharing`, `rafay_cluster_override_sharing`
and `rafay_cluster_sharing_single` resources:

```yaml
clustername: c1
project: defaultproject
sharing:
  all: false
  projects:
    - name: qa
    - name: dev
```

!*/

use crate::SingleSharingStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sharing_model::{Attributes, ProjectMeta, SharingSpec, SharingStatus};
use snafu::{ensure, ResultExt, Snafu};
use std::path::{Path, PathBuf};

/// The public error type for documents.
#[derive(Debug, Snafu)]
pub struct DocumentError(InnerError);

pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

#[derive(Debug, Snafu)]
pub(crate) enum InnerError {
    #[snafu(display("Unable to read '{}': {}", path.display(), source))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to write '{}': {}", path.display(), source))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to parse '{}': {}", path.display(), source))]
    ParseDesired {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[snafu(display("Unable to parse state file '{}': {}", path.display(), source))]
    ParseState {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Invalid attributes in '{}': {}", path.display(), source))]
    StateAttributes {
        path: PathBuf,
        source: sharing_model::Error,
    },

    #[snafu(display("Unable to serialize state: {}", source))]
    SerializeState { source: serde_json::Error },

    #[snafu(display("Unable to serialize attributes: {}", source))]
    SerializeAttributes { source: sharing_model::Error },

    #[snafu(display("'{}' is missing the required attribute '{}'", path.display(), field))]
    MissingAttribute { path: PathBuf, field: &'static str },

    #[snafu(display("{} name change not supported", kind))]
    NameChange { kind: &'static str },
}

/// The `sharing` block of the cluster and cluster override documents.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SharingBlock {
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub projects: Vec<ProjectMeta>,
}

impl SharingBlock {
    /// Ids left empty here are looked up by the reconciler.
    pub fn expand(&self) -> SharingSpec {
        SharingSpec {
            enabled: self.all,
            projects: self.projects.clone(),
        }
    }

    pub fn flatten(status: &SharingStatus) -> Self {
        Self {
            all: status.shared_to_all(),
            projects: status.projects.clone(),
        }
    }
}

/// Expand an optional block. A missing block means the resource should not be shared.
pub fn expand_sharing(block: Option<&SharingBlock>) -> Option<SharingSpec> {
    block.map(SharingBlock::expand)
}

/// `rafay_cluster_sharing`
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClusterSharing {
    pub clustername: String,
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing: Option<SharingBlock>,
}

impl Attributes for ClusterSharing {}

/// `rafay_cluster_override_sharing`
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClusterOverrideSharing {
    pub clusteroverridename: String,
    pub project: String,
    pub clusteroverridetype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing: Option<SharingBlock>,
}

impl Attributes for ClusterOverrideSharing {}

/// The `sharing` block of the single-target document. `projects_list` is computed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SingleSharingBlock {
    pub projectname: String,
    #[serde(default)]
    pub projects_list: Vec<ProjectMeta>,
}

impl SingleSharingBlock {
    /// `projectname` is cleared when the project is no longer shared, so the next apply shares
    /// it again.
    pub fn flatten(status: &SingleSharingStatus) -> Self {
        Self {
            projectname: status
                .project
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            projects_list: status.projects.clone(),
        }
    }
}

/// `rafay_cluster_sharing_single`
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClusterSharingSingle {
    pub clustername: String,
    pub project: String,
    pub sharing: SingleSharingBlock,
}

impl Attributes for ClusterSharingSingle {}

/// What every sharing document has in common.
pub trait SharingDocument: Attributes {
    /// The resource type name, used in messages.
    const KIND: &'static str;

    /// The name of the shared resource.
    fn resource_name(&self) -> &str;

    /// The name of the owning project.
    fn project(&self) -> &str;

    /// Attributes that must not be empty besides the resource name and the project.
    fn extra_required(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }
}

impl SharingDocument for ClusterSharing {
    const KIND: &'static str = "cluster";

    fn resource_name(&self) -> &str {
        &self.clustername
    }

    fn project(&self) -> &str {
        &self.project
    }
}

impl SharingDocument for ClusterOverrideSharing {
    const KIND: &'static str = "cluster override";

    fn resource_name(&self) -> &str {
        &self.clusteroverridename
    }

    fn project(&self) -> &str {
        &self.project
    }

    fn extra_required(&self) -> Vec<(&'static str, &str)> {
        vec![("clusteroverridetype", self.clusteroverridetype.as_str())]
    }
}

impl SharingDocument for ClusterSharingSingle {
    const KIND: &'static str = "cluster";

    fn resource_name(&self) -> &str {
        &self.clustername
    }

    fn project(&self) -> &str {
        &self.project
    }

    fn extra_required(&self) -> Vec<(&'static str, &str)> {
        vec![("projectname", self.sharing.projectname.as_str())]
    }
}

/// Load a desired document. JSON documents are accepted too.
pub fn load_desired<T>(path: &Path) -> DocumentResult<T>
where
    T: SharingDocument,
{
    let data = std::fs::read_to_string(path).context(ReadSnafu { path })?;
    let document: T = serde_yaml::from_str(&data).context(ParseDesiredSnafu { path })?;
    let required = [
        ("name", document.resource_name()),
        ("project", document.project()),
    ];
    for (field, value) in required.into_iter().chain(document.extra_required()) {
        ensure!(
            !value.trim().is_empty(),
            MissingAttributeSnafu { path, field }
        );
    }
    Ok(document)
}

/// The persisted identity and attributes of an applied document.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResourceState<T>
where
    T: SharingDocument,
{
    pub id: Option<String>,
    pub attributes: T,
}

impl<T> ResourceState<T>
where
    T: SharingDocument,
{
    /// The identity of an applied document is the name of its resource.
    pub fn new(attributes: T) -> Self {
        Self {
            id: Some(attributes.resource_name().to_string()),
            attributes,
        }
    }

    /// Load a state file. A missing file means nothing was applied yet.
    pub fn load(path: &Path) -> DocumentResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path).context(ReadSnafu { path })?;
        let mut value: Value = serde_json::from_str(&data).context(ParseStateSnafu { path })?;
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let attributes = value
            .get_mut("attributes")
            .map(Value::take)
            .unwrap_or(Value::Object(Default::default()));
        let attributes = T::from_value(attributes).context(StateAttributesSnafu { path })?;
        Ok(Some(Self { id, attributes }))
    }

    pub fn save(&self, path: &Path) -> DocumentResult<()> {
        let state = serde_json::json!({
            "id": self.id,
            "attributes": self.attributes.clone().into_map().context(SerializeAttributesSnafu)?,
        });
        let data = serde_json::to_string_pretty(&state).context(SerializeStateSnafu)?;
        std::fs::write(path, data).context(WriteSnafu { path })?;
        Ok(())
    }

    /// Renaming the shared resource would silently share a different resource.
    pub fn check_name(&self, desired: &T) -> DocumentResult<()> {
        if let Some(id) = &self.id {
            ensure!(
                id == desired.resource_name(),
                NameChangeSnafu { kind: T::KIND }
            );
        }
        Ok(())
    }
}
