use crate::constants::{CLUSTER_SHARING_EXTERNAL_KEY, CLUSTER_SHARING_INTERNAL};
use crate::ShareMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of a resource's remote project list.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SharedProject {
    pub project_id: String,
}

impl SharedProject {
    pub fn new<S: Into<String>>(project_id: S) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }
}

/// A shareable resource (a cluster or a cluster override) as fetched from the platform. The
/// `projects` list is the raw remote list and may include the owning project.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShareableResource {
    /// The platform identifier. Cluster overrides are addressed by name and may leave this empty.
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// The owning project.
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub share_mode: ShareMode,
    #[serde(default, deserialize_with = "null_to_default")]
    pub projects: Vec<SharedProject>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub settings: BTreeMap<String, String>,
}

impl ShareableResource {
    /// Whether the resource is shared with every project.
    pub fn is_shared_to_all(&self) -> bool {
        self.share_mode == ShareMode::All
    }

    /// `true` when the cluster records that its sharing is managed by the cluster resource itself
    /// rather than by a standalone sharing resource.
    pub fn sharing_managed_internally(&self) -> bool {
        self.settings
            .get(CLUSTER_SHARING_EXTERNAL_KEY)
            .map(|value| value == CLUSTER_SHARING_INTERNAL)
            .unwrap_or(false)
    }
}

/// The platform sends `null` instead of an empty list or map for resources that were never
/// shared.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
