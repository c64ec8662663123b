use crate::error::{self, Result};
use crate::{ProjectMeta, SharedProject};
use serde::{Deserialize, Serialize};
use serde_plain::{derive_display_from_serialize, derive_fromstr_from_deserialize};
use snafu::ensure;

/// How a resource is currently shared, as reported by the platform.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShareMode {
    /// Only the owning project can see the resource.
    #[default]
    None,
    /// Every project can see the resource.
    All,
    /// The resource is shared with an explicit list of projects.
    Custom,
}

derive_display_from_serialize!(ShareMode);
derive_fromstr_from_deserialize!(ShareMode);

/// The mode argument of assign and unassign calls.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssignMode {
    All,
    Custom,
}

derive_display_from_serialize!(AssignMode);
derive_fromstr_from_deserialize!(AssignMode);

impl From<AssignMode> for ShareMode {
    fn from(mode: AssignMode) -> Self {
        match mode {
            AssignMode::All => ShareMode::All,
            AssignMode::Custom => ShareMode::Custom,
        }
    }
}

/// The body of an assign or unassign call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShareRequest {
    pub share_mode: AssignMode,
    pub projects: Vec<SharedProject>,
    /// Marks the cluster's sharing as managed by a standalone sharing resource. Releasing the
    /// resource sends `false`.
    pub cluster_sharing_external: bool,
}

impl ShareRequest {
    pub fn all() -> Self {
        Self {
            share_mode: AssignMode::All,
            projects: Vec::new(),
            cluster_sharing_external: true,
        }
    }

    pub fn custom<I, S>(project_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            share_mode: AssignMode::Custom,
            projects: project_ids.into_iter().map(SharedProject::new).collect(),
            cluster_sharing_external: true,
        }
    }

    /// Unassign-from-all that also hands sharing management back to the resource itself.
    pub fn release() -> Self {
        Self {
            cluster_sharing_external: false,
            ..Self::all()
        }
    }

    pub fn project_ids(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.project_id.as_str()).collect()
    }
}

/// The desired sharing state of a resource.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SharingSpec {
    /// Share with every project.
    #[serde(default)]
    pub enabled: bool,
    /// The projects to share with. Only meaningful when `enabled` is `false`.
    #[serde(default)]
    pub projects: Vec<ProjectMeta>,
}

impl SharingSpec {
    pub fn all() -> Self {
        Self {
            enabled: true,
            projects: Vec::new(),
        }
    }

    pub fn custom(projects: Vec<ProjectMeta>) -> Self {
        Self {
            enabled: false,
            projects,
        }
    }

    /// Sharing to all projects and listing projects at the same time is contradictory.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !(self.enabled && !self.projects.is_empty()),
            error::InvalidSharingSpecSnafu {
                reason: "when sharing to all, do not specify a project list"
            }
        );
        Ok(())
    }
}

/// What the reconciler reports after applying or reading a resource's sharing state. The owning
/// project is never part of `projects`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SharingStatus {
    pub share_mode: ShareMode,
    pub projects: Vec<ProjectMeta>,
}

impl SharingStatus {
    pub fn unshared() -> Self {
        Self::default()
    }

    pub fn shared_to_all(&self) -> bool {
        self.share_mode == ShareMode::All
    }
}
