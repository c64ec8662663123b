use crate::clients::ProjectClient;
use crate::diff::{current_projects, desired_projects, sort_current, SharingDiff};
use crate::provider::{ErrorKind, IntoShareError, RemoteState, ShareError, ShareResult, Shareable};
use log::{debug, info, warn};
use sharing_model::{ProjectMeta, ShareMode, ShareableResource, SharingSpec, SharingStatus};
use std::time::Duration;

/// The `Reconciler` brings the sharing state of one resource in line with a [`SharingSpec`] using
/// as few assign and unassign calls as possible. It holds no state between calls: every operation
/// fetches the resource again.
pub struct Reconciler<'a, S, P>
where
    S: Shareable,
    P: ProjectClient,
{
    target: &'a S,
    projects: &'a P,
    owner: String,
}

impl<'a, S, P> Reconciler<'a, S, P>
where
    S: Shareable,
    P: ProjectClient,
{
    /// `owner` is the id of the project that owns the resource. It is never assigned, unassigned
    /// or reported.
    pub fn new<O: Into<String>>(target: &'a S, projects: &'a P, owner: O) -> Self {
        Self {
            target,
            projects,
            owner: owner.into(),
        }
    }

    /// Apply `desired` and report the resulting state. `None` resets the resource to unshared.
    pub async fn reconcile(&self, desired: Option<SharingSpec>) -> ShareResult<SharingStatus> {
        if let Some(spec) = &desired {
            spec.validate().map_err(|e| {
                ShareError::new_with_source_and_context(
                    ErrorKind::Validation,
                    RemoteState::Untouched,
                    format!("Invalid sharing for {} '{}'", self.target.kind(), self.name()),
                    e,
                )
            })?;
        }
        let desired = match desired {
            Some(spec) => Some(self.resolve(spec).await?),
            None => None,
        };

        let resource = self.fetch().await?;
        if resource.sharing_managed_internally() {
            return Err(ShareError::validation(format!(
                "sharing of {} '{}' is managed by the {} resource itself",
                self.target.kind(),
                self.name(),
                self.target.kind()
            )));
        }

        let spec = match desired {
            None => return self.reset(&resource).await,
            Some(spec) => spec,
        };
        if spec.enabled {
            self.share_to_all(&resource).await
        } else {
            let current = self.current_ids(&resource);
            self.share_custom(&resource, current, spec.projects).await
        }
    }

    /// Report the remote state without changing it. Projects found in `previous` keep their
    /// order; projects shared outside of it are appended.
    pub async fn read(&self, previous: Option<&SharingSpec>) -> ShareResult<SharingStatus> {
        let resource = self.fetch().await?;
        let current = self.current_ids(&resource);
        let current = self.names(&current).await;
        let previous = previous.map(|spec| spec.projects.as_slice()).unwrap_or(&[]);
        Ok(SharingStatus {
            share_mode: resource.share_mode,
            projects: sort_current(current, previous),
        })
    }

    /// Unshare the resource and hand sharing management back to it. The call is always made.
    pub async fn delete(&self) -> ShareResult<()> {
        let resource = self.fetch().await?;
        info!("releasing sharing of {} '{}'", self.target.kind(), self.name());
        self.target.release(&resource).await.context(
            RemoteState::Unknown,
            format!("Unable to unshare {} '{}'", self.target.kind(), self.name()),
        )
    }

    fn name(&self) -> &str {
        self.target.name()
    }

    async fn fetch(&self) -> ShareResult<ShareableResource> {
        self.target.get().await.context(
            RemoteState::Untouched,
            format!("Unable to get {} '{}'", self.target.kind(), self.name()),
        )
    }

    fn current_ids(&self, resource: &ShareableResource) -> Vec<String> {
        current_projects(resource, &self.owner)
    }

    /// Fill in the ids of desired projects that only carry a name.
    async fn resolve(&self, mut spec: SharingSpec) -> ShareResult<SharingSpec> {
        for project in spec.projects.iter_mut().filter(|p| !p.is_resolved()) {
            project.id = self
                .projects
                .project_id_by_name(&project.name)
                .await
                .map_err(|e| {
                    ShareError::new_with_source_and_context(
                        ErrorKind::Resolution,
                        RemoteState::Untouched,
                        format!("Unable to find project '{}'", project.name),
                        e,
                    )
                })?;
            debug!("resolved project {}", project);
        }
        Ok(spec)
    }

    /// Ids whose name can not be looked up are logged and left out.
    async fn names(&self, ids: &[String]) -> Vec<ProjectMeta> {
        let mut projects = Vec::with_capacity(ids.len());
        for id in ids {
            match self.projects.project_name_by_id(id).await {
                Ok(name) => projects.push(ProjectMeta::new(id.as_str(), name)),
                Err(e) => warn!("skipping shared project '{}': {}", id, e),
            }
        }
        projects
    }

    async fn reset(&self, resource: &ShareableResource) -> ShareResult<SharingStatus> {
        if !resource.is_shared_to_all() && self.current_ids(resource).is_empty() {
            debug!("{} '{}' is not shared", self.target.kind(), self.name());
            return Ok(SharingStatus::unshared());
        }
        info!("unsharing {} '{}'", self.target.kind(), self.name());
        self.target.release(resource).await.context(
            RemoteState::Unknown,
            format!("Unable to unshare {} '{}'", self.target.kind(), self.name()),
        )?;
        Ok(SharingStatus::unshared())
    }

    async fn share_to_all(&self, resource: &ShareableResource) -> ShareResult<SharingStatus> {
        if resource.is_shared_to_all() {
            debug!(
                "{} '{}' is already shared with all projects",
                self.target.kind(),
                self.name()
            );
        } else {
            info!("sharing {} '{}' with all projects", self.target.kind(), self.name());
            self.target.assign_all(resource).await.context(
                RemoteState::Unknown,
                format!(
                    "Unable to share {} '{}' with all projects",
                    self.target.kind(),
                    self.name()
                ),
            )?;
        }
        Ok(SharingStatus {
            share_mode: ShareMode::All,
            projects: Vec::new(),
        })
    }

    async fn share_custom(
        &self,
        resource: &ShareableResource,
        current: Vec<String>,
        desired: Vec<ProjectMeta>,
    ) -> ShareResult<SharingStatus> {
        let desired = desired_projects(&desired, &self.owner);
        // Everything goes away with the unassign-from-all below.
        let baseline = if resource.is_shared_to_all() {
            Vec::new()
        } else {
            current
        };
        let diff = SharingDiff::compute(&baseline, &desired, &self.owner)?;

        let mut changed = false;
        if resource.is_shared_to_all() {
            info!("unsharing {} '{}' from all projects", self.target.kind(), self.name());
            self.target.unassign_all(resource).await.context(
                failed_state(changed),
                format!(
                    "Unable to unshare {} '{}' from all projects",
                    self.target.kind(),
                    self.name()
                ),
            )?;
            changed = true;
        }
        if !diff.new_ids.is_empty() {
            info!(
                "sharing {} '{}' with projects {:?}",
                self.target.kind(),
                self.name(),
                diff.new_ids
            );
            self.target
                .assign_custom(resource, &diff.new_ids)
                .await
                .context(
                    failed_state(changed),
                    format!("Unable to share {} '{}'", self.target.kind(), self.name()),
                )?;
            changed = true;
        }
        if !diff.old_ids.is_empty() {
            info!(
                "unsharing {} '{}' from projects {:?}",
                self.target.kind(),
                self.name(),
                diff.old_ids
            );
            self.target
                .unassign_custom(resource, &diff.old_ids)
                .await
                .context(
                    failed_state(changed),
                    format!("Unable to unshare {} '{}'", self.target.kind(), self.name()),
                )?;
        }

        Ok(SharingStatus {
            share_mode: if desired.is_empty() {
                ShareMode::None
            } else {
                ShareMode::Custom
            },
            projects: desired,
        })
    }
}

/// The remote state after a failed mutating call.
pub(crate) fn failed_state(changed: bool) -> RemoteState {
    if changed {
        RemoteState::Diverged
    } else {
        RemoteState::Unknown
    }
}

/// Poll `target` every `interval` until the resource exists. Any error other than not found ends
/// the wait. Callers bound the overall wait with a timeout.
pub async fn wait_for_resource<S>(target: &S, interval: Duration) -> ShareResult<ShareableResource>
where
    S: Shareable,
{
    loop {
        match target.get().await {
            Ok(resource) => return Ok(resource),
            Err(e) if e.is_not_found() => {
                info!(
                    "waiting for {} '{}' to exist, checking again in {}s",
                    target.kind(),
                    target.name(),
                    interval.as_secs()
                );
                tokio::time::sleep(interval).await;
            }
            Err(e) => {
                return Err::<ShareableResource, _>(e).context(
                    RemoteState::Untouched,
                    format!("Unable to get {} '{}'", target.kind(), target.name()),
                )
            }
        }
    }
}
