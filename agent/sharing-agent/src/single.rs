use crate::clients::ProjectClient;
use crate::diff::{current_projects, sort_current};
use crate::provider::{ErrorKind, IntoShareError, RemoteState, ShareError, ShareResult, Shareable};
use crate::reconciler::failed_state;
use log::{debug, info, warn};
use sharing_model::{ProjectMeta, ShareableResource};

/// What the [`SingleReconciler`] reports: the target project, when it is shared, and every project
/// the resource is shared with.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SingleSharingStatus {
    pub project: Option<ProjectMeta>,
    pub projects: Vec<ProjectMeta>,
}

/// Shares a resource with at most one project chosen by name, and moves it from one project to
/// another when that name changes. A resource shared with all projects is left alone.
pub struct SingleReconciler<'a, S, P>
where
    S: Shareable,
    P: ProjectClient,
{
    target: &'a S,
    projects: &'a P,
    owner: String,
}

impl<'a, S, P> SingleReconciler<'a, S, P>
where
    S: Shareable,
    P: ProjectClient,
{
    pub fn new<O: Into<String>>(target: &'a S, projects: &'a P, owner: O) -> Self {
        Self {
            target,
            projects,
            owner: owner.into(),
        }
    }

    pub async fn create(&self, project: &str) -> ShareResult<SingleSharingStatus> {
        let wanted = self.resolve_target(project).await?;
        let resource = self.fetch().await?;
        self.ensure_shared(&resource, wanted, false).await
    }

    /// Move sharing from `previous` to `project`. An unchanged project is only checked.
    pub async fn update(&self, previous: &str, project: &str) -> ShareResult<SingleSharingStatus> {
        let wanted = self.resolve_target(project).await?;
        let resource = self.fetch().await?;
        if resource.is_shared_to_all() {
            return self.report(&resource, Some(&wanted)).await;
        }

        // An empty previous project means it was found unshared by an earlier read.
        let previous_id = if previous.trim().is_empty() {
            None
        } else {
            match self.projects.project_id_by_name(previous).await {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(
                        "project '{}' can no longer be found, not unsharing {} '{}' from it: {}",
                        previous,
                        self.target.kind(),
                        self.name(),
                        e
                    );
                    None
                }
            }
        };

        let mut changed = false;
        let mut resource = resource;
        if let Some(previous_id) = previous_id.filter(|id| *id != wanted.id && *id != self.owner) {
            if current_projects(&resource, &self.owner).contains(&previous_id) {
                info!(
                    "unsharing {} '{}' from project '{}'",
                    self.target.kind(),
                    self.name(),
                    previous
                );
                self.target
                    .unassign_custom(&resource, &[previous_id.clone()])
                    .await
                    .context(
                        failed_state(changed),
                        format!(
                            "Unable to unshare {} '{}' from project '{}'",
                            self.target.kind(),
                            self.name(),
                            previous
                        ),
                    )?;
                resource.projects.retain(|p| p.project_id != previous_id);
                changed = true;
            }
        }
        self.ensure_shared(&resource, wanted, changed).await
    }

    /// Report the projects the resource is shared with. `project` is only reported back while it
    /// is one of them.
    pub async fn read(&self, project: Option<&str>) -> ShareResult<SingleSharingStatus> {
        let resource = self.fetch().await?;
        let wanted = project.map(ProjectMeta::named);
        self.report(&resource, wanted.as_ref()).await
    }

    /// Unshare the resource from `project`. A project that is empty, no longer exists or is no
    /// longer shared leaves nothing to do.
    pub async fn delete(&self, project: &str) -> ShareResult<()> {
        if project.trim().is_empty() {
            warn!(
                "{} '{}' has no shared project recorded, nothing to unshare",
                self.target.kind(),
                self.name()
            );
            return Ok(());
        }
        let id = match self.projects.project_id_by_name(project).await {
            Ok(id) => id,
            Err(e) if e.is_not_found() => {
                warn!(
                    "project '{}' can no longer be found, not unsharing {} '{}' from it: {}",
                    project,
                    self.target.kind(),
                    self.name(),
                    e
                );
                return Ok(());
            }
            Err(e) => {
                return Err(ShareError::new_with_source_and_context(
                    ErrorKind::Resolution,
                    RemoteState::Untouched,
                    format!("Unable to find project '{}'", project),
                    e,
                ))
            }
        };
        let resource = self.fetch().await?;
        if !current_projects(&resource, &self.owner).contains(&id) {
            debug!(
                "{} '{}' is not shared with project '{}'",
                self.target.kind(),
                self.name(),
                project
            );
            return Ok(());
        }
        info!(
            "unsharing {} '{}' from project '{}'",
            self.target.kind(),
            self.name(),
            project
        );
        self.target
            .unassign_custom(&resource, &[id])
            .await
            .context(
                RemoteState::Unknown,
                format!(
                    "Unable to unshare {} '{}' from project '{}'",
                    self.target.kind(),
                    self.name(),
                    project
                ),
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

    /// Name lookups of the target are always strict, and the owner can not be a target.
    async fn resolve_target(&self, project: &str) -> ShareResult<ProjectMeta> {
        if project.trim().is_empty() {
            return Err(ShareError::validation("a project name is required"));
        }
        let id = self
            .projects
            .project_id_by_name(project)
            .await
            .map_err(|e| {
                ShareError::new_with_source_and_context(
                    ErrorKind::Resolution,
                    RemoteState::Untouched,
                    format!("Unable to find project '{}'", project),
                    e,
                )
            })?;
        if id == self.owner {
            return Err(ShareError::validation(format!(
                "{} '{}' is owned by project '{}' and can not be shared with it",
                self.target.kind(),
                self.name(),
                project
            )));
        }
        Ok(ProjectMeta::new(id, project))
    }

    async fn ensure_shared(
        &self,
        resource: &ShareableResource,
        wanted: ProjectMeta,
        changed: bool,
    ) -> ShareResult<SingleSharingStatus> {
        if resource.is_shared_to_all() {
            debug!(
                "{} '{}' is shared with all projects, nothing to do",
                self.target.kind(),
                self.name()
            );
            return self.report(resource, Some(&wanted)).await;
        }
        let mut resource = resource.clone();
        if current_projects(&resource, &self.owner).contains(&wanted.id) {
            debug!(
                "{} '{}' is already shared with {}",
                self.target.kind(),
                self.name(),
                wanted
            );
        } else {
            info!(
                "sharing {} '{}' with project {}",
                self.target.kind(),
                self.name(),
                wanted
            );
            self.target
                .assign_custom(&resource, &[wanted.id.clone()])
                .await
                .context(
                    failed_state(changed),
                    format!(
                        "Unable to share {} '{}' with project '{}'",
                        self.target.kind(),
                        self.name(),
                        wanted.name
                    ),
                )?;
            resource
                .projects
                .push(sharing_model::SharedProject::new(wanted.id.as_str()));
        }
        self.report(&resource, Some(&wanted)).await
    }

    /// Builds the status from `resource` as it is known locally, so a report never costs another
    /// fetch.
    async fn report(
        &self,
        resource: &ShareableResource,
        wanted: Option<&ProjectMeta>,
    ) -> ShareResult<SingleSharingStatus> {
        let mut projects = Vec::new();
        for id in current_projects(resource, &self.owner) {
            match self.projects.project_name_by_id(&id).await {
                Ok(name) => projects.push(ProjectMeta::new(id, name)),
                Err(e) => warn!("skipping shared project '{}': {}", id, e),
            }
        }
        let previous: Vec<ProjectMeta> = wanted.cloned().into_iter().collect();
        let projects = sort_current(projects, &previous);
        let project = wanted.and_then(|wanted| {
            projects
                .iter()
                .find(|p| p.name == wanted.name)
                .cloned()
                .or_else(|| {
                    resource
                        .is_shared_to_all()
                        .then(|| wanted.clone())
                })
        });
        Ok(SingleSharingStatus { project, projects })
    }
}
