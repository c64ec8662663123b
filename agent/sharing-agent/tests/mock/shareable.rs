use super::OWNER;
use sharing_agent::clients::{ClientError, ClientResult};
use sharing_agent::provider::Shareable;
use sharing_model::constants::CLUSTER_SHARING_EXTERNAL_KEY;
use sharing_model::{AssignMode, ShareMode, ShareRequest, SharedProject, ShareableResource};
use std::sync::Mutex;

/// A mutating call as the platform received it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Call {
    Assign(AssignMode, Vec<String>),
    Unassign(AssignMode, Vec<String>),
}

impl Call {
    pub(crate) fn assign(mode: AssignMode, ids: &[&str]) -> Self {
        Call::Assign(mode, ids.iter().map(|s| s.to_string()).collect())
    }

    pub(crate) fn unassign(mode: AssignMode, ids: &[&str]) -> Self {
        Call::Unassign(mode, ids.iter().map(|s| s.to_string()).collect())
    }
}

/// Pretends to be a cluster owned by [`OWNER`].
pub(crate) struct MockShareable {
    resource: Mutex<Option<ShareableResource>>,
    calls: Mutex<Vec<Call>>,
    /// Whether the last `release` handed management back.
    released: Mutex<Option<bool>>,
    gets: Mutex<usize>,
    /// The resource only exists from this `get` on.
    exists_after: usize,
    /// The mutating call with this index fails without being applied.
    fail_at: Option<usize>,
}

impl MockShareable {
    pub(crate) fn new(share_mode: ShareMode, project_ids: &[&str]) -> Self {
        let resource = ShareableResource {
            id: "c-1234".to_string(),
            name: "c1".to_string(),
            project_id: OWNER.to_string(),
            share_mode,
            projects: std::iter::once(OWNER)
                .chain(project_ids.iter().copied())
                .map(SharedProject::new)
                .collect(),
            settings: Default::default(),
        };
        Self {
            resource: Mutex::new(Some(resource)),
            calls: Mutex::new(Vec::new()),
            released: Mutex::new(None),
            gets: Mutex::new(0),
            exists_after: 0,
            fail_at: None,
        }
    }

    pub(crate) fn missing() -> Self {
        let mock = Self::new(ShareMode::None, &[]);
        *mock.resource.lock().unwrap() = None;
        mock
    }

    pub(crate) fn exists_after(mut self, gets: usize) -> Self {
        self.exists_after = gets;
        self
    }

    pub(crate) fn fail_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    pub(crate) fn managed_internally(self) -> Self {
        if let Some(resource) = self.resource.lock().unwrap().as_mut() {
            resource
                .settings
                .insert(CLUSTER_SHARING_EXTERNAL_KEY.to_string(), "false".to_string());
        }
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.lock().unwrap().clear()
    }

    pub(crate) fn gets(&self) -> usize {
        *self.gets.lock().unwrap()
    }

    pub(crate) fn released(&self) -> Option<bool> {
        *self.released.lock().unwrap()
    }

    pub(crate) fn share_mode(&self) -> ShareMode {
        self.resource.lock().unwrap().as_ref().unwrap().share_mode
    }

    /// The remote project ids without the owner.
    pub(crate) fn shared_with(&self) -> Vec<String> {
        self.resource
            .lock()
            .unwrap()
            .as_ref()
            .unwrap()
            .projects
            .iter()
            .map(|p| p.project_id.clone())
            .filter(|id| id != OWNER)
            .collect()
    }

    fn record(&self, call: Call) -> ClientResult<()> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        if self.fail_at == Some(calls.len() - 1) {
            return Err(ClientError::Rejected(Some("injected failure".into())));
        }
        Ok(())
    }

    fn apply<F>(&self, f: F)
    where
        F: FnOnce(&mut ShareableResource),
    {
        if let Some(resource) = self.resource.lock().unwrap().as_mut() {
            f(resource);
            let shared = resource.projects.iter().any(|p| p.project_id != OWNER);
            if resource.share_mode != ShareMode::All {
                resource.share_mode = if shared {
                    ShareMode::Custom
                } else {
                    ShareMode::None
                };
            }
        }
    }
}

#[async_trait::async_trait]
impl Shareable for MockShareable {
    fn kind(&self) -> &'static str {
        "cluster"
    }

    fn name(&self) -> &str {
        "c1"
    }

    async fn get(&self) -> ClientResult<ShareableResource> {
        let mut gets = self.gets.lock().unwrap();
        *gets += 1;
        if *gets <= self.exists_after {
            return Err(ClientError::NotFound(Some("not yet".into())));
        }
        self.resource
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::NotFound(Some("edge 'c1' not found".into())))
    }

    async fn assign(
        &self,
        _resource: &ShareableResource,
        request: &ShareRequest,
    ) -> ClientResult<()> {
        let ids: Vec<String> = request.project_ids().into_iter().map(String::from).collect();
        self.record(Call::Assign(request.share_mode, ids.clone()))?;
        self.apply(|resource| match request.share_mode {
            AssignMode::All => {
                resource.share_mode = ShareMode::All;
                resource.projects.retain(|p| p.project_id == OWNER);
            }
            AssignMode::Custom => {
                for id in ids {
                    if !resource.projects.iter().any(|p| p.project_id == id) {
                        resource.projects.push(SharedProject::new(id));
                    }
                }
            }
        });
        Ok(())
    }

    async fn unassign(
        &self,
        _resource: &ShareableResource,
        request: &ShareRequest,
    ) -> ClientResult<()> {
        let ids: Vec<String> = request.project_ids().into_iter().map(String::from).collect();
        self.record(Call::Unassign(request.share_mode, ids.clone()))?;
        if request.share_mode == AssignMode::All {
            *self.released.lock().unwrap() = Some(!request.cluster_sharing_external);
        }
        self.apply(|resource| match request.share_mode {
            AssignMode::All => {
                resource.share_mode = ShareMode::None;
                resource.projects.retain(|p| p.project_id == OWNER);
            }
            AssignMode::Custom => resource.projects.retain(|p| !ids.contains(&p.project_id)),
        });
        Ok(())
    }
}
