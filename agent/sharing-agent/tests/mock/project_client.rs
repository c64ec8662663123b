use super::PROJECTS;
use sharing_agent::clients::{ClientError, ClientResult, ProjectClient};
use std::collections::HashSet;
use std::sync::Mutex;

/// A [`ProjectClient`] backed by a fixed table of projects. Ids can be marked as broken to make
/// the reverse lookup fail.
#[derive(Default)]
pub(crate) struct MockProjectClient {
    broken_ids: Mutex<HashSet<String>>,
}

impl MockProjectClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn break_id(&self, id: &str) {
        self.broken_ids.lock().unwrap().insert(id.to_string());
    }
}

#[async_trait::async_trait]
impl ProjectClient for MockProjectClient {
    async fn project_id_by_name(&self, name: &str) -> ClientResult<String> {
        PROJECTS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, id)| id.to_string())
            .ok_or_else(|| ClientError::NotFound(Some(format!("no project '{}'", name).into())))
    }

    async fn project_name_by_id(&self, id: &str) -> ClientResult<String> {
        if self.broken_ids.lock().unwrap().contains(id) {
            return Err(ClientError::Rejected(Some("lookup failed".into())));
        }
        PROJECTS
            .iter()
            .find(|(_, i)| *i == id)
            .map(|(name, _)| name.to_string())
            .ok_or_else(|| ClientError::NotFound(Some(format!("no project id '{}'", id).into())))
    }
}
