use super::error::{ClientError, ClientResult};
use super::rest::RestClient;
use log::trace;
use serde::Deserialize;
use sharing_model::constants::{AUTH_API, PROJECTS_PATH};

/// `ProjectClient` translates between project names, which is what users write, and project ids,
/// which is what the sharing API takes.
///
/// This is provided as a trait so that mock implementations can be injected into the
/// [`Reconciler`] for testing purposes. In practice you will use the [`DefaultProjectClient`].
///
/// [`Reconciler`]: crate::Reconciler
#[async_trait::async_trait]
pub trait ProjectClient: Send + Sync {
    /// Look up a project's id by its name. An unknown name is a [`ClientError::NotFound`].
    async fn project_id_by_name(&self, name: &str) -> ClientResult<String>;

    /// Look up a project's name by its id.
    async fn project_name_by_id(&self, id: &str) -> ClientResult<String>;
}

/// Provides the default [`ProjectClient`] implementation.
#[derive(Clone, Debug)]
pub struct DefaultProjectClient {
    rest: RestClient,
}

#[derive(Debug, Deserialize)]
struct ProjectList {
    #[serde(default)]
    results: Vec<Project>,
}

#[derive(Debug, Deserialize)]
struct Project {
    id: String,
    name: String,
}

impl DefaultProjectClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait::async_trait]
impl ProjectClient for DefaultProjectClient {
    async fn project_id_by_name(&self, name: &str) -> ClientResult<String> {
        trace!("looking up project '{}'", name);
        let list: ProjectList = self.rest.get(PROJECTS_PATH, &[], &[("name", name)]).await?;
        // The name filter is a prefix match on some platform versions.
        list.results
            .into_iter()
            .find(|project| project.name == name)
            .map(|project| project.id)
            .ok_or_else(|| {
                ClientError::NotFound(Some(format!("project '{}' does not exist", name).into()))
            })
    }

    async fn project_name_by_id(&self, id: &str) -> ClientResult<String> {
        trace!("looking up project id '{}'", id);
        let project: Project = self
            .rest
            .get(AUTH_API, &["projects", id], &[])
            .await?;
        Ok(project.name)
    }
}
