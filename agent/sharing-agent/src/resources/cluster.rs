use crate::clients::{ClientError, ClientResult, RestClient};
use crate::provider::Shareable;
use log::trace;
use sharing_model::constants::EDGE_API;
use sharing_model::{ShareRequest, ShareableResource};

/// A cluster, addressed by name within its owning project for reads and by id for sharing calls.
#[derive(Clone, Debug)]
pub struct ClusterTarget {
    rest: RestClient,
    project_id: String,
    name: String,
}

impl ClusterTarget {
    pub fn new<S1, S2>(rest: RestClient, project_id: S1, name: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            rest,
            project_id: project_id.into(),
            name: name.into(),
        }
    }

    fn query(&self) -> [(&str, &str); 1] {
        [("user_agent", self.rest.user_agent())]
    }

    async fn share(
        &self,
        resource: &ShareableResource,
        action: &str,
        request: &ShareRequest,
    ) -> ClientResult<()> {
        if resource.id.is_empty() {
            return Err(ClientError::MissingData(Some(
                format!("cluster '{}' has no id", self.name).into(),
            )));
        }
        let segments = [
            "projects",
            self.project_id.as_str(),
            "edges",
            resource.id.as_str(),
            "projects",
            action,
        ];
        self.rest
            .post(EDGE_API, &segments, &self.query(), request)
            .await
    }
}

#[async_trait::async_trait]
impl Shareable for ClusterTarget {
    fn kind(&self) -> &'static str {
        "cluster"
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self) -> ClientResult<ShareableResource> {
        let segments = ["projects", self.project_id.as_str(), "edges", self.name.as_str()];
        let mut resource: ShareableResource =
            self.rest.get(EDGE_API, &segments, &self.query()).await?;
        if resource.project_id.is_empty() {
            resource.project_id = self.project_id.clone();
        }
        trace!(
            "cluster '{}' is shared in mode {} with {} projects",
            self.name,
            resource.share_mode,
            resource.projects.len()
        );
        Ok(resource)
    }

    async fn assign(
        &self,
        resource: &ShareableResource,
        request: &ShareRequest,
    ) -> ClientResult<()> {
        self.share(resource, "assign", request).await
    }

    async fn unassign(
        &self,
        resource: &ShareableResource,
        request: &ShareRequest,
    ) -> ClientResult<()> {
        self.share(resource, "unassign", request).await
    }
}
