use crate::clients::{ClientResult, RestClient};
use crate::provider::Shareable;
use sharing_model::constants::CONFIG_API;
use sharing_model::{ShareRequest, ShareableResource};

/// A cluster override. Overrides are addressed by name and type, never by id.
#[derive(Clone, Debug)]
pub struct OverrideTarget {
    rest: RestClient,
    project_id: String,
    name: String,
    override_type: String,
}

impl OverrideTarget {
    pub fn new<S1, S2, S3>(rest: RestClient, project_id: S1, name: S2, override_type: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            rest,
            project_id: project_id.into(),
            name: name.into(),
            override_type: override_type.into(),
        }
    }

    async fn share(&self, action: &str, request: &ShareRequest) -> ClientResult<()> {
        let segments = [
            "projects",
            self.project_id.as_str(),
            "clusteroverrides",
            self.name.as_str(),
            action,
        ];
        self.rest
            .post(CONFIG_API, &segments, &self.query(), request)
            .await
    }

    fn query(&self) -> [(&str, &str); 1] {
        [("type", self.override_type.as_str())]
    }
}

#[async_trait::async_trait]
impl Shareable for OverrideTarget {
    fn kind(&self) -> &'static str {
        "cluster override"
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self) -> ClientResult<ShareableResource> {
        let mut resource: ShareableResource = self
            .rest
            .get(
                CONFIG_API,
                &[
                    "projects",
                    self.project_id.as_str(),
                    "clusteroverrides",
                    self.name.as_str(),
                ],
                &self.query(),
            )
            .await?;
        if resource.project_id.is_empty() {
            resource.project_id = self.project_id.clone();
        }
        Ok(resource)
    }

    async fn assign(
        &self,
        _resource: &ShareableResource,
        request: &ShareRequest,
    ) -> ClientResult<()> {
        self.share("assign", request).await
    }

    async fn unassign(
        &self,
        _resource: &ShareableResource,
        request: &ShareRequest,
    ) -> ClientResult<()> {
        self.share("unassign", request).await
    }
}
