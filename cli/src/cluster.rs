use crate::lifecycle::{run_shared, Action};
use anyhow::Result;
use clap::Parser;
use sharing_agent::clients::RestClient;
use sharing_agent::document::ClusterSharing;
use sharing_agent::resources::ClusterTarget;

/// Share a cluster described by a `cluster_sharing` document.
#[derive(Debug, Parser)]
pub(crate) struct Cluster {
    #[clap(subcommand)]
    action: Action,
}

impl Cluster {
    pub(crate) async fn run(self, client: RestClient) -> Result<()> {
        run_shared::<ClusterSharing, _, _>(self.action, client, |client, owner, doc| {
            ClusterTarget::new(client, owner, doc.clustername.as_str())
        })
        .await
    }
}
