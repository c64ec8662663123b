use crate::lifecycle::{run_shared, Action};
use anyhow::Result;
use clap::Parser;
use sharing_agent::clients::RestClient;
use sharing_agent::document::ClusterOverrideSharing;
use sharing_agent::resources::OverrideTarget;

/// Share a cluster override described by a `cluster_override_sharing` document.
#[derive(Debug, Parser)]
pub(crate) struct Override {
    #[clap(subcommand)]
    action: Action,
}

impl Override {
    pub(crate) async fn run(self, client: RestClient) -> Result<()> {
        run_shared::<ClusterOverrideSharing, _, _>(
            self.action,
            client,
            |client, owner, doc| {
                OverrideTarget::new(
                    client,
                    owner,
                    doc.clusteroverridename.as_str(),
                    doc.clusteroverridetype.as_str(),
                )
            },
        )
        .await
    }
}
