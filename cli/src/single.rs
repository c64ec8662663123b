use crate::lifecycle::{
    forget, load_state, owner_id, remove_state, required_state, save_state, Action,
};
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sharing_agent::clients::{DefaultProjectClient, RestClient};
use sharing_agent::document::{
    load_desired, ClusterSharingSingle, ResourceState, SharingDocument, SingleSharingBlock,
};
use sharing_agent::resources::ClusterTarget;
use sharing_agent::{wait_for_resource, SingleReconciler};
use sharing_model::constants::RESOURCE_POLL_INTERVAL;

/// Share a cluster with a single project described by a `cluster_sharing_single` document.
#[derive(Debug, Parser)]
pub(crate) struct Single {
    #[clap(subcommand)]
    action: Action,
}

impl Single {
    pub(crate) async fn run(self, client: RestClient) -> Result<()> {
        let projects = DefaultProjectClient::new(client.clone());
        match self.action {
            Action::Apply(apply) => {
                let desired: ClusterSharingSingle =
                    load_desired(&apply.file).context("Unable to load document")?;
                let previous = load_state::<ClusterSharingSingle>(&apply.state)?;
                if let Some(state) = &previous {
                    state.check_name(&desired)?;
                }
                let owner = owner_id(&projects, &desired.project).await?;
                let target =
                    ClusterTarget::new(client, owner.clone(), desired.clustername.as_str());
                if apply.wait {
                    wait_for_resource(&target, RESOURCE_POLL_INTERVAL).await?;
                }
                let reconciler = SingleReconciler::new(&target, &projects, owner);
                let wanted = desired.sharing.projectname.as_str();
                let status = match &previous {
                    Some(state) => {
                        reconciler
                            .update(&state.attributes.sharing.projectname, wanted)
                            .await?
                    }
                    None => reconciler.create(wanted).await?,
                };
                let mut attributes = desired.clone();
                attributes.sharing = SingleSharingBlock::flatten(&status);
                save_state(&apply.state, &ResourceState::new(attributes))
            }
            Action::Read(read) => {
                let mut state = required_state::<ClusterSharingSingle>(&read.state)?;
                let owner = owner_id(&projects, &state.attributes.project).await?;
                let target = ClusterTarget::new(
                    client,
                    owner.clone(),
                    state.attributes.clustername.as_str(),
                );
                let wanted = state.attributes.sharing.projectname.clone();
                let result = SingleReconciler::new(&target, &projects, owner)
                    .read(Some(&wanted))
                    .await;
                let status = match result {
                    Err(e) if e.is_not_found() => {
                        return forget(&read.state, ClusterSharingSingle::KIND, &state).await
                    }
                    other => other?,
                };
                state.attributes.sharing = SingleSharingBlock::flatten(&status);
                save_state(&read.state, &state)
            }
            Action::Delete(delete) => {
                let state = required_state::<ClusterSharingSingle>(&delete.state)?;
                let owner = owner_id(&projects, &state.attributes.project).await?;
                let target = ClusterTarget::new(
                    client,
                    owner.clone(),
                    state.attributes.clustername.as_str(),
                );
                let result = SingleReconciler::new(&target, &projects, owner)
                    .delete(&state.attributes.sharing.projectname)
                    .await;
                match result {
                    Err(e) if e.is_not_found() => info!("cluster is already gone: {}", e),
                    other => other?,
                }
                remove_state(&delete.state).await
            }
        }
    }
}
