use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use sharing_agent::clients::{DefaultProjectClient, ProjectClient, RestClient};
use sharing_agent::document::{
    expand_sharing, load_desired, ClusterOverrideSharing, ClusterSharing, ResourceState,
    SharingBlock, SharingDocument,
};
use sharing_agent::provider::Shareable;
use sharing_agent::{wait_for_resource, Reconciler};
use sharing_model::constants::RESOURCE_POLL_INTERVAL;
use std::path::{Path, PathBuf};

#[derive(Debug, Subcommand)]
pub(crate) enum Action {
    /// Create or update sharing from a document and record it in the state file.
    Apply(Apply),
    /// Refresh the state file from the platform.
    Read(StateFile),
    /// Unshare the resource and remove the state file.
    Delete(StateFile),
}

#[derive(Debug, Parser)]
pub(crate) struct Apply {
    /// Path to the desired sharing document (YAML or JSON).
    #[clap(long = "file", short = 'f')]
    pub(crate) file: PathBuf,
    /// Path to the state file. Created if it does not exist.
    #[clap(long = "state", short = 's')]
    pub(crate) state: PathBuf,
    /// Wait for the resource to exist before sharing it.
    #[clap(long = "wait")]
    pub(crate) wait: bool,
}

#[derive(Debug, Parser)]
pub(crate) struct StateFile {
    /// Path to the state file written by `apply`.
    #[clap(long = "state", short = 's')]
    pub(crate) state: PathBuf,
}

/// Documents with an optional `sharing { all, projects }` block.
pub(crate) trait SharedDocument: SharingDocument {
    fn sharing(&self) -> Option<&SharingBlock>;
    fn set_sharing(&mut self, sharing: Option<SharingBlock>);
}

impl SharedDocument for ClusterSharing {
    fn sharing(&self) -> Option<&SharingBlock> {
        self.sharing.as_ref()
    }

    fn set_sharing(&mut self, sharing: Option<SharingBlock>) {
        self.sharing = sharing;
    }
}

impl SharedDocument for ClusterOverrideSharing {
    fn sharing(&self) -> Option<&SharingBlock> {
        self.sharing.as_ref()
    }

    fn set_sharing(&mut self, sharing: Option<SharingBlock>) {
        self.sharing = sharing;
    }
}

/// Run `action` for a document kind whose resource is built by `make_target` from a client, the
/// owning project id and the document.
pub(crate) async fn run_shared<D, S, F>(
    action: Action,
    client: RestClient,
    make_target: F,
) -> Result<()>
where
    D: SharedDocument,
    S: Shareable,
    F: Fn(RestClient, String, &D) -> S,
{
    let projects = DefaultProjectClient::new(client.clone());
    match action {
        Action::Apply(apply) => {
            let desired: D = load_desired(&apply.file).context("Unable to load document")?;
            let spec = expand_sharing(desired.sharing());
            if let Some(spec) = &spec {
                spec.validate().context(format!(
                    "Invalid sharing in '{}'",
                    apply.file.display()
                ))?;
            }
            if let Some(state) = load_state::<D>(&apply.state)? {
                state.check_name(&desired)?;
            }
            let owner = owner_id(&projects, desired.project()).await?;
            let target = make_target(client, owner.clone(), &desired);
            if apply.wait {
                wait_for_resource(&target, RESOURCE_POLL_INTERVAL).await?;
            }
            let status = Reconciler::new(&target, &projects, owner)
                .reconcile(spec)
                .await?;
            let mut attributes = desired.clone();
            attributes.set_sharing(desired.sharing().map(|_| SharingBlock::flatten(&status)));
            save_state(&apply.state, &ResourceState::new(attributes))
        }
        Action::Read(read) => {
            let mut state = required_state::<D>(&read.state)?;
            let owner = owner_id(&projects, state.attributes.project()).await?;
            let target = make_target(client, owner.clone(), &state.attributes);
            let previous = expand_sharing(state.attributes.sharing());
            let result = Reconciler::new(&target, &projects, owner)
                .read(previous.as_ref())
                .await;
            let status = match result {
                Err(e) if e.is_not_found() => return forget(&read.state, D::KIND, &state).await,
                other => other?,
            };
            let shared = status.shared_to_all() || !status.projects.is_empty();
            if shared || state.attributes.sharing().is_some() {
                state
                    .attributes
                    .set_sharing(Some(SharingBlock::flatten(&status)));
            }
            save_state(&read.state, &state)
        }
        Action::Delete(delete) => {
            let state = required_state::<D>(&delete.state)?;
            let owner = owner_id(&projects, state.attributes.project()).await?;
            let target = make_target(client, owner.clone(), &state.attributes);
            match Reconciler::new(&target, &projects, owner).delete().await {
                Err(e) if e.is_not_found() => info!("{} is already gone: {}", D::KIND, e),
                other => other?,
            }
            remove_state(&delete.state).await
        }
    }
}

pub(crate) async fn owner_id<P: ProjectClient>(projects: &P, name: &str) -> Result<String> {
    projects
        .project_id_by_name(name)
        .await
        .context(format!("Unable to find project '{}'", name))
}

pub(crate) fn load_state<D: SharingDocument>(path: &Path) -> Result<Option<ResourceState<D>>> {
    ResourceState::load(path).context(format!("Unable to load state '{}'", path.display()))
}

pub(crate) fn required_state<D: SharingDocument>(path: &Path) -> Result<ResourceState<D>> {
    load_state(path)?.context(format!("No state found at '{}'", path.display()))
}

/// Write the state file and print it.
pub(crate) fn save_state<D: SharingDocument>(path: &Path, state: &ResourceState<D>) -> Result<()> {
    state
        .save(path)
        .context(format!("Unable to save state '{}'", path.display()))?;
    println!(
        "{}",
        std::fs::read_to_string(path).context("Unable to read back state")?
    );
    Ok(())
}

pub(crate) async fn remove_state(path: &Path) -> Result<()> {
    tokio::fs::remove_file(path)
        .await
        .context(format!("Unable to remove state '{}'", path.display()))
}

/// The resource no longer exists, so there is nothing left to track.
pub(crate) async fn forget<D: SharingDocument>(
    path: &Path,
    kind: &str,
    state: &ResourceState<D>,
) -> Result<()> {
    info!(
        "{} '{}' no longer exists, removing state '{}'",
        kind,
        state.attributes.resource_name(),
        path.display()
    );
    remove_state(path).await
}
