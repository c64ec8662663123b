mod error;

pub use self::error::{ErrorKind, IntoShareError, RemoteState, ShareError, ShareResult};
use crate::clients::ClientResult;
use sharing_model::{ShareRequest, ShareableResource};

/// You implement the [`Shareable`] trait for each kind of platform resource whose visibility can
/// be extended to other projects. The implementation is then injected into the [`Reconciler`] or
/// the [`SingleReconciler`], which decide which calls to make.
///
/// Only `get`, `assign` and `unassign` need to be written. The mode-specific helpers build the
/// matching [`ShareRequest`] and forward to them.
///
/// [`Reconciler`]: crate::Reconciler
/// [`SingleReconciler`]: crate::SingleReconciler
#[async_trait::async_trait]
pub trait Shareable: Send + Sync {
    /// A human readable kind used in messages, e.g. `cluster`.
    fn kind(&self) -> &'static str;

    /// The name of the resource being shared.
    fn name(&self) -> &str;

    /// Fetch the resource, including its share mode and remote project list.
    async fn get(&self) -> ClientResult<ShareableResource>;

    /// Extend the visibility of `resource` as described by `request`.
    async fn assign(&self, resource: &ShareableResource, request: &ShareRequest)
        -> ClientResult<()>;

    /// Narrow the visibility of `resource` as described by `request`.
    async fn unassign(
        &self,
        resource: &ShareableResource,
        request: &ShareRequest,
    ) -> ClientResult<()>;

    async fn assign_all(&self, resource: &ShareableResource) -> ClientResult<()> {
        self.assign(resource, &ShareRequest::all()).await
    }

    async fn assign_custom(
        &self,
        resource: &ShareableResource,
        project_ids: &[String],
    ) -> ClientResult<()> {
        self.assign(resource, &ShareRequest::custom(project_ids.iter().cloned()))
            .await
    }

    async fn unassign_all(&self, resource: &ShareableResource) -> ClientResult<()> {
        self.unassign(resource, &ShareRequest::all()).await
    }

    async fn unassign_custom(
        &self,
        resource: &ShareableResource,
        project_ids: &[String],
    ) -> ClientResult<()> {
        self.unassign(resource, &ShareRequest::custom(project_ids.iter().cloned()))
            .await
    }

    /// Unassign from all projects and hand sharing management back to the resource itself.
    async fn release(&self, resource: &ShareableResource) -> ClientResult<()> {
        self.unassign(resource, &ShareRequest::release()).await
    }
}
