/*!

The `sharing-agent` library keeps the project sharing of platform resources in line with a
declarative description. You implement the [`Shareable`] trait for a kind of resource (clusters
and cluster overrides are provided in [`resources`]), then hand it to a [`Reconciler`] or a
[`SingleReconciler`] together with a [`ProjectClient`].

[`Shareable`]: crate::provider::Shareable
[`ProjectClient`]: crate::clients::ProjectClient

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

mod bootstrap;
pub mod clients;
pub mod diff;
pub mod document;
pub mod error;
pub mod provider;
mod reconciler;
pub mod resources;
mod single;

pub use bootstrap::{BootstrapData, BootstrapError};
pub use reconciler::{wait_for_resource, Reconciler};
pub use single::{SingleReconciler, SingleSharingStatus};
