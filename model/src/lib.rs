/*!

This library provides the data types that describe how a platform resource (a cluster or a
cluster override) is shared between projects, along with the provider configuration file that
holds the platform endpoint and credentials.

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

pub use attributes::Attributes;
pub use error::{Error, Result};
pub use project::ProjectMeta;
pub use provider_config::ProviderConfig;
pub use resource::{SharedProject, ShareableResource};
pub use sharing::{AssignMode, ShareMode, ShareRequest, SharingSpec, SharingStatus};

mod attributes;
pub mod constants;
mod error;
mod project;
mod provider_config;
mod resource;
mod sharing;
