/*!

[`Shareable`] implementations for the platform resources that can be shared between projects.

[`Shareable`]: crate::provider::Shareable

!*/

mod cluster;
mod cluster_override;

pub use cluster::ClusterTarget;
pub use cluster_override::OverrideTarget;
