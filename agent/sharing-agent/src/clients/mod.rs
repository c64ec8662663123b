/*!

This module provides the clients that the reconcilers use to talk to the platform.

!*/

mod error;
mod project_client;
mod rest;

pub use error::{ClientError, ClientResult};
pub use project_client::{DefaultProjectClient, ProjectClient};
pub use rest::RestClient;
