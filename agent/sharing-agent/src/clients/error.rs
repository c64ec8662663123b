use crate::error::{ErrorEnum, ErrorMessage};
use reqwest::StatusCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The result type returned by [`ProjectClient`] and [`Shareable`] implementations.
///
/// [`ProjectClient`]: crate::clients::ProjectClient
/// [`Shareable`]: crate::provider::Shareable
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// The error type returned by [`ProjectClient`] and [`Shareable`] implementations.
///
/// [`ProjectClient`]: crate::clients::ProjectClient
/// [`Shareable`]: crate::provider::Shareable
#[derive(Debug)]
pub enum ClientError {
    /// The client could not be created.
    InitializationFailed(Option<Box<dyn std::error::Error + Send + Sync + 'static>>),

    /// Some data that was expected to be present was not found.
    MissingData(Option<ErrorMessage>),

    /// The platform answered that the object does not exist.
    NotFound(Option<ErrorMessage>),

    /// The platform answered with a non-success status other than not found.
    Rejected(Option<ErrorMessage>),

    /// A communication with the platform failed.
    RequestFailed(Option<Box<dyn std::error::Error + Send + Sync + 'static>>),

    /// An error occurred serializing or deserializing.
    Serialization(Option<Box<dyn std::error::Error + Send + Sync + 'static>>),
}

impl ClientError {
    pub(crate) fn for_status(status: StatusCode, what: &str, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("{} returned {}", what, status)
        } else {
            format!("{} returned {}: {}", what, status, body.trim())
        };
        if status == StatusCode::NOT_FOUND {
            ClientError::NotFound(Some(message.into()))
        } else {
            ClientError::Rejected(Some(message.into()))
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

impl ErrorEnum for ClientError {
    fn variant_name(&self) -> &'static str {
        match self {
            ClientError::InitializationFailed(_) => "Initialization failed",
            ClientError::MissingData(_) => "Missing data",
            ClientError::NotFound(_) => "Not found",
            ClientError::Rejected(_) => "Request rejected",
            ClientError::RequestFailed(_) => "Request failed",
            ClientError::Serialization(_) => "Serialization error",
        }
    }

    fn inner(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            ClientError::InitializationFailed(e) => e.as_ref().map(|some| some.as_ref()),
            ClientError::MissingData(s) | ClientError::NotFound(s) | ClientError::Rejected(s) => {
                s.as_ref()
                    .map(|some| some as &(dyn std::error::Error + Send + Sync + 'static))
            }
            ClientError::RequestFailed(e) => e.as_ref().map(|some| some.as_ref()),
            ClientError::Serialization(e) => e.as_ref().map(|some| some.as_ref()),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner_as_source()
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

#[test]
fn status_mapping() {
    assert!(ClientError::for_status(StatusCode::NOT_FOUND, "GET /x", "").is_not_found());
    let rejected = ClientError::for_status(StatusCode::FORBIDDEN, "GET /x", "denied\n");
    assert!(!rejected.is_not_found());
    assert_eq!(
        rejected.to_string(),
        "Request rejected: GET /x returned 403 Forbidden: denied"
    );
}
