use std::error::Error;
use std::fmt::{Display, Formatter};

/// This struct can serve as an `Error` type when you want to provide an error message, but have no
/// underlying error type. It allows a string to serve as an error. This can be useful for custom
/// (i.e. mock) implementations of the [`ProjectClient`] and [`Shareable`] traits.
///
/// # Example
///
/// ```
/// # use sharing_agent::error::ErrorMessage;
/// // Create a std::error::Error from a string.
/// let _error: ErrorMessage = "Something bad happened".into();
/// ```
///
/// [`ProjectClient`]: crate::clients::ProjectClient
/// [`Shareable`]: crate::provider::Shareable
#[derive(Debug)]
pub struct ErrorMessage {
    message: String,
}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.message, f)
    }
}

impl<S: Into<String>> From<S> for ErrorMessage {
    fn from(s: S) -> Self {
        Self { message: s.into() }
    }
}

impl std::error::Error for ErrorMessage {}

/// This internal trait helps de-duplicate a bit of code that we use when implementing `Display`
/// and `Error` for our error enums.
pub(crate) trait ErrorEnum {
    fn variant_name(&self) -> &'static str;
    fn inner(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)>;

    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.inner() {
            None => Display::fmt(self.variant_name(), f),
            Some(inner) => write!(f, "{}: {}", self.variant_name(), inner),
        }
    }

    fn inner_as_source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner().map(|some| some as &(dyn Error + 'static))
    }
}
