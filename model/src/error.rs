use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
pub struct Error(OpaqueError);
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum OpaqueError {
    #[snafu(display("Error deserializing attributes: {}", source))]
    AttributeDeserialization { source: serde_json::Error },

    #[snafu(display("Error serializing attributes: {}", source))]
    AttributeSerialization { source: serde_json::Error },

    #[snafu(display(
        "Error serializing attributes: expected Value::Object type but got something else."
    ))]
    AttributeWrongValueType {},

    #[snafu(display("Unable to determine the home directory to expand '{}'", path))]
    HomeDir { path: String },

    #[snafu(display("Invalid sharing specification: {}", reason))]
    InvalidSharingSpec { reason: String },

    #[snafu(display("Unable to parse provider config '{}': {}", path.display(), source))]
    ProviderConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Unable to read provider config '{}': {}", path.display(), source))]
    ProviderConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Provider config '{}' is missing '{}'", path.display(), field))]
    ProviderConfigMissing { path: PathBuf, field: String },
}
