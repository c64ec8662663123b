/*!

The `bootstrap` module defines a struct and function for gathering the information needed to
construct the platform clients: the provider config file and the per-invocation options.

!*/
use sharing_model::constants::DEFAULT_USER_AGENT;
use sharing_model::ProviderConfig;
use snafu::{ResultExt, Snafu};
use std::path::PathBuf;

/// The public error type for [`BootstrapData`].
#[derive(Debug, Snafu)]
pub struct BootstrapError(InnerError);

/// The private error type for [`BootstrapData`].
#[derive(Debug, Snafu)]
pub(crate) enum InnerError {
    #[snafu(display("Unable to locate the provider config file: {}", source))]
    ConfigPath { source: sharing_model::Error },

    #[snafu(display("Unable to load the provider config file: {}", source))]
    ConfigLoad { source: sharing_model::Error },
}

/// Everything the clients need to talk to the platform.
#[derive(Clone, Debug)]
pub struct BootstrapData {
    /// Where the provider config was read from.
    pub config_path: PathBuf,
    pub config: ProviderConfig,
    /// Reported to the platform as the `User-Agent` header and the `user_agent` query parameter.
    pub user_agent: String,
    /// Accept invalid TLS certificates. Also enabled by `skip_server_cert_check` in the config.
    pub ignore_insecure_tls_error: bool,
    /// Act as this user by switching to their API key.
    pub as_user: Option<String>,
}

impl BootstrapData {
    /// Load the provider config from `explicit`, or from the location given by the environment,
    /// or from the default location.
    pub fn from_config_path(explicit: Option<&str>) -> Result<BootstrapData, BootstrapError> {
        let config_path = ProviderConfig::resolve_path(explicit).context(ConfigPathSnafu)?;
        let config = ProviderConfig::from_path(&config_path).context(ConfigLoadSnafu)?;
        Ok(Self::from_config(config_path, config))
    }

    pub fn from_config(config_path: PathBuf, config: ProviderConfig) -> BootstrapData {
        let ignore_insecure_tls_error = config.skip_server_cert_check;
        BootstrapData {
            config_path,
            config,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ignore_insecure_tls_error,
            as_user: None,
        }
    }

    pub fn ignore_insecure_tls_error(mut self, ignore: bool) -> Self {
        self.ignore_insecure_tls_error = self.ignore_insecure_tls_error || ignore;
        self
    }

    pub fn as_user(mut self, user: Option<String>) -> Self {
        self.as_user = user.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
