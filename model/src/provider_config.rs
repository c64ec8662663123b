use crate::constants::{DEFAULT_PROVIDER_CONFIG, ENV_PROVIDER_CONFIG};
use crate::error::{self, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use snafu::{ensure, OptionExt, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// The contents of the platform CLI's JSON config file, which holds the endpoint and credentials
/// used for every API call.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// The REST endpoint, with or without a scheme, e.g. `console.rafay.dev`.
    pub rest_endpoint: String,
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    /// The default project of the CLI profile.
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    /// Accept invalid TLS certificates from the endpoint.
    #[serde(default)]
    pub skip_server_cert_check: bool,
}

// Credentials are kept out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("rest_endpoint", &self.rest_endpoint)
            .field("project", &self.project)
            .field("organization", &self.organization)
            .field("skip_server_cert_check", &self.skip_server_cert_check)
            .finish_non_exhaustive()
    }
}

impl ProviderConfig {
    /// Read and validate the config file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading provider config '{}'", path.display());
        let data = fs::read_to_string(path).context(error::ProviderConfigReadSnafu { path })?;
        let config: Self =
            serde_json::from_str(&data).context(error::ProviderConfigParseSnafu { path })?;
        ensure!(
            !config.rest_endpoint.trim().is_empty(),
            error::ProviderConfigMissingSnafu {
                path,
                field: "rest_endpoint"
            }
        );
        ensure!(
            !config.api_key.trim().is_empty(),
            error::ProviderConfigMissingSnafu {
                path,
                field: "api_key"
            }
        );
        Ok(config)
    }

    /// Find the config file: `explicit` if given, else the `RAFAY_PROVIDER_CONFIG` environment
    /// variable, else `~/.rafay/cli/config.json`. A leading `~` is expanded and relative paths
    /// are made absolute.
    pub fn resolve_path(explicit: Option<&str>) -> Result<PathBuf> {
        let from_env = std::env::var(ENV_PROVIDER_CONFIG).ok();
        let raw = explicit
            .map(str::to_string)
            .or(from_env)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| {
                info!(
                    "provider will use default config file {}",
                    DEFAULT_PROVIDER_CONFIG
                );
                DEFAULT_PROVIDER_CONFIG.to_string()
            });
        expand_path(raw.trim())
    }

    /// The endpoint as a base URL string, adding `https://` when no scheme is present.
    pub fn base_url(&self) -> String {
        let endpoint = self.rest_endpoint.trim().trim_end_matches('/');
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("https://{}", endpoint)
        }
    }
}

fn expand_path(raw: &str) -> Result<PathBuf> {
    if let Some(rest) = raw.strip_prefix('~') {
        let home = dirs::home_dir().context(error::HomeDirSnafu { path: raw })?;
        return Ok(home.join(rest.trim_start_matches('/')));
    }
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return Ok(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => Ok(cwd.join(path)),
        Err(_) => Ok(path),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_cli_config() {
        let file = write_config(
            r#"{
                "profile": "prod",
                "rest_endpoint": "console.example.dev",
                "api_key": "ra2.abc",
                "api_secret": "s3cr3t",
                "project": "defaultproject",
                "organization": "acme"
            }"#,
        );
        let config = ProviderConfig::from_path(file.path()).unwrap();
        assert_eq!(config.api_key, "ra2.abc");
        assert_eq!(config.project.as_deref(), Some("defaultproject"));
        assert!(!config.skip_server_cert_check);
        assert_eq!(config.base_url(), "https://console.example.dev");
        assert!(!format!("{:?}", config).contains("s3cr3t"));
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let file = write_config(r#"{ "rest_endpoint": "console.example.dev", "api_key": "" }"#);
        let message = ProviderConfig::from_path(file.path())
            .unwrap_err()
            .to_string();
        assert!(message.contains("api_key"), "{}", message);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        assert!(ProviderConfig::from_path("/nonexistent/sharectl/config.json").is_err());
    }

    #[test]
    fn scheme_is_kept() {
        let config = ProviderConfig {
            rest_endpoint: "http://localhost:8080/".into(),
            ..ProviderConfig::default()
        };
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn explicit_path_wins_and_tilde_expands() {
        let path = ProviderConfig::resolve_path(Some("/etc/sharectl.json")).unwrap();
        assert_eq!(path, PathBuf::from("/etc/sharectl.json"));
        if let Some(home) = dirs::home_dir() {
            let path = ProviderConfig::resolve_path(Some("~/.rafay/cli/config.json")).unwrap();
            assert_eq!(path, home.join(".rafay/cli/config.json"));
        }
    }
}
