use super::error::{ClientError, ClientResult};
use crate::BootstrapData;
use log::{debug, info, trace};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sharing_model::constants::{HEADER_API_KEY, USERS_PATH};
use url::Url;

/// A thin authenticated HTTP client for the platform's REST API. Every request carries the API key
/// header and the user agent. Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base: Url,
    api_key: String,
    user_agent: String,
}

/// An API key as returned for a user.
#[derive(Debug, Deserialize)]
struct UserApiKey {
    key: String,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base", &self.base.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Build a client from bootstrap data. When `as_user` is set the client switches to that
    /// user's API key before it is returned.
    pub async fn new(data: &BootstrapData) -> ClientResult<Self> {
        let client = Self::from_parts(
            &data.config.base_url(),
            &data.config.api_key,
            &data.user_agent,
            data.ignore_insecure_tls_error,
        )?;
        match &data.as_user {
            Some(user) => client.impersonate(user).await,
            None => Ok(client),
        }
    }

    pub fn from_parts(
        base_url: &str,
        api_key: &str,
        user_agent: &str,
        ignore_insecure_tls_error: bool,
    ) -> ClientResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::InitializationFailed(Some(Box::new(e))))?;
        if ignore_insecure_tls_error {
            info!("TLS certificate verification is disabled for '{}'", base);
        }
        let http = Client::builder()
            .user_agent(user_agent)
            .danger_accept_invalid_certs(ignore_insecure_tls_error)
            .build()
            .map_err(|e| ClientError::InitializationFailed(Some(Box::new(e))))?;
        Ok(Self {
            http,
            base,
            api_key: api_key.to_string(),
            user_agent: user_agent.to_string(),
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns a client that acts as `user` by using that user's API key. The original client is
    /// left untouched so callers decide per call which identity they use.
    pub async fn impersonate(&self, user: &str) -> ClientResult<Self> {
        debug!("fetching api key for user '{}'", user);
        let api_key: UserApiKey = self.get(USERS_PATH, &[user, "apikey"], &[]).await?;
        if api_key.key.is_empty() {
            return Err(ClientError::MissingData(Some(
                format!("no api key was returned for user '{}'", user).into(),
            )));
        }
        Ok(Self {
            api_key: api_key.key,
            ..self.clone()
        })
    }

    /// `GET` a JSON document from `root` followed by `segments`. `root` is a fixed API path, each
    /// segment is escaped.
    pub async fn get<T>(
        &self,
        root: &str,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(root, segments, query)?;
        let what = format!("GET {}", url.path());
        let body = self.send(self.request(Method::GET, url), &what).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Serialization(Some(Box::new(e))))
    }

    /// `POST` a JSON body and discard the response body.
    pub async fn post<B>(
        &self,
        root: &str,
        segments: &[&str],
        query: &[(&str, &str)],
        body: &B,
    ) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(root, segments, query)?;
        let what = format!("POST {}", url.path());
        let request = self.request(Method::POST, url).json(body);
        let _ = self.send(request, &what).await?;
        Ok(())
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(HEADER_API_KEY, &self.api_key)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> ClientResult<String> {
        trace!("{}", what);
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(Some(Box::new(e))))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::RequestFailed(Some(Box::new(e))))?;
        if !status.is_success() {
            debug!("{} returned {}", what, status);
            return Err(ClientError::for_status(status, what, &body));
        }
        Ok(body)
    }

    /// Every path ends with a slash.
    fn url(&self, root: &str, segments: &[&str], query: &[(&str, &str)]) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InitializationFailed(Some(
                    format!("'{}' can not be used as a base url", self.base).into(),
                ))
            })?
            .pop_if_empty()
            .extend(root.split('/').filter(|s| !s.is_empty()))
            .extend(segments)
            .push("");
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }
}
