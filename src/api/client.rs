use super::constants::{headers, USER_AGENT};
use super::resilience::RetryPolicy;
use log::debug;
use reqwest::{Method, Url};
use serde_json::Value;
use std::time::Duration;

/// HTTP client bound to one environment's API root and bearer token.
///
/// The token is fixed for the lifetime of the client; create a new client
/// to pick up a refreshed token.
#[derive(Clone)]
pub struct FormsClient {
    env_name: String,
    base_url: String,
    http_client: reqwest::Client,
    access_token: String,
    retry_policy: RetryPolicy,
}

impl FormsClient {
    pub fn new(
        env_name: String,
        base_url: String,
        access_token: String,
        retry_policy: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            env_name,
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            access_token,
            retry_policy,
        })
    }

    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a path relative to the API root
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.send(Method::GET, path, None).await
    }

    /// POST a JSON body to a path relative to the API root
    pub async fn post(&self, path: &str, body: &Value) -> Result<reqwest::Response, reqwest::Error> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[{}] {} {}", self.env_name, method, url);

        let mut builder = self
            .http_client
            .request(method, &url)
            .bearer_auth(&self.access_token)
            .header("Accept", headers::CONTENT_TYPE_JSON);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let request = builder.build()?;
        self.retry_policy.send(&self.http_client, request).await
    }

    /// Turn a pagination link into a path relative to the API root.
    ///
    /// Absolute links are reduced to path and query; if the path starts with
    /// the API root's own path (for example `/v1`) that prefix is dropped so the
    /// result can be passed back to [`FormsClient::get`].
    pub fn relative_path(&self, link: &str) -> String {
        if let Some(rest) = link.strip_prefix(&self.base_url) {
            return ensure_leading_slash(rest);
        }

        let (path, query) = match Url::parse(link) {
            Ok(url) => (url.path().to_string(), url.query().map(str::to_string)),
            Err(_) => match link.split_once('?') {
                Some((path, query)) => (path.to_string(), Some(query.to_string())),
                None => (link.to_string(), None),
            },
        };

        let root_path = Url::parse(&self.base_url)
            .map(|url| url.path().trim_end_matches('/').to_string())
            .unwrap_or_default();

        let path = ensure_leading_slash(&path);
        let path = if !root_path.is_empty()
            && (path == root_path || path.starts_with(&format!("{}/", root_path)))
        {
            ensure_leading_slash(&path[root_path.len()..])
        } else {
            path
        };

        match query {
            Some(query) => format!("{}?{}", path, query),
            None => path,
        }
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
