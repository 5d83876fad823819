//! Authenticated HTTP client for one instance.
//!
//! Built once per run and passed by reference to every step. All requests
//! carry basic credentials and the `kbn-xsrf` header the instance requires
//! on every state-changing call.

use crate::config::InstanceConfig;
use crate::error::{MigrateError, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::debug;
use url::Url;

const XSRF_HEADER: &str = "kbn-xsrf";

/// Basic credentials. The password never shows up in `Debug` output.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::from(&InstanceConfig::default())
    }
}

impl From<&InstanceConfig> for ClientOptions {
    fn from(config: &InstanceConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            accept_invalid_certs: config.accept_invalid_certs,
        }
    }
}

#[derive(Debug)]
pub struct KibanaClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl KibanaClient {
    pub fn new(base_url: &str, credentials: Credentials, options: &ClientOptions) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Relative joins drop the last path segment unless it ends with '/',
        // which matters for instances served under a base path.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(XSRF_HEADER, HeaderValue::from_static("true"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// URL of an instance-wide API, e.g. `api/spaces/space`.
    pub fn api_url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// URL of an API scoped to one space, e.g. `s/marketing/api/saved_objects/_export`.
    pub fn space_url(&self, space_id: &str, path: &str) -> Result<Url> {
        self.api_url(&format!("s/{}/{}", space_id, path.trim_start_matches('/')))
    }

    pub fn get(&self, url: Url) -> RequestBuilder {
        debug!("GET {}", url);
        self.authorize(self.http.get(url))
    }

    pub fn post(&self, url: Url) -> RequestBuilder {
        debug!("POST {}", url);
        self.authorize(self.http.post(url))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(
            &self.credentials.username,
            Some(self.credentials.password.expose_secret()),
        )
    }

    /// Pass successful responses through; turn anything else into a transport error.
    pub async fn check(response: Response, context: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(MigrateError::transport(context, status, body))
    }
}
