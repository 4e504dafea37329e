// modgrab-net/src/api.rs
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use modgrab_common::config::Config;
use modgrab_common::error::{ModError, Result};
use modgrab_common::model::{Project, Version};
use reqwest::header::{HeaderMap, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::download;
use crate::limit::RateLimiter;

const REQUEST_TIMEOUT_SECS: u64 = 300;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = "modgrab mod fetcher (Rust; +https://github.com/modgrab/modgrab)";

/// Query surface of the mod registry. The resolver and downloader only speak
/// this trait; [`ModrinthClient`] is the production implementation.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Project metadata by slug or project id. 404 maps to `NotFound` tagged
    /// with the requested target.
    async fn project(&self, id_or_slug: &str) -> Result<Project>;

    /// Version list of a project, filtered server-side by loader, game
    /// version, and the featured flag. The registry returns versions
    /// newest-first; callers rely on that ordering.
    async fn versions(
        &self,
        project_id: &str,
        loader: &str,
        game_version: &str,
    ) -> Result<Vec<Version>>;

    /// Full version record by version id.
    async fn version(&self, version_id: &str) -> Result<Version>;

    /// Streams a file and verifies its SHA-512 digest before returning the
    /// bytes.
    async fn fetch_file(&self, filename: &str, url: &str, sha512: &str) -> Result<Vec<u8>>;
}

pub struct ModrinthClient {
    client: Client,
    base_url: String,
    limiter: RateLimiter,
}

impl ModrinthClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::per_minute(config.requests_per_minute),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        target: &str,
    ) -> Result<T> {
        self.limiter.wait().await;
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ModError::not_found(
                target,
                format!("'{target}' was not found on the registry"),
            ));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("(failed to read response body: {e})"));
            error!("HTTP {} from {}: {}", status, url, body);
            return Err(ModError::Api(format!("HTTP status {status} from {url}")));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse response from {}: {}", url, e);
            ModError::Json(Arc::new(e))
        })
    }
}

#[async_trait]
impl Registry for ModrinthClient {
    async fn project(&self, id_or_slug: &str) -> Result<Project> {
        self.get_json(&format!("/project/{id_or_slug}"), &[], id_or_slug)
            .await
    }

    async fn versions(
        &self,
        project_id: &str,
        loader: &str,
        game_version: &str,
    ) -> Result<Vec<Version>> {
        // The registry expects JSON-encoded arrays in the query string.
        // `featured` stays on: some projects only publish dev builds
        // otherwise.
        let query = [
            ("loaders", serde_json::to_string(&[loader])?),
            ("game_versions", serde_json::to_string(&[game_version])?),
            ("featured", "true".to_string()),
        ];
        self.get_json(&format!("/project/{project_id}/version"), &query, project_id)
            .await
    }

    async fn version(&self, version_id: &str) -> Result<Version> {
        self.get_json(&format!("/version/{version_id}"), &[], version_id)
            .await
    }

    async fn fetch_file(&self, filename: &str, url: &str, sha512: &str) -> Result<Vec<u8>> {
        download::fetch_verified(&self.client, &self.limiter, filename, url, sha512).await
    }
}

fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, USER_AGENT_STRING.parse().unwrap());
    headers.insert(ACCEPT, "application/json".parse().unwrap());
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| ModError::Api(format!("Failed to build HTTP client: {e}")))
}
