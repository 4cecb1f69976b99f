//! GitHub REST gateway.
//!
//! [`RepoHost`] is the seam the walker talks through; [`GitHubClient`] is
//! the HTTP implementation. Status handling is uniform: 200 is success,
//! 404 is [`TourError::NotFound`], anything else is
//! [`TourError::RemoteUnavailable`]. Nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::domain::{PathEntry, RepositoryRef, Result, TourError};

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// Flat listing of a branch as returned by the recursive tree endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoTree {
    pub entries: Vec<PathEntry>,
    /// The host cut the listing short.
    pub truncated: bool,
}

/// Read-only access to a hosted repository.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Full recursive listing of `branch`.
    async fn fetch_tree(&self, repo: &RepositoryRef, branch: &str) -> Result<RepoTree>;

    /// Immediate children of the directory at `path` (`""` is the root).
    async fn list_directory(&self, repo: &RepositoryRef, path: &str) -> Result<Vec<PathEntry>>;

    /// Raw bytes of the file at `path`.
    async fn fetch_file(&self, repo: &RepositoryRef, path: &str) -> Result<Vec<u8>>;

    /// Raw text of the repository README.
    async fn fetch_readme(&self, repo: &RepositoryRef) -> Result<String>;
}

/// GitHub connection settings
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API base URL
    pub api_url: String,
    /// Bearer token (optional; raises rate limits)
    pub token: Option<String>,
    /// Bounded wait for each request
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_url: GITHUB_API_URL.to_string(),
            token: None,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl GitHubConfig {
    /// Config for a specific API base URL
    pub fn new(api_url: &str) -> Self {
        GitHubConfig {
            api_url: api_url.to_string(),
            ..Self::default()
        }
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
}

impl TreeItem {
    fn into_entry(self) -> Option<PathEntry> {
        match self.kind.as_str() {
            "blob" => Some(PathEntry::file(self.path, self.size)),
            "tree" => Some(PathEntry::dir(self.path)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
}

impl ContentItem {
    fn into_entry(self) -> Option<PathEntry> {
        match self.kind.as_str() {
            "file" => Some(PathEntry::file(self.path, self.size)),
            "dir" => Some(PathEntry::dir(self.path)),
            other => {
                debug!(path = %self.path, kind = other, "dropping unsupported content entry");
                None
            }
        }
    }
}

/// HTTP client for the GitHub REST API, one session per pipeline run
pub struct GitHubClient {
    base_url: Url,
    http_client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let base_url = Url::parse(&config.api_url).map_err(|e| {
            TourError::Config(format!("invalid GitHub API URL '{}': {e}", config.api_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TourError::Config(format!(
                "GitHub API URL '{}' cannot be a base",
                config.api_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                TourError::Config("GITHUB_TOKEN contains invalid characters".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("repotour/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(GitHubClient {
            base_url,
            http_client,
        })
    }

    fn endpoint<'a, I>(&self, repo: &RepositoryRef, tail: I) -> Url
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        // checked in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner(), repo.name()])
                .extend(tail.into_iter().filter(|s| !s.is_empty()));
        }
        url
    }

    async fn get(&self, url: Url, resource: &str, raw: bool) -> Result<reqwest::Response> {
        debug!(%url, "GET");
        let mut request = self.http_client.get(url);
        if raw {
            request = request.header(ACCEPT, RAW_MEDIA_TYPE);
        }
        let response = request.send().await?;
        check_status(response.status(), resource)?;
        Ok(response)
    }
}

fn check_status(status: StatusCode, resource: &str) -> Result<()> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::NOT_FOUND => Err(TourError::NotFound {
            resource: resource.to_string(),
        }),
        other => Err(TourError::RemoteUnavailable {
            resource: resource.to_string(),
            status: other.as_u16(),
        }),
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn fetch_tree(&self, repo: &RepositoryRef, branch: &str) -> Result<RepoTree> {
        let mut url = self.endpoint(repo, ["git", "trees"].into_iter().chain(branch.split('/')));
        url.query_pairs_mut().append_pair("recursive", "1");

        let response = self.get(url, &format!("tree {branch}"), false).await?;
        let body: TreeResponse = serde_json::from_str(&response.text().await?)?;
        Ok(RepoTree {
            entries: body.tree.into_iter().filter_map(TreeItem::into_entry).collect(),
            truncated: body.truncated,
        })
    }

    async fn list_directory(&self, repo: &RepositoryRef, path: &str) -> Result<Vec<PathEntry>> {
        let url = self.endpoint(repo, std::iter::once("contents").chain(path.split('/')));
        let resource = if path.is_empty() { "/" } else { path };

        let response = self.get(url, &format!("directory {resource}"), false).await?;
        let items: Vec<ContentItem> = serde_json::from_str(&response.text().await?)?;
        Ok(items.into_iter().filter_map(ContentItem::into_entry).collect())
    }

    async fn fetch_file(&self, repo: &RepositoryRef, path: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(repo, std::iter::once("contents").chain(path.split('/')));
        let response = self.get(url, &format!("file {path}"), true).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_readme(&self, repo: &RepositoryRef) -> Result<String> {
        let url = self.endpoint(repo, ["readme"]);
        let response = self.get(url, "README", true).await?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepositoryRef {
        "octo/widgets".parse().unwrap()
    }

    #[test]
    fn endpoint_joins_segments_and_encodes_paths() {
        let client = GitHubClient::new(GitHubConfig::new("https://api.example.test/")).unwrap();
        let url = client.endpoint(&repo(), ["contents", "docs", "user guide.md"]);
        assert_eq!(
            url.as_str(),
            "https://api.example.test/repos/octo/widgets/contents/docs/user%20guide.md"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let config = GitHubConfig::new("https://ghe.example.test/api/v3");
        let client = GitHubClient::new(config).unwrap();
        let url = client.endpoint(&repo(), ["readme"]);
        assert_eq!(
            url.as_str(),
            "https://ghe.example.test/api/v3/repos/octo/widgets/readme"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = GitHubClient::new(GitHubConfig::new("not a url")).err().unwrap();
        assert!(matches!(err, TourError::Config(_)));
    }

    #[test]
    fn status_mapping() {
        assert!(check_status(StatusCode::OK, "x").is_ok());
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, "README"),
            Err(TourError::NotFound { .. })
        ));
        assert!(matches!(
            check_status(StatusCode::FORBIDDEN, "README"),
            Err(TourError::RemoteUnavailable { status: 403, .. })
        ));
    }

    #[test]
    fn tree_items_map_to_entries() {
        let body: TreeResponse = serde_json::from_str(
            r#"{"sha":"abc","tree":[
                {"path":"src","type":"tree"},
                {"path":"src/app.py","type":"blob","size":120},
                {"path":"vendor/lib","type":"commit"}
            ],"truncated":true}"#,
        )
        .unwrap();
        assert!(body.truncated);
        let entries: Vec<_> = body.tree.into_iter().filter_map(TreeItem::into_entry).collect();
        assert_eq!(
            entries,
            vec![PathEntry::dir("src"), PathEntry::file("src/app.py", Some(120))]
        );
    }
}
