use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::components::FileContributor;
use crate::config::GitHubConfig;
use crate::error::ContributorsError;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const CLIENT_USER_AGENT: &str = "file-contributors/1.0";
const PER_PAGE: usize = 100;
const MAX_PAGES: u32 = 5;

/// Where a page's contributors come from.
#[async_trait]
pub trait ContributorSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Contributors to the file at `path`, most recent first.
    async fn fetch_contributors(&self, path: &str) -> Result<Vec<FileContributor>, ContributorsError>;
}

/// Context handle for the configured source.
#[derive(Clone)]
pub struct SharedSource(pub Arc<dyn ContributorSource>);

/// Reads contributors from a repository's commit history.
pub struct GitHubCommits {
    client: reqwest::Client,
    api_base: String,
    owner: String,
    repo: String,
    branch: Option<String>,
    token: Option<String>,
}

impl GitHubCommits {
    pub fn new(owner: String, repo: String, branch: Option<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: GITHUB_API_BASE.to_string(),
            owner,
            repo,
            branch,
            token,
        }
    }

    pub fn from_config(config: &GitHubConfig) -> Self {
        Self::new(
            config.owner.clone(),
            config.repo.clone(),
            config.branch.clone(),
            config.token.clone(),
        )
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn commits_url(&self, path: &str, page: u32) -> Result<Url, ContributorsError> {
        let mut url = Url::parse(&format!(
            "{}/repos/{}/{}/commits",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repo
        ))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("path", path)
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string());
            if let Some(ref branch) = self.branch {
                query.append_pair("sha", branch);
            }
        }

        Ok(url)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_page(&self, path: &str, page: u32) -> Result<Vec<GitHubCommit>, ContributorsError> {
        let mut request = self
            .client
            .get(self.commits_url(path, page)?)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, "application/vnd.github+json");

        if let Some(ref token) = self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;

        if matches!(response.status(), StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS) {
            if let Some(wait) = rate_limit_wait(response.headers(), unix_now()) {
                return Err(ContributorsError::RateLimited(wait));
            }
        }

        let commits: Vec<GitHubCommit> = response.error_for_status()?.json().await?;
        Ok(commits)
    }
}

#[async_trait]
impl ContributorSource for GitHubCommits {
    fn name(&self) -> &'static str {
        "github"
    }

    #[tracing::instrument(skip(self), fields(owner = %self.owner, repo = %self.repo))]
    async fn fetch_contributors(&self, path: &str) -> Result<Vec<FileContributor>, ContributorsError> {
        let mut commits = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_page(path, page).await?;
            let count = batch.len();

            tracing::debug!(page, count, "fetched page");

            commits.extend(batch);

            if count < PER_PAGE {
                break;
            }
            page += 1;

            if page > MAX_PAGES {
                tracing::warn!("stopping at page {MAX_PAGES} to avoid rate limits");
                break;
            }
        }

        let contributors = collect_contributors(commits);
        tracing::info!(count = contributors.len(), "fetched contributors");
        Ok(contributors)
    }
}

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    /// Absent when the commit email is not linked to an account
    author: Option<GitHubUser>,
    commit: CommitDetails,
}

#[derive(Debug, Deserialize)]
struct CommitDetails {
    author: Option<CommitSignature>,
}

#[derive(Debug, Deserialize)]
struct CommitSignature {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
    avatar_url: String,
    html_url: String,
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Seconds to wait before asking again, when a refused response is GitHub's
/// rate limiter rather than a permissions error.
///
/// Secondary limits send `retry-after`; the primary limit sends
/// `x-ratelimit-remaining: 0` with the reset time as a Unix timestamp.
fn rate_limit_wait(headers: &HeaderMap, now: u64) -> Option<u64> {
    let number = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
    };

    if let Some(seconds) = number(RETRY_AFTER.as_str()) {
        return Some(seconds);
    }

    if number("x-ratelimit-remaining") == Some(0) {
        return number("x-ratelimit-reset").map(|reset| reset.saturating_sub(now));
    }

    None
}

/// One entry per account, at its most recent commit. Commits arrive newest
/// first, so first sight wins.
fn collect_contributors(commits: Vec<GitHubCommit>) -> Vec<FileContributor> {
    let mut seen = HashSet::new();

    commits
        .into_iter()
        .filter_map(|commit| {
            let user = commit.author?;
            if !seen.insert(user.login.clone()) {
                return None;
            }

            Some(FileContributor {
                login: user.login,
                avatar_url: user.avatar_url,
                html_url: user.html_url,
                date: commit
                    .commit
                    .author
                    .and_then(|signature| signature.date)
                    .unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn commit(login: Option<&str>, date: &str) -> serde_json::Value {
        serde_json::json!({
            "sha": "0000000",
            "author": login.map(|login| serde_json::json!({
                "login": login,
                "avatar_url": format!("https://avatars.githubusercontent.com/{login}"),
                "html_url": format!("https://github.com/{login}"),
            })),
            "commit": {
                "author": { "name": "Someone", "date": date },
                "message": "Update page"
            }
        })
    }

    fn source(server: &MockServer) -> GitHubCommits {
        GitHubCommits::new("ethereum".to_string(), "site".to_string(), None, None)
            .with_api_base(server.uri())
    }

    #[tokio::test]
    async fn fetches_contributors_for_path() {
        let mock_server = MockServer::start().await;

        let body = serde_json::json!([
            commit(Some("alice"), "2024-03-01T10:00:00Z"),
            commit(Some("bob"), "2024-02-01T10:00:00Z"),
        ]);

        Mock::given(method("GET"))
            .and(path("/repos/ethereum/site/commits"))
            .and(query_param("path", "docs/intro.md"))
            .and(query_param("page", "1"))
            .and(header("User-Agent", CLIENT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&mock_server)
            .await;

        let contributors = source(&mock_server)
            .fetch_contributors("docs/intro.md")
            .await
            .unwrap();

        assert_eq!(contributors.len(), 2);
        assert_eq!(contributors[0].login, "alice");
        assert_eq!(contributors[0].date, "2024-03-01T10:00:00Z");
        assert_eq!(contributors[0].html_url, "https://github.com/alice");
        assert_eq!(contributors[1].login, "bob");
    }

    #[tokio::test]
    async fn sends_token_and_branch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/ethereum/site/commits"))
            .and(query_param("sha", "dev"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = GitHubCommits::new(
            "ethereum".to_string(),
            "site".to_string(),
            Some("dev".to_string()),
            Some("secret".to_string()),
        )
        .with_api_base(mock_server.uri());

        let contributors = source.fetch_contributors("README.md").await.unwrap();

        assert!(contributors.is_empty());
    }

    #[tokio::test]
    async fn reports_rate_limiting() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/ethereum/site/commits"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", "99999999999"),
            )
            .mount(&mock_server)
            .await;

        let result = source(&mock_server).fetch_contributors("README.md").await;

        assert!(matches!(result, Err(ContributorsError::RateLimited(secs)) if secs > 0));
    }

    #[tokio::test]
    async fn reports_secondary_rate_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "60"))
            .mount(&mock_server)
            .await;

        let result = source(&mock_server).fetch_contributors("README.md").await;

        assert!(matches!(result, Err(ContributorsError::RateLimited(60))));
    }

    #[tokio::test]
    async fn forbidden_without_rate_limit_is_an_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "4999")
                    .insert_header("x-ratelimit-reset", "99999999999"),
            )
            .mount(&mock_server)
            .await;

        let result = source(&mock_server).fetch_contributors("README.md").await;

        assert!(matches!(result, Err(ContributorsError::Http(_))));
    }

    #[tokio::test]
    async fn server_errors_surface_as_http_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let result = source(&mock_server).fetch_contributors("README.md").await;

        assert!(matches!(result, Err(ContributorsError::Http(_))));
    }

    #[test]
    fn keeps_most_recent_commit_per_author() {
        let commits: Vec<GitHubCommit> = serde_json::from_value(serde_json::json!([
            commit(Some("alice"), "2024-03-01T00:00:00Z"),
            commit(Some("bob"), "2024-02-01T00:00:00Z"),
            commit(Some("alice"), "2024-01-01T00:00:00Z"),
        ]))
        .unwrap();

        let contributors = collect_contributors(commits);
        let logins: Vec<&str> = contributors.iter().map(|c| c.login.as_str()).collect();

        assert_eq!(logins, vec!["alice", "bob"]);
        assert_eq!(contributors[0].date, "2024-03-01T00:00:00Z");
    }

    #[test]
    fn skips_commits_without_account() {
        let commits: Vec<GitHubCommit> = serde_json::from_value(serde_json::json!([
            commit(None, "2024-03-01T00:00:00Z"),
            commit(Some("carol"), "2024-02-01T00:00:00Z"),
        ]))
        .unwrap();

        let contributors = collect_contributors(commits);

        assert_eq!(contributors.len(), 1);
        assert_eq!(contributors[0].login, "carol");
    }

    #[test]
    fn builds_commits_url() {
        let source = GitHubCommits::new(
            "ethereum".to_string(),
            "site".to_string(),
            Some("main".to_string()),
            None,
        );

        let url = source.commits_url("docs/a b.md", 2).unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/ethereum/site/commits?path=docs%2Fa+b.md&per_page=100&page=2&sha=main"
        );
    }

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, value.parse().unwrap());
        }
        map
    }

    #[test]
    fn rate_limit_wait_counts_down_to_reset() {
        let exhausted = headers(&[("x-ratelimit-remaining", "0"), ("x-ratelimit-reset", "1000")]);

        assert_eq!(rate_limit_wait(&exhausted, 940), Some(60));
        assert_eq!(rate_limit_wait(&exhausted, 2000), Some(0));
    }

    #[test]
    fn rate_limit_wait_prefers_retry_after() {
        let secondary = headers(&[
            ("retry-after", "30"),
            ("x-ratelimit-remaining", "0"),
            ("x-ratelimit-reset", "1000"),
        ]);

        assert_eq!(rate_limit_wait(&secondary, 0), Some(30));
    }

    #[test]
    fn no_rate_limit_without_exhausted_quota() {
        assert_eq!(rate_limit_wait(&HeaderMap::new(), 0), None);
        assert_eq!(
            rate_limit_wait(&headers(&[("x-ratelimit-remaining", "12"), ("x-ratelimit-reset", "1000")]), 0),
            None
        );
        assert_eq!(rate_limit_wait(&headers(&[("retry-after", "soon")]), 0), None);
    }
}
