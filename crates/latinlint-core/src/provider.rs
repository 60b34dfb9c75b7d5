//! Changed-file providers: resolve a change identifier to the files it touches
use serde::Deserialize;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, GitHubConfig};

const PER_PAGE: usize = 100;
const USER_AGENT: &str = concat!("latinlint/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid change identifier {id:?}: {reason}")]
    InvalidChangeId { id: String, reason: &'static str },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("failed to read file list {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Resolves a change identifier (a pull request number, a list file, ...)
/// to the ordered list of file paths it touches.
///
/// Which files count as "changed" is entirely up to the implementation;
/// callers pass the result through unfiltered apart from the ignore list.
pub trait ChangedFiles {
    fn changed_files(&self, change_id: &str) -> Result<Vec<String>, ProviderError>;
}

/// Reads newline-separated paths from a file named by the change id (`-` = stdin).
/// Blank lines are skipped; surrounding whitespace is trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileList;

impl FileList {
    pub fn parse<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
        let mut out = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                out.push(line.to_string());
            }
        }
        Ok(out)
    }
}

impl ChangedFiles for FileList {
    fn changed_files(&self, change_id: &str) -> Result<Vec<String>, ProviderError> {
        let io_err = |source: io::Error| ProviderError::Io { path: change_id.to_string(), source };
        if change_id == "-" {
            return Self::parse(io::stdin().lock()).map_err(io_err);
        }
        let file = std::fs::File::open(PathBuf::from(change_id)).map_err(io_err)?;
        Self::parse(BufReader::new(file)).map_err(io_err)
    }
}

/// One entry of `GET /repos/{repo}/pulls/{n}/files`.
#[derive(Debug, Clone, Deserialize)]
struct PullRequestFile {
    filename: String,
    #[serde(default)]
    status: Option<String>,
}

/// Lists the files of a GitHub pull request through the REST API.
pub struct GitHubPullRequest {
    client: reqwest::blocking::Client,
    api_url: String,
    repository: String,
    token: Option<String>,
    include_extensions: Vec<String>,
}

impl GitHubPullRequest {
    /// Build from configuration; the token is read from `token_env` if set.
    pub fn from_config(cfg: &GitHubConfig) -> Result<Self, ProviderError> {
        let repository = cfg.repository.clone().ok_or(ConfigError::MissingRepository)?;
        let token = std::env::var(&cfg.token_env).ok().filter(|t| !t.is_empty());
        let client = reqwest::blocking::Client::builder().user_agent(USER_AGENT).timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
            repository,
            token,
            include_extensions: cfg.include_extensions.clone(),
        })
    }

    fn fetch_page(&self, number: u64, page: usize) -> Result<Vec<PullRequestFile>, ProviderError> {
        let url = format!("{}/repos/{}/pulls/{}/files", self.api_url, self.repository, number);
        let mut req = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .query(&[("per_page", PER_PAGE), ("page", page)]);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ProviderError::Status { url, status: status.as_u16(), body });
        }
        Ok(resp.json()?)
    }
}

impl ChangedFiles for GitHubPullRequest {
    fn changed_files(&self, change_id: &str) -> Result<Vec<String>, ProviderError> {
        let number = parse_pull_number(change_id)?;
        let mut entries = Vec::new();
        for page in 1.. {
            let batch = self.fetch_page(number, page)?;
            let done = batch.len() < PER_PAGE;
            debug!(page, count = batch.len(), "fetched pull request files");
            entries.extend(batch);
            if done {
                break;
            }
        }
        let files = select_files(entries, &self.include_extensions);
        info!(pull_request = number, files = files.len(), "resolved changed files");
        Ok(files)
    }
}

fn parse_pull_number(change_id: &str) -> Result<u64, ProviderError> {
    let invalid = |reason: &'static str| ProviderError::InvalidChangeId { id: change_id.to_string(), reason };
    let n: u64 = change_id.trim().parse().map_err(|_| invalid("expected a pull request number"))?;
    if n == 0 {
        return Err(invalid("pull request numbers start at 1"));
    }
    Ok(n)
}

/// Drop removed files and keep those matching `include` (empty = keep all).
fn select_files(entries: Vec<PullRequestFile>, include: &[String]) -> Vec<String> {
    entries
        .into_iter()
        .filter(|f| f.status.as_deref() != Some("removed"))
        .filter(|f| include.is_empty() || include.iter().any(|ext| f.filename.ends_with(ext.as_str())))
        .map(|f| f.filename)
        .collect()
}
