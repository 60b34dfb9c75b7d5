//! Configuration file loading (TOML)
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::patterns::{PatternError, PatternSet, DEFAULT_PATTERNS};

/// Default file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "latinlint.toml";

const DEFAULT_ROOT: &str = "src";
const DEFAULT_IGNORE: &[&str] = &["CHANGES.md"];
const DEFAULT_EXCLUDE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".js", ".css"];
const DEFAULT_GITHUB_API: &str = "https://api.github.com";
const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("github.repository is not set; add it to latinlint.toml")]
    MissingRepository,
}

/// Top-level `latinlint.toml`; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    root: Option<PathBuf>,
    #[serde(default)]
    patterns: Option<Vec<String>>,
    #[serde(default)]
    ignore: Option<Vec<String>>,
    #[serde(default)]
    exclude_extensions: Option<Vec<String>>,
    #[serde(default)]
    github: Option<GitHubSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GitHubSection {
    #[serde(default)]
    repository: Option<String>,
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    token_env: Option<String>,
    #[serde(default)]
    include_extensions: Option<Vec<String>>,
}

/// Settings for the GitHub pull-request file source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    /// `owner/name`
    pub repository: Option<String>,
    pub api_url: String,
    /// Environment variable holding an API token; unset variable = anonymous.
    pub token_env: String,
    /// Only changed files ending in one of these are linted; empty = all.
    pub include_extensions: Vec<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            repository: None,
            api_url: DEFAULT_GITHUB_API.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            include_extensions: vec![".md".to_string()],
        }
    }
}

/// Resolved lint configuration, passed explicitly to discovery and scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintConfig {
    /// Directory walked in full-tree mode.
    pub root: PathBuf,
    /// Disallowed phrases, in report order.
    pub patterns: Vec<String>,
    /// Exact basenames that are never scanned.
    pub ignore: Vec<String>,
    /// File name suffixes skipped in full-tree mode.
    pub exclude_extensions: Vec<String>,
    pub github: GitHubConfig,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            patterns: to_strings(DEFAULT_PATTERNS),
            ignore: to_strings(DEFAULT_IGNORE),
            exclude_extensions: to_strings(DEFAULT_EXCLUDE_EXTENSIONS),
            github: GitHubConfig::default(),
        }
    }
}

impl LintConfig {
    /// Load from a TOML file, filling missing keys with defaults.
    /// A relative `root` is resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let txt = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let mut cfg = Self::parse(&txt).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        if cfg.root.is_relative() {
            if let Some(dir) = path.parent() {
                cfg.root = dir.join(&cfg.root);
            }
        }
        Ok(cfg)
    }

    /// Parse TOML text; relative paths are kept as written.
    pub fn parse(txt: &str) -> Result<Self, toml::de::Error> {
        let parsed: ConfigFile = toml::from_str(txt)?;
        let defaults = Self::default();
        let gh = parsed.github.unwrap_or_default();
        Ok(Self {
            root: parsed.root.unwrap_or(defaults.root),
            patterns: parsed.patterns.unwrap_or(defaults.patterns),
            ignore: parsed.ignore.unwrap_or(defaults.ignore),
            exclude_extensions: parsed.exclude_extensions.unwrap_or(defaults.exclude_extensions),
            github: GitHubConfig {
                repository: gh.repository,
                api_url: gh.api_url.unwrap_or(defaults.github.api_url),
                token_env: gh.token_env.unwrap_or(defaults.github.token_env),
                include_extensions: gh.include_extensions.unwrap_or(defaults.github.include_extensions),
            },
        })
    }

    /// Build the pattern set described by this configuration.
    pub fn pattern_set(&self) -> Result<PatternSet, ConfigError> {
        Ok(PatternSet::new(&self.patterns)?)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
