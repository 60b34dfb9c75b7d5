//! Run-level errors (anything that aborts a lint run)
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum LintError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("changed-file provider failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("root directory {} does not exist", .0.display())]
    RootNotFound(PathBuf),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("scan worker panicked")]
    WorkerPanicked,
}
