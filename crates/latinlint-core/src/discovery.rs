//! Candidate file discovery (full tree or changed files)
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::LintError;
use crate::provider::ChangedFiles;

/// Where the files to lint come from.
pub enum Discovery<'a> {
    /// Every file under `root` except excluded extensions.
    FullTree { root: PathBuf, exclude_extensions: Vec<String> },
    /// Files touched by `change_id`, relative paths resolved against `base`.
    Changed { provider: &'a dyn ChangedFiles, change_id: String, base: PathBuf },
}

/// Discovered files plus how many were dropped by the ignore list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    pub files: Vec<PathBuf>,
    pub ignored: usize,
}

impl Discovery<'_> {
    /// Enumerate candidates and apply the basename ignore list.
    /// Only a provider failure or an unreadable root aborts.
    pub fn discover(&self, ignore: &[String]) -> Result<Discovered, LintError> {
        let candidates = match self {
            Discovery::FullTree { root, exclude_extensions } => walk_tree(root, exclude_extensions)?,
            Discovery::Changed { provider, change_id, base } => {
                let base = absolutize(&current_dir(), base);
                provider
                    .changed_files(change_id)?
                    .into_iter()
                    .map(|p| absolutize(&base, Path::new(&p)))
                    .collect()
            }
        };

        let total = candidates.len();
        let files: Vec<PathBuf> = candidates.into_iter().filter(|p| !is_ignored(p, ignore)).collect();
        let ignored = total - files.len();
        debug!(total, ignored, "discovered files");
        Ok(Discovered { files, ignored })
    }
}

/// Recursively collect regular files under `root`, sorted for reproducible output.
fn walk_tree(root: &Path, exclude_extensions: &[String]) -> Result<Vec<PathBuf>, LintError> {
    if !root.is_dir() {
        return Err(LintError::RootNotFound(root.to_path_buf()));
    }
    let root = absolutize(&current_dir(), root);
    let mut files = Vec::new();
    for entry in WalkDir::new(&root).min_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let excluded = entry
            .file_name()
            .to_str()
            .is_some_and(|name| exclude_extensions.iter().any(|ext| name.ends_with(ext.as_str())));
        if !excluded {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_ignored(path: &Path, ignore: &[String]) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| ignore.iter().any(|i| i == name))
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_default()
}

/// Join a relative `path` onto `base`; `.` components are dropped.
fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() { path.to_path_buf() } else { base.join(path) };
    joined.components().collect()
}
