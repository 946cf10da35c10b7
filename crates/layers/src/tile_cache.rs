//! Per-layer record of remote tile fetches.
//!
//! Each distinct URL is fetched at most once per layer. Successes remember
//! where the tile landed so later requests for the same URL are satisfied
//! by linking to that file; failures are remembered so they are never
//! retried.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{FetchError, LayerError, LayerResult};
use crate::fetch::TileFetcher;

/// What happened to one tile request.
#[derive(Debug)]
pub enum TileOutcome {
    /// Downloaded into the destination.
    Fetched,
    /// Destination now links to an earlier download.
    Linked(PathBuf),
    /// Destination already is the earlier download.
    Reused,
    /// Fetch failed now; no output written.
    Failed(FetchError),
    /// URL failed before; skipped without a request.
    KnownFailure,
}

impl TileOutcome {
    /// Whether the destination holds the tile.
    pub fn produced_output(&self) -> bool {
        matches!(
            self,
            TileOutcome::Fetched | TileOutcome::Linked(_) | TileOutcome::Reused
        )
    }
}

#[derive(Debug, Default)]
pub struct RemoteTileCache {
    fetched: HashMap<String, PathBuf>,
    failed: HashSet<String>,
}

impl RemoteTileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }

    /// Make `dest` hold the tile at `url`, fetching only when no earlier
    /// attempt for that URL exists.
    ///
    /// Fetch failures are recorded and reported in the outcome; only local
    /// filesystem problems are errors.
    pub fn resolve(&mut self, url: &str, dest: &Path, fetcher: &dyn TileFetcher) -> LayerResult<TileOutcome> {
        if let Some(cached) = self.fetched.get(url).cloned() {
            if cached.exists() {
                if is_same_file(&cached, dest) {
                    debug!(url, path = %dest.display(), "Tile already in place");
                    return Ok(TileOutcome::Reused);
                }
                self.forget_destination(dest);
                remove_existing(dest)?;
                link_or_copy(&cached, dest)?;
                debug!(url, from = %cached.display(), to = %dest.display(), "Linked cached tile");
                return Ok(TileOutcome::Linked(cached));
            }
            warn!(url, path = %cached.display(), "Cached tile disappeared, fetching again");
            self.fetched.remove(url);
        }

        self.forget_destination(dest);
        remove_existing(dest)?;

        if self.failed.contains(url) {
            debug!(url, "Skipping tile that failed before");
            return Ok(TileOutcome::KnownFailure);
        }

        info!(url, path = %dest.display(), "Fetching remote tile");
        match fetcher.fetch(url, dest) {
            Ok(()) => {
                self.fetched.insert(url.to_string(), entry_path(dest));
                Ok(TileOutcome::Fetched)
            }
            Err(e) => {
                warn!(url, error = %e, "Remote tile fetch failed");
                self.failed.insert(url.to_string());
                Ok(TileOutcome::Failed(e))
            }
        }
    }

    /// Drop every URL whose download lived at `dest`, since `dest` is about
    /// to be overwritten.
    fn forget_destination(&mut self, dest: &Path) {
        let overwritten = entry_path(dest);
        self.fetched.retain(|url, path| {
            let keep = *path != overwritten;
            if !keep {
                debug!(url = url.as_str(), path = %dest.display(), "Forgetting overwritten tile");
            }
            keep
        });
    }
}

/// Absolute location of `path` itself, resolving its directory but not a
/// symlink at `path`.
fn entry_path(path: &Path) -> PathBuf {
    let resolved = match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
            fs::canonicalize(parent).map(|dir| dir.join(name)).ok()
        }
        _ => None,
    };
    resolved.unwrap_or_else(|| path.to_path_buf())
}

fn is_same_file(cached: &Path, dest: &Path) -> bool {
    fs::canonicalize(dest).map(|d| d == cached).unwrap_or(false)
}

/// Remove `path` if present, including dangling symlinks.
pub(crate) fn remove_existing(path: &Path) -> LayerResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LayerError::io(path, e)),
    }
}

#[cfg(unix)]
fn link_or_copy(src: &Path, dest: &Path) -> LayerResult<()> {
    std::os::unix::fs::symlink(src, dest).map_err(|e| LayerError::io(dest, e))
}

#[cfg(not(unix))]
fn link_or_copy(src: &Path, dest: &Path) -> LayerResult<()> {
    fs::copy(src, dest)
        .map(|_| ())
        .map_err(|e| LayerError::io(dest, e))
}
