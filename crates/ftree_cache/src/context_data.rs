use crate::fingerprint::Fingerprint;
use anyhow::{anyhow, Context, Result};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// State defined by the existence (and contents) of a well-known file in a
/// directory, e.g. a `package.json` file or a `node_modules` directory.
pub trait ContextData: Sized {
    /// Reads the context data from `path`. Returns `Ok(None)` when the entry
    /// at `path` does not qualify (the cache then records a negative entry).
    fn read_context_data(path: &Path) -> Result<Option<Self>>;
}

#[derive(Debug)]
struct DirEntry<T> {
    fingerprint: Option<Fingerprint>,
    data: Option<Arc<T>>,
}

/// Map of directories to their contained context file, if any.
///
/// Every lookup revalidates the cached entry against the file's modification
/// fingerprint, so a changed or deleted context file is observed on the next
/// resolution rather than served stale. Entries are replaced wholesale with a
/// single map insert; readers hold `Arc` clones and can never observe a torn
/// entry. A racing double-load converges to the last writer, which is sound
/// because `read_context_data` is a pure function of the file contents.
#[derive(Debug)]
pub struct FileContextCache<T> {
    context_fname: &'static str,
    cache: DashMap<PathBuf, DirEntry<T>>,
}

impl<T: ContextData> FileContextCache<T> {
    pub fn new(context_fname: &'static str) -> Self {
        Self {
            context_fname,
            cache: DashMap::new(),
        }
    }

    pub fn context_fname(&self) -> &'static str {
        self.context_fname
    }

    /// Checks a single directory for the context file.
    ///
    /// Consults the cache first; on a miss (or a stale fingerprint) probes
    /// the real filesystem and caches the outcome, including "not present".
    pub fn check_dir(&self, dir: &Path) -> Result<Option<Arc<T>>> {
        let target = dir.join(self.context_fname);
        let fingerprint = Fingerprint::probe(&target)
            .with_context(|| format!("failed to stat {}", target.display()))?;

        if let Some(entry) = self.cache.get(dir) {
            if entry.fingerprint == fingerprint {
                return Ok(entry.data.clone());
            }
            debug!(
                "stale cache entry for {}/{}, reloading",
                dir.display(),
                self.context_fname
            );
        }

        let data = match fingerprint {
            None => None,
            Some(_) => T::read_context_data(&target)
                .with_context(|| format!("failed to read {}", target.display()))?
                .map(Arc::new),
        };
        debug!(
            "populated {}/{}: {}",
            dir.display(),
            self.context_fname,
            if data.is_some() { "found" } else { "not found" }
        );

        self.cache.insert(
            dir.to_owned(),
            DirEntry {
                fingerprint,
                data: data.clone(),
            },
        );
        Ok(data)
    }

    /// Iterator over the context files in `base` and each of its ancestors,
    /// nearest first.
    pub fn probe_path_iter<'cache, 'base>(
        &'cache self,
        base: &'base Path,
    ) -> ProbePathIterator<'cache, 'base, T> {
        ProbePathIterator {
            i: 0,
            cache: self,
            head: Some(base),
        }
    }

    /// Walks upward from `base` and returns the nearest directory holding a
    /// context file, or `None` when the walk reaches the filesystem root.
    pub fn probe_path<'cache, 'base>(
        &'cache self,
        base: &'base Path,
    ) -> Result<Option<(&'base Path, Arc<T>)>> {
        self.probe_path_iter(base).next().transpose()
    }
}

/// Steps up the directory tree yielding each discovered context file.
pub struct ProbePathIterator<'cache, 'base, T> {
    i: u32,
    cache: &'cache FileContextCache<T>,
    head: Option<&'base Path>,
}

impl<'cache, 'base, T: ContextData> Iterator for ProbePathIterator<'cache, 'base, T> {
    type Item = Result<(&'base Path, Arc<T>)>;

    fn next(&mut self) -> Option<Self::Item> {
        const MAX_PROBE_DEPTH: u32 = 1000;

        loop {
            let head_path = self.head?;
            if self.i >= MAX_PROBE_DEPTH {
                // terminate iteration; yielding this error forever would
                // loop callers that skip errored ancestors
                self.head = None;
                return Some(Err(anyhow!(
                    "max probe depth reached while searching for {} in parent directories",
                    self.cache.context_fname
                )));
            }
            self.i += 1;
            self.head = head_path.parent();

            match self.cache.check_dir(head_path) {
                Ok(Some(data)) => return Some(Ok((head_path, data))),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
