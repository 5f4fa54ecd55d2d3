use crate::cache::TsconfigCache;
use crate::error::ConfigError;
use crate::resolved::ResolvedTsconfig;
use abspath::to_absolute_path;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

const DEFAULT_CONFIG_NAME: &str = "tsconfig.json";
const MAX_WALK_DEPTH: usize = 1000;

/// Finds the configuration that governs `containing_file`.
///
/// Caller-supplied `candidates` are tried first, in order. A candidate
/// naming a directory (or anything without a `.json` extension) means
/// `<candidate>/tsconfig.json`; relative candidates resolve against the
/// current working directory. A candidate that does not exist is skipped
/// silently; one that exists but fails to load is a [`ConfigError`].
///
/// When no candidate matches (or none were given), the directory tree is
/// walked upward from `containing_file` looking for a `tsconfig.json`.
/// `Ok(None)` means no configuration applies — resolution proceeds without
/// alias or baseUrl mapping.
pub fn find_config(
    cache: &TsconfigCache,
    containing_file: &Path,
    candidates: &[PathBuf],
) -> Result<Option<Arc<ResolvedTsconfig>>, ConfigError> {
    for candidate in candidates {
        let mut target = to_absolute_path(candidate).map_err(|source| ConfigError::BadPath {
            path: candidate.to_owned(),
            source,
        })?;
        if target.extension() != Some("json".as_ref()) {
            target.push(DEFAULT_CONFIG_NAME);
        }
        match cache.load(&target)? {
            Some(config) => {
                debug!("using config candidate {}", target.display());
                return Ok(Some(config));
            }
            None => {
                trace!("config candidate {} does not exist, skipped", target.display());
            }
        }
    }

    let containing = to_absolute_path(containing_file).map_err(|source| ConfigError::BadPath {
        path: containing_file.to_owned(),
        source,
    })?;
    let mut dir = containing.parent();
    for _ in 0..MAX_WALK_DEPTH {
        let head = match dir {
            None => return Ok(None),
            Some(d) => d,
        };
        if let Some(config) = cache.load(&head.join(DEFAULT_CONFIG_NAME))? {
            debug!(
                "discovered {} for {}",
                head.join(DEFAULT_CONFIG_NAME).display(),
                containing.display()
            );
            return Ok(Some(config));
        }
        dir = head.parent();
    }
    Ok(None)
}
