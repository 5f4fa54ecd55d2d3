use crate::error::ConfigError;
use crate::loader::load_tsconfig;
use crate::resolved::ResolvedTsconfig;
use abspath::to_absolute_path;
use dashmap::DashMap;
use ftree_cache::Fingerprint;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct CacheEntry {
    fingerprint: Option<Fingerprint>,
    /// `None` records "there is no config file at this path".
    config: Option<Arc<ResolvedTsconfig>>,
}

/// Memoizes loaded configurations, keyed by absolute config file path.
///
/// Entries are revalidated against the file's modification fingerprint on
/// every lookup and rebuilt when the file changed. Negative lookups are
/// cached too. There is no teardown; one entry exists per distinct config
/// file in a project, for the lifetime of the cache.
///
/// The cache is an explicitly constructed object rather than process-global
/// state, so tests can build isolated instances; the public facade owns one
/// for the process lifetime.
#[derive(Debug, Default)]
pub struct TsconfigCache {
    cache: DashMap<PathBuf, CacheEntry>,
}

impl TsconfigCache {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Loads the config at `path`, or returns the cached instance.
    ///
    /// `Ok(None)` means no file exists at `path` — not an error, so a
    /// caller-supplied candidate that is absent can be skipped silently.
    pub fn load(&self, path: &Path) -> Result<Option<Arc<ResolvedTsconfig>>, ConfigError> {
        let abs = to_absolute_path(path).map_err(|source| ConfigError::BadPath {
            path: path.to_owned(),
            source,
        })?;
        let fingerprint = Fingerprint::probe(&abs).map_err(|source| ConfigError::Io {
            path: abs.clone(),
            source,
        })?;

        if let Some(entry) = self.cache.get(&abs) {
            if entry.fingerprint == fingerprint {
                return Ok(entry.config.clone());
            }
            debug!("tsconfig {} changed on disk, reloading", abs.display());
        }

        let config = match fingerprint {
            None => None,
            Some(_) => Some(Arc::new(load_tsconfig(&abs)?)),
        };
        self.cache.insert(
            abs,
            CacheEntry {
                fingerprint,
                config: config.clone(),
            },
        );
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_tmpdir::test_tmpdir;

    #[test]
    fn test_load_is_memoized() {
        let tmp = test_tmpdir!(
            "tsconfig.json" => r#"{ "compilerOptions": { "baseUrl": "." } }"#
        );
        let cache = TsconfigCache::new();
        let first = cache.load(&tmp.root_join("tsconfig.json")).unwrap().unwrap();
        let second = cache.load(&tmp.root_join("tsconfig.json")).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_load_missing_is_none() {
        let tmp = test_tmpdir!(
            "unrelated.txt" => ""
        );
        let cache = TsconfigCache::new();
        assert!(cache.load(&tmp.root_join("tsconfig.json")).unwrap().is_none());
        // negative entries are cached but stay correct
        assert!(cache.load(&tmp.root_join("tsconfig.json")).unwrap().is_none());
    }

    #[test]
    fn test_load_reloads_changed_file() {
        let tmp = test_tmpdir!(
            "tsconfig.json" => r#"{ "compilerOptions": { "baseUrl": "./src" } }"#
        );
        let cache = TsconfigCache::new();
        let before = cache.load(&tmp.root_join("tsconfig.json")).unwrap().unwrap();
        assert_eq!(before.base_url, Some(tmp.root_join("src")));

        tmp.write_file(
            "tsconfig.json",
            r#"{ "compilerOptions": { "baseUrl": "./lib/nested" } }"#,
        )
        .unwrap();
        let after = cache.load(&tmp.root_join("tsconfig.json")).unwrap().unwrap();
        assert_eq!(after.base_url, Some(tmp.root_join("lib/nested")));
    }

    #[test]
    fn test_load_created_after_negative_lookup() {
        let tmp = test_tmpdir!(
            "unrelated.txt" => ""
        );
        let cache = TsconfigCache::new();
        assert!(cache.load(&tmp.root_join("tsconfig.json")).unwrap().is_none());

        tmp.write_file("tsconfig.json", r#"{ "compilerOptions": { "baseUrl": "." } }"#)
            .unwrap();
        assert!(cache.load(&tmp.root_join("tsconfig.json")).unwrap().is_some());
    }

    #[test]
    fn test_broken_config_propagates() {
        let tmp = test_tmpdir!(
            "tsconfig.json" => "{ nope"
        );
        let cache = TsconfigCache::new();
        assert!(matches!(
            cache.load(&tmp.root_join("tsconfig.json")),
            Err(ConfigError::Parse { .. })
        ));
    }
}
