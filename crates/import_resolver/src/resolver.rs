use crate::alias::alias_candidates;
use crate::builtins::is_builtin;
use crate::node_modules::{NodeModulesCache, NodeModulesResolver};
use crate::package::PackageJsonCache;
use crate::probe::{probe, resolve_as_directory};
use abspath::{join_abspath, to_absolute_path};
use ftree_cache::FileContextCache;
use lazy_static::lazy_static;
use path_slash::PathExt;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tsconfig_paths::{find_config, ConfigError, TsconfigCache, DEFAULT_EXTENSIONS};

/// Verdict of a resolution request.
///
/// `found` with a filesystem target carries the absolute, slash-normalized
/// path; for a built-in it carries the specifier itself. `found: false`
/// always pairs with an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    pub found: bool,
    pub path: String,
}

impl ResolutionResult {
    pub fn not_found() -> Self {
        Self {
            found: false,
            path: String::new(),
        }
    }

    fn builtin(specifier: &str) -> Self {
        Self {
            found: true,
            path: specifier.to_string(),
        }
    }

    fn file(path: &Path) -> Self {
        // symlinked targets report their real location; a hit that cannot
        // be canonicalized keeps its lexical form
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        Self {
            found: true,
            path: path.to_slash_lossy().to_string(),
        }
    }
}

/// Per-call options: an ordered list of tsconfig candidates to try before
/// falling back to upward discovery. The host-facing single-string
/// shorthand normalizes into a one-element list via the `From` impls.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectOptions {
    pub project: Vec<PathBuf>,
}

impl From<&str> for ProjectOptions {
    fn from(candidate: &str) -> Self {
        Self {
            project: vec![PathBuf::from(candidate)],
        }
    }
}

impl From<String> for ProjectOptions {
    fn from(candidate: String) -> Self {
        Self {
            project: vec![PathBuf::from(candidate)],
        }
    }
}

impl<P: Into<PathBuf>> From<Vec<P>> for ProjectOptions {
    fn from(candidates: Vec<P>) -> Self {
        Self {
            project: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

/// The only failure a caller sees. Not-found is a result, not an error;
/// a broken discovered configuration must not silently degrade to "no
/// aliases" since that would mask real project misconfiguration.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Resolver facade owning the shared caches.
///
/// Safe to share across linting workers: all cache access is concurrent,
/// and each `resolve` call runs to completion synchronously.
#[derive(Debug)]
pub struct TsImportResolver {
    tsconfig_cache: TsconfigCache,
    pkg_json_cache: PackageJsonCache,
    node_modules_cache: NodeModulesCache,
}

impl Default for TsImportResolver {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    static ref FALLBACK_EXTENSIONS: Vec<String> =
        DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect();
    static ref PROCESS_RESOLVER: TsImportResolver = TsImportResolver::new();
}

/// Resolves against a process-wide resolver instance, so a host plugin
/// pays config parsing once per process. Tests and embedders that need
/// isolation construct their own [`TsImportResolver`].
pub fn resolve(
    specifier: &str,
    containing_file: impl AsRef<Path>,
    options: &ProjectOptions,
) -> Result<ResolutionResult, ResolveError> {
    PROCESS_RESOLVER.resolve(specifier, containing_file, options)
}

impl TsImportResolver {
    pub fn new() -> Self {
        Self {
            tsconfig_cache: TsconfigCache::new(),
            pkg_json_cache: FileContextCache::new("package.json"),
            node_modules_cache: FileContextCache::new("node_modules"),
        }
    }

    /// Resolves `specifier` as written in `containing_file`.
    ///
    /// Pipeline: built-in check, config discovery, alias matching, candidate
    /// probing, node-style `node_modules` fallback. Only a broken
    /// discovered-and-selected configuration is an error; everything else
    /// reports through the [`ResolutionResult`].
    pub fn resolve(
        &self,
        specifier: &str,
        containing_file: impl AsRef<Path>,
        options: &ProjectOptions,
    ) -> Result<ResolutionResult, ResolveError> {
        // bundler-style "./module?raw" suffixes are not part of the path
        let specifier = strip_query(specifier);
        if specifier.is_empty() {
            return Ok(ResolutionResult::not_found());
        }

        // before any configuration work, so a broken tsconfig can never
        // fail a built-in import
        if is_builtin(specifier) {
            return Ok(ResolutionResult::builtin(specifier));
        }

        let containing =
            to_absolute_path(containing_file.as_ref()).map_err(anyhow::Error::from)?;
        let containing_dir = containing.parent().unwrap_or_else(|| Path::new("/"));

        let config = find_config(&self.tsconfig_cache, &containing, &options.project)?;
        let extensions: &[String] = config
            .as_deref()
            .map(|c| c.extensions.as_slice())
            .unwrap_or(&FALLBACK_EXTENSIONS);

        // relative and absolute specifiers bypass alias mapping, but an
        // exhausted local probe still falls through to the node_modules walk
        let bare = !is_relative(specifier) && !Path::new(specifier).is_absolute();
        if !bare {
            let base = if is_relative(specifier) {
                join_abspath(containing_dir, specifier).map_err(anyhow::Error::from)?
            } else {
                PathBuf::from(specifier)
            };
            if let Some(hit) = probe_base(&base, specifier, extensions) {
                return Ok(ResolutionResult::file(&hit));
            }
        } else if let Some(config) = config.as_deref() {
            // bare specifier: alias candidates first, in mapping order
            for candidate in alias_candidates(specifier, config) {
                if let Some(hit) = probe(&candidate, extensions) {
                    debug!("resolved {specifier} via paths mapping to {}", hit.display());
                    return Ok(ResolutionResult::file(&hit));
                }
            }
        }

        // node-style fallback; alias exhaustion does not forbid it
        let node_resolver =
            NodeModulesResolver::new(&self.pkg_json_cache, &self.node_modules_cache);
        if let Some(hit) = node_resolver.resolve(containing_dir, specifier, extensions)? {
            return Ok(ResolutionResult::file(&hit));
        }

        // DefinitelyTyped packages: a bare import may only exist as its
        // @types counterpart in a lint environment
        if bare && !specifier.starts_with('@') {
            let typed = format!("@types/{specifier}");
            if let Some(hit) = node_resolver.resolve(containing_dir, &typed, extensions)? {
                return Ok(ResolutionResult::file(&hit));
            }
        }

        Ok(ResolutionResult::not_found())
    }
}

/// Probes one base path, honoring specifiers that syntactically name a
/// directory (`.`, `..`, trailing slash): those skip the extension-append
/// step and go straight to index probing.
fn probe_base(base: &Path, specifier: &str, extensions: &[String]) -> Option<PathBuf> {
    if names_directory(specifier) {
        resolve_as_directory(base, extensions)
    } else {
        probe(base, extensions)
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

fn names_directory(specifier: &str) -> bool {
    specifier == "." || specifier == ".." || specifier.ends_with('/')
}

fn strip_query(specifier: &str) -> &str {
    match specifier.find('?') {
        Some(idx) => &specifier[..idx],
        None => specifier,
    }
}
