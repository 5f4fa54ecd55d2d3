use crate::package::PackageJsonCache;
use crate::probe::{resolve_as_directory, resolve_as_file};
use abspath::join_abspath;
use anyhow::Result;
use ftree_cache::{ContextData, FileContextCache};
use parking_lot::RwLock;
use path_clean::PathClean;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const NODE_MODULES: &str = "node_modules";

/// A discovered `node_modules` directory, carrying a memo of the
/// resolutions already attempted against it (`None` records a miss, so
/// repeated failures don't hit the disk again either).
#[derive(Debug, Default)]
pub struct NodeModulesDir {
    resolutions: RwLock<HashMap<String, Option<PathBuf>>>,
}

impl NodeModulesDir {
    fn cached(&self, target: &str) -> Option<Option<PathBuf>> {
        self.resolutions.read().get(target).cloned()
    }

    fn store(&self, target: &str, resolution: Option<PathBuf>) {
        self.resolutions
            .write()
            .insert(target.to_string(), resolution);
    }
}

impl ContextData for NodeModulesDir {
    fn read_context_data(path: &Path) -> Result<Option<Self>> {
        Ok(path.is_dir().then(NodeModulesDir::default))
    }
}

pub type NodeModulesCache = FileContextCache<NodeModulesDir>;

/// Node-style resolution: walk ancestor directories of the importing file,
/// trying `<ancestor>/node_modules/<specifier>` in each, nearest first.
pub struct NodeModulesResolver<'caches> {
    pkg_json_cache: &'caches PackageJsonCache,
    node_modules_cache: &'caches NodeModulesCache,
}

impl<'caches> NodeModulesResolver<'caches> {
    pub fn new(
        pkg_json_cache: &'caches PackageJsonCache,
        node_modules_cache: &'caches NodeModulesCache,
    ) -> Self {
        Self {
            pkg_json_cache,
            node_modules_cache,
        }
    }

    pub fn resolve(
        &self,
        base_dir: &Path,
        target: &str,
        extensions: &[String],
    ) -> Result<Option<PathBuf>> {
        let mut iter = self.node_modules_cache.probe_path_iter(base_dir);
        loop {
            let (ancestor, nm_dir) = match iter.next() {
                Some(Ok(found)) => found,
                Some(Err(e)) => {
                    // an unreadable ancestor fails only its own probe
                    warn!("skipping unreadable node_modules ancestor: {e:#}");
                    continue;
                }
                None => break,
            };

            match nm_dir.cached(target) {
                Some(Some(path)) => return Ok(Some(path)),
                Some(None) => continue,
                None => {}
            }

            let nm_path = ancestor.join(NODE_MODULES);
            debug!(
                "attempting node_modules resolution: {}",
                nm_path.join(target).display()
            );
            let resolution = self.resolve_package_target(&nm_path, target, extensions)?;
            nm_dir.store(target, resolution.clone());
            if resolution.is_some() {
                return Ok(resolution);
            }
        }
        Ok(None)
    }

    /// Resolves a target inside one `node_modules` directory: as a plain
    /// file, then via the package's `exports` map, then as a package
    /// directory (entry fields before index probing).
    fn resolve_package_target(
        &self,
        nm_path: &Path,
        target: &str,
        extensions: &[String],
    ) -> Result<Option<PathBuf>> {
        let candidate = nm_path.join(target).clean();
        if let Some(file) = resolve_as_file(&candidate, extensions) {
            return Ok(Some(file));
        }

        // only bare targets name a package with an exports map
        if !target.starts_with('.') && !Path::new(target).is_absolute() {
            let (package_name, subpath) = split_package_target(target);
            if let Some(hit) =
                self.resolve_package_exports(&nm_path.join(package_name), subpath, extensions)?
            {
                return Ok(Some(hit));
            }
        }

        if !candidate.is_dir() {
            return Ok(None);
        }
        if let Some(entry) = self.resolve_package_entry(&candidate, extensions)? {
            return Ok(Some(entry));
        }
        Ok(resolve_as_directory(&candidate, extensions))
    }

    /// Consults the package's `exports` field for the subpath, probing each
    /// declared target as a file in order.
    fn resolve_package_exports(
        &self,
        pkg_dir: &Path,
        subpath: &str,
        extensions: &[String],
    ) -> Result<Option<PathBuf>> {
        let pkg = match self.pkg_json_cache.check_dir(pkg_dir)? {
            Some(pkg) => pkg,
            None => return Ok(None),
        };
        for target in pkg.export_targets(subpath) {
            let target_path = match join_abspath(pkg_dir, &target) {
                Ok(p) => p,
                Err(e) => {
                    warn!("bad exports target {target:?} in {}: {e}", pkg_dir.display());
                    continue;
                }
            };
            if let Some(hit) = resolve_as_file(&target_path, extensions) {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }

    /// Consults the package's `package.json` entry fields, in order.
    fn resolve_package_entry(
        &self,
        pkg_dir: &Path,
        extensions: &[String],
    ) -> Result<Option<PathBuf>> {
        let pkg = match self.pkg_json_cache.check_dir(pkg_dir)? {
            Some(pkg) => pkg,
            None => return Ok(None),
        };
        for entry in pkg.entry_fields() {
            let entry_path = match join_abspath(pkg_dir, entry) {
                Ok(p) => p,
                Err(e) => {
                    warn!("bad entry field {entry:?} in {}: {e}", pkg_dir.display());
                    continue;
                }
            };
            if let Some(hit) = resolve_as_file(&entry_path, extensions)
                .or_else(|| resolve_as_directory(&entry_path, extensions))
            {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }
}

/// Splits a bare target into the package name (two segments for scoped
/// packages) and the subpath after it (`""` for a bare package import).
fn split_package_target(target: &str) -> (&str, &str) {
    let name_segments = if target.starts_with('@') { 2 } else { 1 };
    let mut end = 0;
    for _ in 0..name_segments {
        match target[end..].find('/') {
            Some(pos) => end += pos + 1,
            None => return (target, ""),
        }
    }
    (&target[..end - 1], &target[end..])
}
