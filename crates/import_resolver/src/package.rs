use anyhow::Result;
use ftree_cache::{ContextData, FileContextCache};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;
use tsconfig_paths::PathPattern;

/// The entry-point fields of a `package.json`, in the shape resolution
/// cares about. Everything else in the manifest is ignored.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct PackageJson {
    pub name: Option<String>,
    pub types: Option<String>,
    pub typings: Option<String>,
    pub fesm2020: Option<String>,
    pub fesm2015: Option<String>,
    pub esm2020: Option<String>,
    pub es2020: Option<String>,
    pub module: Option<String>,
    #[serde(rename = "jsnext:main")]
    pub jsnext_main: Option<String>,
    pub main: Option<String>,
    pub exports: Option<Value>,
}

pub type PackageJsonCache = FileContextCache<PackageJson>;

impl PackageJson {
    /// Candidate entry fields in probe order. Type-declaration entries come
    /// first: for a lint resolver the interesting target of a package import
    /// is its typed surface, mirroring how TS-aware resolvers order their
    /// mainFields. The fesm/esm entries are the Angular package format's
    /// flavors of `module`.
    pub fn entry_fields(&self) -> impl Iterator<Item = &str> {
        [
            &self.types,
            &self.typings,
            &self.fesm2020,
            &self.fesm2015,
            &self.esm2020,
            &self.es2020,
            &self.module,
            &self.jsnext_main,
            &self.main,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
    }

    /// Candidate targets from the `exports` field for the given package
    /// subpath (`""` for a bare package import), package-relative, in
    /// declaration order.
    ///
    /// Three forms are understood: a bare string, an array of strings, and a
    /// subpath map whose keys may carry one `*` wildcard. Conditional export
    /// objects and keys with multiple wildcards are skipped.
    pub fn export_targets(&self, subpath: &str) -> Vec<String> {
        match &self.exports {
            None => Vec::new(),
            Some(exports) => exports_value_targets(exports, subpath),
        }
    }
}

fn exports_value_targets(exports: &Value, subpath: &str) -> Vec<String> {
    match exports {
        Value::String(target) if subpath.is_empty() => vec![target.clone()],
        Value::Array(entries) if subpath.is_empty() => entries
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        Value::Object(map) => {
            for (key, value) in map {
                let key = key.strip_prefix("./").unwrap_or(key.as_str());
                let key = if key == "." { "" } else { key };
                let pattern = match key.matches('*').count() {
                    0 => PathPattern::Exact(key.to_string()),
                    1 => {
                        let pos = key.find('*').unwrap_or_default();
                        PathPattern::Wildcard {
                            prefix: key[..pos].to_string(),
                            suffix: key[pos + 1..].to_string(),
                        }
                    }
                    _ => continue,
                };
                if let Some(m) = pattern.matches(subpath) {
                    return match value {
                        Value::String(target) => vec![target.replace('*', m.captured)],
                        Value::Array(entries) => entries
                            .iter()
                            .filter_map(Value::as_str)
                            .map(|target| target.replace('*', m.captured))
                            .collect(),
                        _ => Vec::new(),
                    };
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

impl ContextData for PackageJson {
    fn read_context_data(path: &Path) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(pkg) => Ok(Some(pkg)),
            Err(e) => {
                // a malformed manifest inside node_modules degrades to
                // index-file probing instead of failing the resolution
                warn!("ignoring malformed package.json at {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_tmpdir::test_tmpdir;

    #[test]
    fn test_entry_fields_order() {
        let pkg = PackageJson {
            name: Some("pkg".to_string()),
            typings: Some("./typings/index.d.ts".to_string()),
            fesm2020: Some("./fesm2020/pkg.mjs".to_string()),
            module: Some("./esm/index.js".to_string()),
            main: Some("./lib/index.js".to_string()),
            ..Default::default()
        };
        assert_eq!(
            pkg.entry_fields().collect::<Vec<_>>(),
            vec![
                "./typings/index.d.ts",
                "./fesm2020/pkg.mjs",
                "./esm/index.js",
                "./lib/index.js"
            ]
        );
    }

    #[test]
    fn test_jsnext_main_field_name() {
        let pkg: PackageJson =
            serde_json::from_str(r#"{ "jsnext:main": "./next/index.js" }"#).unwrap();
        assert_eq!(
            pkg.entry_fields().collect::<Vec<_>>(),
            vec!["./next/index.js"]
        );
    }

    #[test]
    fn test_export_targets_string_form() {
        let pkg: PackageJson =
            serde_json::from_str(r#"{ "exports": "./lib/entry.js" }"#).unwrap();
        assert_eq!(pkg.export_targets(""), vec!["./lib/entry.js".to_string()]);
        assert!(pkg.export_targets("nested").is_empty());
    }

    #[test]
    fn test_export_targets_array_form() {
        let pkg: PackageJson =
            serde_json::from_str(r#"{ "exports": ["./a.js", "./b.js"] }"#).unwrap();
        assert_eq!(
            pkg.export_targets(""),
            vec!["./a.js".to_string(), "./b.js".to_string()]
        );
    }

    #[test]
    fn test_export_targets_map_dot_key() {
        let pkg: PackageJson = serde_json::from_str(
            r#"{ "exports": { ".": "./index.js", "./util": "./lib/util.js" } }"#,
        )
        .unwrap();
        assert_eq!(pkg.export_targets(""), vec!["./index.js".to_string()]);
        assert_eq!(pkg.export_targets("util"), vec!["./lib/util.js".to_string()]);
    }

    #[test]
    fn test_export_targets_wildcard_map() {
        let pkg: PackageJson = serde_json::from_str(
            r#"{ "exports": { "./features/*": "./dist/features/*.js" } }"#,
        )
        .unwrap();
        assert_eq!(
            pkg.export_targets("features/parser"),
            vec!["./dist/features/parser.js".to_string()]
        );
        assert!(pkg.export_targets("other").is_empty());
    }

    #[test]
    fn test_export_targets_skips_conditional_object() {
        let pkg: PackageJson = serde_json::from_str(
            r#"{ "exports": { ".": { "import": "./index.mjs" } } }"#,
        )
        .unwrap();
        assert!(pkg.export_targets("").is_empty());
    }

    #[test]
    fn test_cache_reads_manifest() {
        let tmp = test_tmpdir!(
            "pkg/package.json" => r#"{ "name": "pkg", "main": "./index.js" }"#
        );
        let cache: PackageJsonCache = FileContextCache::new("package.json");
        let pkg = cache.check_dir(&tmp.root_join("pkg")).unwrap().unwrap();
        assert_eq!(pkg.main.as_deref(), Some("./index.js"));
    }

    #[test]
    fn test_malformed_manifest_is_negative_entry() {
        let tmp = test_tmpdir!(
            "pkg/package.json" => "not json at all"
        );
        let cache: PackageJsonCache = FileContextCache::new("package.json");
        assert!(cache.check_dir(&tmp.root_join("pkg")).unwrap().is_none());
    }
}
