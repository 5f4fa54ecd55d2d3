use std::path::{Path, PathBuf};

/// Probe priority for extensionless candidates. Source extensions come
/// before declaration and script extensions, matching tsc's own order.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "d.ts", "js", "jsx", "json", "node"];

/// A single key of the `paths` table: either an exact specifier or a
/// pattern with exactly one `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Wildcard { prefix: String, suffix: String },
}

/// Outcome of matching a specifier against one pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch<'specifier> {
    /// The segment captured by `*` (empty for exact matches).
    pub captured: &'specifier str,
    /// Length of the non-wildcard prefix, the precedence criterion:
    /// the longest literal prefix wins, first-declared breaks ties.
    pub prefix_len: usize,
}

impl PathPattern {
    pub fn matches<'s>(&self, specifier: &'s str) -> Option<PatternMatch<'s>> {
        match self {
            PathPattern::Exact(key) => (specifier == key).then_some(PatternMatch {
                captured: "",
                prefix_len: key.len(),
            }),
            PathPattern::Wildcard { prefix, suffix } => {
                if specifier.len() < prefix.len() + suffix.len() {
                    return None;
                }
                if !specifier.starts_with(prefix.as_str()) || !specifier.ends_with(suffix.as_str())
                {
                    return None;
                }
                Some(PatternMatch {
                    captured: &specifier[prefix.len()..specifier.len() - suffix.len()],
                    prefix_len: prefix.len(),
                })
            }
        }
    }
}

/// A configuration after `extends` flattening and normalization.
///
/// Immutable once built; resolvers receive shared read-only handles from the
/// cache and rebuilding only happens when the source file's fingerprint
/// changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTsconfig {
    /// Directory of the config file this was loaded from (the leaf of the
    /// extends chain).
    pub dir: PathBuf,
    /// Absolute `baseUrl`, resolved against the directory of the config
    /// file that declared it.
    pub base_url: Option<PathBuf>,
    /// `paths` entries in declaration order (extending file first).
    pub paths: Vec<(PathPattern, Vec<String>)>,
    /// Extension probe order.
    pub extensions: Vec<String>,
}

impl ResolvedTsconfig {
    /// The directory alias substitutions resolve against: `baseUrl` when
    /// declared, otherwise the config file's own directory.
    pub fn substitution_base(&self) -> &Path {
        self.base_url.as_deref().unwrap_or(&self.dir)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exact_match() {
        let pat = PathPattern::Exact("@app/special".to_string());
        assert_eq!(
            pat.matches("@app/special"),
            Some(PatternMatch {
                captured: "",
                prefix_len: 12
            })
        );
        assert_eq!(pat.matches("@app/special/nested"), None);
    }

    #[test]
    fn test_wildcard_prefix_match() {
        let pat = PathPattern::Wildcard {
            prefix: "@app/".to_string(),
            suffix: "".to_string(),
        };
        assert_eq!(
            pat.matches("@app/feature/thing"),
            Some(PatternMatch {
                captured: "feature/thing",
                prefix_len: 5
            })
        );
        assert_eq!(pat.matches("@other/feature"), None);
    }

    #[test]
    fn test_wildcard_with_suffix() {
        let pat = PathPattern::Wildcard {
            prefix: "lib/".to_string(),
            suffix: "/impl".to_string(),
        };
        assert_eq!(
            pat.matches("lib/parser/impl"),
            Some(PatternMatch {
                captured: "parser",
                prefix_len: 4
            })
        );
        assert_eq!(pat.matches("lib/parser"), None);
    }

    #[test]
    fn test_bare_star_matches_everything() {
        let pat = PathPattern::Wildcard {
            prefix: "".to_string(),
            suffix: "".to_string(),
        };
        assert_eq!(
            pat.matches("anything/at/all"),
            Some(PatternMatch {
                captured: "anything/at/all",
                prefix_len: 0
            })
        );
    }

    #[test]
    fn test_wildcard_too_short_specifier() {
        let pat = PathPattern::Wildcard {
            prefix: "ab".to_string(),
            suffix: "cd".to_string(),
        };
        // "abcd" has an empty capture, "abc" cannot satisfy both sides
        assert!(pat.matches("abcd").is_some());
        assert_eq!(pat.matches("abc"), None);
    }
}
