use abspath::join_abspath;
use path_clean::PathClean;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};
use tsconfig_paths::{PatternMatch, ResolvedTsconfig};

/// Applies the config's `baseUrl`/`paths` mapping to a specifier, producing
/// the ordered candidate paths to probe.
///
/// Alias mapping only applies to bare specifiers; relative and absolute
/// specifiers yield no candidates. Matching follows tsc's precedence: among
/// all matching `paths` keys the one with the longest non-wildcard prefix
/// wins, first-declared breaking ties; the winner's substitution list is
/// emitted in declared order. With no matching key, a configured `baseUrl`
/// contributes the specifier resolved against it as the single candidate.
pub fn alias_candidates(specifier: &str, config: &ResolvedTsconfig) -> Vec<PathBuf> {
    if specifier.starts_with('.') || Path::new(specifier).is_absolute() {
        return Vec::new();
    }

    let mut best: Option<(PatternMatch, &[String])> = None;
    for (pattern, substitutions) in &config.paths {
        if let Some(m) = pattern.matches(specifier) {
            trace!(
                "paths key {:?} matches {:?} (prefix_len {})",
                pattern,
                specifier,
                m.prefix_len
            );
            // strictly-greater keeps the first-declared key on ties
            if best.map_or(true, |(b, _)| m.prefix_len > b.prefix_len) {
                best = Some((m, substitutions));
            }
        }
    }

    let base = config.substitution_base();
    match best {
        Some((m, substitutions)) => substitutions
            .iter()
            .filter_map(|substitution| {
                let replaced = substitution.replace('*', m.captured);
                to_candidate(base, &replaced)
            })
            .collect(),
        None => match &config.base_url {
            Some(base_url) => to_candidate(base_url, specifier).into_iter().collect(),
            None => Vec::new(),
        },
    }
}

fn to_candidate(base: &Path, target: &str) -> Option<PathBuf> {
    let target_path = Path::new(target);
    if target_path.is_absolute() {
        return Some(target_path.to_path_buf().clean());
    }
    match join_abspath(base, target_path) {
        Ok(candidate) => Some(candidate),
        Err(e) => {
            // only reachable with a relative substitution base, which the
            // config loader normalizes away
            warn!("skipping alias candidate {target}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use tsconfig_paths::PathPattern;

    fn config(
        base_url: Option<&str>,
        paths: Vec<(PathPattern, Vec<&str>)>,
    ) -> ResolvedTsconfig {
        ResolvedTsconfig {
            dir: PathBuf::from("/repo"),
            base_url: base_url.map(PathBuf::from),
            paths: paths
                .into_iter()
                .map(|(p, subs)| (p, subs.into_iter().map(String::from).collect()))
                .collect(),
            extensions: vec!["ts".to_string()],
        }
    }

    fn wildcard(prefix: &str, suffix: &str) -> PathPattern {
        PathPattern::Wildcard {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    #[test]
    fn test_relative_specifiers_bypass_aliases() {
        let config = config(Some("/repo"), vec![(wildcard("", ""), vec!["./src/*"])]);
        assert_eq!(alias_candidates("./local", &config), Vec::<PathBuf>::new());
        assert_eq!(alias_candidates("../up", &config), Vec::<PathBuf>::new());
        assert_eq!(alias_candidates("/abs/path", &config), Vec::<PathBuf>::new());
    }

    #[test]
    fn test_wildcard_substitution() {
        let config = config(
            Some("/repo"),
            vec![(wildcard("@app/", ""), vec!["./src/*"])],
        );
        assert_eq!(
            alias_candidates("@app/feature/thing", &config),
            vec![PathBuf::from("/repo/src/feature/thing")]
        );
    }

    #[test]
    fn test_exact_key_beats_wildcard() {
        let config = config(
            Some("/repo"),
            vec![
                (wildcard("@app/", ""), vec!["./src/*"]),
                (
                    PathPattern::Exact("@app/special".to_string()),
                    vec!["./special.ts"],
                ),
            ],
        );
        assert_eq!(
            alias_candidates("@app/special", &config),
            vec![PathBuf::from("/repo/special.ts")]
        );
    }

    #[test]
    fn test_longer_prefix_beats_shorter() {
        let config = config(
            Some("/repo"),
            vec![
                (wildcard("@app/", ""), vec!["./src/*"]),
                (wildcard("@app/lib/", ""), vec!["./lib/*"]),
            ],
        );
        assert_eq!(
            alias_candidates("@app/lib/util", &config),
            vec![PathBuf::from("/repo/lib/util")]
        );
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        let config = config(
            Some("/repo"),
            vec![
                (wildcard("@app/", ""), vec!["./first/*"]),
                (wildcard("@app/", ""), vec!["./second/*"]),
            ],
        );
        assert_eq!(
            alias_candidates("@app/x", &config),
            vec![PathBuf::from("/repo/first/x")]
        );
    }

    #[test]
    fn test_substitution_list_order_preserved() {
        let config = config(
            Some("/repo"),
            vec![(wildcard("lib/", ""), vec!["./generated/*", "./handwritten/*"])],
        );
        assert_eq!(
            alias_candidates("lib/a", &config),
            vec![
                PathBuf::from("/repo/generated/a"),
                PathBuf::from("/repo/handwritten/a")
            ]
        );
    }

    #[test]
    fn test_base_url_fallback_without_matching_key() {
        let config = config(Some("/repo/src"), vec![]);
        assert_eq!(
            alias_candidates("utils/helper", &config),
            vec![PathBuf::from("/repo/src/utils/helper")]
        );
    }

    #[test]
    fn test_no_key_no_base_url_is_empty() {
        let config = config(None, vec![(wildcard("@app/", ""), vec!["./src/*"])]);
        assert_eq!(alias_candidates("other/thing", &config), Vec::<PathBuf>::new());
    }

    #[test]
    fn test_substitutions_fall_back_to_config_dir_without_base_url() {
        let config = config(None, vec![(wildcard("@app/", ""), vec!["./src/*"])]);
        assert_eq!(
            alias_candidates("@app/x", &config),
            vec![PathBuf::from("/repo/src/x")]
        );
    }

    #[test]
    fn test_absolute_substitution_used_verbatim() {
        let config = config(
            Some("/repo"),
            vec![(
                PathPattern::Exact("vendored".to_string()),
                vec!["/opt/vendored/index.ts"],
            )],
        );
        assert_eq!(
            alias_candidates("vendored", &config),
            vec![PathBuf::from("/opt/vendored/index.ts")]
        );
    }
}
