use crate::error::ConfigError;
use crate::raw::TsconfigJson;
use crate::resolved::{PathPattern, ResolvedTsconfig, DEFAULT_EXTENSIONS};
use abspath::{join_abspath, to_absolute_path};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One file of the extends chain, with per-file normalization (absolute
/// `baseUrl`, ordered `paths` entries) already applied.
struct ConfigLayer {
    dir: PathBuf,
    base_url: Option<PathBuf>,
    paths: Option<Vec<(String, Vec<String>)>>,
}

/// Reads the tsconfig file at `path`, flattens its `extends` chain and
/// normalizes the result.
///
/// A missing `extends` target is a hard error (the author asked for it); a
/// cyclic chain is detected via the set of visited absolute paths.
pub fn load_tsconfig(path: &Path) -> Result<ResolvedTsconfig, ConfigError> {
    let abs = to_absolute_path(path).map_err(|source| ConfigError::BadPath {
        path: path.to_owned(),
        source,
    })?;
    let mut visited = HashSet::new();
    let layer = load_chain(&abs, &mut visited)?;
    finalize(&abs, layer)
}

fn load_chain(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<ConfigLayer, ConfigError> {
    if !visited.insert(path.to_owned()) {
        return Err(ConfigError::ExtendsCycle {
            path: path.to_owned(),
        });
    }
    debug!("loading tsconfig {}", path.display());

    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    let raw: TsconfigJson =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

    let dir = path.parent().unwrap_or_else(|| Path::new("/")).to_path_buf();

    let base_url = raw
        .compiler_options
        .base_url
        .as_deref()
        .map(|raw_base| join_abspath(&dir, raw_base))
        .transpose()
        .map_err(|source| ConfigError::BadPath {
            path: path.to_owned(),
            source,
        })?;

    let paths = raw
        .compiler_options
        .paths
        .map(|table| {
            table
                .into_iter()
                .map(|(key, value)| {
                    let substitutions: Vec<String> =
                        serde_json::from_value(value).map_err(|source| ConfigError::Parse {
                            path: path.to_owned(),
                            source,
                        })?;
                    Ok((key, substitutions))
                })
                .collect::<Result<Vec<_>, ConfigError>>()
        })
        .transpose()?;

    let layer = ConfigLayer {
        dir,
        base_url,
        paths,
    };

    match raw.extends {
        None => Ok(layer),
        Some(target) => {
            let target_path =
                extends_target(&layer.dir, &target).map_err(|source| ConfigError::BadPath {
                    path: path.to_owned(),
                    source,
                })?;
            if !target_path.is_file() {
                return Err(ConfigError::MissingExtends {
                    path: path.to_owned(),
                    target,
                });
            }
            let base = load_chain(&target_path, visited)?;
            Ok(merge(base, layer))
        }
    }
}

/// Resolves an `extends` value against the declaring file's directory,
/// appending `.json` when the target doesn't already name a json file.
fn extends_target(dir: &Path, target: &str) -> Result<PathBuf, abspath::Error> {
    let joined = join_abspath(dir, target)?;
    if target.ends_with(".json") {
        return Ok(joined);
    }
    let mut with_ext = joined.into_os_string();
    with_ext.push(".json");
    Ok(PathBuf::from(with_ext))
}

/// Merges one `extends` link: the extending file's fields override the
/// base's key-by-key; base-only `paths` keys survive, sorted after the
/// extender's own declarations so the extender's keys also win precedence
/// tie-breaks.
fn merge(base: ConfigLayer, child: ConfigLayer) -> ConfigLayer {
    let paths = match (base.paths, child.paths) {
        (base_paths, None) => base_paths,
        (None, child_paths) => child_paths,
        (Some(base_paths), Some(mut merged)) => {
            for (key, substitutions) in base_paths {
                if !merged.iter().any(|(child_key, _)| *child_key == key) {
                    merged.push((key, substitutions));
                }
            }
            Some(merged)
        }
    };
    ConfigLayer {
        dir: child.dir,
        base_url: child.base_url.or(base.base_url),
        paths,
    }
}

fn finalize(path: &Path, layer: ConfigLayer) -> Result<ResolvedTsconfig, ConfigError> {
    let mut paths = Vec::new();
    for (key, substitutions) in layer.paths.unwrap_or_default() {
        if substitutions.is_empty() {
            return Err(ConfigError::EmptyPathsEntry {
                path: path.to_owned(),
                key,
            });
        }
        let pattern = match key.matches('*').count() {
            0 => PathPattern::Exact(key),
            1 => {
                let pos = key.find('*').unwrap();
                PathPattern::Wildcard {
                    prefix: key[..pos].to_string(),
                    suffix: key[pos + 1..].to_string(),
                }
            }
            _ => {
                return Err(ConfigError::MultipleWildcards {
                    path: path.to_owned(),
                    key,
                })
            }
        };
        paths.push((pattern, substitutions));
    }

    Ok(ResolvedTsconfig {
        dir: layer.dir,
        base_url: layer.base_url,
        paths,
        extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
    })
}
