use std::path::PathBuf;

/// Failure to load a configuration file that exists (or was explicitly
/// requested via `extends`). Absence of a config file is not an error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Disk I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path} as a tsconfig document: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} extends \"{target}\", which does not exist")]
    MissingExtends { path: PathBuf, target: String },
    #[error("Cyclic extends chain: {path} is visited twice")]
    ExtendsCycle { path: PathBuf },
    #[error("Value of paths.\"{key}\" in {path} must not be an empty array")]
    EmptyPathsEntry { path: PathBuf, key: String },
    #[error("paths.\"{key}\" in {path} must contain at most one wildcard")]
    MultipleWildcards { path: PathBuf, key: String },
    #[error("Could not absolutize config path {path}: {source}")]
    BadPath {
        path: PathBuf,
        #[source]
        source: abspath::Error,
    },
}
