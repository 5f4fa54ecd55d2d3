//! Loading, merging and caching of `tsconfig.json` configuration.
//!
//! A config file is read once, its `extends` chain flattened, and the
//! `baseUrl`/`paths` fields normalized into a [`ResolvedTsconfig`] that the
//! resolver consumes. Loaded configs are memoized in a [`TsconfigCache`]
//! keyed by absolute path and revalidated by modification fingerprint.

mod cache;
mod discovery;
mod error;
mod loader;
mod raw;
mod resolved;

pub use cache::TsconfigCache;
pub use discovery::find_config;
pub use error::ConfigError;
pub use loader::load_tsconfig;
pub use raw::{TsconfigCompilerOptions, TsconfigJson};
pub use resolved::{PathPattern, PatternMatch, ResolvedTsconfig, DEFAULT_EXTENSIONS};
