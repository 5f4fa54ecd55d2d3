//! Caches for state that is defined by the presence of a file somewhere in
//! the directory tree (a `tsconfig.json`, a `package.json`, a `node_modules`
//! directory).
//!
//! Resolution probes the same directories over and over while a project is
//! linted; these caches make each directory pay for its disk probe once,
//! while a modification fingerprint keeps entries honest when a file changes
//! between calls.

mod context_data;
mod fingerprint;

pub use context_data::{ContextData, FileContextCache, ProbePathIterator};
pub use fingerprint::Fingerprint;
