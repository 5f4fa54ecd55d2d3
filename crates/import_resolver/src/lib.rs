//! Resolution of TypeScript/JavaScript import specifiers to on-disk files.
//!
//! Given a specifier as written in a source file, the containing file, and
//! an optional list of tsconfig candidates, [`TsImportResolver::resolve`]
//! reports what the import actually references: a platform built-in, an
//! absolute file path, or nothing. Honors the tsconfig cascade (`extends`,
//! `baseUrl`, `paths`) and falls back to node-style `node_modules`
//! resolution.

mod alias;
mod builtins;
mod node_modules;
mod package;
mod probe;
mod resolver;

pub use alias::alias_candidates;
pub use builtins::{is_builtin, NODE_BUILTINS};
pub use node_modules::{NodeModulesCache, NodeModulesResolver};
pub use package::{PackageJson, PackageJsonCache};
pub use probe::{probe, resolve_as_directory, resolve_as_file};
pub use resolver::{resolve, ProjectOptions, ResolutionResult, ResolveError, TsImportResolver};
