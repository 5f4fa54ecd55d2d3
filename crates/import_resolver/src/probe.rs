use std::path::{Path, PathBuf};
use tracing::trace;

/// Probes `base` as a regular file: first exactly as written, then with
/// each extension appended in order.
///
/// Appended means `foo` probes `foo.ts`, and `foo.bar` probes `foo.bar.ts` —
/// the existing suffix is never replaced. A probe that fails with an I/O
/// error counts as a miss; probing never mutates the filesystem.
pub fn resolve_as_file(base: &Path, extensions: &[String]) -> Option<PathBuf> {
    trace!("resolve_as_file({})", base.display());
    if base.is_file() {
        return Some(base.to_path_buf());
    }

    let name = base.file_name()?.to_string_lossy();
    for ext in extensions {
        let with_ext = base.with_file_name(format!("{name}.{ext}"));
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }
    None
}

/// Probes `base` as a directory, trying `index.<ext>` for each extension
/// in order.
pub fn resolve_as_directory(base: &Path, extensions: &[String]) -> Option<PathBuf> {
    trace!("resolve_as_directory({})", base.display());
    for ext in extensions {
        let index = base.join(format!("index.{ext}"));
        if index.is_file() {
            return Some(index);
        }
    }
    None
}

/// Full probe sequence for one candidate base path: exact file, file with
/// extension, then directory index. First hit wins.
pub fn probe(base: &Path, extensions: &[String]) -> Option<PathBuf> {
    resolve_as_file(base, extensions).or_else(|| resolve_as_directory(base, extensions))
}
