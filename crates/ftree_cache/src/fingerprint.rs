use std::path::Path;
use std::time::SystemTime;

/// Modification fingerprint of a filesystem entry: (mtime, size).
///
/// Two fingerprints comparing equal is taken to mean the entry is unchanged.
/// Size participates so that rapid rewrites within the mtime granularity of
/// the filesystem are still usually detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    mtime: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    /// Stats `path` and returns its fingerprint, or `None` if the entry does
    /// not exist. Errors other than NotFound are propagated.
    pub fn probe(path: &Path) -> std::io::Result<Option<Fingerprint>> {
        match std::fs::metadata(path) {
            Ok(meta) => Ok(Some(Fingerprint {
                // some filesystems don't report mtime; fall back to size-only
                mtime: meta.modified().ok(),
                len: meta.len(),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
