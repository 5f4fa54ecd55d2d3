use path_clean::PathClean;
use std::env::current_dir;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Base path is not absolute")]
    BasePathNotAbsolute,
    #[error("Failed to determine the current working directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Joins `path` onto `base`, producing a cleaned absolute path.
///
/// `base` must itself be absolute. An absolute `path` is returned as-is
/// (cleaned), without consulting `base`.
pub fn join_abspath(base: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let base = base.as_ref();
    let path = path.as_ref();
    if !base.is_absolute() {
        return Err(Error::BasePathNotAbsolute);
    }

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
    .clean();

    Ok(absolute_path)
}

/// Absolutizes `path` against the current working directory.
pub fn to_absolute_path(path: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let path = path.as_ref();
    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir().map_err(Error::CurrentDir)?.join(path)
    }
    .clean();

    Ok(absolute_path)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_join_abspath_relative() {
        assert_eq!(
            join_abspath("/repo/src", "../lib/mod.ts").unwrap(),
            PathBuf::from("/repo/lib/mod.ts")
        );
    }

    #[test]
    fn test_join_abspath_cleans_dots() {
        assert_eq!(
            join_abspath("/repo", "./a/./b/../c").unwrap(),
            PathBuf::from("/repo/a/c")
        );
    }

    #[test]
    fn test_join_abspath_absolute_path_wins() {
        assert_eq!(
            join_abspath("/repo", "/other/file.ts").unwrap(),
            PathBuf::from("/other/file.ts")
        );
    }

    #[test]
    fn test_join_abspath_rejects_relative_base() {
        assert!(matches!(
            join_abspath("repo", "file.ts"),
            Err(Error::BasePathNotAbsolute)
        ));
    }

    #[test]
    fn test_to_absolute_path_passthrough() {
        assert_eq!(
            to_absolute_path("/a/b/../c").unwrap(),
            PathBuf::from("/a/c")
        );
    }

    #[test]
    fn test_to_absolute_path_joins_cwd() {
        let abs = to_absolute_path("some/rel/path").unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("some/rel/path"));
    }
}
