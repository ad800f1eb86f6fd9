//! Locates the repository whose coverage is collected.

use error::{ErrorKind, Result, ResultExt};

use std::ffi::OsStr;
use std::fs::canonicalize;
use std::path::{Path, PathBuf};

/// The file marking the top of a CMake project.
const PROJECT_FILE: &str = "CMakeLists.txt";

/// Finds the closest ancestor of `start` (including `start` itself) containing `CMakeLists.txt`.
///
/// Nested CMake projects are not told apart: the innermost one wins.
pub fn find_cmake_root(start: &Path) -> Option<&Path> {
    start.ancestors().find(|dir| dir.join(PROJECT_FILE).is_file())
}

/// Finds the canonical repository root.
///
/// Uses `explicit` if given (the `--root` option). Otherwise searches upwards from the directory this program was
/// built from, so a checkout at `<repository>/tools/coverage/run-coverage` finds `<repository>`.
///
/// # Errors
///
/// Returns [`RootNotFound`] if the path is not an existing directory containing `CMakeLists.txt`, or if no such
/// ancestor exists.
///
/// [`RootNotFound`]: ../error/enum.ErrorKind.html#variant.RootNotFound
pub fn repository_root(explicit: Option<&OsStr>) -> Result<PathBuf> {
    let root = match explicit {
        Some(root) => PathBuf::from(root),
        None => {
            let start = Path::new(env!("CARGO_MANIFEST_DIR"));
            find_cmake_root(start).ok_or_else(|| ErrorKind::RootNotFound(start.to_owned()))?.to_owned()
        },
    };
    let canonical = canonicalize(&root).chain_err(|| ErrorKind::RootNotFound(root.clone()))?;
    ensure!(canonical.join(PROJECT_FILE).is_file(), ErrorKind::RootNotFound(root));
    debug!("repository root = {}", canonical.display());
    Ok(canonical)
}
