//! Additional methods for libstd.

use error::{ErrorKind, Result, ResultExt};

use std::fs::{remove_dir_all, remove_file};
use std::io;
use std::path::Path;
use std::process::Command;

/// Removes a directory recursively. A directory which does not exist is not an error.
pub fn clean_dir(dir: &Path) -> io::Result<()> {
    match remove_dir_all(dir) {
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        res => res,
    }
}

/// Removes a file. A file which does not exist is not an error.
pub fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match remove_file(path) {
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        res => res,
    }
}

pub trait CommandExt {
    /// Runs the command to completion, turning a non-zero exit into [`ForwardFailed`].
    ///
    /// [`ForwardFailed`]: ../error/enum.ErrorKind.html#variant.ForwardFailed
    fn ensure_success(&mut self, name: &str) -> Result<()>;
}

impl CommandExt for Command {
    fn ensure_success(&mut self, name: &str) -> Result<()> {
        let status = self.status().chain_err(|| format!("cannot launch `{}`", name))?;
        ensure!(status.success(), ErrorKind::ForwardFailed(name.to_owned(), status));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use std::fs::{File, create_dir_all};

    #[test]
    fn test_clean_missing_paths() {
        let dir = tempdir().unwrap();
        clean_dir(&dir.path().join("nope")).unwrap();
        remove_file_if_exists(&dir.path().join("nope.txt")).unwrap();
    }

    #[test]
    fn test_clean_existing_paths() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        create_dir_all(&nested).unwrap();
        let file = nested.join("c.txt");
        File::create(&file).unwrap();

        remove_file_if_exists(&file).unwrap();
        assert!(!file.exists());
        clean_dir(&dir.path().join("a")).unwrap();
        assert!(!dir.path().join("a").exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_ensure_success() {
        Command::new("true").ensure_success("true").unwrap();

        let error = Command::new("sh").args(&["-c", "exit 7"]).ensure_success("sh").unwrap_err();
        match *error.kind() {
            ErrorKind::ForwardFailed(ref name, status) => {
                assert_eq!(name, "sh");
                assert_eq!(status.code(), Some(7));
            },
            ref kind => panic!("unexpected error {:?}", kind),
        }
        assert_eq!(error.exit_code(), Some(7));
    }

    #[test]
    fn test_ensure_success_missing_program() {
        let error = Command::new("/nonexistent/covrun-tool").ensure_success("covrun-tool").unwrap_err();
        assert_eq!(error.to_string(), "cannot launch `covrun-tool`");
        assert_eq!(error.exit_code(), None);
    }
}
