//! Scoped working directory for a single run.
//!
//! The `rmapi` client reads and writes files relative to its current
//! directory. Rather than changing the process directory, every remote call
//! receives a [`WorkDir`] and runs its child process inside it. The
//! directory and everything in it is removed when the `WorkDir` drops, on
//! success and error paths alike.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug)]
pub struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("rmjournal-").tempdir()?;
        log::debug!("work dir {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A fresh, empty subdirectory (e.g. one per download).
    pub fn subdir(&self, name: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        if path.exists() {
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    pub fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.dir.path().join(file_name);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_on_drop() {
        let work = WorkDir::new().unwrap();
        let root = work.path().to_path_buf();
        work.write("a.rmdoc", b"x").unwrap();
        work.subdir("download").unwrap();
        assert!(root.join("a.rmdoc").exists());

        drop(work);
        assert!(!root.exists());
    }

    #[test]
    fn test_subdir_starts_empty() {
        let work = WorkDir::new().unwrap();
        let sub = work.subdir("fetch").unwrap();
        fs::write(sub.join("old.rmdoc"), b"x").unwrap();

        let again = work.subdir("fetch").unwrap();
        assert_eq!(fs::read_dir(again).unwrap().count(), 0);
    }

    #[test]
    fn test_removed_when_run_fails() {
        fn failing_run(root: &mut Option<PathBuf>) -> Result<()> {
            let work = WorkDir::new()?;
            *root = Some(work.path().to_path_buf());
            work.write("partial.rmdoc", b"x")?;
            Err(crate::error::JournalError::Remote("network down".into()))
        }

        let mut root = None;
        assert!(failing_run(&mut root).is_err());
        assert!(!root.unwrap().exists());
    }
}
