//! # Remote Document Store
//!
//! The tablet's cloud is reached through the [`RemoteStore`] trait so the
//! update pipeline can run against different backends.
//!
//! ## Implementations
//!
//! - [`rmapi::RmapiStore`]: production backend, shells out to the `rmapi`
//!   client. Every call runs the child process inside the run's
//!   [`WorkDir`], which is where downloads land and uploads are read from.
//!
//! - [`memory::MemoryRemote`]: in-memory backend for testing
//!   - No processes, no network
//!   - Lets tests inspect what was published
//!
//! ## Naming
//!
//! Documents are addressed by their visible name inside a folder. [`ROOT`]
//! is the top level of the account; other folders are given by name.
//! There is no retry or timeout logic: a failing call aborts the run.

use crate::error::Result;
use crate::workdir::WorkDir;
use std::collections::HashSet;

pub mod memory;
pub mod rmapi;

pub const ROOT: &str = "/";

/// Path of `name` inside `folder` as the remote client expects it.
pub fn remote_path(folder: &str, name: &str) -> String {
    if folder == ROOT {
        name.to_string()
    } else {
        format!("{}/{}", folder.trim_end_matches('/'), name)
    }
}

pub trait RemoteStore {
    /// Names of the documents and folders directly inside `folder`.
    fn list_names(&self, folder: &str, work: &WorkDir) -> Result<HashSet<String>>;

    /// Download a top-level document as `.rmdoc` bytes.
    fn fetch(&self, name: &str, work: &WorkDir) -> Result<Vec<u8>>;

    /// Upload `archive` as `name` inside `folder`, replacing any existing
    /// document of that name.
    fn publish(&mut self, archive: &[u8], folder: &str, name: &str, work: &WorkDir) -> Result<()>;

    /// Create `folder` at the top level unless it already exists.
    fn ensure_folder(&mut self, folder: &str, work: &WorkDir) -> Result<()>;

    /// Whether a top-level document called `name` exists.
    fn exists(&self, name: &str, work: &WorkDir) -> Result<bool> {
        Ok(self.list_names(ROOT, work)?.contains(name))
    }
}
