use super::{RemoteStore, ROOT};
use crate::error::{JournalError, Result};
use crate::workdir::WorkDir;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Remote store kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    documents: BTreeMap<(String, String), Vec<u8>>,
    folders: BTreeSet<String>,
    publish_log: Vec<(String, String)>,
    fail_publish: bool,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, folder: &str, name: &str, archive: Vec<u8>) -> Self {
        self.documents
            .insert((folder.to_string(), name.to_string()), archive);
        self
    }

    /// Make every publish fail, simulating a dropped connection.
    pub fn failing_publish(mut self) -> Self {
        self.fail_publish = true;
        self
    }

    pub fn document(&self, folder: &str, name: &str) -> Option<&Vec<u8>> {
        self.documents.get(&(folder.to_string(), name.to_string()))
    }

    pub fn has_folder(&self, folder: &str) -> bool {
        self.folders.contains(folder)
    }

    /// `(folder, name)` of every successful publish, in order.
    pub fn publish_log(&self) -> &[(String, String)] {
        &self.publish_log
    }
}

impl RemoteStore for MemoryRemote {
    fn list_names(&self, folder: &str, _work: &WorkDir) -> Result<HashSet<String>> {
        let mut names: HashSet<String> = self
            .documents
            .keys()
            .filter(|(f, _)| f == folder)
            .map(|(_, name)| name.clone())
            .collect();
        if folder == ROOT {
            names.extend(self.folders.iter().cloned());
        }
        Ok(names)
    }

    fn fetch(&self, name: &str, _work: &WorkDir) -> Result<Vec<u8>> {
        self.document(ROOT, name)
            .cloned()
            .ok_or_else(|| JournalError::RemoteNotFound(name.to_string()))
    }

    fn publish(&mut self, archive: &[u8], folder: &str, name: &str, _work: &WorkDir) -> Result<()> {
        if self.fail_publish {
            return Err(JournalError::Remote(format!(
                "connection lost while uploading '{}'",
                name
            )));
        }
        if folder != ROOT && !self.folders.contains(folder) {
            return Err(JournalError::Remote(format!(
                "folder '{}' does not exist",
                folder
            )));
        }
        self.documents
            .insert((folder.to_string(), name.to_string()), archive.to_vec());
        self.publish_log
            .push((folder.to_string(), name.to_string()));
        Ok(())
    }

    fn ensure_folder(&mut self, folder: &str, _work: &WorkDir) -> Result<()> {
        if folder != ROOT {
            self.folders.insert(folder.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_then_fetch() {
        let work = WorkDir::new().unwrap();
        let mut remote = MemoryRemote::new();
        remote.publish(b"doc", ROOT, "Journal", &work).unwrap();

        assert!(remote.exists("Journal", &work).unwrap());
        assert_eq!(remote.fetch("Journal", &work).unwrap(), b"doc".to_vec());
    }

    #[test]
    fn test_publish_overwrites() {
        let work = WorkDir::new().unwrap();
        let mut remote = MemoryRemote::new().with_document(ROOT, "Journal", b"old".to_vec());
        remote.publish(b"new", ROOT, "Journal", &work).unwrap();
        assert_eq!(remote.document(ROOT, "Journal").unwrap(), &b"new".to_vec());
    }

    #[test]
    fn test_fetch_missing_is_not_found() {
        let work = WorkDir::new().unwrap();
        let remote = MemoryRemote::new();
        assert!(matches!(
            remote.fetch("Nope", &work),
            Err(JournalError::RemoteNotFound(_))
        ));
    }

    #[test]
    fn test_folders_are_listed_at_root_and_scope_names() {
        let work = WorkDir::new().unwrap();
        let mut remote = MemoryRemote::new();
        remote.ensure_folder("Backups", &work).unwrap();
        remote.publish(b"x", "Backups", "BJ_20250101", &work).unwrap();

        let root = remote.list_names(ROOT, &work).unwrap();
        assert!(root.contains("Backups"));
        assert!(!root.contains("BJ_20250101"));
        assert!(remote
            .list_names("Backups", &work)
            .unwrap()
            .contains("BJ_20250101"));
    }

    #[test]
    fn test_publish_into_missing_folder_fails() {
        let work = WorkDir::new().unwrap();
        let mut remote = MemoryRemote::new();
        assert!(remote.publish(b"x", "Nowhere", "BJ", &work).is_err());
    }
}
