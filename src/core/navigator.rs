//! Current-folder tracking for the browser view

use super::node::Node;
use super::store::{Store, StoreError, StoreResult};

/// Stack of folder names leading from the root to the folder being browsed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    current: Vec<String>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &[String] {
        &self.current
    }

    pub fn is_at_root(&self) -> bool {
        self.current.is_empty()
    }

    /// Go to the parent folder
    pub fn ascend(&mut self) -> StoreResult<&[String]> {
        self.current.pop().ok_or(StoreError::AtRoot)?;
        Ok(&self.current)
    }

    /// Enter the subfolder `name` of the current folder
    pub fn descend(&mut self, store: &Store, name: &str) -> StoreResult<&[String]> {
        match store.get(self.current.as_slice(), name) {
            Ok(Node::Folder(folder)) => {
                self.current.push(folder.name.clone());
                Ok(&self.current)
            }
            Ok(Node::Page(_)) | Err(_) => Err(StoreError::NotFound(name.to_string())),
        }
    }

    /// Jump to any existing folder
    pub fn move_to<S: AsRef<str>>(&mut self, store: &Store, path: &[S]) -> StoreResult<&[String]> {
        store.resolve_folder(path)?;
        self.current = path.iter().map(|s| s.as_ref().to_string()).collect();
        Ok(&self.current)
    }

    /// Fall back to the deepest ancestor that still exists
    ///
    /// Returns true when the current path had to change.
    pub fn revalidate(&mut self, store: &Store) -> bool {
        let mut changed = false;
        while store.resolve_folder(self.current.as_slice()).is_err() {
            self.current.pop();
            changed = true;
        }
        changed
    }
}
