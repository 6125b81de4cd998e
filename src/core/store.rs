//! Path-addressed folder and page store
//!
//! The store owns the whole notebook tree. Folders are addressed by a path,
//! the sequence of folder names leading from the root; the root itself is
//! the empty path. Pages and folders share one namespace per parent.

use thiserror::Error;

use super::node::{now, Folder, Node, NodeKind, Page};

/// Name of the root folder
pub const ROOT_NAME: &str = "root";

/// Errors returned by store and navigation operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A path segment is missing or names a page
    #[error("Folder not found: {0}")]
    PathNotFound(String),

    /// A named child does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A child with this name already exists in the target folder
    #[error("'{0}' already exists in this folder")]
    AlreadyExists(String),

    #[error("Invalid name: '{0}'")]
    InvalidName(String),

    /// Ascending from the root folder
    #[error("Already at the root folder")]
    AtRoot,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Render a folder path for display, `/` for the root
pub fn display_path<S: AsRef<str>>(path: &[S]) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.iter().fold(String::new(), |mut out, segment| {
        out.push('/');
        out.push_str(segment.as_ref());
        out
    })
}

/// Trim a user-supplied name and reject ones that cannot address a child
pub fn validate_name(name: &str) -> StoreResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." || trimmed.contains('/') {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

/// In-memory notebook tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    root: Folder,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// The empty path addressing the root folder
    pub const ROOT: &'static [&'static str] = &[];

    pub fn new() -> Self {
        Self {
            root: Folder::new(ROOT_NAME),
        }
    }

    pub fn root(&self) -> &Folder {
        &self.root
    }

    /// Walk from the root following each path segment
    pub fn resolve_folder<S: AsRef<str>>(&self, path: &[S]) -> StoreResult<&Folder> {
        let mut folder = &self.root;
        for segment in path {
            folder = folder
                .child(segment.as_ref())
                .and_then(Node::as_folder)
                .ok_or_else(|| StoreError::PathNotFound(display_path(path)))?;
        }
        Ok(folder)
    }

    fn resolve_folder_mut<S: AsRef<str>>(&mut self, path: &[S]) -> StoreResult<&mut Folder> {
        let mut folder = &mut self.root;
        for segment in path {
            folder = folder
                .child_mut(segment.as_ref())
                .and_then(Node::as_folder_mut)
                .ok_or_else(|| StoreError::PathNotFound(display_path(path)))?;
        }
        Ok(folder)
    }

    /// Insert a new empty folder named `name` into the folder at `path`
    pub fn create_folder<S: AsRef<str>>(&mut self, path: &[S], name: &str) -> StoreResult<&Folder> {
        let name = validate_name(name)?;
        let parent = self.resolve_folder_mut(path)?;
        if parent.contains(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }

        tracing::debug!("Creating folder '{}' in {}", name, display_path(path));
        parent.insert(Node::Folder(Folder::new(name)));
        parent
            .child(name)
            .and_then(Node::as_folder)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Insert a new page into the folder at `path`, stamped with the current time
    pub fn create_page<S: AsRef<str>>(
        &mut self,
        path: &[S],
        title: &str,
        content: &str,
    ) -> StoreResult<&Page> {
        let title = validate_name(title)?;
        let parent_path: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
        let parent = self.resolve_folder_mut(path)?;
        if parent.contains(title) {
            return Err(StoreError::AlreadyExists(title.to_string()));
        }

        tracing::debug!("Creating page '{}' in {}", title, display_path(path));
        let page = Page::new(title, content, parent_path, now());
        parent.insert(Node::Page(page));
        parent
            .child(title)
            .and_then(Node::as_page)
            .ok_or_else(|| StoreError::NotFound(title.to_string()))
    }

    /// Immediate children of the folder at `path`
    pub fn list<S: AsRef<str>>(&self, path: &[S]) -> StoreResult<Vec<(String, NodeKind)>> {
        let folder = self.resolve_folder(path)?;
        Ok(folder
            .sorted_children()
            .into_iter()
            .map(|node| (node.name().to_string(), node.kind()))
            .collect())
    }

    /// A specific child of the folder at `path`, looked up by its trimmed name
    pub fn get<S: AsRef<str>>(&self, path: &[S], name: &str) -> StoreResult<&Node> {
        self.resolve_folder(path)?
            .child(name.trim())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// A page of the folder at `path`; a folder with that name is not a match
    pub fn get_page<S: AsRef<str>>(&self, path: &[S], title: &str) -> StoreResult<&Page> {
        self.get(path, title)?
            .as_page()
            .ok_or_else(|| StoreError::NotFound(title.to_string()))
    }

    /// Direct pages of the folder at `path`
    pub fn pages<S: AsRef<str>>(&self, path: &[S]) -> StoreResult<Vec<&Page>> {
        Ok(self.resolve_folder(path)?.pages().collect())
    }

    /// Detach a child, and with it the whole subtree below a folder
    pub fn remove<S: AsRef<str>>(&mut self, path: &[S], name: &str) -> StoreResult<Node> {
        let parent = self.resolve_folder_mut(path)?;
        let removed = parent
            .remove(name.trim())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        tracing::debug!("Removed '{}' from {}", name, display_path(path));
        Ok(removed)
    }

    /// Every folder path in the tree, depth first, starting with the root
    pub fn folder_paths(&self) -> Vec<Vec<String>> {
        fn walk(folder: &Folder, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
            out.push(prefix.clone());
            for sub in folder.subfolders() {
                prefix.push(sub.name.clone());
                walk(sub, prefix, out);
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.root, &mut Vec::new(), &mut out);
        out
    }

    pub fn page_count(&self) -> usize {
        self.root.totals().0
    }

    pub fn folder_count(&self) -> usize {
        self.root.totals().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_create_folder_then_resolve_is_empty() {
        let mut store = Store::new();
        store.create_folder(Store::ROOT, "Projects").unwrap();
        store.create_folder(&["Projects"], "Archive").unwrap();

        let folder = store.resolve_folder(&["Projects", "Archive"]).unwrap();
        assert_eq!(folder.name, "Archive");
        assert!(folder.is_empty());
    }

    #[test]
    fn test_page_then_folder_same_name_fails() {
        let mut store = Store::new();
        store.create_page(Store::ROOT, "X", "").unwrap();
        let result = store.create_folder(Store::ROOT, "X");
        assert_eq!(result.unwrap_err(), StoreError::AlreadyExists("X".to_string()));
    }

    #[test]
    fn test_folder_then_page_same_name_fails() {
        let mut store = Store::new();
        store.create_folder(Store::ROOT, "X").unwrap();
        let result = store.create_page(Store::ROOT, "X", "body");
        assert_eq!(result.unwrap_err(), StoreError::AlreadyExists("X".to_string()));
        assert_eq!(store.page_count(), 0);
    }

    #[test]
    fn test_same_name_in_different_folders_is_allowed() {
        let mut store = Store::new();
        store.create_folder(Store::ROOT, "A").unwrap();
        store.create_folder(Store::ROOT, "B").unwrap();
        store.create_page(&["A"], "Notes", "").unwrap();
        store.create_page(&["B"], "Notes", "").unwrap();
        assert_eq!(store.page_count(), 2);
    }

    #[test]
    fn test_projects_scenario() {
        let mut store = Store::new();
        store.create_folder(Store::ROOT, "Projects").unwrap();
        store.create_page(&["Projects"], "Spec", "hello").unwrap();

        let listing = store.list(&["Projects"]).unwrap();
        assert_eq!(listing, vec![("Spec".to_string(), NodeKind::Page)]);

        let node = store.get(&["Projects"], "Spec").unwrap();
        assert_eq!(node.as_page().unwrap().content, "hello");
    }

    #[test]
    fn test_page_records_parent_path() {
        let mut store = Store::new();
        store.create_folder(Store::ROOT, "Work").unwrap();
        store.create_folder(&["Work"], "Q3").unwrap();
        let page = store.create_page(&["Work", "Q3"], "Plan", "").unwrap();

        assert_eq!(page.parent_path(), ["Work".to_string(), "Q3".to_string()]);
        assert_eq!(page.folder_name(), "Q3");
    }

    #[test]
    fn test_resolve_missing_folder() {
        let store = Store::new();
        let result = store.resolve_folder(&["Missing"]);
        assert_eq!(
            result.unwrap_err(),
            StoreError::PathNotFound("/Missing".to_string())
        );
    }

    #[test]
    fn test_resolve_through_page_fails() {
        let mut store = Store::new();
        store.create_page(Store::ROOT, "Leaf", "").unwrap();
        assert!(matches!(
            store.resolve_folder(&["Leaf"]),
            Err(StoreError::PathNotFound(_))
        ));
        assert!(matches!(
            store.create_page(&["Leaf"], "Child", ""),
            Err(StoreError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_get_missing_child() {
        let store = Store::new();
        assert_eq!(
            store.get(Store::ROOT, "nope").unwrap_err(),
            StoreError::NotFound("nope".to_string())
        );
    }

    #[test]
    fn test_get_page_rejects_folder() {
        let mut store = Store::new();
        store.create_folder(Store::ROOT, "Docs").unwrap();
        assert!(matches!(
            store.get_page(Store::ROOT, "Docs"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_names_are_trimmed_and_validated() {
        let mut store = Store::new();
        store.create_folder(Store::ROOT, "  Trimmed  ").unwrap();
        assert!(store.resolve_folder(&["Trimmed"]).is_ok());

        for bad in ["", "   ", ".", "..", "a/b"] {
            assert_eq!(
                store.create_folder(Store::ROOT, bad).unwrap_err(),
                StoreError::InvalidName(bad.to_string())
            );
        }
        assert!(matches!(
            store.create_page(Store::ROOT, "", "content"),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn test_lookup_trims_like_create() {
        let mut store = Store::new();
        store.create_page(Store::ROOT, " Spec ", "x").unwrap();

        assert_eq!(store.get(Store::ROOT, " Spec ").unwrap().name(), "Spec");
        assert_eq!(store.get_page(Store::ROOT, " Spec ").unwrap().content, "x");
        assert_eq!(
            store.create_folder(Store::ROOT, " Spec ").unwrap_err(),
            StoreError::AlreadyExists("Spec".to_string())
        );

        let removed = store.remove(Store::ROOT, " Spec ").unwrap();
        assert_eq!(removed.kind(), NodeKind::Page);
        assert_eq!(store.page_count(), 0);
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let mut store = Store::new();
        store.create_folder(Store::ROOT, "Old").unwrap();
        store.create_folder(&["Old"], "Deeper").unwrap();
        store.create_page(&["Old", "Deeper"], "Note", "").unwrap();

        let removed = store.remove(Store::ROOT, "Old").unwrap();
        assert_eq!(removed.kind(), NodeKind::Folder);
        assert!(store.resolve_folder(&["Old", "Deeper"]).is_err());
        assert_eq!(store.page_count(), 0);
        assert_eq!(store.folder_count(), 0);

        assert_eq!(
            store.remove(Store::ROOT, "Old").unwrap_err(),
            StoreError::NotFound("Old".to_string())
        );
    }

    #[test]
    fn test_pages_lists_only_direct_pages() {
        let mut store = Store::new();
        store.create_folder(Store::ROOT, "Sub").unwrap();
        store.create_page(&["Sub"], "Hidden", "").unwrap();
        store.create_page(Store::ROOT, "b", "").unwrap();
        store.create_page(Store::ROOT, "A", "").unwrap();

        let titles: Vec<&str> = store
            .pages(Store::ROOT)
            .unwrap()
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["A", "b"]);
    }

    #[test]
    fn test_folder_paths_depth_first() {
        let mut store = Store::new();
        store.create_folder(Store::ROOT, "b").unwrap();
        store.create_folder(Store::ROOT, "a").unwrap();
        store.create_folder(&["a"], "inner").unwrap();
        store.create_page(&["a"], "page", "").unwrap();

        let paths: Vec<String> = store
            .folder_paths()
            .iter()
            .map(|p| display_path(p.as_slice()))
            .collect();
        assert_eq!(paths, vec!["/", "/a", "/a/inner", "/b"]);
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(Store::ROOT), "/");
        assert_eq!(display_path(&["a", "b"]), "/a/b");
    }

    proptest! {
        #[test]
        fn list_is_independent_of_creation_order(
            names in prop::collection::hash_set("[a-z]{1,8}", 1..12),
            folder_mask in any::<u16>(),
        ) {
            let names: Vec<String> = names.into_iter().collect();
            let mut forward = Store::new();
            let mut backward = Store::new();

            let create = |store: &mut Store, index: usize, name: &str| {
                if folder_mask & (1 << index) != 0 {
                    store.create_folder(Store::ROOT, name).map(|_| ())
                } else {
                    store.create_page(Store::ROOT, name, "").map(|_| ())
                }
            };
            for (i, name) in names.iter().enumerate() {
                create(&mut forward, i, name.as_str()).unwrap();
            }
            for (i, name) in names.iter().enumerate().rev() {
                create(&mut backward, i, name.as_str()).unwrap();
            }

            let a: HashSet<_> = forward.list(Store::ROOT).unwrap().into_iter().collect();
            let b: HashSet<_> = backward.list(Store::ROOT).unwrap().into_iter().collect();
            prop_assert_eq!(a.len(), names.len());
            prop_assert_eq!(a, b);
        }
    }
}
