//! Page and folder nodes of the notebook tree

use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime, SubsecRound};

use super::store::display_path;

/// Format used wherever a creation timestamp is shown or exported
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time, truncated to whole seconds
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Kind of a folder child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Page,
    Folder,
}

/// A leaf document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub content: String,
    created_at: NaiveDateTime,
    /// Names of the folders leading from the root to this page's parent
    parent_path: Vec<String>,
}

impl Page {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        parent_path: Vec<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            created_at,
            parent_path,
        }
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Creation time as `YYYY-MM-DD HH:MM:SS`
    pub fn created_at_display(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn parent_path(&self) -> &[String] {
        &self.parent_path
    }

    /// Full location of the containing folder, `None` for pages at the root
    pub fn folder_display(&self) -> String {
        if self.parent_path.is_empty() {
            "None".to_string()
        } else {
            display_path(self.parent_path())
        }
    }

    /// Name of the containing folder, empty for pages at the root
    pub fn folder_name(&self) -> &str {
        self.parent_path.last().map(String::as_str).unwrap_or("")
    }
}

/// An interior node holding named children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Folder {
    pub name: String,
    children: BTreeMap<String, Node>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: BTreeMap::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether any direct child is a page; subfolders do not count
    pub fn has_pages(&self) -> bool {
        self.children.values().any(|child| child.kind() == NodeKind::Page)
    }

    /// Children sorted folders first, then case-insensitively by name
    pub fn sorted_children(&self) -> Vec<&Node> {
        let mut children: Vec<&Node> = self.children.values().collect();
        children.sort_by(|a, b| match (a.kind(), b.kind()) {
            (NodeKind::Folder, NodeKind::Page) => std::cmp::Ordering::Less,
            (NodeKind::Page, NodeKind::Folder) => std::cmp::Ordering::Greater,
            _ => a
                .name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
                .then_with(|| a.name().cmp(b.name())),
        });
        children
    }

    /// Direct pages, in listing order
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.sorted_children().into_iter().filter_map(Node::as_page)
    }

    /// Direct subfolders, in listing order
    pub fn subfolders(&self) -> impl Iterator<Item = &Folder> {
        self.sorted_children().into_iter().filter_map(Node::as_folder)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    /// Insert a child under its own name. Callers check for collisions first.
    pub(crate) fn insert(&mut self, node: Node) -> &mut Node {
        let name = node.name().to_string();
        self.children.entry(name).or_insert(node)
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Node> {
        self.children.remove(name)
    }

    /// Count of pages and folders in this subtree, excluding `self`
    pub fn totals(&self) -> (usize, usize) {
        self.children
            .values()
            .fold((0, 0), |(pages, folders), child| match child {
                Node::Page(_) => (pages + 1, folders),
                Node::Folder(folder) => {
                    let (p, f) = folder.totals();
                    (pages + p, folders + f + 1)
                }
            })
    }
}

/// A node in the notebook tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Page(Page),
    Folder(Folder),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Page(page) => &page.title,
            Node::Folder(folder) => &folder.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Page(_) => NodeKind::Page,
            Node::Folder(_) => NodeKind::Folder,
        }
    }

    pub fn as_page(&self) -> Option<&Page> {
        match self {
            Node::Page(page) => Some(page),
            Node::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::Page(_) => None,
        }
    }

    pub(crate) fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::Page(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_folder_name_of_root_page_is_empty() {
        let page = Page::new("Inbox", "", Vec::new(), timestamp());
        assert_eq!(page.folder_name(), "");
        assert_eq!(page.folder_display(), "None");
    }

    #[test]
    fn test_folder_name_is_last_segment() {
        let path = vec!["Work".to_string(), "Q3".to_string()];
        let page = Page::new("Plan", "", path, timestamp());
        assert_eq!(page.folder_name(), "Q3");
        assert_eq!(page.folder_display(), "/Work/Q3");
        assert_eq!(page.created_at_display(), "2024-03-09 14:05:07");
    }

    #[test]
    fn test_sorted_children_folders_first() {
        let mut folder = Folder::new("root");
        folder.insert(Node::Page(Page::new("alpha", "", Vec::new(), timestamp())));
        folder.insert(Node::Folder(Folder::new("Zeta")));
        folder.insert(Node::Folder(Folder::new("beta")));

        let names: Vec<&str> = folder.sorted_children().iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["beta", "Zeta", "alpha"]);
    }

    #[test]
    fn test_folder_with_only_subfolders_has_no_pages() {
        let mut folder = Folder::new("Projects");
        folder.insert(Node::Folder(Folder::new("Rust")));
        assert!(!folder.is_empty());
        assert!(!folder.has_pages());

        folder.insert(Node::Page(Page::new("Plan", "", Vec::new(), timestamp())));
        assert!(folder.has_pages());
    }

    #[test]
    fn test_totals_counts_nested() {
        let mut inner = Folder::new("inner");
        inner.insert(Node::Page(Page::new("a", "", Vec::new(), timestamp())));
        let mut root = Folder::new("root");
        root.insert(Node::Folder(inner));
        root.insert(Node::Page(Page::new("b", "", Vec::new(), timestamp())));

        assert_eq!(root.totals(), (2, 1));
    }

    #[test]
    fn test_now_has_no_subseconds() {
        use chrono::Timelike;
        assert_eq!(now().nanosecond(), 0);
    }
}
