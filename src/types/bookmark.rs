use serde::{Deserialize, Serialize};

/// One bookmark folder in the parsed tree.
///
/// The document root is a `FolderNode` with an empty name; its `children`
/// are the top-level folders of the export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    pub name: String,
    /// 0-based position among sibling folders.
    pub order: usize,
    pub children: Vec<FolderNode>,
    pub links: Vec<LinkNode>,
}

impl FolderNode {
    pub fn new(name: impl Into<String>, order: usize) -> Self {
        Self {
            name: name.into(),
            order,
            children: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Total number of links in this folder and every descendant.
    pub fn link_count(&self) -> usize {
        self.links.len() + self.children.iter().map(FolderNode::link_count).sum::<usize>()
    }
}

/// One bookmark entry. `url` is empty when the source URL was rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkNode {
    pub title: String,
    pub url: String,
    pub description: String,
    /// 0-based position among sibling links.
    pub order: usize,
}

/// Result of parsing a bookmark document: the tree plus non-fatal problems.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub tree: FolderNode,
    pub errors: Vec<String>,
}
