//! In-memory virtual file tree.
//!
//! A [`Tree`] maps path segments to [`Node`]s; a node is either the text
//! content of a file or a nested tree. Templates are rendered into a tree,
//! hooks and patchers rewrite it, and [`materialize`](materialize::materialize)
//! finally writes it under a directory on disk.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::VFS_SEPARATOR;

pub mod materialize;
pub mod path;
pub mod patcher;

pub use materialize::{materialize, MaterializeReport};
pub use path::ParsedPath;
pub use patcher::{Matcher, TreePatcher};

/// A virtual directory: path segment -> node.
pub type Tree = IndexMap<String, Node>;

/// A flattened tree: full relative path -> file content.
pub type FlatTree = IndexMap<String, String>;

/// An entry of a [`Tree`].
///
/// Serialized untagged, so a tree round-trips through JSON as plain
/// nested objects with string leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    File(String),
    Directory(Tree),
}

impl Node {
    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn as_file(&self) -> Option<&str> {
        match self {
            Node::File(content) => Some(content),
            Node::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&Tree> {
        match self {
            Node::Directory(tree) => Some(tree),
            Node::File(_) => None,
        }
    }
}

impl From<&str> for Node {
    fn from(content: &str) -> Self {
        Node::File(content.to_string())
    }
}

impl From<String> for Node {
    fn from(content: String) -> Self {
        Node::File(content)
    }
}

impl From<Tree> for Node {
    fn from(tree: Tree) -> Self {
        Node::Directory(tree)
    }
}

/// Joins a VFS base path and a key.
pub fn join(base: Option<&str>, key: &str) -> String {
    match base {
        Some(base) if !base.is_empty() => format!("{base}{VFS_SEPARATOR}{key}"),
        _ => key.to_string(),
    }
}

/// Returns the parent path of a VFS path, `""` for top-level entries.
pub fn parent(path: &str) -> &str {
    path.rsplit_once(VFS_SEPARATOR).map(|(dir, _)| dir).unwrap_or("")
}

/// Flattens a tree into a mapping of full relative path to content.
///
/// When two branches flatten to the same path the one visited later wins.
pub fn flatten(tree: &Tree) -> FlatTree {
    flatten_at(tree, None)
}

/// Flattens a tree whose entries live under `base`.
pub fn flatten_at(tree: &Tree, base: Option<&str>) -> FlatTree {
    let mut paths = FlatTree::new();

    for (key, node) in tree {
        let current = join(base, key);
        match node {
            Node::File(content) => {
                paths.insert(current, content.clone());
            }
            Node::Directory(child) => {
                paths.extend(flatten_at(child, Some(&current)));
            }
        }
    }

    paths
}

/// Stores `content` at `path`, creating intermediate directories.
///
/// A file standing where a directory is needed is replaced by that
/// directory, and an existing entry at `path` is replaced wholesale.
pub fn insert_path(tree: &mut Tree, path: &str, content: impl Into<Node>) {
    let mut segments: Vec<&str> =
        path.split(VFS_SEPARATOR).filter(|s| !s.is_empty() && *s != ".").collect();
    let Some(file_name) = segments.pop() else {
        return;
    };

    let mut current = tree;
    for segment in segments {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Node::Directory(Tree::new()));
        if entry.is_file() {
            *entry = Node::Directory(Tree::new());
        }
        current = match entry {
            Node::Directory(child) => child,
            Node::File(_) => unreachable!("file entries were replaced above"),
        };
    }
    current.insert(file_name.to_string(), content.into());
}

/// Looks up the node stored at `path`.
pub fn get_path<'a>(tree: &'a Tree, path: &str) -> Option<&'a Node> {
    let mut segments = path.split(VFS_SEPARATOR).filter(|s| !s.is_empty());
    let mut node = tree.get(segments.next()?)?;
    for segment in segments {
        node = node.as_directory()?.get(segment)?;
    }
    Some(node)
}
