//! Lazy structural rewrites of a [`Tree`].
//!
//! Every builder call records an action; nothing runs until
//! [`TreePatcher::make`] replays the actions in order on a copy of the
//! captured tree, each action performing a fresh traversal of the output of
//! the previous one.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::{flatten, insert_path, Node, ParsedPath, Tree};
use crate::constants::VFS_SEPARATOR;

type Action = Box<dyn Fn(Tree) -> Tree + Send + Sync>;

/// Selects path segments or file names.
#[derive(Clone)]
pub enum Matcher {
    Exact(String),
    Pattern(Regex),
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Matcher {
    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Matcher::Predicate(Arc::new(check))
    }

    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Matcher::Exact(expected) => expected == value,
            Matcher::Pattern(regex) => regex.is_match(value),
            Matcher::Predicate(check) => check(value),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Exact(value) => f.debug_tuple("Exact").field(value).finish(),
            Matcher::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for Matcher {
    fn from(value: &str) -> Self {
        Matcher::Exact(value.to_string())
    }
}

impl From<String> for Matcher {
    fn from(value: String) -> Self {
        Matcher::Exact(value)
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Matcher::Pattern(regex)
    }
}

/// Fluent builder of tree transformations.
pub struct TreePatcher {
    source: Tree,
    actions: Vec<Action>,
}

impl TreePatcher {
    pub fn new(tree: Tree) -> Self {
        Self { source: tree, actions: Vec::new() }
    }

    /// Number of recorded actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Drops the most recently recorded action.
    pub fn undo(mut self) -> Self {
        self.actions.pop();
        self
    }

    /// Replaces the tree by its flattened, depth-1 form.
    pub fn flat(mut self) -> Self {
        self.actions.push(Box::new(|tree| {
            flatten(&tree).into_iter().map(|(path, content)| (path, Node::File(content))).collect()
        }));
        self
    }

    /// Replaces every path segment selected by `matcher` with `replacement`,
    /// in file and directory keys alike.
    pub fn replace_directory(mut self, matcher: impl Into<Matcher>, replacement: &str) -> Self {
        let matcher = matcher.into();
        let replacement = replacement.to_string();
        self.actions.push(Box::new(move |tree| {
            let rewrite = |key: &str| {
                key.split(VFS_SEPARATOR)
                    .map(|segment| {
                        if matcher.is_match(segment) {
                            replacement.as_str()
                        } else {
                            segment
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(&VFS_SEPARATOR.to_string())
            };
            rewrite_keys(tree, &rewrite, &rewrite)
        }));
        self
    }

    /// Moves every file whose base name is selected by `matcher` under
    /// `new_directory`.
    ///
    /// Keys are rewritten in place, so on a nested tree the file lands at
    /// `new_directory/<name>` relative to its current parent; call
    /// [`TreePatcher::flat`] first to move files relative to the root.
    pub fn move_files(self, matcher: impl Into<Matcher>, new_directory: &str) -> Self {
        let matcher = matcher.into();
        let new_directory = new_directory.to_string();
        self.rename_files_with(move |path| {
            if matcher.is_match(&path.base) {
                path.relocate(&new_directory)
            } else {
                path
            }
        })
    }

    /// Renames files whose base name is a key of `dictionary`.
    pub fn rename_files_with_dictionary<I, K, V>(self, dictionary: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let dictionary: indexmap::IndexMap<String, String> =
            dictionary.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.rename_files_with(move |mut path| {
            if let Some(renamed) = dictionary.get(&path.base) {
                path.base = renamed.clone();
            }
            path
        })
    }

    /// Rewrites every file key through `rename`.
    pub fn rename_files_with<F>(mut self, rename: F) -> Self
    where
        F: Fn(ParsedPath) -> ParsedPath + Send + Sync + 'static,
    {
        self.actions.push(Box::new(move |tree| {
            let files = |key: &str| rename(ParsedPath::parse(key)).format();
            rewrite_keys(tree, &|key: &str| key.to_string(), &files)
        }));
        self
    }

    /// Places the whole tree below `directory`.
    pub fn nest(mut self, directory: &str) -> Self {
        let directory = directory.to_string();
        self.actions.push(Box::new(move |tree| {
            let mut nested = Tree::new();
            insert_path(&mut nested, &directory, Node::Directory(tree.clone()));
            if nested.is_empty() {
                tree
            } else {
                nested
            }
        }));
        self
    }

    /// Applies the recorded actions to a copy of the captured tree.
    pub fn make(&self) -> Tree {
        self.actions.iter().fold(self.source.clone(), |tree, action| action(tree))
    }
}

/// Rebuilds `tree` with the same shape and rewritten keys.
///
/// Within one level files are placed first and sub-trees after them, so a
/// sub-tree wins a key collision with a file; otherwise the later key wins.
fn rewrite_keys(
    tree: Tree,
    directories: &dyn Fn(&str) -> String,
    files: &dyn Fn(&str) -> String,
) -> Tree {
    let mut updated = Tree::new();
    let mut children = Vec::new();

    for (key, node) in tree {
        match node {
            Node::File(content) => {
                updated.insert(files(&key), Node::File(content));
            }
            Node::Directory(child) => children.push((directories(&key), child)),
        }
    }

    for (key, child) in children {
        updated.insert(key, Node::Directory(rewrite_keys(child, directories, files)));
    }

    updated
}
