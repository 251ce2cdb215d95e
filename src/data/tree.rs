//! Nested, string-keyed trees and their flat "qualified name" form.
//!
//! A qualified name (qname) joins the path of a leaf with `__`, so the leaf at
//! `einnahmen -> bruttolohn_m` has the qname `einnahmen__bruttolohn_m`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separator between path segments in a qualified name.
pub const QNAME_SEPARATOR: &str = "__";

/// A nested tree keyed by path segment.
pub type Tree<T> = BTreeMap<String, Node<T>>;

/// One entry of a [`Tree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node<T> {
    Branch(BTreeMap<String, Node<T>>),
    Leaf(T),
}

pub fn qname_from_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(QNAME_SEPARATOR)
}

pub fn path_from_qname(qname: &str) -> Vec<String> {
    qname.split(QNAME_SEPARATOR).map(str::to_string).collect()
}

/// Last path segment of a qualified name.
pub fn leaf_name(qname: &str) -> &str {
    qname.rsplit(QNAME_SEPARATOR).next().unwrap_or(qname)
}

/// Flatten a tree into `qname -> leaf`. Empty branches vanish.
pub fn flatten_to_qnames<T: Clone>(tree: &Tree<T>) -> BTreeMap<String, T> {
    flatten_to_paths(tree)
        .into_iter()
        .map(|(path, leaf)| (qname_from_path(&path), leaf))
        .collect()
}

/// Flatten a tree into `path -> leaf`.
pub fn flatten_to_paths<T: Clone>(tree: &Tree<T>) -> BTreeMap<Vec<String>, T> {
    let mut out = BTreeMap::new();
    let mut prefix = Vec::new();
    collect_leaves(tree, &mut prefix, &mut out);
    out
}

fn collect_leaves<T: Clone>(
    tree: &Tree<T>,
    prefix: &mut Vec<String>,
    out: &mut BTreeMap<Vec<String>, T>,
) {
    for (key, node) in tree {
        prefix.push(key.clone());
        match node {
            Node::Leaf(leaf) => {
                out.insert(prefix.clone(), leaf.clone());
            }
            Node::Branch(children) => collect_leaves(children, prefix, out),
        }
        prefix.pop();
    }
}

/// Build a nested tree from `qname -> leaf` pairs.
///
/// Fails if a qname names a leaf at a path that is also a branch, e.g. both
/// `a` and `a__b`.
pub fn unflatten_from_qnames<T>(leaves: impl IntoIterator<Item = (String, T)>) -> Result<Tree<T>> {
    let mut tree = Tree::new();
    for (qname, leaf) in leaves {
        insert_leaf(&mut tree, &qname, leaf)?;
    }
    Ok(tree)
}

/// Insert one leaf at the path given by `qname`.
pub fn insert_leaf<T>(tree: &mut Tree<T>, qname: &str, leaf: T) -> Result<()> {
    let conflict = || Error::TreeConflict {
        qname: qname.to_string(),
    };

    let path = path_from_qname(qname);
    let Some((last, parents)) = path.split_last() else {
        return Err(conflict());
    };

    let mut current = tree;
    for segment in parents {
        let node = current
            .entry(segment.clone())
            .or_insert_with(|| Node::Branch(BTreeMap::new()));
        current = match node {
            Node::Branch(children) => children,
            Node::Leaf(_) => return Err(conflict()),
        };
    }

    if current.contains_key(last) {
        return Err(conflict());
    }
    current.insert(last.clone(), Node::Leaf(leaf));
    Ok(())
}
