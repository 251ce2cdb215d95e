//! Data containers shared by personas and the broadcaster.

pub mod column;
pub mod tree;

pub use column::Column;
pub use tree::{
    flatten_to_paths, flatten_to_qnames, leaf_name, path_from_qname, qname_from_path,
    unflatten_from_qnames, Node, Tree, QNAME_SEPARATOR,
};

/// Input data of a persona: one column per leaf.
pub type DataTree = Tree<Column>;

/// Names of the quantities a persona is meant to compute.
pub type TargetTree = Tree<()>;
