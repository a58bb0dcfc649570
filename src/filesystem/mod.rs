//! Lazily materialized view of the filesystem.
//!
//! A [`TreeNode`] mirrors one filesystem entry. Directories are listed one
//! level at a time, and only when [`TreeNode::expand`] is called, so the cost
//! of any operation is bounded by the size of a single directory.

mod roots;
mod tree;

pub use roots::list_platform_roots;
pub use tree::{NodeKind, TreeError, TreeNode, resolve_shortcut, set_root};
