use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use derive_more::Display;
use snafu::{Snafu, ensure};
use tracing::{debug, warn};

use crate::ext::PathExt;

/// Represents the type of a filesystem node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    #[display("directory")]
    Directory,
    #[display("file")]
    File,
}

impl NodeKind {
    /// Symlinks are followed. When the target cannot be inspected the entry's own
    /// type is used instead, and `None` means the entry vanished entirely.
    fn of_entry(entry: &fs::DirEntry) -> Option<Self> {
        let path = entry.path();
        match fs::metadata(&path) {
            Ok(metadata) => Some(Self::from_is_dir(metadata.is_dir())),
            Err(e) => {
                debug!(
                    "Could not read metadata of {}: {}. Falling back to entry type",
                    path.display(),
                    e
                );
                entry
                    .file_type()
                    .ok()
                    .map(|file_type| Self::from_is_dir(file_type.is_dir()))
            }
        }
    }

    fn from_is_dir(is_dir: bool) -> Self {
        if is_dir {
            NodeKind::Directory
        } else {
            NodeKind::File
        }
    }
}

/// One entry of the browsed tree.
///
/// Directory nodes start unloaded and only touch the filesystem when
/// [`TreeNode::expand`] is called on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    path: PathBuf,
    display_name: String,
    kind: NodeKind,
    children_loaded: bool,
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Creates an unloaded top-level directory node, labelled with its full path.
    pub fn root(path: PathBuf) -> Self {
        TreeNode {
            display_name: path.display().to_string(),
            path,
            kind: NodeKind::Directory,
            children_loaded: false,
            children: Vec::new(),
        }
    }

    fn child(path: PathBuf, kind: NodeKind) -> Self {
        TreeNode {
            display_name: path.leaf_name(),
            path,
            kind,
            children_loaded: false,
            children: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn children_loaded(&self) -> bool {
        self.children_loaded
    }

    /// Loaded children, empty until the node has been expanded.
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Whether the node should be offered to the user as expandable.
    pub fn is_expandable(&self) -> bool {
        self.is_dir() && !self.children_loaded
    }

    /// Lists the immediate entries of this directory and replaces the children with them.
    ///
    /// Every call lists again, nothing from a previous listing is kept. On failure the
    /// node is left exactly as it was.
    pub fn expand(&mut self) -> Result<&[TreeNode], TreeError> {
        ensure!(
            self.is_dir(),
            NotADirectorySnafu {
                path: self.path.clone()
            }
        );

        let children = list_directory(&self.path)?;
        self.children = children;
        self.children_loaded = true;
        Ok(&self.children)
    }

    /// Drops the loaded children so the next expansion lists the directory again.
    pub fn collapse(&mut self) {
        self.children.clear();
        self.children_loaded = false;
    }

    /// Looks up an already loaded node by path. Never touches the filesystem.
    pub fn find(&self, path: &Path) -> Option<&TreeNode> {
        if self.path == path {
            return Some(self);
        }
        if !path.starts_with(&self.path) {
            return None;
        }
        self.children.iter().find_map(|child| child.find(path))
    }

    pub fn find_mut(&mut self, path: &Path) -> Option<&mut TreeNode> {
        if self.path == path {
            return Some(self);
        }
        if !path.starts_with(&self.path) {
            return None;
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(path))
    }
}

/// Validates `path` and returns a fresh, unexpanded root node for it.
pub fn set_root(path: impl AsRef<Path>) -> Result<TreeNode, TreeError> {
    let path = path.as_ref();
    ensure!(path.is_dir(), InvalidPathSnafu { path });

    let absolute = path.normalized_absolute();
    debug!("New root: {}", absolute.display());
    Ok(TreeNode::root(absolute))
}

/// Sidebar navigation. Validates exactly like [`set_root`].
pub fn resolve_shortcut(path: impl AsRef<Path>) -> Result<TreeNode, TreeError> {
    set_root(path)
}

fn list_directory(path: &Path) -> Result<Vec<TreeNode>, TreeError> {
    let entries = fs::read_dir(path).map_err(|source| classify_listing_error(path, source))?;

    let mut children = Vec::new();
    let mut skipped = 0usize;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read an entry of {}: {}", path.display(), e);
                skipped += 1;
                continue;
            }
        };
        match NodeKind::of_entry(&entry) {
            Some(kind) => children.push(TreeNode::child(entry.path(), kind)),
            None => {
                debug!("Entry {} vanished during listing", entry.path().display());
                skipped += 1;
            }
        }
    }

    debug!(
        "Listed {} entries in {} ({} skipped)",
        children.len(),
        path.display(),
        skipped
    );
    Ok(children)
}

fn classify_listing_error(path: &Path, source: io::Error) -> TreeError {
    let path = path.to_path_buf();
    match source.kind() {
        io::ErrorKind::PermissionDenied => TreeError::PermissionError { path, source },
        _ => TreeError::IoError { path, source },
    }
}

#[derive(Debug, Snafu)]
pub enum TreeError {
    #[snafu(display("Invalid path: {}", path.best_effort_path_display()))]
    InvalidPathError { path: PathBuf },
    #[snafu(display("Cannot access {}", path.best_effort_path_display()))]
    PermissionError { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to list {}: {}", path.best_effort_path_display(), source))]
    IoError { path: PathBuf, source: io::Error },
    #[snafu(display("{} is not a directory", path.best_effort_path_display()))]
    NotADirectoryError { path: PathBuf },
}

impl TreeError {
    /// Permission problems are reported as warnings, everything else as errors.
    pub fn is_warning(&self) -> bool {
        matches!(self, TreeError::PermissionError { .. })
    }
}
