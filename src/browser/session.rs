use std::path::{Path, PathBuf};

use snafu::{OptionExt, Snafu};
use tracing::{debug, info, warn};

use crate::ext::PathExt;
use crate::filesystem::{self, NodeKind, TreeError, TreeNode};
use crate::shortcuts::Shortcut;

/// The single live tree a user is looking at, together with its selection and path bar.
///
/// Either every platform root is shown, or exactly one navigated root. Navigating
/// always discards the previous tree.
#[derive(Debug)]
pub struct BrowserSession {
    roots: Vec<TreeNode>,
    selection: Option<PathBuf>,
    path_bar: String,
}

/// Result of navigating to a new root.
#[derive(Debug)]
pub struct Navigation {
    pub root: PathBuf,
    /// Set when the first listing of the new root failed. The root is still
    /// installed, just unexpanded.
    pub listing_error: Option<TreeError>,
}

/// What a double click on a node turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Expanded { children: usize },
    OpenFile(PathBuf),
}

impl BrowserSession {
    /// Starts with every platform root as an unexpanded top-level node.
    pub fn new() -> Self {
        let roots = filesystem::list_platform_roots()
            .into_iter()
            .map(TreeNode::root)
            .collect();

        BrowserSession {
            roots,
            selection: None,
            path_bar: String::new(),
        }
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn selection(&self) -> Option<&Path> {
        self.selection.as_deref()
    }

    pub fn path_bar(&self) -> &str {
        &self.path_bar
    }

    pub fn node(&self, path: &Path) -> Option<&TreeNode> {
        self.roots.iter().find_map(|root| root.find(path))
    }

    fn node_mut(&mut self, path: &Path) -> Result<&mut TreeNode, SessionError> {
        self.roots
            .iter_mut()
            .find_map(|root| root.find_mut(path))
            .context(NodeNotFoundSnafu { path })
    }

    /// Goes back to the platform roots.
    pub fn reset(&mut self) {
        debug!("Resetting session to platform roots");
        *self = Self::new();
    }

    /// Path bar navigation. On an invalid path the current tree is left untouched.
    pub fn navigate(&mut self, path: impl AsRef<Path>) -> Result<Navigation, SessionError> {
        let root = filesystem::set_root(path)?;
        Ok(self.install_root(root))
    }

    /// Sidebar navigation, with the same validation as [`BrowserSession::navigate`].
    pub fn open_shortcut(&mut self, shortcut: &Shortcut) -> Result<Navigation, SessionError> {
        debug!("Opening shortcut '{}'", shortcut.name());
        let root = filesystem::resolve_shortcut(shortcut.path())?;
        Ok(self.install_root(root))
    }

    fn install_root(&mut self, mut root: TreeNode) -> Navigation {
        let listing_error = root.expand().err();
        if let Some(error) = &listing_error {
            warn!("New root could not be listed: {}", error);
        }

        let root_path = root.path().to_path_buf();
        info!("Navigated to {}", root_path.display());

        self.path_bar = root_path.display().to_string();
        self.selection = Some(root_path.clone());
        self.roots = vec![root];

        Navigation {
            root: root_path,
            listing_error,
        }
    }

    /// Lists a loaded directory node and points the path bar at it.
    ///
    /// Returns the number of children now loaded.
    pub fn expand(&mut self, path: &Path) -> Result<usize, SessionError> {
        let node = self.node_mut(path)?;
        let children = node.expand()?.len();
        self.path_bar = node.path().display().to_string();
        self.prune_selection();
        Ok(children)
    }

    pub fn collapse(&mut self, path: &Path) -> Result<(), SessionError> {
        self.node_mut(path)?.collapse();
        self.prune_selection();
        Ok(())
    }

    pub fn select(&mut self, path: &Path) -> Result<(), SessionError> {
        let node = self.node(path).context(NodeNotFoundSnafu { path })?;
        self.selection = Some(node.path().to_path_buf());
        Ok(())
    }

    /// Double click: directories are expanded, files are handed back to be opened.
    pub fn activate(&mut self, path: &Path) -> Result<Activation, SessionError> {
        let node = self.node(path).context(NodeNotFoundSnafu { path })?;
        let node_path = node.path().to_path_buf();
        let kind = node.kind();
        self.selection = Some(node_path.clone());

        match kind {
            NodeKind::Directory => {
                let children = self.expand(&node_path)?;
                Ok(Activation::Expanded { children })
            }
            NodeKind::File => Ok(Activation::OpenFile(node_path)),
        }
    }

    /// Children are replaced wholesale on expansion, so a selected path may no longer
    /// exist in the tree.
    fn prune_selection(&mut self) {
        let stale = self
            .selection
            .as_deref()
            .is_some_and(|selected| self.node(selected).is_none());
        if stale {
            debug!("Selection no longer present in the tree, clearing it");
            self.selection = None;
        }
    }
}

impl Default for BrowserSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(transparent)]
    TreeError { source: TreeError },
    #[snafu(display("{} is not shown in the tree", path.best_effort_path_display()))]
    NodeNotFoundError { path: PathBuf },
}

impl SessionError {
    pub fn is_warning(&self) -> bool {
        match self {
            SessionError::TreeError { source } => source.is_warning(),
            SessionError::NodeNotFoundError { .. } => false,
        }
    }
}
