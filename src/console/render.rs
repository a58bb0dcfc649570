use std::path::Path;

use colored::Colorize;

use crate::filesystem::TreeNode;

const INDENT: &str = "  ";

/// Draws the loaded part of a tree, one node per line.
///
/// Unexpanded directories are marked `+`, expanded ones `-`.
#[derive(Debug, Clone, Copy)]
pub struct TreeRenderer {
    styled: bool,
}

impl TreeRenderer {
    pub fn new(styled: bool) -> Self {
        TreeRenderer { styled }
    }

    pub fn render(&self, roots: &[TreeNode], selection: Option<&Path>) -> String {
        let mut out = String::new();
        for root in roots {
            self.render_node(root, 0, selection, &mut out);
        }
        out
    }

    fn render_node(
        &self,
        node: &TreeNode,
        depth: usize,
        selection: Option<&Path>,
        out: &mut String,
    ) {
        let marker = if node.is_expandable() {
            "+ "
        } else if node.is_dir() {
            "- "
        } else {
            "  "
        };
        let selected = selection == Some(node.path());

        out.push_str(&INDENT.repeat(depth));
        out.push_str(marker);
        out.push_str(&self.label(node, selected));
        out.push('\n');

        for child in node.children() {
            self.render_node(child, depth + 1, selection, out);
        }
    }

    fn label(&self, node: &TreeNode, selected: bool) -> String {
        let name = node.display_name();
        if !self.styled {
            return if selected {
                format!("[{name}]")
            } else {
                name.to_string()
            };
        }

        let label = if node.is_dir() {
            name.blue().bold()
        } else {
            name.normal()
        };
        if selected {
            label.reversed().to_string()
        } else {
            label.to_string()
        }
    }

    pub fn error(&self, message: &str) -> String {
        self.prefixed("error", message, |prefix| prefix.red().bold().to_string())
    }

    pub fn warning(&self, message: &str) -> String {
        self.prefixed("warning", message, |prefix| prefix.yellow().bold().to_string())
    }

    fn prefixed(&self, prefix: &str, message: &str, paint: impl FnOnce(&str) -> String) -> String {
        if self.styled {
            format!("{}: {}", paint(prefix), message)
        } else {
            format!("{prefix}: {message}")
        }
    }
}
