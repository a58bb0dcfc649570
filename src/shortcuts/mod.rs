//! Named bookmarks shown next to the tree.

mod shortcut_store;

pub use shortcut_store::{Shortcut, ShortcutStore, ShortcutStoreError};
