use std::path::PathBuf;

use tracing::debug;

/// Returns the top-level entry points of the filesystem.
///
/// Drive letters that exist on Windows, in letter order. A single `/` everywhere else.
pub fn list_platform_roots() -> Vec<PathBuf> {
    #[cfg(target_family = "windows")]
    let roots: Vec<PathBuf> = (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|drive| drive.exists())
        .collect();
    #[cfg(not(target_family = "windows"))]
    let roots = vec![PathBuf::from("/")];

    debug!("Platform roots: {:?}", roots);
    roots
}
