use std::path::{Component, Path, PathBuf};

/// Helpers for paths shown to the user and used as node identities.
pub trait PathExt {
    /// Canonical form when the path exists, otherwise an absolute and lexically
    /// normalized form.
    fn best_effort_path_display(&self) -> String;

    /// Last component of the path, or the whole path for roots like `/` or `C:\`.
    fn leaf_name(&self) -> String;

    /// Absolute form with `.` and `..` resolved lexically, symlinks are left alone.
    fn normalized_absolute(&self) -> PathBuf;
}

impl PathExt for Path {
    fn best_effort_path_display(&self) -> String {
        if let Ok(canonical_path) = self.canonicalize() {
            return canonical_path.display().to_string();
        }

        self.normalized_absolute().display().to_string()
    }

    fn leaf_name(&self) -> String {
        match self.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.display().to_string(),
        }
    }

    fn normalized_absolute(&self) -> PathBuf {
        let absolute_path = std::path::absolute(self).unwrap_or_else(|_| self.to_path_buf());
        normalize_path(&absolute_path)
    }
}

impl PathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        self.as_path().best_effort_path_display()
    }

    fn leaf_name(&self) -> String {
        self.as_path().leaf_name()
    }

    fn normalized_absolute(&self) -> PathBuf {
        self.as_path().normalized_absolute()
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

#[cfg(test)]
mod tests {
    use rstest::*;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case("/a/b/../c", "/a/c")]
    #[case("/a/./b", "/a/b")]
    #[case("/../a", "/a")]
    #[case("/a/b/../../..", "/")]
    fn normalizes_dot_components(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_path(Path::new(input)), PathBuf::from(expected));
    }

    #[cfg(unix)]
    #[rstest]
    #[case("/", "/")]
    #[case("/home/alice", "alice")]
    #[case("/home/alice/notes.txt", "notes.txt")]
    fn leaf_name_of_paths(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Path::new(input).leaf_name(), expected);
    }

    #[test]
    fn existing_path_displays_canonical_form() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dotted = temp_dir.path().join(".");

        assert_eq!(
            dotted.best_effort_path_display(),
            temp_dir.path().canonicalize().unwrap().display().to_string()
        );
    }

    #[cfg(unix)]
    #[test]
    fn normalized_absolute_drops_parent_components() {
        assert_eq!(
            Path::new("/tmp/a/../b/.").normalized_absolute(),
            PathBuf::from("/tmp/b")
        );
    }

    #[cfg(unix)]
    #[test]
    fn missing_path_displays_normalized_form() {
        let display = Path::new("/no/such/../dir").best_effort_path_display();
        assert_eq!(display, "/no/dir");
    }
}
