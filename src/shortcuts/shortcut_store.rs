use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use compio::fs;
use derive_more::Display;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml, YamlEmitter};
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::ext::PathExt;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{name}: {}", path.display())]
pub struct Shortcut {
    name: String,
    path: PathBuf,
}

impl Shortcut {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Shortcut {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Not validated until someone navigates to it.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Ordered list of shortcuts, persisted as a `name: path` mapping.
///
/// Plain JSON objects are valid YAML, so files written as `{"Home": "/home/alice"}`
/// load as well.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortcutStore {
    shortcuts: Vec<Shortcut>,
}

impl ShortcutStore {
    /// Loads the store, falling back to [`ShortcutStore::defaults`] when the file does not exist.
    pub async fn read(path: &Path) -> Result<Self, ShortcutStoreError> {
        debug!("Reading shortcuts from {}", path.best_effort_path_display());
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No shortcut file found, using default shortcuts");
                return Ok(Self::defaults());
            }
            Err(e) => {
                return Err(e).context(ReadSnafu {
                    file_path: path.best_effort_path_display(),
                });
            }
        };

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        let store: Self = contents.as_str().try_into()?;
        debug!("Loaded {} shortcuts", store.len());
        Ok(store)
    }

    pub async fn write(&self, path: &Path) -> Result<(), ShortcutStoreError> {
        let contents = self.to_yaml_string()?;

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.context(WriteSnafu {
                file_path: path.best_effort_path_display(),
            })?;
        }

        let res = fs::write(path, contents.into_bytes()).await;
        res.0.context(WriteSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        info!(
            "Saved {} shortcuts to {}",
            self.len(),
            path.best_effort_path_display()
        );
        Ok(())
    }

    /// Desktop, Documents, Downloads and the home directory of the current user.
    pub fn defaults() -> Self {
        let Some(home) = dirs::home_dir() else {
            info!("Home directory is unknown, starting without shortcuts");
            return Self::default();
        };

        let shortcuts = vec![
            Shortcut::new(
                "Desktop",
                dirs::desktop_dir().unwrap_or_else(|| home.join("Desktop")),
            ),
            Shortcut::new(
                "Documents",
                dirs::document_dir().unwrap_or_else(|| home.join("Documents")),
            ),
            Shortcut::new(
                "Downloads",
                dirs::download_dir().unwrap_or_else(|| home.join("Downloads")),
            ),
            Shortcut::new("Home", home),
        ];
        ShortcutStore { shortcuts }
    }

    pub fn add(&mut self, shortcut: Shortcut) {
        debug!("Adding shortcut {}", shortcut);
        self.shortcuts.push(shortcut);
    }

    /// Removes every shortcut called `name` and returns how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.shortcuts.len();
        self.shortcuts.retain(|shortcut| shortcut.name != name);
        before - self.shortcuts.len()
    }

    /// First shortcut with the given name.
    pub fn get(&self, name: &str) -> Option<&Shortcut> {
        self.shortcuts.iter().find(|shortcut| shortcut.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shortcut> {
        self.shortcuts.iter()
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    /// A repeated name keeps its first position and takes the last path.
    /// Paths that are not valid UTF-8 cannot be stored and are skipped.
    fn to_yaml_string(&self) -> Result<String, ShortcutStoreError> {
        let mut mapping = LinkedHashMap::new();
        for shortcut in &self.shortcuts {
            let Some(path) = shortcut.path.to_str() else {
                warn!(
                    "Not saving shortcut '{}': path {} is not valid UTF-8",
                    shortcut.name,
                    shortcut.path.display()
                );
                continue;
            };
            mapping.replace(
                Yaml::Value(Scalar::String(Cow::Borrowed(shortcut.name.as_str()))),
                Yaml::Value(Scalar::String(Cow::Borrowed(path))),
            );
        }

        let mut out = String::new();
        let mut emitter = YamlEmitter::new(&mut out);
        emitter
            .dump(&Yaml::Mapping(mapping))
            .context(EmitSnafu)?;
        out.push('\n');
        Ok(out)
    }

    fn parse_shortcuts_from_yaml(top_level: &LinkedHashMap<Yaml, Yaml>) -> Vec<Shortcut> {
        top_level
            .iter()
            .filter_map(|(key, value)| match (key.as_str(), value.as_str()) {
                (Some(name), Some(path)) => Some(Shortcut::new(name, path)),
                _ => {
                    debug!("Skipping invalid shortcut entry: {:?}", key);
                    None
                }
            })
            .collect()
    }
}

impl TryFrom<&str> for ShortcutStore {
    type Error = ShortcutStoreError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            debug!("Shortcut file is empty");
            return Ok(Self::default());
        };

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;
        Ok(ShortcutStore {
            shortcuts: Self::parse_shortcuts_from_yaml(top_level),
        })
    }
}

#[derive(Debug, Snafu)]
pub enum ShortcutStoreError {
    #[snafu(display("Failed to read the shortcut file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Shortcut file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the shortcut file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the shortcut file should be a map"))]
    TopLevelNotMapError,
    #[snafu(display("Failed to serialize shortcuts"))]
    EmitError { source: saphyr::EmitError },
    #[snafu(display("Failed to write the shortcut file: {}", file_path))]
    WriteError {
        file_path: String,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::filesystem;

    fn names(store: &ShortcutStore) -> Vec<&str> {
        store.iter().map(Shortcut::name).collect()
    }

    #[test]
    fn parses_json_object() {
        let store: ShortcutStore = r#"{"Home": "/home/alice"}"#.try_into().unwrap();

        assert_eq!(store.len(), 1);
        let home = store.get("Home").unwrap();
        assert_eq!(home.path(), Path::new("/home/alice"));
    }

    #[test]
    fn parses_yaml_mapping_in_order() {
        let contents = "Projects: /srv/projects\nHome: /home/alice\nArchive: /mnt/archive\n";
        let store: ShortcutStore = contents.try_into().unwrap();

        assert_eq!(names(&store), vec!["Projects", "Home", "Archive"]);
    }

    #[rstest]
    #[case("")]
    #[case("{}")]
    fn empty_file_gives_empty_store(#[case] contents: &str) {
        let store: ShortcutStore = contents.try_into().unwrap();
        assert!(store.is_empty());
    }

    #[rstest]
    #[case("- /home/alice\n- /tmp")]
    #[case("just a string")]
    fn top_level_must_be_map(#[case] contents: &str) {
        let result: Result<ShortcutStore, _> = contents.try_into();
        assert!(matches!(
            result,
            Err(ShortcutStoreError::TopLevelNotMapError)
        ));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let result: Result<ShortcutStore, _> = "{\"Home\": [unclosed".try_into();
        assert!(matches!(result, Err(ShortcutStoreError::ParseError { .. })));
    }

    #[test]
    fn non_string_entries_are_skipped() {
        let contents = r#"
Home: /home/alice
123: /numeric/key
Nested:
  path: /not/a/string
"#;
        let store: ShortcutStore = contents.try_into().unwrap();

        assert_eq!(names(&store), vec!["Home"]);
    }

    #[test]
    fn add_get_and_remove() {
        let mut store = ShortcutStore::default();
        store.add(Shortcut::new("Logs", "/var/log"));
        store.add(Shortcut::new("Logs", "/tmp/log"));
        store.add(Shortcut::new("Etc", "/etc"));

        assert_eq!(store.get("Logs").unwrap().path(), Path::new("/var/log"));
        assert_eq!(store.remove("Logs"), 2);
        assert_eq!(store.remove("Logs"), 0);
        assert_eq!(names(&store), vec!["Etc"]);
    }

    #[test]
    fn shortcut_display() {
        let shortcut = Shortcut::new("Home", "/home/alice");
        assert_eq!(shortcut.to_string(), "Home: /home/alice");
    }

    #[test]
    fn defaults_point_into_home() {
        let store = ShortcutStore::defaults();
        let Some(home) = dirs::home_dir() else {
            assert!(store.is_empty());
            return;
        };

        assert_eq!(names(&store), vec!["Desktop", "Documents", "Downloads", "Home"]);
        assert_eq!(store.get("Home").unwrap().path(), home);
    }

    #[compio::test]
    async fn missing_file_gives_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let store = ShortcutStore::read(&temp_dir.path().join("shortcuts.yaml"))
            .await
            .unwrap();

        assert_eq!(store, ShortcutStore::defaults());
    }

    #[compio::test]
    async fn written_store_reads_back() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("state").join("shortcuts.yaml");
        let mut store = ShortcutStore::default();
        store.add(Shortcut::new("Home", "/home/alice"));
        store.add(Shortcut::new("With spaces: and colon", "/srv/my files"));
        store.add(Shortcut::new("Home", "/home/bob"));

        store.write(&path).await.unwrap();
        let reread = ShortcutStore::read(&path).await.unwrap();

        assert_eq!(names(&reread), vec!["Home", "With spaces: and colon"]);
        assert_eq!(reread.get("Home").unwrap().path(), Path::new("/home/bob"));
        assert_eq!(
            reread.get("With spaces: and colon").unwrap().path(),
            Path::new("/srv/my files")
        );
    }

    #[compio::test]
    async fn repeated_name_keeps_first_position() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("shortcuts.yaml");
        let mut store = ShortcutStore::default();
        store.add(Shortcut::new("Home", "/home/alice"));
        store.add(Shortcut::new("Srv", "/srv"));
        store.add(Shortcut::new("Tmp", "/tmp"));
        store.add(Shortcut::new("Home", "/home/bob"));

        store.write(&path).await.unwrap();
        let reread = ShortcutStore::read(&path).await.unwrap();

        assert_eq!(names(&reread), vec!["Home", "Srv", "Tmp"]);
        assert_eq!(reread.get("Home").unwrap().path(), Path::new("/home/bob"));
    }

    #[cfg(unix)]
    #[compio::test]
    async fn non_utf8_path_is_not_saved() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("shortcuts.yaml");
        let mut store = ShortcutStore::default();
        store.add(Shortcut::new("Home", "/home/alice"));
        store.add(Shortcut::new(
            "Broken",
            PathBuf::from(OsStr::from_bytes(b"/tmp/caf\xe9")),
        ));
        store.add(Shortcut::new("Srv", "/srv"));

        store.write(&path).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let reread = ShortcutStore::read(&path).await.unwrap();

        assert!(!written.contains("Broken"));
        assert!(!written.contains('\u{fffd}'));
        assert_eq!(names(&reread), vec!["Home", "Srv"]);
    }

    #[compio::test]
    async fn unreadable_file_is_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let result = ShortcutStore::read(temp_dir.path()).await;

        assert!(matches!(result, Err(ShortcutStoreError::ReadError { .. })));
    }

    #[cfg(unix)]
    #[compio::test]
    async fn shortcut_from_json_store_resolves_to_unexpanded_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let home = temp_dir.path().join("alice");
        std::fs::create_dir(&home).unwrap();
        let path = temp_dir.path().join("shortcuts.json");
        std::fs::write(
            &path,
            format!(r#"{{"Home": "{}"}}"#, home.display()),
        )
        .unwrap();

        let store = ShortcutStore::read(&path).await.unwrap();
        let root = filesystem::resolve_shortcut(store.get("Home").unwrap().path()).unwrap();

        assert_eq!(root.path(), home);
        assert!(!root.children_loaded());
    }
}
