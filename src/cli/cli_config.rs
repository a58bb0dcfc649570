use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Browse the filesystem as a lazily expanding tree")]
pub struct Cli {
    /// Directory to show instead of the platform roots
    pub start_path: Option<PathBuf>,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// File the shortcuts are loaded from and saved to
    #[clap(long, short, default_value = "shortcuts.yaml")]
    pub shortcuts: PathBuf,

    /// Never colour the output
    #[clap(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["arbor"]).unwrap();

        assert!(cli.start_path.is_none());
        assert_eq!(cli.shortcuts, PathBuf::from("shortcuts.yaml"));
        assert!(!cli.no_color);
    }

    #[test]
    fn all_arguments() {
        let cli = Cli::try_parse_from([
            "arbor",
            "/home/alice",
            "--log-level",
            "debug",
            "--shortcuts",
            "/tmp/bookmarks.yaml",
            "--no-color",
        ])
        .unwrap();

        assert_eq!(cli.start_path, Some(PathBuf::from("/home/alice")));
        assert!(matches!(cli.log_level, LogLevel::Debug));
        assert_eq!(cli.shortcuts, PathBuf::from("/tmp/bookmarks.yaml"));
        assert!(cli.no_color);
    }
}
