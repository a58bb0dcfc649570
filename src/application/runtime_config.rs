use std::path::PathBuf;

use supports_color::Stream;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub start_path: Option<PathBuf>,
    pub shortcuts_file: PathBuf,
    pub styled: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            start_path: cli.start_path,
            shortcuts_file: cli.shortcuts,
            styled: !cli.no_color && supports_color::on(Stream::Stdout).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn no_color_disables_styling() {
        let cli = Cli::try_parse_from(["arbor", "--no-color", "--shortcuts", "s.yaml"]).unwrap();

        let config = RuntimeConfig::from(cli);

        assert!(!config.styled);
        assert_eq!(config.shortcuts_file, PathBuf::from("s.yaml"));
        assert!(config.start_path.is_none());
    }
}
