use std::path::PathBuf;
use std::str::FromStr;

use snafu::Snafu;

pub const HELP: &str = "\
Commands:
  go <path>                 show <path> as the root of the tree
  roots                     show the platform roots again
  expand <path>             list the entries of a directory
  collapse <path>           forget the entries of a directory
  select <path>             select a node
  activate <path>           expand a directory or open a file
  open <path>               open a file with its default application
  shortcuts                 list shortcuts
  shortcut <name>           navigate to a shortcut
  bookmark <name> [path]    add a shortcut, defaults to the current path
  unbookmark <name>         remove shortcuts with that name
  tree                      print the tree
  help                      print this help
  quit                      leave

Relative paths are resolved against the current path.";

/// One user action, as typed on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Go(PathBuf),
    Roots,
    Expand(PathBuf),
    Collapse(PathBuf),
    Select(PathBuf),
    Activate(PathBuf),
    Open(PathBuf),
    Shortcuts,
    Shortcut(String),
    Bookmark { name: String, path: Option<PathBuf> },
    Unbookmark(String),
    Tree,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "go" | "cd" => ConsoleCommand::Go(path_argument(word, rest)?),
            "roots" => ConsoleCommand::Roots,
            "expand" => ConsoleCommand::Expand(path_argument(word, rest)?),
            "collapse" => ConsoleCommand::Collapse(path_argument(word, rest)?),
            "select" => ConsoleCommand::Select(path_argument(word, rest)?),
            "activate" => ConsoleCommand::Activate(path_argument(word, rest)?),
            "open" => ConsoleCommand::Open(path_argument(word, rest)?),
            "shortcuts" => ConsoleCommand::Shortcuts,
            "shortcut" => ConsoleCommand::Shortcut(name_argument(word, rest)?.to_string()),
            "bookmark" => {
                let rest = name_argument(word, rest)?;
                match rest.split_once(char::is_whitespace) {
                    Some((name, path)) => ConsoleCommand::Bookmark {
                        name: name.to_string(),
                        path: Some(PathBuf::from(path.trim())),
                    },
                    None => ConsoleCommand::Bookmark {
                        name: rest.to_string(),
                        path: None,
                    },
                }
            }
            "unbookmark" => ConsoleCommand::Unbookmark(name_argument(word, rest)?.to_string()),
            "tree" | "ls" => ConsoleCommand::Tree,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            _ => {
                return UnknownCommandSnafu { command: word }.fail();
            }
        };
        Ok(command)
    }
}

fn path_argument(command: &str, rest: &str) -> Result<PathBuf, ParseCommandError> {
    if rest.is_empty() {
        return MissingArgumentSnafu {
            command,
            expected: "a path",
        }
        .fail();
    }
    Ok(PathBuf::from(rest))
}

fn name_argument<'a>(command: &str, rest: &'a str) -> Result<&'a str, ParseCommandError> {
    if rest.is_empty() {
        return MissingArgumentSnafu {
            command,
            expected: "a shortcut name",
        }
        .fail();
    }
    Ok(rest)
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ParseCommandError {
    #[snafu(display("Unknown command '{}', type 'help' for a list of commands", command))]
    UnknownCommandError { command: String },
    #[snafu(display("'{}' expects {}", command, expected))]
    MissingArgumentError {
        command: String,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[rstest]
    #[case("go /home/alice", ConsoleCommand::Go("/home/alice".into()))]
    #[case("cd   /srv/my files  ", ConsoleCommand::Go("/srv/my files".into()))]
    #[case("roots", ConsoleCommand::Roots)]
    #[case("expand etc", ConsoleCommand::Expand("etc".into()))]
    #[case("collapse /etc", ConsoleCommand::Collapse("/etc".into()))]
    #[case("select /etc/passwd", ConsoleCommand::Select("/etc/passwd".into()))]
    #[case("activate /etc/passwd", ConsoleCommand::Activate("/etc/passwd".into()))]
    #[case("open notes.txt", ConsoleCommand::Open("notes.txt".into()))]
    #[case("shortcuts", ConsoleCommand::Shortcuts)]
    #[case("shortcut Home", ConsoleCommand::Shortcut("Home".into()))]
    #[case("unbookmark Home", ConsoleCommand::Unbookmark("Home".into()))]
    #[case("  tree", ConsoleCommand::Tree)]
    #[case("?", ConsoleCommand::Help)]
    #[case("exit", ConsoleCommand::Quit)]
    fn parses_commands(#[case] line: &str, #[case] expected: ConsoleCommand) {
        assert_eq!(line.parse::<ConsoleCommand>(), Ok(expected));
    }

    #[test]
    fn bookmark_with_and_without_path() {
        assert_eq!(
            "bookmark Logs /var/log".parse::<ConsoleCommand>(),
            Ok(ConsoleCommand::Bookmark {
                name: "Logs".to_string(),
                path: Some("/var/log".into()),
            })
        );
        assert_eq!(
            "bookmark Here".parse::<ConsoleCommand>(),
            Ok(ConsoleCommand::Bookmark {
                name: "Here".to_string(),
                path: None,
            })
        );
    }

    #[rstest]
    #[case("go")]
    #[case("expand   ")]
    #[case("shortcut")]
    #[case("bookmark")]
    fn missing_argument(#[case] line: &str) {
        assert!(matches!(
            line.parse::<ConsoleCommand>(),
            Err(ParseCommandError::MissingArgumentError { .. })
        ));
    }

    #[test]
    fn unknown_command() {
        let error = "frobnicate now".parse::<ConsoleCommand>().unwrap_err();

        assert_eq!(
            error,
            ParseCommandError::UnknownCommandError {
                command: "frobnicate".to_string()
            }
        );
        assert!(error.to_string().contains("'frobnicate'"));
    }
}
