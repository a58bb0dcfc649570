use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::browser::{Activation, BrowserSession, Navigation, SessionError};
use crate::console::command::HELP;
use crate::console::{ConsoleCommand, TreeRenderer};
use crate::ext::PathExt;
use crate::opener;
use crate::shortcuts::{Shortcut, ShortcutStore};

enum Flow {
    Continue,
    Quit,
}

/// Reads commands line by line and applies them to the session.
///
/// Every failure of a user action is printed and the loop carries on. Only
/// broken input or output ends it early.
pub struct Console<R, W> {
    session: BrowserSession,
    shortcuts: ShortcutStore,
    renderer: TreeRenderer,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(
        session: BrowserSession,
        shortcuts: ShortcutStore,
        renderer: TreeRenderer,
        input: R,
        output: W,
    ) -> Self {
        Console {
            session,
            shortcuts,
            renderer,
            input,
            output,
        }
    }

    pub fn session(&self) -> &BrowserSession {
        &self.session
    }

    /// Gives the shortcuts back so they can be saved.
    pub fn into_shortcuts(self) -> ShortcutStore {
        self.shortcuts
    }

    /// Runs until `quit` or the end of input.
    pub async fn run(&mut self) -> Result<(), ConsoleError> {
        self.print_tree()?;
        let mut line = String::new();
        loop {
            write!(self.output, "{}> ", self.session.path_bar()).context(OutputSnafu)?;
            self.output.flush().context(OutputSnafu)?;

            line.clear();
            let read = self.input.read_line(&mut line).context(InputSnafu)?;
            if read == 0 {
                debug!("End of input");
                writeln!(self.output).context(OutputSnafu)?;
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<ConsoleCommand>() {
                Ok(command) => {
                    debug!("Command: {:?}", command);
                    if let Flow::Quit = self.dispatch(command).await? {
                        return Ok(());
                    }
                }
                Err(e) => self.report_error(&e)?,
            }
        }
    }

    async fn dispatch(&mut self, command: ConsoleCommand) -> Result<Flow, ConsoleError> {
        match command {
            ConsoleCommand::Go(path) => {
                let path = self.resolve(&path);
                let result = self.session.navigate(&path);
                self.after_navigation(result)?;
            }
            ConsoleCommand::Roots => {
                self.session.reset();
                self.print_tree()?;
            }
            ConsoleCommand::Expand(path) => {
                let path = self.resolve(&path);
                match self.session.expand(&path) {
                    Ok(_) => self.print_tree()?,
                    Err(e) => self.report_session_error(&e)?,
                }
            }
            ConsoleCommand::Collapse(path) => {
                let path = self.resolve(&path);
                match self.session.collapse(&path) {
                    Ok(()) => self.print_tree()?,
                    Err(e) => self.report_session_error(&e)?,
                }
            }
            ConsoleCommand::Select(path) => {
                let path = self.resolve(&path);
                match self.session.select(&path) {
                    Ok(()) => self.print_tree()?,
                    Err(e) => self.report_session_error(&e)?,
                }
            }
            ConsoleCommand::Activate(path) => {
                let path = self.resolve(&path);
                match self.session.activate(&path) {
                    Ok(Activation::Expanded { .. }) => self.print_tree()?,
                    Ok(Activation::OpenFile(file)) => self.open(&file).await?,
                    Err(e) => self.report_session_error(&e)?,
                }
            }
            ConsoleCommand::Open(path) => {
                let path = self.resolve(&path);
                self.open(&path).await?;
            }
            ConsoleCommand::Shortcuts => self.print_shortcuts()?,
            ConsoleCommand::Shortcut(name) => match self.shortcuts.get(&name).cloned() {
                Some(shortcut) => {
                    let result = self.session.open_shortcut(&shortcut);
                    self.after_navigation(result)?;
                }
                None => self.report_error(&format!("No shortcut named '{name}'"))?,
            },
            ConsoleCommand::Bookmark { name, path } => {
                let path = match path {
                    Some(path) => self.resolve(&path),
                    None if !self.session.path_bar().is_empty() => {
                        PathBuf::from(self.session.path_bar())
                    }
                    None => {
                        self.report_error(&"Nothing to bookmark, navigate somewhere first")?;
                        return Ok(Flow::Continue);
                    }
                };
                let shortcut = Shortcut::new(name, path);
                self.emit(format!("Added shortcut {shortcut}"))?;
                self.shortcuts.add(shortcut);
            }
            ConsoleCommand::Unbookmark(name) => match self.shortcuts.remove(&name) {
                0 => self.report_error(&format!("No shortcut named '{name}'"))?,
                removed => self.emit(format!("Removed {removed} shortcut(s) named '{name}'"))?,
            },
            ConsoleCommand::Tree => self.print_tree()?,
            ConsoleCommand::Help => self.emit(HELP)?,
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Relative paths are taken from the path bar, like a working directory.
    fn resolve(&self, path: &Path) -> PathBuf {
        let current = self.session.path_bar();
        if path.is_absolute() || current.is_empty() {
            path.normalized_absolute()
        } else {
            Path::new(current).join(path).normalized_absolute()
        }
    }

    fn after_navigation(
        &mut self,
        result: Result<Navigation, SessionError>,
    ) -> Result<(), ConsoleError> {
        match result {
            Ok(navigation) => {
                debug!("Showing {}", navigation.root.display());
                if let Some(listing_error) = navigation.listing_error {
                    let error = SessionError::from(listing_error);
                    self.report_session_error(&error)?;
                }
                self.print_tree()
            }
            Err(e) => self.report_session_error(&e),
        }
    }

    async fn open(&mut self, path: &Path) -> Result<(), ConsoleError> {
        match opener::open_with_default_app(path).await {
            Ok(()) => self.emit(format!("Opened {}", path.display())),
            Err(e) => self.report_error(&e),
        }
    }

    fn print_tree(&mut self) -> Result<(), ConsoleError> {
        let rendered = self
            .renderer
            .render(self.session.roots(), self.session.selection());
        write!(self.output, "{rendered}").context(OutputSnafu)
    }

    fn print_shortcuts(&mut self) -> Result<(), ConsoleError> {
        if self.shortcuts.is_empty() {
            return self.emit("No shortcuts");
        }
        let listing = self
            .shortcuts
            .iter()
            .map(|shortcut| format!("  {shortcut}"))
            .collect::<Vec<_>>()
            .join("\n");
        self.emit(listing)
    }

    fn report_session_error(&mut self, error: &SessionError) -> Result<(), ConsoleError> {
        if error.is_warning() {
            let message = self.renderer.warning(&error.to_string());
            self.emit(message)
        } else {
            self.report_error(error)
        }
    }

    fn report_error(&mut self, error: &dyn Display) -> Result<(), ConsoleError> {
        let message = self.renderer.error(&error.to_string());
        self.emit(message)
    }

    fn emit(&mut self, text: impl Display) -> Result<(), ConsoleError> {
        writeln!(self.output, "{text}").context(OutputSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum ConsoleError {
    #[snafu(display("Failed to read a command"))]
    InputError { source: std::io::Error },
    #[snafu(display("Failed to write to the console"))]
    OutputError { source: std::io::Error },
}
