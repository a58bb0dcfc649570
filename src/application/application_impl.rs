use std::io;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, error};

use crate::application::RuntimeConfig;
use crate::browser::BrowserSession;
use crate::console::{Console, ConsoleError, TreeRenderer};
use crate::shortcuts::{ShortcutStore, ShortcutStoreError};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let shortcuts = ShortcutStore::read(&app_config.shortcuts_file)
            .await
            .context(ShortcutStoreSnafu)?;
        debug!("Loaded shortcuts: {:?}", shortcuts);

        let session = Self::initial_session(&app_config);

        colored::control::set_override(app_config.styled);
        let mut console = Console::new(
            session,
            shortcuts,
            TreeRenderer::new(app_config.styled),
            io::stdin().lock(),
            io::stdout(),
        );
        let outcome = console.run().await.context(ConsoleSnafu);
        debug!("Leaving at '{}'", console.session().path_bar());

        // Saved even when the console broke down, the shortcuts themselves are intact.
        if let Err(e) = console
            .into_shortcuts()
            .write(&app_config.shortcuts_file)
            .await
        {
            error!("Failed to save shortcuts: {}", e);
        }

        outcome
    }

    /// Platform roots, or the start path when one was given and is valid.
    fn initial_session(app_config: &RuntimeConfig) -> BrowserSession {
        let mut session = BrowserSession::new();
        if let Some(start_path) = &app_config.start_path {
            match session.navigate(start_path) {
                Ok(navigation) => {
                    if let Some(listing_error) = navigation.listing_error {
                        error!("{}", listing_error);
                    }
                }
                Err(e) => error!("Cannot start at {}: {}", start_path.display(), e),
            }
        }
        session
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading shortcuts"))]
    ShortcutStoreError { source: ShortcutStoreError },
    #[snafu(display("Critical failure encountered in the console"))]
    ConsoleError { source: ConsoleError },
}
