//! Line-oriented front end driving a [`crate::browser::BrowserSession`].

mod command;
mod console;
mod render;

pub use command::ConsoleCommand;
pub use console::{Console, ConsoleError};
pub use render::TreeRenderer;
