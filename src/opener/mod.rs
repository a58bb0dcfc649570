//! Hands files over to the desktop's default application.

mod default_app;

pub use default_app::open_with_default_app;
