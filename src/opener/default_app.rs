use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use compio::process::Command;
use snafu::{ResultExt, Snafu, ensure};
use tracing::{debug, info};

use crate::ext::PathExt;

/// Returns the handler program and its arguments for opening `path`.
/// This should be os-specific.
fn handler_command(path: &Path) -> (&'static str, Vec<&OsStr>) {
    #[cfg(target_family = "windows")]
    {
        // `start` treats the first quoted argument as a window title.
        let args = vec![
            OsStr::new("/C"),
            OsStr::new("start"),
            OsStr::new(""),
            path.as_os_str(),
        ];
        ("cmd", args)
    }
    #[cfg(target_os = "macos")]
    {
        ("open", vec![path.as_os_str()])
    }
    #[cfg(all(not(target_family = "windows"), not(target_os = "macos")))]
    {
        ("xdg-open", vec![path.as_os_str()])
    }
}

/// Opens a file with whatever the platform considers its default handler and waits
/// for the handler to report back.
pub async fn open_with_default_app(path: &Path) -> Result<(), OpenFailedError> {
    ensure!(path.is_file(), NotAFileSnafu { path });

    let (handler, args) = handler_command(path);
    let mut cmd = Command::new(handler);
    cmd.args(args);
    let _ = cmd.stdout(Stdio::null());
    let _ = cmd.stderr(Stdio::null());

    debug!("Opening {} with '{}'", path.display(), handler);
    let child = cmd
        .spawn()
        .map_err(|source| classify_spawn_error(handler, source))?;

    let status = child.wait().await.context(WaitSnafu { handler })?;
    ensure!(
        status.success(),
        UnsuccessfulExitSnafu {
            handler,
            path,
            status: status.code().unwrap_or(-1),
        }
    );

    info!("Opened {}", path.display());
    Ok(())
}

fn classify_spawn_error(handler: &str, source: io::Error) -> OpenFailedError {
    let handler = handler.to_string();
    match source.kind() {
        io::ErrorKind::NotFound => OpenFailedError::HandlerMissingError { handler },
        io::ErrorKind::PermissionDenied => OpenFailedError::PermissionError { handler, source },
        _ => OpenFailedError::SpawnError { handler, source },
    }
}

#[derive(Debug, Snafu)]
pub enum OpenFailedError {
    #[snafu(display("Cannot open {}: not a file", path.best_effort_path_display()))]
    NotAFileError { path: PathBuf },
    #[snafu(display("No handler to open files with: '{}' was not found", handler))]
    HandlerMissingError { handler: String },
    #[snafu(display("Not permitted to run '{}'", handler))]
    PermissionError {
        handler: String,
        source: io::Error,
    },
    #[snafu(display("Failed to spawn '{}': {}", handler, source))]
    SpawnError {
        handler: String,
        source: io::Error,
    },
    #[snafu(display("Failed to wait for '{}'", handler))]
    WaitError {
        handler: String,
        source: io::Error,
    },
    #[snafu(display(
        "'{}' failed to open {} with exit code {}",
        handler,
        path.best_effort_path_display(),
        status
    ))]
    UnsuccessfulExitError {
        handler: String,
        path: PathBuf,
        status: i32,
    },
}
