use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::BrowserError;

#[cfg(target_os = "macos")]
fn launcher(url: &str) -> (&'static str, Command) {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    ("open", cmd)
}

#[cfg(target_os = "windows")]
fn launcher(url: &str) -> (&'static str, Command) {
    let mut cmd = Command::new("cmd");
    // The empty string is the window title `start` expects before the target
    cmd.args(["/C", "start", "", url]);
    ("cmd", cmd)
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launcher(url: &str) -> (&'static str, Command) {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    ("xdg-open", cmd)
}

/// Hand a URL to the platform's default browser
pub(crate) fn open_url(url: &str) -> Result<(), BrowserError> {
    let (name, mut cmd) = launcher(url);
    debug!(launcher = name, url, "opening browser");

    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BrowserError::NotFound(name)
            } else {
                BrowserError::Spawn(e)
            }
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(BrowserError::Failed(status))
    }
}
