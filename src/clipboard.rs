//! Copy release notes to the system clipboard via platform tools.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::ClipboardError;

/// Clipboard programs in order of preference, with their arguments.
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// Find the first clipboard tool available on PATH.
fn find_clipboard_tool() -> Option<(PathBuf, &'static str, &'static [&'static str])> {
    CLIPBOARD_TOOLS.iter().find_map(|(name, args)| {
        which::which(name).ok().map(|path| (path, *name, *args))
    })
}

/// Copy `text` to the clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let (path, name, args) = find_clipboard_tool().ok_or(ClipboardError::NoTool)?;
    debug!(tool = name, "Copying to clipboard");
    pipe_to(&path, name, args, text)
}

fn pipe_to(program: &Path, name: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let spawn_err = |source| ClipboardError::Spawn {
        tool: name.to_string(),
        source,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(spawn_err)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).map_err(spawn_err)?;
    }

    let status = child.wait().map_err(spawn_err)?;
    if !status.success() {
        return Err(ClipboardError::Failed {
            tool: name.to_string(),
            code: status.code().unwrap_or(-1),
        });
    }

    Ok(())
}
