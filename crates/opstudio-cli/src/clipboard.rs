//! System clipboard through the platform's copy utility

use opstudio_core::clipboard::Clipboard;
use opstudio_core::errors::{Result, StudioError};
use std::io::Write;
use std::process::{Command, Stdio};

/// Tried in order; the first one that runs and exits cleanly wins
const COPY_UTILITIES: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut failures = Vec::new();
        for (program, args) in COPY_UTILITIES {
            match pipe_to(program, args, text) {
                Ok(()) => return Ok(()),
                Err(reason) => failures.push(reason),
            }
        }
        Err(StudioError::Clipboard {
            reason: failures.join("; "),
        })
    }
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> std::result::Result<(), String> {
    let mut command = Command::new(program);
    command.args(args);
    pipe_through(command, program, text)
}

/// Feed `text` to the command's stdin and wait for it to exit.
///
/// The child is always reaped, including when it stops reading early.
fn pipe_through(mut command: Command, label: &str, text: &str) -> std::result::Result<(), String> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("{}: {}", label, e))?;

    let written = match child.stdin.take() {
        // stdin is dropped at the end of the arm so the child sees EOF
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    if let Err(e) = written {
        let _ = child.kill();
        let _ = child.wait();
        return Err(format!("{}: {}", label, e));
    }

    let status = child.wait().map_err(|e| format!("{}: {}", label, e))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("{} exited with {}", label, status))
    }
}
