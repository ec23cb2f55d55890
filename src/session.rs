//! Process-wide terminal session.
//!
//! One [`IoSession`] is created in `main` and passed down to everything that
//! talks to the user. It decides whether prompts may block, whether output is
//! colored, and owns the spinner shown during long-running steps.

use std::env;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use colored::{Color, Colorize};
use crossterm::tty::IsTty;
use indicatif::{ProgressBar, ProgressStyle};

use crate::constants::{defaults, env as env_vars};

/// Where status lines go.
#[derive(Clone)]
enum ErrStream {
    Stderr,
    Buffer(Arc<Mutex<Vec<u8>>>),
}

/// Spinner on stderr showing `label` followed by the animation.
fn spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{msg} {spinner:.cyan}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(defaults::SPINNER_INTERVAL_MS));
    pb
}

pub struct IoSession {
    interactive: bool,
    color_enabled: bool,
    progress_enabled: bool,
    err: ErrStream,
    spinner: Mutex<Option<ProgressBar>>,
}

impl IoSession {
    /// Session over the real stdin/stdout/stderr.
    ///
    /// Interactive only when stdin and stdout are terminals. Color follows
    /// `CLICOLOR_FORCE` / `NO_COLOR`, otherwise whether stderr is a terminal.
    pub fn system() -> Self {
        let stdin_tty = io::stdin().is_tty();
        let stdout_tty = io::stdout().is_tty();
        let stderr_tty = io::stderr().is_tty();

        let forced = env::var(env_vars::CLICOLOR_FORCE).is_ok_and(|v| v != "0");
        let disabled = env::var_os(env_vars::NO_COLOR).is_some();
        let color_enabled = forced || (stderr_tty && !disabled);
        colored::control::set_override(color_enabled);

        Self {
            interactive: stdin_tty && stdout_tty,
            color_enabled,
            progress_enabled: stdout_tty && stderr_tty,
            err: ErrStream::Stderr,
            spinner: Mutex::new(None),
        }
    }

    /// Non-interactive, uncolored session that records status lines in memory.
    pub fn test() -> Self {
        Self {
            interactive: false,
            color_enabled: false,
            progress_enabled: false,
            err: ErrStream::Buffer(Arc::new(Mutex::new(Vec::new()))),
            spinner: Mutex::new(None),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Force prompts off (the `--no-prompt` flag) or on.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn is_color_enabled(&self) -> bool {
        self.color_enabled
    }

    /// Everything written to the in-memory stream of a [`IoSession::test`] session.
    pub fn err_output(&self) -> String {
        match &self.err {
            ErrStream::Buffer(buf) => buf
                .lock()
                .map(|b| String::from_utf8_lossy(&b).into_owned())
                .unwrap_or_default(),
            ErrStream::Stderr => String::new(),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color_enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Write one line to the status stream, clearing any spinner first.
    pub fn write_line(&self, line: &str) {
        self.stop_progress();
        match &self.err {
            ErrStream::Stderr => {
                let _ = writeln!(io::stderr(), "{}", line);
            }
            ErrStream::Buffer(buf) => {
                if let Ok(mut b) = buf.lock() {
                    let _ = writeln!(b, "{}", line);
                }
            }
        }
    }

    fn log(&self, icon: &str, color: Color, message: &str) {
        let line = format!("{} {}", self.paint(icon, color), message);
        self.write_line(&line);
    }

    pub fn info(&self, message: &str) {
        self.log("•", Color::Cyan, message);
    }

    pub fn success(&self, message: &str) {
        self.log("✓", Color::Green, message);
    }

    pub fn warning(&self, message: &str) {
        self.log("!", Color::Yellow, message);
    }

    pub fn failure(&self, message: &str) {
        self.log("✖", Color::Red, message);
    }

    /// Show (or relabel) the spinner. No-op when progress output is disabled.
    pub fn start_progress(&self, label: &str) {
        if !self.progress_enabled {
            return;
        }
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };
        match slot.as_ref() {
            Some(pb) => pb.set_message(label.to_string()),
            None => *slot = Some(spinner(label)),
        }
    }

    pub fn stop_progress(&self) {
        let pb = self.spinner.lock().ok().and_then(|mut slot| slot.take());
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
    }
}

impl Drop for IoSession {
    fn drop(&mut self) {
        self.stop_progress();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_records_icon_lines() {
        let session = IoSession::test();
        session.info("There are uncommitted files");
        session.success("Setup complete.");
        session.warning("fetch failed");
        session.failure("Aborted.");

        assert_eq!(
            session.err_output(),
            "• There are uncommitted files\n✓ Setup complete.\n! fetch failed\n✖ Aborted.\n"
        );
    }

    #[test]
    fn test_set_interactive_overrides_detection() {
        let mut session = IoSession::test();
        assert!(!session.is_interactive());
        assert!(!session.is_color_enabled());
        session.set_interactive(true);
        assert!(session.is_interactive());
    }

    #[test]
    fn test_progress_is_noop_when_disabled() {
        let session = IoSession::test();
        session.start_progress("Pushing");
        assert!(session.spinner.lock().unwrap().is_none());
        session.stop_progress();
    }
}
