//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{AuditTheme, OutputMode, UserInterface};
use crate::audit::Score;

/// Terminal UI implementation.
///
/// Command output goes to stdout; status and errors go to stderr so piped
/// JSON stays clean.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: AuditTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode, no_color: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme: AuditTheme::detect(no_color),
            mode,
        }
    }

    /// The theme in use.
    pub fn theme(&self) -> &AuditTheme {
        &self.theme
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn output(&mut self, text: &str) {
        writeln!(self.out, "{}", text).ok();
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_score(&mut self, score: Score, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_score(score, msg)).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_output_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet, true);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn no_color_uses_plain_theme() {
        let ui = TerminalUI::new(OutputMode::Normal, true);
        assert_eq!(ui.theme().format_success("ok"), "✓ ok");
    }
}
