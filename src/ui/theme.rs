//! Visual theme and styling.

use console::Style;

use crate::audit::Score;

/// The audit's visual theme.
#[derive(Debug, Clone)]
pub struct AuditTheme {
    /// Style for passing checks (green).
    pub success: Style,
    /// Style for warnings (orange).
    pub warning: Style,
    /// Style for failures and errors (red bold).
    pub error: Style,
    /// Style for informational results (cyan).
    pub info: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for report headers (bold magenta).
    pub header: Style,
    /// Style for box-drawing borders (dim).
    pub border: Style,
}

impl Default for AuditTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditTheme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().magenta(),
            border: Style::new().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            border: Style::new(),
        }
    }

    /// Pick a theme for the terminal.
    pub fn detect(no_color: bool) -> Self {
        if !no_color && should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format an informational message.
    pub fn format_info(&self, msg: &str) -> String {
        format!("{}", self.info.apply_to(format!("ℹ {}", msg)))
    }

    /// Format a line after a check's score.
    pub fn format_score(&self, score: Score, msg: &str) -> String {
        match score {
            Score::Pass => self.format_success(msg),
            Score::Warn => self.format_warning(msg),
            Score::Fail => self.format_error(msg),
            Score::Info => self.format_info(msg),
        }
    }

    /// Format a report header.
    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(title))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_success() {
        let msg = AuditTheme::plain().format_success("Complete");
        assert_eq!(msg, "✓ Complete");
    }

    #[test]
    fn theme_formats_warning() {
        let msg = AuditTheme::plain().format_warning("Caution");
        assert!(msg.contains("⚠"));
        assert!(msg.contains("Caution"));
    }

    #[test]
    fn theme_formats_error() {
        let msg = AuditTheme::plain().format_error("Failed");
        assert!(msg.contains("✗"));
    }

    #[test]
    fn score_picks_icon() {
        let theme = AuditTheme::plain();
        assert!(theme.format_score(Score::Pass, "ok").starts_with("✓"));
        assert!(theme.format_score(Score::Warn, "meh").starts_with("⚠"));
        assert!(theme.format_score(Score::Fail, "bad").starts_with("✗"));
        assert!(theme.format_score(Score::Info, "fyi").starts_with("ℹ"));
    }

    #[test]
    fn no_color_flag_forces_plain() {
        let theme = AuditTheme::detect(true);
        assert_eq!(theme.format_header("Cache"), "Cache");
    }

    #[test]
    fn default_impl_matches_new() {
        assert_eq!(
            AuditTheme::default().format_success("test"),
            AuditTheme::new().format_success("test")
        );
    }
}
