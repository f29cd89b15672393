//! Result and action text shaping.
//!
//! Checks build their messages through [`Markup`] so the same check renders
//! as plain text on a terminal and as HTML for dashboards that embed it.

/// Formatting helpers for result and action text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Markup {
    html: bool,
}

impl Markup {
    /// Plain text output.
    pub fn plain() -> Self {
        Self { html: false }
    }

    /// HTML output.
    pub fn html() -> Self {
        Self { html: true }
    }

    /// Choose plain text or HTML.
    pub fn new(html: bool) -> Self {
        Self { html }
    }

    /// Whether this produces HTML.
    pub fn is_html(&self) -> bool {
        self.html
    }

    /// A line break.
    pub fn linebreak(&self) -> &'static str {
        if self.html {
            "<br/>"
        } else {
            "\n"
        }
    }

    /// A bulleted or numbered list.
    pub fn list<S: AsRef<str>>(&self, items: &[S], ordered: bool) -> String {
        if self.html {
            let tag = if ordered { "ol" } else { "ul" };
            let body: String = items
                .iter()
                .map(|item| format!("<li>{}</li>", item.as_ref()))
                .collect();
            return format!("<{tag}>{body}</{tag}>");
        }

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if ordered {
                    format!("{}. {}", i + 1, item.as_ref())
                } else {
                    format!("- {}", item.as_ref())
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A two-column listing with headers.
    pub fn key_value_list(&self, key_header: &str, value_header: &str, rows: &[(String, String)]) -> String {
        if self.html {
            let body: String = rows
                .iter()
                .map(|(k, v)| format!("<tr><td>{k}</td><td>{v}</td></tr>"))
                .collect();
            return format!(
                "<table><thead><tr><th>{key_header}</th><th>{value_header}</th></tr></thead><tbody>{body}</tbody></table>"
            );
        }

        let mut lines = vec![format!("{key_header}: {value_header}")];
        lines.extend(rows.iter().map(|(k, v)| format!("{k}: {v}")));
        lines.join("\n")
    }
}
