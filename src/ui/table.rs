//! Table rendering for formatted output.

use console::measure_text_width;

/// A box-drawn table. Cells may span several lines.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
}

fn cell_width(cell: &str) -> usize {
    cell.lines().map(measure_text_width).max().unwrap_or(0)
}

impl Table {
    /// Create a new table with the given headers.
    pub fn new(headers: &[&str]) -> Self {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let column_widths = headers.iter().map(|h| cell_width(h)).collect();

        Self {
            headers,
            rows: Vec::new(),
            column_widths,
        }
    }

    /// Add a row to the table.
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) {
        let row: Vec<String> = row.iter().map(|s| s.as_ref().to_string()).collect();
        for (width, cell) in self.column_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell_width(cell));
        }
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as a string.
    pub fn render(&self) -> String {
        let mut lines = vec![self.render_border('┌', '┬', '┐')];
        lines.extend(self.render_row(&self.headers));
        lines.push(self.render_border('├', '┼', '┤'));
        for row in &self.rows {
            lines.extend(self.render_row(row));
        }
        lines.push(self.render_border('└', '┴', '┘'));
        lines.join("\n")
    }

    fn render_border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self
            .column_widths
            .iter()
            .map(|width| "─".repeat(width + 2))
            .collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn render_row(&self, row: &[String]) -> Vec<String> {
        let cells: Vec<Vec<&str>> = self
            .column_widths
            .iter()
            .enumerate()
            .map(|(i, _)| row.get(i).map_or(vec![""], |cell| cell.lines().collect()))
            .collect();
        let height = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);

        (0..height)
            .map(|line| {
                let mut s = String::from("│");
                for (cell, width) in cells.iter().zip(&self.column_widths) {
                    let text = cell.get(line).copied().unwrap_or("");
                    let pad = width - measure_text_width(text);
                    s.push_str(&format!(" {}{} │", text, " ".repeat(pad)));
                }
                s
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_empty() {
        let table = Table::new(&["A", "B"]);
        assert!(table.is_empty());
        let output = table.render();
        assert!(output.contains("A"));
        assert!(output.contains("B"));
    }

    #[test]
    fn table_with_rows() {
        let mut table = Table::new(&["Check", "Score"]);
        table.add_row(&["cache_page_expire", "pass"]);
        table.add_row(&["cron_last", "fail"]);

        assert_eq!(table.row_count(), 2);
        let output = table.render();
        assert!(output.contains("cache_page_expire"));
        assert!(output.contains("fail"));
    }

    #[test]
    fn table_uses_box_drawing() {
        let output = Table::new(&["Test"]).render();
        for c in ["┌", "┐", "└", "┘", "│", "─"] {
            assert!(output.contains(c));
        }
    }

    #[test]
    fn table_handles_missing_cells() {
        let mut table = Table::new(&["A", "B", "C"]);
        table.add_row(&["only", "two"]);
        let output = table.render();
        assert!(output.contains("only"));
        assert!(output.contains("two"));
    }

    #[test]
    fn multiline_cells_grow_the_row() {
        let mut table = Table::new(&["Check", "Result"]);
        table.add_row(&["superfluous", "Extra files:\n- backup.sql"]);
        let lines: Vec<_> = table.render().lines().map(str::to_string).collect();
        // Top border, header, separator, two row lines, bottom border.
        assert_eq!(lines.len(), 6);
        assert!(lines[4].contains("- backup.sql"));
        let widths: Vec<_> = lines.iter().map(|l| measure_text_width(l)).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
