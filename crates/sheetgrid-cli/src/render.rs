//! Plain-text rendering of a view page.
//!
//! Layout:
//!
//! ```text
//!   #  name   amount ▼
//! * 1  Alice  100
//!   2  Bob    200
//! page 1/1 · 2 rows
//! ```
//!
//! The first column is the 1-indexed store position (what `--set` takes),
//! `*` marks duplicate rows, and cells wider than [`MAX_COLUMN_WIDTH`] are
//! truncated with an ellipsis.

use sheetgrid::sort::{SortDirection, SortSpec};
use sheetgrid::view::ViewPage;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a rendered column may get.
pub const MAX_COLUMN_WIDTH: usize = 24;

const GAP: &str = "  ";

/// Renders a page as a table followed by a footer line.
#[must_use]
pub fn render_page(page: &ViewPage<'_>, sort: Option<&SortSpec>) -> String {
    let headers: Vec<String> = std::iter::once("#".to_string())
        .chain(page.columns.iter().map(|c| header_label(c, sort)))
        .collect();

    let body: Vec<(bool, Vec<String>)> = page
        .rows
        .iter()
        .map(|&row| {
            let cells = std::iter::once((row.index + 1).to_string())
                .chain(page.cells(row).map(|v| single_line(&v.display())))
                .collect();
            (row.duplicate, cells)
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .map(|(_, cells)| cells[i].width())
                .chain(std::iter::once(h.width()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&render_line(" ", &headers, &widths));
    for (duplicate, cells) in &body {
        let marker = if *duplicate { "*" } else { " " };
        out.push_str(&render_line(marker, cells, &widths));
    }
    if page.is_empty() {
        out.push_str("  (no matching rows)\n");
    }
    out.push_str(&footer(page));
    out
}

/// Returns the footer line, e.g. `page 2/3 · 45 rows`.
#[must_use]
pub fn footer(page: &ViewPage<'_>) -> String {
    let noun = if page.total_rows == 1 { "row" } else { "rows" };
    format!(
        "page {}/{} · {} {noun}\n",
        page.page, page.page_count, page.total_rows
    )
}

fn header_label(column: &str, sort: Option<&SortSpec>) -> String {
    match sort {
        Some(spec) if spec.column == column => {
            let arrow = match spec.direction {
                SortDirection::Ascending => "▲",
                SortDirection::Descending => "▼",
            };
            format!("{column} {arrow}")
        }
        _ => column.to_string(),
    }
}

fn render_line(marker: &str, cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| pad(&truncate_string(cell, width), width))
        .collect();
    let mut line = format!("{marker} {}", padded.join(GAP));
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Truncates `s` to at most `width` display columns, ending in `…` when cut.
fn truncate_string(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetgrid::prelude::*;

    fn sheet(json: &str) -> Sheet {
        Sheet::with_data(
            SheetConfig::editor(),
            ProcessedResult::from_json(json).unwrap(),
        )
    }

    #[test]
    fn test_render_table() {
        let sheet = sheet(
            r#"{"columns": ["name", "amount"],
                "rows": [{"name": "Alice", "amount": 100}, {"name": "Bob", "amount": 200}]}"#,
        );
        let out = render_page(&sheet.view(), None);
        assert_eq!(
            out,
            "  #  name   amount\n  1  Alice  100\n  2  Bob    200\npage 1/1 · 2 rows\n"
        );
    }

    #[test]
    fn test_duplicate_marker_and_sort_arrow() {
        let mut sheet = sheet(r#"{"columns": ["a"], "rows": [{"a": "x"}, {"a": "x"}, {"a": "y"}]}"#);
        sheet.update(SheetMsg::ToggleSort("a".into()));
        let out = render_page(&sheet.view(), sheet.view_state().sort());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  #  a ▲");
        assert_eq!(lines[1], "* 1  x");
        assert_eq!(lines[2], "* 2  x");
        assert_eq!(lines[3], "  3  y");
    }

    #[test]
    fn test_empty_view() {
        let mut sheet = sheet(r#"{"columns": ["a"], "rows": [{"a": "x"}]}"#);
        sheet.update(SheetMsg::SetGlobalFilter("zzz".into()));
        let out = render_page(&sheet.view(), None);
        assert!(out.contains("(no matching rows)"));
        assert!(out.ends_with("page 1/1 · 0 rows\n"));
    }

    #[test]
    fn test_single_row_footer() {
        let sheet = sheet(r#"{"columns": ["a"], "rows": [{"a": 1}]}"#);
        assert_eq!(footer(&sheet.view()), "page 1/1 · 1 row\n");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello", 5), "hello");
        assert_eq!(truncate_string("hello world", 5), "hell…");
        assert_eq!(truncate_string("日本語テキスト", 5), "日本…");
        assert_eq!(truncate_string("abc", 0), "");
    }

    #[test]
    fn test_control_characters_flattened() {
        assert_eq!(single_line("a\nb\tc"), "a b c");
    }
}
