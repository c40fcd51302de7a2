//! Plain-text tables sized by display width.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::entities::PageMeta;

const MAX_CELL_WIDTH: usize = 48;
const ELLIPSIS: char = '…';

/// Truncates to `max` display columns, marking the cut with an ellipsis.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    let text = text.replace(['\n', '\r', '\t'], " ");
    if text.width() <= max {
        return text;
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push(ELLIPSIS);
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Renders a header row, a rule and the data rows.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate(cell, MAX_CELL_WIDTH)).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| pad(value, *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(cells.len() + 2);
    out.push(line(headers.to_vec()));
    out.push(
        widths
            .iter()
            .map(|width| "─".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &cells {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

/// One-line pagination summary.
#[must_use]
pub fn render_page_meta(meta: Option<&PageMeta>, shown: usize) -> String {
    match meta {
        Some(meta) => format!(
            "الصفحة {} من {} ({} عنصر)",
            meta.page,
            meta.total_pages.max(1),
            meta.total
        ),
        None => format!("{shown} عنصر"),
    }
}

/// Aligned `label: value` lines.
#[must_use]
pub fn render_pairs<V: std::fmt::Display>(pairs: &[(&str, V)]) -> String {
    let width = pairs.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(label, value)| format!("{}  {value}", pad(label, width)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_by_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("日本語テキスト", 7), "日本語…");
    }

    #[test]
    fn test_table_columns_align() {
        let table = render_table(
            &["id", "title"],
            &[
                vec!["1".into(), "مرحبا".into()],
                vec!["22".into(), "x".into()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id  title"));
        assert!(lines[2].starts_with("1   مرحبا"));
        assert_eq!(lines[3], "22  x");
    }

    #[test]
    fn test_page_meta_summary() {
        let meta = PageMeta {
            page: 2,
            limit: 10,
            total: 35,
            total_pages: 4,
        };
        assert_eq!(render_page_meta(Some(&meta), 10), "الصفحة 2 من 4 (35 عنصر)");
        assert_eq!(render_page_meta(None, 3), "3 عنصر");
    }

    #[test]
    fn test_pairs_align() {
        let out = render_pairs(&[("a", 1), ("long", 2)]);
        assert_eq!(out, "a     1\nlong  2");
    }
}
