//! Plain-text rendering of a page snapshot.

use std::fmt::Write;

use crate::memory::PageSnapshot;

/// Renders a snapshot for a terminal.
///
/// The status line always comes first. When the result panel is visible the
/// summary, a column-aligned table and the download line follow.
#[must_use]
pub fn render_text(snapshot: &PageSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", snapshot.status);
    if snapshot.result_hidden {
        return out;
    }

    out.push('\n');
    let _ = writeln!(out, "{}", snapshot.summary);

    if !snapshot.columns.is_empty() || !snapshot.rows.is_empty() {
        out.push('\n');
        render_table(&mut out, &snapshot.columns, &snapshot.rows);
    }

    out.push('\n');
    match &snapshot.download.href {
        Some(href) if !snapshot.download.disabled => {
            let _ = writeln!(out, "{}: {href}", snapshot.download.label);
        }
        _ => out.push_str("(download disabled)\n"),
    }
    out
}

fn render_table(out: &mut String, columns: &[String], rows: &[Vec<String>]) {
    let width_count = rows.iter().map(Vec::len).chain([columns.len()]).max().unwrap_or(0);
    let mut widths = vec![0_usize; width_count];
    for line in std::iter::once(columns).chain(rows.iter().map(Vec::as_slice)) {
        for (i, cell) in line.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    if !columns.is_empty() {
        push_line(out, columns, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(out, &rule, &widths);
    }
    for row in rows {
        push_line(out, row, &widths);
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
