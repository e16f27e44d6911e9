//! Plain-text table rendering of a report run.

use super::column::ColumnDescriptor;
use super::format::CellFormatter;
use crate::engine::ReportOutput;

const TOTAL_LABEL: &str = "Total";

/// Render `output` as an aligned text table.
///
/// Header, one line per row, and a totals footer when any column is
/// aggregated. Footer cells of non-aggregated columns are blank, except the
/// first one, which carries the "Total" label.
pub fn render_table(output: &ReportOutput, formatter: &CellFormatter) -> String {
    let columns = &output.columns;
    if columns.is_empty() {
        return String::new();
    }

    let header: Vec<String> = columns.iter().map(|c| c.title.clone()).collect();
    let body: Vec<Vec<String>> = output
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| formatter.format_cell(column, row))
                .collect()
        })
        .collect();
    let footer = footer(output, columns, formatter);

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in body.iter().chain(footer.iter()) {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines = vec![render_line(&header, &widths), rule.clone()];
    lines.extend(body.iter().map(|line| render_line(line, &widths)));
    if let Some(footer) = &footer {
        lines.push(rule);
        lines.push(render_line(footer, &widths));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn footer(
    output: &ReportOutput,
    columns: &[ColumnDescriptor],
    formatter: &CellFormatter,
) -> Option<Vec<String>> {
    if !columns.iter().any(|c| c.aggregated) {
        return None;
    }

    let mut cells: Vec<String> = columns
        .iter()
        .map(|column| match output.total(&column.key) {
            Some(total) if column.aggregated => formatter.format_total(column, total),
            _ => String::new(),
        })
        .collect();

    if cells[0].is_empty() {
        cells[0] = TOTAL_LABEL.to_string();
    }
    Some(cells)
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
