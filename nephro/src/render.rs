//! Template rendering for CLI output using outstanding

use console::Style;
use nephrolib::{SummaryTable, TableRow};
use outstanding::{render_auto, render_with_output, Theme};
use serde::Serialize;

/// Include template at compile time
const SUMMARY_TABLE_TEMPLATE: &str = include_str!("../templates/summary_table.jinja");

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

const MIN_LABEL_WIDTH: usize = 12;
const CELL_WIDTH: usize = 10;

/// Row data for template rendering (pre-padded)
#[derive(Debug, Serialize)]
struct TemplateRow {
    label: String,
    cells: Vec<String>,
}

/// Data context for the summary table template
#[derive(Debug, Serialize)]
struct SummaryTableContext {
    title: Option<String>,
    header: TemplateRow,
    separator: String,
    rows: Vec<TemplateRow>,
    total: TemplateRow,
    notes: Vec<String>,
}

fn to_template_row(label: &str, values: &[String], label_width: usize) -> TemplateRow {
    TemplateRow {
        label: format!("{label:<label_width$}"),
        cells: values
            .iter()
            .map(|v| format!("{v:>width$}", width = CELL_WIDTH))
            .collect(),
    }
}

impl SummaryTableContext {
    fn new(table: &SummaryTable) -> Self {
        let label_header = table.headers.first().map(String::as_str).unwrap_or("");
        let value_headers = table.headers.get(1..).unwrap_or(&[]);

        let label_width = table
            .rows
            .iter()
            .chain(std::iter::once(&table.footer))
            .map(|r: &TableRow| r.label.len())
            .chain(std::iter::once(label_header.len()))
            .max()
            .unwrap_or(0)
            .max(MIN_LABEL_WIDTH);

        Self {
            title: table.title.clone(),
            header: to_template_row(label_header, value_headers, label_width),
            separator: "-".repeat(label_width + (CELL_WIDTH + 1) * value_headers.len()),
            rows: table
                .rows
                .iter()
                .map(|r| to_template_row(&r.label, &r.values, label_width))
                .collect(),
            total: to_template_row(&table.footer.label, &table.footer.values, label_width),
            notes: table.notes.clone(),
        }
    }
}

/// Create the theme with styles
fn create_theme() -> Theme {
    Theme::new()
        .add("title", Style::new().bold())
        .add("header", Style::new().bold())
        .add("total", Style::new().bold())
        .add("note", Style::new().yellow())
}

/// Render a summary table to string using outstanding
pub fn render_summary(table: &SummaryTable, output_mode: OutputMode) -> anyhow::Result<String> {
    let theme = create_theme();
    let context = SummaryTableContext::new(table);

    let mut rendered = render_with_output(SUMMARY_TABLE_TEMPLATE, &context, &theme, output_mode)
        .map_err(|e| anyhow::anyhow!("failed to render table: {e}"))?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Render a full extraction result using outstanding's auto dispatch.
///
/// Structured modes serialize `result` directly; other modes fall back to
/// the summary table.
pub fn render_result<T: Serialize>(
    result: &T,
    summary: impl FnOnce() -> SummaryTable,
    output_mode: OutputMode,
) -> anyhow::Result<String> {
    if output_mode.is_structured() {
        let theme = create_theme();
        let mut rendered = render_auto(SUMMARY_TABLE_TEMPLATE, result, &theme, output_mode)
            .map_err(|e| anyhow::anyhow!("failed to serialize result: {e}"))?;
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        return Ok(rendered);
    }

    render_summary(&summary(), output_mode)
}
