use eframe::egui::{self, Color32, RichText, Slider, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::loader::{LoadOutcome, CSV_FALLBACK_NAME};
use crate::data::model::DataTable;
use crate::data::stats;
use crate::state::{WidgetState, PREVIEW_MAX_ROWS, PREVIEW_MIN_ROWS};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top bar: app name, source summary, refresh.
pub fn top_bar(ui: &mut Ui, outcome: &LoadOutcome, refresh_requested: &mut bool) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Predictions Dashboard");
        ui.separator();

        match &outcome.source {
            Some(source) => {
                let file = source
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| source.path.display().to_string());
                ui.label(format!("{} rows from {file}", outcome.table.n_rows()));
                if outcome.rows_skipped > 0 {
                    ui.label(
                        RichText::new(format!("{} malformed rows skipped", outcome.rows_skipped))
                            .color(Color32::YELLOW),
                    );
                }
            }
            None => {
                ui.label(RichText::new("no data loaded").color(Color32::RED));
            }
        }

        ui.separator();
        if ui.button("Refresh").clicked() {
            *refresh_requested = true;
        }
    });
}

// ---------------------------------------------------------------------------
// Dashboard body
// ---------------------------------------------------------------------------

/// Render every dashboard section in fixed order. An empty table renders
/// the guidance message and nothing else.
pub fn dashboard(ui: &mut Ui, outcome: &LoadOutcome, widgets: &mut WidgetState) {
    let table = &outcome.table;
    if table.is_empty() {
        empty_state(ui);
        return;
    }

    ui.heading(RichText::new("Predictions Dashboard").size(24.0));
    ui.label("Analysis of the prediction data from your data-mining project.");

    overview(ui, table);
    preview(ui, table, widgets);

    if !table.numeric_columns().is_empty() {
        statistics(ui, table);
        plot::visualization(ui, table, widgets);
    }

    column_info(ui, table);
    column_name_grid(ui, table);
}

fn empty_state(ui: &mut Ui) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.colored_label(Color32::RED, "Could not load any data.");
        ui.add_space(8.0);
        ui.label(format!(
            "Tip: place your spreadsheet (predictions.xlsx) or {CSV_FALLBACK_NAME} \
             in the data/ folder next to the app."
        ));
    });
}

fn section_heading(ui: &mut Ui, title: &str) {
    ui.add_space(16.0);
    ui.heading(title);
    ui.separator();
}

/// A labelled metric in the original's `st.metric` style.
pub(super) fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).small().weak());
        ui.label(RichText::new(value).size(22.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn overview(ui: &mut Ui, table: &DataTable) {
    section_heading(ui, "Data overview");
    ui.columns(3, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Total rows", format_thousands(table.n_rows()));
        metric(&mut cols[1], "Columns", table.n_cols().to_string());
        metric(
            &mut cols[2],
            "Numeric columns",
            table.numeric_columns().len().to_string(),
        );
    });
}

fn preview(ui: &mut Ui, table: &DataTable, widgets: &mut WidgetState) {
    section_heading(ui, "Data preview");

    ui.add(
        Slider::new(&mut widgets.preview_rows, PREVIEW_MIN_ROWS..=PREVIEW_MAX_ROWS)
            .text("rows to display"),
    );
    ui.add_space(4.0);

    let n_rows = preview_row_count(widgets.preview_rows, table.n_rows());
    ui.push_id("preview", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(TableColumn::auto().resizable(true), table.n_cols())
            .header(20.0, |mut header| {
                for name in table.column_names() {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, n_rows, |mut row| {
                    let r = row.index();
                    for col in &table.columns {
                        row.col(|ui| {
                            ui.label(col.values[r].to_string());
                        });
                    }
                });
            });
    });
}

fn statistics(ui: &mut Ui, table: &DataTable) {
    section_heading(ui, "Numeric statistics");

    let rows = stats::describe(table);
    ui.push_id("describe", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(TableColumn::auto().resizable(true), 9)
            .header(20.0, |mut header| {
                for title in [
                    "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
                ] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let d = &rows[row.index()];
                    let cells = [
                        d.name.clone(),
                        d.count.to_string(),
                        format!("{:.2}", d.mean),
                        format!("{:.2}", d.std),
                        format!("{:.2}", d.min),
                        format!("{:.2}", d.q25),
                        format!("{:.2}", d.median),
                        format!("{:.2}", d.q75),
                        format!("{:.2}", d.max),
                    ];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

fn column_info(ui: &mut Ui, table: &DataTable) {
    section_heading(ui, "Column info");

    let summaries = stats::summarize_columns(table);
    ui.push_id("column_info", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(TableColumn::auto().resizable(true), 4)
            .header(20.0, |mut header| {
                for title in ["column", "dtype", "missing", "distinct"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, summaries.len(), |mut row| {
                    let s = &summaries[row.index()];
                    let cells = [
                        s.name.clone(),
                        s.dtype.to_string(),
                        s.missing.to_string(),
                        s.distinct.to_string(),
                    ];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

fn column_name_grid(ui: &mut Ui, table: &DataTable) {
    section_heading(ui, "All columns");
    ui.columns(3, |cols: &mut [Ui]| {
        for (idx, name) in table.column_names().enumerate() {
            cols[idx % 3].label(format!("{}. {name}", idx + 1));
        }
    });
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Rows to show in the preview for a given slider value.
fn preview_row_count(slider_value: usize, total_rows: usize) -> usize {
    slider_value.min(total_rows)
}

/// `1234567` → `"1,234,567"`.
fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_clamped_to_table_length() {
        assert_eq!(preview_row_count(10, 1_000), 10);
        assert_eq!(preview_row_count(100, 7), 7);
        assert_eq!(preview_row_count(5, 5), 5);
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }
}
