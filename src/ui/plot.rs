use eframe::egui::{ComboBox, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::color::ColorMap;
use crate::data::model::DataTable;
use crate::data::stats;
use crate::state::WidgetState;
use crate::ui::sections;

// ---------------------------------------------------------------------------
// Visualization section: one numeric column as a line chart
// ---------------------------------------------------------------------------

/// Render the column selector, the line chart, and the four derived metrics.
/// The caller guarantees at least one numeric column exists.
pub fn visualization(ui: &mut Ui, table: &DataTable, widgets: &mut WidgetState) {
    let numeric = table.numeric_columns();
    let names: Vec<&str> = numeric.iter().map(|c| c.name.as_str()).collect();
    let colors = ColorMap::new(&names);

    ui.add_space(16.0);
    ui.heading("Visualization");
    ui.separator();

    // Keep the selection valid against the current table; fall back to the
    // first numeric column.
    let selected = match widgets
        .chart_column
        .clone()
        .filter(|name| names.contains(&name.as_str()))
    {
        Some(name) => name,
        None => {
            let first = numeric[0].name.clone();
            widgets.chart_column = Some(first.clone());
            first
        }
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Column to visualize:");
        ComboBox::from_id_salt("chart_column")
            .selected_text(RichText::new(&selected).color(colors.color_for(&selected)))
            .show_ui(ui, |ui: &mut Ui| {
                for col in &numeric {
                    let text = RichText::new(&col.name).color(colors.color_for(&col.name));
                    if ui.selectable_label(selected == col.name, text).clicked() {
                        widgets.chart_column = Some(col.name.clone());
                    }
                }
            });
    });
    ui.add_space(4.0);

    let column = numeric
        .iter()
        .find(|c| c.name == selected)
        .unwrap_or(&numeric[0]);

    // Values plotted against a 0-based row index; null cells leave no point.
    let points: PlotPoints = column
        .values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.as_f64().map(|y| [i as f64, y]))
        .collect();

    Plot::new("column_chart")
        .height(260.0)
        .x_axis_label("Index")
        .y_axis_label(column.name.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let line = Line::new(points)
                .name(&column.name)
                .color(colors.color_for(&column.name))
                .width(1.5);
            plot_ui.line(line);
        });

    if let Some(s) = stats::numeric_stats(column) {
        ui.add_space(8.0);
        ui.columns(4, |cols: &mut [Ui]| {
            sections::metric(&mut cols[0], "Minimum", format!("{:.2}", s.min));
            sections::metric(&mut cols[1], "Maximum", format!("{:.2}", s.max));
            sections::metric(&mut cols[2], "Mean", format!("{:.2}", s.mean));
            sections::metric(&mut cols[3], "Median", format!("{:.2}", s.median));
        });
    }
}
