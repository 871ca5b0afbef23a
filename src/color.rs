use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color mapping: column name → Color32
// ---------------------------------------------------------------------------

/// Assigns each column a stable, visually distinct colour using evenly
/// spaced hues. Used for the chart line and the dropdown entries.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map over the given column names, in order.
    pub fn new(columns: &[&str]) -> Self {
        let n = columns.len().max(1);
        let mapping = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let hue = (i as f32 / n as f32) * 360.0;
                let hsl = Hsl::new(hue, 0.75, 0.55);
                let rgb: Srgb = hsl.into_color();
                let color = Color32::from_rgb(
                    (rgb.red * 255.0) as u8,
                    (rgb.green * 255.0) as u8,
                    (rgb.blue * 255.0) as u8,
                );
                (name.to_string(), color)
            })
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::LIGHT_BLUE,
        }
    }

    /// Look up the colour for a column; unknown names get the default.
    pub fn color_for(&self, column: &str) -> Color32 {
        self.mapping
            .get(column)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_stable_and_distinct() {
        let map = ColorMap::new(&["a", "b", "c"]);
        assert_eq!(map.color_for("a"), map.color_for("a"));
        assert_ne!(map.color_for("a"), map.color_for("b"));
        assert_ne!(map.color_for("b"), map.color_for("c"));
    }

    #[test]
    fn unknown_column_gets_default() {
        let map = ColorMap::new(&["a"]);
        assert_eq!(map.color_for("missing"), Color32::LIGHT_BLUE);
    }
}
