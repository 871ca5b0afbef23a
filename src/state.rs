use std::path::PathBuf;

use crate::data::cache::DatasetCache;
use crate::data::loader::LoadOptions;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Preview slider bounds and default.
pub const PREVIEW_MIN_ROWS: usize = 5;
pub const PREVIEW_MAX_ROWS: usize = 100;
pub const PREVIEW_DEFAULT_ROWS: usize = 10;

/// Widget values owned across frames. They only affect the current render
/// pass; the loaded data never depends on them.
#[derive(Debug, Clone)]
pub struct WidgetState {
    /// How many leading rows the preview shows.
    pub preview_rows: usize,
    /// Numeric column selected in the visualization dropdown.
    pub chart_column: Option<String>,
}

impl Default for WidgetState {
    fn default() -> Self {
        WidgetState {
            preview_rows: PREVIEW_DEFAULT_ROWS,
            chart_column: None,
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Directory scanned for the data file.
    pub data_dir: PathBuf,

    /// Parsing policy for the delimited-text fallback.
    pub load_options: LoadOptions,

    /// Memoized load result; the only cross-frame shared data.
    pub cache: DatasetCache,

    /// Current widget values.
    pub widgets: WidgetState,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            data_dir: PathBuf::from("data"),
            load_options: LoadOptions::default(),
            cache: DatasetCache::new(),
            widgets: WidgetState::default(),
        }
    }
}

impl AppState {
    /// Drop the cached dataset so the next frame re-reads the disk.
    /// Widget values survive; a vanished chart column falls back to the
    /// first numeric column on render.
    pub fn refresh(&mut self) {
        self.cache.invalidate();
    }
}
