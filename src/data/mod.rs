/// Data layer: core types, loading, caching, and derived statistics.
///
/// Architecture:
/// ```text
///  data/*.xlsx | data/Sheet1.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  discover + parse file → DataTable (memoized by cache)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ DataTable │  Vec<Column> of typed cells
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats   │  column summaries, describe(), per-column metrics
///   └──────────┘
/// ```

pub mod cache;
pub mod loader;
pub mod model;
pub mod stats;
