use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a spreadsheet or
/// delimited-text column can carry.
/// Distinct-value counting uses `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Int(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for numeric aggregation.
    /// Bools are deliberately excluded.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnType – inferred per-column type tag
// ---------------------------------------------------------------------------

/// The inferred type of a column, derived from its non-null cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Text,
    /// Every cell in the column is null.
    Empty,
}

impl ColumnType {
    /// Whether the column supports arithmetic aggregation.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int => "int64",
            ColumnType::Float => "float64",
            ColumnType::Bool => "bool",
            ColumnType::Text => "object",
            ColumnType::Empty => "empty",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Column – one named column of cells
// ---------------------------------------------------------------------------

/// A single named column. Duplicate names across a table are passed through
/// as given by the source file.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Column {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Infer the column's type from its non-null cells.
    ///
    /// An all-`Int` column is `Int`; a mix of `Int` and `Float` is `Float`;
    /// any other mix degrades to `Text`; all-null is `Empty`.
    pub fn infer_type(&self) -> ColumnType {
        let mut seen: Option<ColumnType> = None;
        for value in &self.values {
            let t = match value {
                CellValue::Null => continue,
                CellValue::Int(_) => ColumnType::Int,
                CellValue::Float(_) => ColumnType::Float,
                CellValue::Bool(_) => ColumnType::Bool,
                CellValue::Text(_) => ColumnType::Text,
            };
            seen = Some(match seen {
                None => t,
                Some(prev) if prev == t => t,
                Some(ColumnType::Int) if t == ColumnType::Float => ColumnType::Float,
                Some(ColumnType::Float) if t == ColumnType::Int => ColumnType::Float,
                Some(_) => return ColumnType::Text,
            });
        }
        seen.unwrap_or(ColumnType::Empty)
    }

    /// The column's non-null values as `f64`, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }

    /// Count of null cells.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Count of distinct non-null values.
    pub fn distinct_count(&self) -> usize {
        self.values
            .iter()
            .filter(|v| !v.is_null())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

// ---------------------------------------------------------------------------
// DataTable – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table: an ordered sequence of equally-long columns.
///
/// Invariant: every column holds exactly `n_rows` cells. The constructor
/// enforces this by padding short columns with nulls, so a `DataTable` is
/// never ragged. Not mutated after creation.
#[derive(Debug, Clone)]
pub struct DataTable {
    pub columns: Vec<Column>,
    n_rows: usize,
}

impl DataTable {
    /// A table with zero columns and zero rows.
    pub fn empty() -> Self {
        DataTable {
            columns: Vec::new(),
            n_rows: 0,
        }
    }

    /// Build a table from parsed columns, padding ragged columns with nulls
    /// up to the longest column's length.
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let n_rows = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for col in &mut columns {
            col.values.resize(n_rows, CellValue::Null);
        }
        DataTable { columns, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Whether there is nothing to display.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.n_rows == 0
    }

    /// Column names in table order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// The columns whose inferred type supports arithmetic aggregation.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.infer_type().is_numeric())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, values: Vec<CellValue>) -> Column {
        Column {
            name: name.to_string(),
            values,
        }
    }

    #[test]
    fn from_columns_pads_ragged_input() {
        let table = DataTable::from_columns(vec![
            col("a", vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3)]),
            col("b", vec![CellValue::Text("x".into())]),
        ]);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.columns[1].values.len(), 3);
        assert_eq!(table.columns[1].values[2], CellValue::Null);
    }

    #[test]
    fn type_inference_follows_cell_mix() {
        let ints = col("i", vec![CellValue::Int(1), CellValue::Null, CellValue::Int(2)]);
        assert_eq!(ints.infer_type(), ColumnType::Int);

        let mixed_numeric = col("f", vec![CellValue::Int(1), CellValue::Float(2.5)]);
        assert_eq!(mixed_numeric.infer_type(), ColumnType::Float);

        let mixed = col("m", vec![CellValue::Int(1), CellValue::Text("x".into())]);
        assert_eq!(mixed.infer_type(), ColumnType::Text);

        let empty = col("e", vec![CellValue::Null, CellValue::Null]);
        assert_eq!(empty.infer_type(), ColumnType::Empty);
        assert!(!empty.infer_type().is_numeric());
    }

    #[test]
    fn missing_and_distinct_counts() {
        let c = col(
            "c",
            vec![
                CellValue::Text("a".into()),
                CellValue::Text("a".into()),
                CellValue::Text("b".into()),
                CellValue::Null,
            ],
        );
        assert_eq!(c.missing_count(), 1);
        assert_eq!(c.distinct_count(), 2);
    }

    #[test]
    fn empty_table_reports_empty() {
        assert!(DataTable::empty().is_empty());

        // Columns but no rows is still "nothing to display".
        let header_only = DataTable::from_columns(vec![col("a", vec![])]);
        assert!(header_only.is_empty());
        assert_eq!(header_only.n_cols(), 1);
    }
}
