use super::model::{Column, ColumnType, DataTable};

// ---------------------------------------------------------------------------
// Per-column metadata
// ---------------------------------------------------------------------------

/// Derived metadata for one column, recomputed on demand.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: ColumnType,
    pub missing: usize,
    pub distinct: usize,
}

/// One [`ColumnSummary`] per column, in table order.
pub fn summarize_columns(table: &DataTable) -> Vec<ColumnSummary> {
    table
        .columns
        .iter()
        .map(|col| ColumnSummary {
            name: col.name.clone(),
            dtype: col.infer_type(),
            missing: col.missing_count(),
            distinct: col.distinct_count(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Single-column metrics
// ---------------------------------------------------------------------------

/// Minimum, maximum, mean, and median over a column's non-null values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

/// `None` when the column has no non-null numeric values.
pub fn numeric_stats(column: &Column) -> Option<NumericStats> {
    let mut values = column.numeric_values();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let sum: f64 = values.iter().sum();
    Some(NumericStats {
        min: values[0],
        max: values[values.len() - 1],
        mean: sum / values.len() as f64,
        median: quantile(&values, 0.5),
    })
}

// ---------------------------------------------------------------------------
// Descriptive summary (describe)
// ---------------------------------------------------------------------------

/// Descriptive summary of one numeric column: count, mean, sample std,
/// min, quartiles, max.
#[derive(Debug, Clone)]
pub struct DescribeRow {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// One [`DescribeRow`] per numeric column, over non-null values only.
pub fn describe(table: &DataTable) -> Vec<DescribeRow> {
    table
        .numeric_columns()
        .into_iter()
        .filter_map(|col| {
            let mut values = col.numeric_values();
            if values.is_empty() {
                return None;
            }
            values.sort_by(f64::total_cmp);

            let count = values.len();
            let mean = values.iter().sum::<f64>() / count as f64;
            Some(DescribeRow {
                name: col.name.clone(),
                count,
                mean,
                std: sample_std(&values, mean),
                min: values[0],
                q25: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q75: quantile(&values, 0.75),
                max: values[count - 1],
            })
        })
        .collect()
}

/// Sample standard deviation (n − 1 denominator). NaN below two values.
fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Quantile with linear interpolation between closest ranks.
/// `sorted` must be non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let frac = position - lower as f64;
    if lower + 1 >= sorted.len() {
        return sorted[sorted.len() - 1];
    }
    sorted[lower] + frac * (sorted[lower + 1] - sorted[lower])
}
