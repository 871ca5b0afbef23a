use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use encoding_rs::{Encoding, WINDOWS_1252};
use thiserror::Error;

use super::model::{CellValue, Column, DataTable};

/// Fixed name of the delimited-text fallback file.
pub const CSV_FALLBACK_NAME: &str = "Sheet1.csv";

/// Spreadsheet extensions tried before the delimited-text fallback.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

// ---------------------------------------------------------------------------
// Options and outcome types
// ---------------------------------------------------------------------------

/// What to do with a delimited-text row whose field count does not match the
/// header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRowPolicy {
    /// Drop the row and count it.
    #[default]
    Skip,
    /// Abort the delimited-text attempt (the loader then ends in the
    /// empty-table terminal state).
    Fail,
    /// Drop the row from the table but keep its raw fields in the outcome.
    Collect,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub on_malformed_row: MalformedRowPolicy,
    /// Encoding of the delimited-text fallback. WINDOWS-1252 is the WHATWG
    /// mapping of the `latin1` label and decodes every byte sequence.
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            on_malformed_row: MalformedRowPolicy::Skip,
            encoding: WINDOWS_1252,
        }
    }
}

/// A row dropped by [`MalformedRowPolicy::Collect`].
#[derive(Debug, Clone)]
pub struct MalformedRow {
    /// 1-based line number within the source file.
    pub line: u64,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    DelimitedText,
}

/// The file the loader actually read.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub format: SourceFormat,
}

/// Result of [`load`]: always a valid (possibly empty) table, never an error.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub table: DataTable,
    /// `None` when no file could be read at all.
    pub source: Option<LoadedSource>,
    /// Rows dropped by the malformed-row policy (delimited text only).
    pub rows_skipped: usize,
    /// Raw content of dropped rows under [`MalformedRowPolicy::Collect`].
    pub malformed: Vec<MalformedRow>,
}

impl LoadOutcome {
    fn empty() -> Self {
        LoadOutcome {
            table: DataTable::empty(),
            source: None,
            rows_skipped: 0,
            malformed: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can go wrong while locating or parsing a data file.
/// None of these escape [`load`]; each either falls through to the next
/// format or ends in the empty-table terminal state.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data directory `{0}` is missing or unreadable")]
    MissingDataDir(PathBuf),
    #[error("failed to parse spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("workbook `{0}` has no worksheets")]
    EmptyWorkbook(PathBuf),
    #[error("failed to parse delimited text: {0}")]
    Csv(#[from] csv::Error),
    #[error("reading `{0}`: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("malformed row at line {line}: {fields} fields, expected {expected}")]
    MalformedRow {
        line: u64,
        fields: usize,
        expected: usize,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the data file from `data_dir`.
///
/// Ordered, first-match-wins fallback chain with no retries:
/// 1. the lexicographically first `.xlsx`/`.xls` file, parsed fully;
/// 2. on spreadsheet absence or parse failure, `Sheet1.csv`, parsed
///    permissively per `options`;
/// 3. on total failure, an empty table.
///
/// Never returns an error: every failure is logged and absorbed. A failed
/// spreadsheet parse does not try a second spreadsheet file.
pub fn load(data_dir: &Path, options: &LoadOptions) -> LoadOutcome {
    match find_spreadsheet(data_dir) {
        Ok(Some(path)) => match load_spreadsheet(&path) {
            Ok(table) => {
                log::info!(
                    "loaded spreadsheet {}: {} rows, {} columns",
                    path.display(),
                    table.n_rows(),
                    table.n_cols()
                );
                return LoadOutcome {
                    table,
                    source: Some(LoadedSource {
                        path,
                        format: SourceFormat::Spreadsheet,
                    }),
                    rows_skipped: 0,
                    malformed: Vec::new(),
                };
            }
            Err(e) => log::warn!(
                "failed to read spreadsheet {}: {e}; trying {CSV_FALLBACK_NAME}",
                path.display()
            ),
        },
        Ok(None) => log::debug!("no spreadsheet file in {}", data_dir.display()),
        Err(e) => {
            log::warn!("{e}");
            return LoadOutcome::empty();
        }
    }

    let csv_path = data_dir.join(CSV_FALLBACK_NAME);
    if csv_path.is_file() {
        match load_delimited(&csv_path, options) {
            Ok(csv) => {
                log::info!(
                    "loaded {}: {} rows parsed, {} skipped",
                    csv_path.display(),
                    csv.table.n_rows(),
                    csv.rows_skipped
                );
                return LoadOutcome {
                    table: csv.table,
                    source: Some(LoadedSource {
                        path: csv_path,
                        format: SourceFormat::DelimitedText,
                    }),
                    rows_skipped: csv.rows_skipped,
                    malformed: csv.malformed,
                };
            }
            Err(e) => log::error!("failed to read {}: {e}", csv_path.display()),
        }
    } else {
        log::debug!("no {CSV_FALLBACK_NAME} in {}", data_dir.display());
    }

    log::error!("no readable data file in {}", data_dir.display());
    LoadOutcome::empty()
}

// ---------------------------------------------------------------------------
// File discovery
// ---------------------------------------------------------------------------

/// Find the spreadsheet file to load, if any.
///
/// Directory-listing order is platform-dependent, so candidates are sorted
/// by path (byte-wise lexicographic on the file name) and the first wins.
fn find_spreadsheet(dir: &Path) -> Result<Option<PathBuf>, LoadError> {
    let entries = fs::read_dir(dir).map_err(|_| LoadError::MissingDataDir(dir.to_path_buf()))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    let ext = ext.to_ascii_lowercase();
                    SPREADSHEET_EXTENSIONS.contains(&ext.as_str())
                })
                .unwrap_or(false)
        })
        .collect();

    candidates.sort();
    Ok(candidates.into_iter().next())
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Parse the first worksheet of an `.xlsx`/`.xls` file: first row is the
/// header, every following row is data.
fn load_spreadsheet(path: &Path) -> Result<DataTable, LoadError> {
    let mut workbook = open_workbook_auto(path)?;

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(LoadError::EmptyWorkbook(path.to_path_buf()));
    };
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataTable::empty());
    };

    let mut columns: Vec<Column> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| Column::new(header_name(cell, idx)))
        .collect();

    for row in rows {
        for (idx, col) in columns.iter_mut().enumerate() {
            col.values.push(convert_cell(row.get(idx).unwrap_or(&Data::Empty)));
        }
    }

    Ok(DataTable::from_columns(columns))
}

fn header_name(cell: &Data, idx: usize) -> String {
    match cell {
        Data::Empty => format!("column_{idx}"),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(s.to_string())
            }
        }
        // Excel serial date number; kept numeric so date columns still chart.
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Delimited-text loader
// ---------------------------------------------------------------------------

struct CsvLoad {
    table: DataTable,
    rows_skipped: usize,
    malformed: Vec<MalformedRow>,
}

/// Parse the fallback file permissively: bytes are decoded through
/// `options.encoding`, the delimiter is sniffed from the header line, and
/// rows whose field count differs from the header go through the
/// malformed-row policy.
fn load_delimited(path: &Path, options: &LoadOptions) -> Result<CsvLoad, LoadError> {
    let raw = fs::read(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))?;
    let delimiter = sniff_delimiter(&raw);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(raw.as_slice());

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|field| decode_field(field, options.encoding))
        .collect();
    if headers.is_empty() {
        return Ok(CsvLoad {
            table: DataTable::empty(),
            rows_skipped: 0,
            malformed: Vec::new(),
        });
    }

    let mut columns: Vec<Column> = headers.into_iter().map(Column::new).collect();
    let mut rows_skipped = 0usize;
    let mut malformed = Vec::new();
    let mut record = csv::ByteRecord::new();

    loop {
        let line = reader.position().line();
        match reader.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) if record.len() != columns.len() => match options.on_malformed_row {
                MalformedRowPolicy::Skip => {
                    rows_skipped += 1;
                    log::debug!(
                        "skipping malformed row at line {line}: {} fields, expected {}",
                        record.len(),
                        columns.len()
                    );
                }
                MalformedRowPolicy::Fail => {
                    return Err(LoadError::MalformedRow {
                        line,
                        fields: record.len(),
                        expected: columns.len(),
                    });
                }
                MalformedRowPolicy::Collect => {
                    rows_skipped += 1;
                    malformed.push(MalformedRow {
                        line,
                        fields: record
                            .iter()
                            .map(|field| decode_field(field, options.encoding))
                            .collect(),
                    });
                }
            },
            Ok(true) => {
                for (idx, field) in record.iter().enumerate() {
                    let text = decode_field(field, options.encoding);
                    columns[idx].values.push(guess_cell(&text));
                }
            }
            // The csv reader continues with the next record after an error.
            Err(e) => match options.on_malformed_row {
                MalformedRowPolicy::Fail => return Err(e.into()),
                _ => {
                    rows_skipped += 1;
                    log::debug!("skipping unreadable row at line {line}: {e}");
                }
            },
        }
    }

    Ok(CsvLoad {
        table: DataTable::from_columns(columns),
        rows_skipped,
        malformed,
    })
}

fn decode_field(field: &[u8], encoding: &'static Encoding) -> String {
    let (text, _, _) = encoding.decode(field);
    text.trim().to_string()
}

/// Pick the delimiter by counting candidates in the header line.
/// Ties go to the earlier candidate, so a plain file stays comma-separated.
fn sniff_delimiter(raw: &[u8]) -> u8 {
    let header = raw.split(|&b| b == b'\n').next().unwrap_or(raw);

    let mut best = b',';
    let mut best_count = 0usize;
    for &candidate in &[b',', b';', b'\t', b'|'] {
        let count = header.iter().filter(|&&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

fn guess_cell(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Int(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnType;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) {
        fs::write(dir.path().join(name), bytes).expect("write test file");
    }

    #[test]
    fn xlsx_row_and_column_counts_match_source() {
        let dir = TempDir::new().unwrap();
        fs::copy(fixture("predictions.xlsx"), dir.path().join("predictions.xlsx")).unwrap();

        let outcome = load(dir.path(), &LoadOptions::default());

        assert_eq!(outcome.table.n_rows(), 4);
        assert_eq!(outcome.table.n_cols(), 3);
        assert_eq!(
            outcome.table.column_names().collect::<Vec<_>>(),
            vec!["id", "score", "label"]
        );
        assert_eq!(outcome.table.columns[1].infer_type(), ColumnType::Float);
        assert!(matches!(
            outcome.source,
            Some(LoadedSource {
                format: SourceFormat::Spreadsheet,
                ..
            })
        ));
    }

    #[test]
    fn spreadsheet_wins_over_fallback_csv() {
        let dir = TempDir::new().unwrap();
        fs::copy(fixture("predictions.xlsx"), dir.path().join("predictions.xlsx")).unwrap();
        write_file(&dir, CSV_FALLBACK_NAME, b"other,columns\n1,2\n");

        let outcome = load(dir.path(), &LoadOptions::default());

        let source = outcome.source.expect("a file was loaded");
        assert_eq!(source.format, SourceFormat::Spreadsheet);
        assert_eq!(outcome.table.column_names().next(), Some("id"));
    }

    #[test]
    fn broken_spreadsheet_falls_through_without_second_attempt() {
        let dir = TempDir::new().unwrap();
        // `a.xlsx` sorts first and is unreadable; the valid `b.xlsx` must NOT
        // be tried next: the loader goes straight to the csv fallback.
        write_file(&dir, "a.xlsx", b"this is not a zip archive");
        fs::copy(fixture("predictions.xlsx"), dir.path().join("b.xlsx")).unwrap();
        write_file(&dir, CSV_FALLBACK_NAME, b"x,y\n1,2\n3,4\n");

        let outcome = load(dir.path(), &LoadOptions::default());

        let source = outcome.source.expect("csv fallback should load");
        assert_eq!(source.format, SourceFormat::DelimitedText);
        assert_eq!(outcome.table.n_rows(), 2);
    }

    #[test]
    fn spreadsheet_pick_is_lexicographic() {
        let dir = TempDir::new().unwrap();
        fs::copy(fixture("predictions.xlsx"), dir.path().join("a.xlsx")).unwrap();
        write_file(&dir, "z.xlsx", b"garbage that would fail to parse");

        let outcome = load(dir.path(), &LoadOptions::default());

        let source = outcome.source.expect("a.xlsx should load");
        assert_eq!(source.path.file_name().unwrap(), "a.xlsx");
        assert_eq!(outcome.table.n_rows(), 4);
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            CSV_FALLBACK_NAME,
            b"a,b\n1,2\n3\n4,5\n6,7,8\n9,10\n",
        );

        let outcome = load(dir.path(), &LoadOptions::default());

        assert_eq!(outcome.table.n_rows(), 3);
        assert_eq!(outcome.rows_skipped, 2);
        assert!(outcome.malformed.is_empty());
    }

    #[test]
    fn collect_policy_retains_dropped_rows() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, CSV_FALLBACK_NAME, b"a,b\n1,2\n3,4,5\n");

        let options = LoadOptions {
            on_malformed_row: MalformedRowPolicy::Collect,
            ..LoadOptions::default()
        };
        let outcome = load(dir.path(), &options);

        assert_eq!(outcome.table.n_rows(), 1);
        assert_eq!(outcome.rows_skipped, 1);
        assert_eq!(outcome.malformed.len(), 1);
        assert_eq!(outcome.malformed[0].fields, vec!["3", "4", "5"]);
    }

    #[test]
    fn fail_policy_ends_in_empty_table() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, CSV_FALLBACK_NAME, b"a,b\n1,2\n3\n");

        let options = LoadOptions {
            on_malformed_row: MalformedRowPolicy::Fail,
            ..LoadOptions::default()
        };
        let outcome = load(dir.path(), &options);

        assert!(outcome.table.is_empty());
        assert!(outcome.source.is_none());
    }

    #[test]
    fn missing_directory_yields_empty_outcome() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let outcome = load(&missing, &LoadOptions::default());

        assert!(outcome.table.is_empty());
        assert!(outcome.source.is_none());
    }

    #[test]
    fn directory_without_data_files_yields_empty_outcome() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "notes.txt", b"not a data file");

        let outcome = load(dir.path(), &LoadOptions::default());

        assert!(outcome.table.is_empty());
        assert!(outcome.source.is_none());
    }

    #[test]
    fn fallback_csv_is_decoded_as_windows_1252() {
        let dir = TempDir::new().unwrap();
        // "région" / "café" with 0xE9 for "é".
        write_file(
            &dir,
            CSV_FALLBACK_NAME,
            b"r\xE9gion,count\ncaf\xE9,3\nbar,4\n",
        );

        let outcome = load(dir.path(), &LoadOptions::default());

        assert_eq!(outcome.table.column_names().next(), Some("r\u{e9}gion"));
        assert_eq!(
            outcome.table.columns[0].values[0],
            CellValue::Text("caf\u{e9}".into())
        );
    }

    #[test]
    fn delimiter_is_sniffed_from_header() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, CSV_FALLBACK_NAME, b"a;b;c\n1;2;3\n4;5;6\n");

        let outcome = load(dir.path(), &LoadOptions::default());

        assert_eq!(outcome.table.n_cols(), 3);
        assert_eq!(outcome.table.n_rows(), 2);
        assert_eq!(outcome.table.columns[2].values[1], CellValue::Int(6));
    }

    #[test]
    fn sniffer_prefers_comma_on_ties() {
        assert_eq!(sniff_delimiter(b"a,b|c,d\n"), b',');
        assert_eq!(sniff_delimiter(b"a\tb\tc\n"), b'\t');
        assert_eq!(sniff_delimiter(b"plain\n"), b',');
    }

    #[test]
    fn cell_guessing_matches_value_shapes() {
        assert_eq!(guess_cell(""), CellValue::Null);
        assert_eq!(guess_cell("42"), CellValue::Int(42));
        assert_eq!(guess_cell("4.25"), CellValue::Float(4.25));
        assert_eq!(guess_cell("true"), CellValue::Bool(true));
        assert_eq!(guess_cell("hello"), CellValue::Text("hello".into()));
    }
}
