//! CSV discovery and typed loading of the five datasets.
//!
//! Each file is parsed with the `csv` crate and every field is coerced to the
//! type declared by its [`DatasetKind`] schema.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use insight_core::error::{LoadCause, LoadError};
use insight_core::models::{ColumnType, DatasetKind, Scalar};
use insight_core::Dataset;
use tracing::{debug, warn};

/// Directory depth searched below the data root for dataset files.
const MAX_SEARCH_DEPTH: usize = 3;

// ── DataSources ────────────────────────────────────────────────────────────────

/// Location of each dataset's CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    paths: BTreeMap<DatasetKind, PathBuf>,
}

impl DataSources {
    /// Resolve every canonical file name under `dir`.
    ///
    /// A file directly inside `dir` wins; otherwise the first match (by sorted
    /// path) in a nested directory is used. Kinds with no match still get the
    /// direct path so that loading reports a clear "file not found".
    pub fn from_dir(dir: &Path) -> Self {
        let found = find_csv_files(dir);
        let paths = DatasetKind::ALL
            .into_iter()
            .map(|kind| {
                let direct = dir.join(kind.file_name());
                let path = if direct.is_file() {
                    direct
                } else {
                    found
                        .iter()
                        .find(|p| p.file_name().is_some_and(|n| n == kind.file_name()))
                        .cloned()
                        .unwrap_or(direct)
                };
                (kind, path)
            })
            .collect();
        Self { paths }
    }

    pub fn path(&self, kind: DatasetKind) -> &Path {
        &self.paths[&kind]
    }
}

// ── Public API ─────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(MAX_SEARCH_DEPTH)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "csv")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Read and type the dataset of `kind` stored at `path`.
pub fn read_dataset(kind: DatasetKind, path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| {
        LoadError::new(
            kind,
            LoadCause::FileRead {
                path: path.to_path_buf(),
                source,
            },
        )
    })?;
    let dataset = parse_dataset(kind, file)?;
    debug!(
        dataset = %kind,
        rows = dataset.len(),
        path = %path.display(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Parse CSV text from `input` into a typed dataset of `kind`.
///
/// All schema columns must be present in the header; extra columns are kept
/// as text.
pub fn parse_dataset(kind: DatasetKind, input: impl Read) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::new(kind, e))?
        .iter()
        .map(str::to_string)
        .collect();

    if let Some((missing, _)) = kind
        .schema()
        .iter()
        .find(|(name, _)| !headers.iter().any(|h| h == name))
    {
        return Err(LoadError::new(
            kind,
            LoadCause::MissingColumn(missing.to_string()),
        ));
    }

    let types: Vec<ColumnType> = headers
        .iter()
        .map(|h| kind.column_type(h).unwrap_or(ColumnType::Text))
        .collect();

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LoadError::new(kind, e))?;
        let mut values = Vec::with_capacity(headers.len());
        for (col_idx, ty) in types.iter().enumerate() {
            let field = record.get(col_idx).unwrap_or_default();
            let value = parse_field(field, *ty).ok_or_else(|| {
                LoadError::new(
                    kind,
                    LoadCause::InvalidValue {
                        row: row_idx + 1,
                        column: headers[col_idx].clone(),
                        value: field.to_string(),
                    },
                )
            })?;
            values.push(value);
        }
        rows.push(values);
    }

    Dataset::new(kind.name(), headers, rows)
        .map_err(|e| LoadError::new(kind, LoadCause::Malformed(e.to_string())))
}

// ── Internal helpers ───────────────────────────────────────────────────────────

/// Coerce a raw field to `ty`. Empty fields and `nan` become
/// [`Scalar::Missing`]; `None` means the field is not a valid `ty`.
fn parse_field(field: &str, ty: ColumnType) -> Option<Scalar> {
    let trimmed = field.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Some(Scalar::Missing);
    }

    match ty {
        ColumnType::Text => Some(Scalar::Text(trimmed.to_string())),
        ColumnType::Integer => trimmed.parse::<i64>().ok().map(Scalar::Int).or_else(|| {
            // Integer columns exported by spreadsheets sometimes carry ".0".
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.fract() == 0.0)
                .map(|v| Scalar::Int(v as i64))
        }),
        ColumnType::Float => trimmed.parse::<f64>().ok().map(Scalar::Float),
        ColumnType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .map(Scalar::Date),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const FINANCIAL_CSV: &str = "\
Year,Quarter,Division,Revenue_M,Net_Profit_M,RD_Investment_M,Market_Share_Pct,Employee_Count
2024,Q1,Wayne Tech,100.5,20,5,12.5,1200
2024,Q1,Wayne Foundation,50,,1,3.0,300.0
";

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_parse_field_types() {
        assert_eq!(parse_field("42", ColumnType::Integer), Some(Scalar::Int(42)));
        assert_eq!(parse_field("42.0", ColumnType::Integer), Some(Scalar::Int(42)));
        assert_eq!(parse_field("42.5", ColumnType::Integer), None);
        assert_eq!(parse_field("3", ColumnType::Float), Some(Scalar::Float(3.0)));
        assert_eq!(parse_field("", ColumnType::Float), Some(Scalar::Missing));
        assert_eq!(parse_field("NaN", ColumnType::Integer), Some(Scalar::Missing));
        assert_eq!(
            parse_field("2024-01-31", ColumnType::Date),
            Some(Scalar::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()))
        );
        assert_eq!(parse_field("31/01/2024", ColumnType::Date), None);
    }

    #[test]
    fn test_parse_financial_dataset() {
        let ds = parse_dataset(DatasetKind::Financial, FINANCIAL_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.name(), "financial");
        let second = ds.row(1).unwrap();
        assert_eq!(second.get("Division"), Some(&Scalar::from("Wayne Foundation")));
        assert_eq!(second.get("Net_Profit_M"), Some(&Scalar::Missing));
        assert_eq!(second.get("Employee_Count"), Some(&Scalar::Int(300)));
        assert_eq!(ds.row(0).unwrap().get("Year"), Some(&Scalar::Int(2024)));
    }

    #[test]
    fn test_parse_missing_column_fails() {
        let csv = "Year,Quarter,Division\n2024,Q1,Wayne Tech\n";
        let err = parse_dataset(DatasetKind::Financial, csv.as_bytes()).unwrap_err();
        assert_eq!(err.dataset, DatasetKind::Financial);
        assert!(matches!(err.cause, LoadCause::MissingColumn(ref c) if c == "Revenue_M"));
    }

    #[test]
    fn test_parse_invalid_value_reports_row_and_column() {
        let csv = FINANCIAL_CSV.replace("100.5", "lots");
        let err = parse_dataset(DatasetKind::Financial, csv.as_bytes()).unwrap_err();
        match err.cause {
            LoadCause::InvalidValue { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "Revenue_M");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected cause: {other}"),
        }
    }

    #[test]
    fn test_parse_ragged_record_is_csv_error() {
        let csv = "Year,Quarter,Division,Revenue_M,Net_Profit_M,RD_Investment_M,Market_Share_Pct,Employee_Count\n2024,Q1\n";
        let err = parse_dataset(DatasetKind::Financial, csv.as_bytes()).unwrap_err();
        assert!(matches!(err.cause, LoadCause::Csv(_)));
    }

    #[test]
    fn test_read_dataset_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_dataset(DatasetKind::Hr, &dir.path().join("nope.csv")).unwrap_err();
        assert_eq!(err.dataset, DatasetKind::Hr);
        assert!(matches!(err.cause, LoadCause::FileRead { .. }));
    }

    #[test]
    fn test_find_csv_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("exports");
        std::fs::create_dir_all(&sub).unwrap();
        write_file(dir.path(), "b.csv", "x\n");
        write_file(&sub, "a.csv", "x\n");
        write_file(dir.path(), "notes.txt", "x\n");

        let files = find_csv_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_find_csv_files_nonexistent_path() {
        assert!(find_csv_files(Path::new("/tmp/does-not-exist-wayne-insights")).is_empty());
    }

    #[test]
    fn test_data_sources_prefers_direct_then_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("2024");
        std::fs::create_dir_all(&nested).unwrap();
        write_file(dir.path(), "wayne_financial_data.csv", FINANCIAL_CSV);
        let hr = write_file(&nested, "wayne_hr_analytics.csv", "Date\n");

        let sources = DataSources::from_dir(dir.path());
        assert_eq!(
            sources.path(DatasetKind::Financial),
            dir.path().join("wayne_financial_data.csv")
        );
        assert_eq!(sources.path(DatasetKind::Hr), hr);
        assert_eq!(
            sources.path(DatasetKind::Rd),
            dir.path().join("wayne_rd_portfolio.csv")
        );
    }
}
