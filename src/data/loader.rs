use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, WriterBuilder};

use super::error::TableError;
use super::filter::{self, FilterPredicate};
use super::model::{Column, ColumnData, Table};

// ---------------------------------------------------------------------------
// Format selection
// ---------------------------------------------------------------------------

/// Supported delimited-text formats.
///
/// There is intentionally no `Default`: callers must name the format, and
/// the only way in from a string is [`Format::from_str`], which rejects
/// anything but `"tsv"` and `"csv"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Tsv,
    Csv,
}

impl Format {
    pub fn delimiter(self) -> u8 {
        match self {
            Format::Tsv => b'\t',
            Format::Csv => b',',
        }
    }
}

impl FromStr for Format {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tsv" => Ok(Format::Tsv),
            "csv" => Ok(Format::Csv),
            other => Err(TableError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Tsv => write!(f, "tsv"),
            Format::Csv => write!(f, "csv"),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a delimited file into a [`Table`], eagerly and in full.
///
/// The first line is the header row; every column gets a single type
/// inferred from its cells. Ragged rows, duplicate column names, and a
/// missing header row are parse errors.
pub fn load(path: &Path, format: Format) -> Result<Table, TableError> {
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .delimiter(format.delimiter())
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_error(path, format!("reading header row: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        return Err(parse_error(path, "missing header row".to_string()));
    }
    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) {
            return Err(parse_error(path, format!("duplicate column name {name:?}")));
        }
    }

    // Collect raw cells column-major; the reader rejects ragged rows.
    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| parse_error(path, format!("row {row_no}: {e}")))?;
        for (col, field) in record.iter().enumerate() {
            raw[col].push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();
    Ok(Table::new(columns))
}

/// [`load`], then keep only rows passing `predicate` when one is given.
/// With `None` the table comes back unchanged.
pub fn load_and_filter(
    path: &Path,
    format: Format,
    predicate: Option<&FilterPredicate>,
) -> Result<Table, TableError> {
    let table = load(path, format)?;
    match predicate {
        Some(pred) => filter::filter(&table, pred),
        None => Ok(table),
    }
}

/// Serialize a table back to a delimited file, header row first.
pub fn write(table: &Table, path: &Path, format: Format) -> Result<(), TableError> {
    let file = File::create(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(file);

    writer
        .write_record(table.column_names())
        .map_err(|e| write_error(path, e))?;
    for row in 0..table.n_rows() {
        let fields: Vec<String> = table.row(row).iter().map(ToString::to_string).collect();
        writer
            .write_record(&fields)
            .map_err(|e| write_error(path, e))?;
    }
    writer.flush().map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_error(path: &Path, message: String) -> TableError {
    TableError::Parse {
        path: path.to_path_buf(),
        message,
    }
}

fn write_error(path: &Path, e: csv::Error) -> TableError {
    match e.into_kind() {
        csv::ErrorKind::Io(source) => TableError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => parse_error(path, format!("{other:?}")),
    }
}

/// Decide one type for a whole column: `Int` if every cell parses as `i64`,
/// else `Float` if every cell parses as `f64`, else `Bool` if every cell is
/// literally `true`/`false`, else `Str` with the cells kept verbatim.
fn infer_column(name: String, cells: Vec<String>) -> Column {
    let ints: Result<Vec<i64>, _> = cells.iter().map(|s| s.trim().parse()).collect();
    if let Ok(values) = ints {
        return Column {
            name,
            data: ColumnData::Int(values),
        };
    }
    let floats: Result<Vec<f64>, _> = cells.iter().map(|s| s.trim().parse()).collect();
    if let Ok(values) = floats {
        return Column {
            name,
            data: ColumnData::Float(values),
        };
    }
    if cells.iter().all(|s| s == "true" || s == "false") {
        return Column {
            name,
            data: ColumnData::Bool(cells.iter().map(|s| s == "true").collect()),
        };
    }
    Column {
        name,
        data: ColumnData::Str(cells),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ColumnType, Value};
    use anyhow::Result;
    use tempfile::tempdir;

    const COUNTS_TSV: &str = "Sample_ID\tClassified_insects\ns1\t5000\ns2\t15000\ns3\t10000\n";

    fn write_input(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_counts_tsv() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(&dir, "counts.tsv", COUNTS_TSV);

        let table = load(&path, Format::Tsv)?;
        assert_eq!(table.column_names(), vec!["Sample_ID", "Classified_insects"]);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.column("Sample_ID")?.dtype(), ColumnType::Str);
        assert_eq!(table.column("Classified_insects")?.dtype(), ColumnType::Int);
        Ok(())
    }

    #[test]
    fn load_two_column_csv() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(&dir, "tiny.csv", "a,b\n1,2\n");

        let table = load(&path, Format::Csv)?;
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.row(0), vec![Value::Int(1), Value::Int(2)]);
        Ok(())
    }

    #[test]
    fn format_rejects_unknown_names() {
        assert!(matches!(
            "invalid".parse::<Format>(),
            Err(TableError::InvalidFormat(name)) if name == "invalid"
        ));
        // exact match only
        assert!("TSV".parse::<Format>().is_err());
        assert_eq!("tsv".parse::<Format>().unwrap(), Format::Tsv);
        assert_eq!("csv".parse::<Format>().unwrap(), Format::Csv);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load(Path::new("/no/such/file.tsv"), Format::Tsv).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn ragged_row_is_a_parse_error() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(&dir, "ragged.tsv", "a\tb\n1\t2\n3\n");

        assert!(matches!(
            load(&path, Format::Tsv),
            Err(TableError::Parse { .. })
        ));
        Ok(())
    }

    #[test]
    fn duplicate_header_is_a_parse_error() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(&dir, "dup.csv", "a,a\n1,2\n");

        assert!(matches!(
            load(&path, Format::Csv),
            Err(TableError::Parse { message, .. }) if message.contains("duplicate")
        ));
        Ok(())
    }

    #[test]
    fn empty_file_is_missing_header() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(&dir, "empty.tsv", "");

        assert!(matches!(
            load(&path, Format::Tsv),
            Err(TableError::Parse { message, .. }) if message.contains("header")
        ));
        Ok(())
    }

    #[test]
    fn float_and_bool_inference() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(&dir, "mix.csv", "ratio,flag\n3.5,true\n2,false\n");

        let table = load(&path, Format::Csv)?;
        assert_eq!(table.column("ratio")?.dtype(), ColumnType::Float);
        assert_eq!(table.column("flag")?.dtype(), ColumnType::Bool);
        assert_eq!(table.row(0), vec![Value::Float(3.5), Value::Bool(true)]);
        Ok(())
    }

    #[test]
    fn filter_keeps_strictly_greater_rows() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(&dir, "counts.tsv", COUNTS_TSV);

        let pred = FilterPredicate::greater_than("Classified_insects", 10000.0);
        let table = load_and_filter(&path, Format::Tsv, Some(&pred))?;
        // the boundary value 10000 is excluded
        assert_eq!(table.n_rows(), 1);
        assert_eq!(
            table.row(0),
            vec![Value::Str("s2".into()), Value::Int(15000)]
        );
        Ok(())
    }

    #[test]
    fn filtered_rows_are_a_subset_in_original_order() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(&dir, "counts.tsv", COUNTS_TSV);

        let pred = FilterPredicate::greater_than("Classified_insects", 6000.0);
        let table = load_and_filter(&path, Format::Tsv, Some(&pred))?;
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.row(0)[0], Value::Str("s2".into()));
        assert_eq!(table.row(1)[0], Value::Str("s3".into()));
        Ok(())
    }

    #[test]
    fn no_predicate_means_no_filtering() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(&dir, "counts.tsv", COUNTS_TSV);

        let plain = load(&path, Format::Tsv)?;
        let unfiltered = load_and_filter(&path, Format::Tsv, None)?;
        assert_eq!(plain, unfiltered);
        Ok(())
    }

    #[test]
    fn filter_errors_surface_from_load_and_filter() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(&dir, "counts.tsv", COUNTS_TSV);

        let missing = FilterPredicate::greater_than("Classified_mammals", 1.0);
        assert!(matches!(
            load_and_filter(&path, Format::Tsv, Some(&missing)),
            Err(TableError::ColumnNotFound(_))
        ));

        let textual = FilterPredicate::greater_than("Sample_ID", 1.0);
        assert!(matches!(
            load_and_filter(&path, Format::Tsv, Some(&textual)),
            Err(TableError::TypeMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn write_then_load_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(&dir, "counts.tsv", COUNTS_TSV);
        let out = dir.path().join("out.csv");

        let table = load(&path, Format::Tsv)?;
        write(&table, &out, Format::Csv)?;
        let reread = load(&out, Format::Csv)?;
        assert_eq!(table, reread);
        Ok(())
    }
}
