//! Export/Serializer: delimited text for download.
//!
//! The export covers exactly what the user sees: the rows as filtered and
//! sorted by the current view (every page, not just the current one) and the
//! visible columns in display order. The first line is the header.
//!
//! Fields containing the delimiter, a double quote or a line break are quoted
//! with inner quotes doubled; null cells are empty fields. Every record,
//! including the last one, ends with `\n`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::store::Row;

/// Errors produced while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The CSV writer failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the export file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes `rows` restricted to the columns at `positions`.
///
/// `header` names the exported columns; `positions` are their positions in the
/// row store, in the same order.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if the underlying writer fails.
pub fn to_delimited<'a, I>(
    header: &[String],
    positions: &[usize],
    rows: I,
    delimiter: u8,
) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Row>,
{
    if positions.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    write_fields(&mut writer, header)?;
    let mut count = 0usize;
    for row in rows {
        let fields: Vec<_> = positions.iter().map(|&p| row.get(p).display()).collect();
        write_fields(&mut writer, fields.as_slice())?;
        count += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    debug!(rows = count, bytes = bytes.len(), "exported rows");
    // Every field came from a `str`, so the output is valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_fields<T: AsRef<str>>(
    writer: &mut csv::Writer<Vec<u8>>,
    fields: &[T],
) -> Result<(), ExportError> {
    match fields {
        // csv quotes a lone empty field; write the bare terminator instead.
        [only] if only.as_ref().is_empty() => {
            writer.flush()?;
            writer.get_mut().push(b'\n');
        }
        _ => writer.write_record(fields.iter().map(|f| f.as_ref().as_bytes()))?,
    }
    Ok(())
}

/// Builds the timestamped export file name, e.g.
/// `processed_data_20261019_153000.csv`.
#[must_use]
pub fn export_filename(prefix: &str, now: NaiveDateTime, delimiter: u8) -> String {
    let extension = if delimiter == b'\t' { "tsv" } else { "csv" };
    format!("{prefix}_{}.{extension}", now.format("%Y%m%d_%H%M%S"))
}

/// Writes an export body to `dir` under [`export_filename`] and returns its path.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the file cannot be written.
pub fn write_export(
    dir: &Path,
    prefix: &str,
    now: NaiveDateTime,
    delimiter: u8,
    body: &str,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_filename(prefix, now, delimiter));
    fs::write(&path, body)?;
    debug!(path = %path.display(), "wrote export file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use chrono::NaiveDate;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_simple_export() {
        let rows = [
            Row::new(vec![Value::text("Alice"), Value::from(100)]),
            Row::new(vec![Value::text("Bob"), Value::from(200)]),
        ];
        let out = to_delimited(&header(&["name", "amount"]), &[0, 1], &rows, b',').unwrap();
        assert_eq!(out, "name,amount\nAlice,100\nBob,200\n");
    }

    #[test]
    fn test_quoting() {
        let rows = [Row::new(vec![
            Value::text("He said, \"hi\""),
            Value::text("two\nlines"),
            Value::text("plain"),
        ])];
        let out = to_delimited(&header(&["a", "b", "c"]), &[0, 1, 2], &rows, b',').unwrap();
        assert_eq!(out, "a,b,c\n\"He said, \"\"hi\"\"\",\"two\nlines\",plain\n");
    }

    #[test]
    fn test_null_is_empty_field() {
        let rows = [Row::new(vec![Value::Null, Value::text("x")])];
        let out = to_delimited(&header(&["a", "b"]), &[0, 1], &rows, b',').unwrap();
        assert_eq!(out, "a,b\n,x\n");
    }

    #[test]
    fn test_single_column_null_is_empty_line() {
        let rows = [
            Row::new(vec![Value::Null]),
            Row::new(vec![Value::text("x")]),
            Row::new(vec![Value::text("")]),
        ];
        let out = to_delimited(&header(&["a"]), &[0], &rows, b',').unwrap();
        assert_eq!(out, "a\n\nx\n\n");
    }

    #[test]
    fn test_column_subset_and_order() {
        let rows = [Row::new(vec![Value::from(1), Value::from(2), Value::from(3)])];
        let out = to_delimited(&header(&["c", "a"]), &[2, 0], &rows, b',').unwrap();
        assert_eq!(out, "c,a\n3,1\n");
    }

    #[test]
    fn test_header_only_when_empty() {
        let out = to_delimited(&header(&["a", "b"]), &[0, 1], &[], b',').unwrap();
        assert_eq!(out, "a,b\n");
    }

    #[test]
    fn test_no_columns_is_empty() {
        let rows = [Row::new(vec![Value::from(1)])];
        assert_eq!(to_delimited(&[], &[], &rows, b',').unwrap(), "");
    }

    #[test]
    fn test_custom_delimiter() {
        let rows = [Row::new(vec![Value::text("x;y"), Value::text("z")])];
        let out = to_delimited(&header(&["a", "b"]), &[0, 1], &rows, b';').unwrap();
        assert_eq!(out, "a;b\n\"x;y\";z\n");
    }

    #[test]
    fn test_export_filename() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        assert_eq!(
            export_filename("processed_data", now, b','),
            "processed_data_20261019_153000.csv"
        );
        assert_eq!(export_filename("out", now, b'\t'), "out_20261019_153000.tsv");
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let now = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let path = write_export(dir.path(), "data", now, b',', "a\n1\n").unwrap();
        assert_eq!(path.file_name().unwrap(), "data_20260102_030405.csv");
        assert_eq!(fs::read_to_string(path).unwrap(), "a\n1\n");
    }
}
