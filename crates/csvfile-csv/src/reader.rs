//! Typed CSV reader

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csvfile_core::{CellType, CellValue};
use encoding_rs::Encoding;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvOptions;

/// Streams rows of a CSV source, converting each field with its column's type
///
/// Rows are produced one at a time, one per physical line. A row that fails
/// conversion or has the wrong number of fields yields an error, but the
/// reader stays usable: the next call moves on to the following row. A blank
/// line is a row with no fields.
pub struct TypedReader<R> {
    inner: csv::Reader<LineSource<R>>,
    types: Vec<CellType>,
    encoding: &'static Encoding,
    record: csv::ByteRecord,
    /// `record` holds a row that has not been returned yet
    pending: bool,
    /// Blank lines skipped by the parser before `record`
    blank_lines: usize,
    row: usize,
}

impl TypedReader<File> {
    /// Open a file for typed reading
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        types: Vec<CellType>,
        options: &CsvOptions,
    ) -> CsvResult<Self> {
        let file = File::open(path)?;
        Self::new(file, types, options)
    }
}

impl<R: Read> TypedReader<R> {
    /// Create a reader over `source` with one type per column
    pub fn new(source: R, types: Vec<CellType>, options: &CsvOptions) -> CsvResult<Self> {
        let inner = csv_reader(source, options)?;
        Ok(Self::from_csv(inner, types, options.encoding))
    }

    /// Create a reader from type names or aliases such as `["s", "i"]`
    pub fn with_type_names<I, S>(source: R, identifiers: I, options: &CsvOptions) -> CsvResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types = CellType::resolve_all(identifiers)?;
        Self::new(source, types, options)
    }

    pub(crate) fn from_csv(
        mut inner: csv::Reader<LineSource<R>>,
        types: Vec<CellType>,
        encoding: &'static Encoding,
    ) -> Self {
        // blank lines before this point (ahead of a header) are not rows
        let consumed = inner.position().byte();
        inner.get_mut().blank_lines_before(consumed);
        Self {
            inner,
            types,
            encoding,
            record: csv::ByteRecord::new(),
            pending: false,
            blank_lines: 0,
            row: 0,
        }
    }

    /// Column types, in column order
    pub fn types(&self) -> &[CellType] {
        &self.types
    }

    /// Number of data rows consumed so far, including rows that failed
    pub fn rows_read(&self) -> usize {
        self.row
    }

    /// Read and convert the next row, `None` at end of input
    pub fn read_row(&mut self) -> CsvResult<Option<Vec<CellValue>>> {
        if self.blank_lines == 0 && !self.pending {
            self.pending = self.inner.read_byte_record(&mut self.record)?;
            let consumed = self.inner.position().byte();
            self.blank_lines = self.inner.get_mut().blank_lines_before(consumed);
        }

        let row = self.row;
        if self.blank_lines > 0 {
            self.blank_lines -= 1;
            self.row += 1;
            tracing::trace!(row, "blank line");
            crate::check_row_length(row, 0, self.types.len())?;
            return Ok(Some(Vec::new()));
        }
        if !self.pending {
            return Ok(None);
        }
        self.pending = false;
        self.row += 1;
        tracing::trace!(row, fields = self.record.len(), "decoding row");
        decode_row(row, &self.record, &self.types, self.encoding).map(Some)
    }
}

impl<R: Read> Iterator for TypedReader<R> {
    type Item = CsvResult<Vec<CellValue>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_row().transpose()
    }
}

/// Build the CSV primitive over `source` with line tracking
pub(crate) fn csv_reader<R: Read>(
    source: R,
    options: &CsvOptions,
) -> CsvResult<csv::Reader<LineSource<R>>> {
    Ok(options.reader_builder()?.from_reader(LineSource::new(source)))
}

/// Decode every field of `record`, or return the index of the first field
/// that is not valid in `encoding`
pub(crate) fn decode_text<'r>(
    record: &'r csv::ByteRecord,
    encoding: &'static Encoding,
) -> Result<Vec<std::borrow::Cow<'r, str>>, usize> {
    record
        .iter()
        .enumerate()
        .map(|(column, bytes)| {
            encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .ok_or(column)
        })
        .collect()
}

fn decode_row(
    row: usize,
    record: &csv::ByteRecord,
    types: &[CellType],
    encoding: &'static Encoding,
) -> CsvResult<Vec<CellValue>> {
    crate::check_row_length(row, record.len(), types.len())?;
    let fields = decode_text(record, encoding).map_err(|column| CsvError::Decode {
        row,
        column,
        encoding: encoding.name(),
    })?;
    fields
        .iter()
        .zip(types)
        .enumerate()
        .map(|(column, (field, ty))| {
            decode_field(*ty, field).map_err(|source| CsvError::Cell {
                row,
                column,
                source,
            })
        })
        .collect()
}

/// Blank text is null for every type except `str`, where it stays an empty string
fn decode_field(ty: CellType, field: &str) -> csvfile_core::Result<CellValue> {
    if ty != CellType::Str && field.trim().is_empty() {
        Ok(CellValue::Null)
    } else {
        ty.loads(field)
    }
}

/// Byte source that remembers what it handed to the CSV parser
///
/// The parser drops empty lines without reporting them. Looking back at the
/// bytes it consumed for a record recovers how many line breaks came before
/// the record's first field.
pub(crate) struct LineSource<R> {
    source: R,
    /// Bytes read but not yet accounted for, starting at stream offset `start`
    buf: Vec<u8>,
    start: u64,
    /// Last byte accounted for
    last: Option<u8>,
}

impl<R> LineSource<R> {
    fn new(source: R) -> Self {
        Self {
            source,
            buf: Vec::new(),
            start: 0,
            last: None,
        }
    }

    /// Count the empty lines between the last call and the first field at or
    /// before stream offset `end`, then forget those bytes
    ///
    /// `\r\n`, `\n` and `\r` each end a line. A `\n` right after a `\r` is the
    /// tail of the previous line's CRLF.
    fn blank_lines_before(&mut self, end: u64) -> usize {
        let len = usize::try_from(end.saturating_sub(self.start))
            .unwrap_or(usize::MAX)
            .min(self.buf.len());
        let mut prev = self.last;
        let mut lines = 0;
        for &b in self.buf[..len].iter().take_while(|&&b| b == b'\r' || b == b'\n') {
            if !(b == b'\n' && prev == Some(b'\r')) {
                lines += 1;
            }
            prev = Some(b);
        }
        if len > 0 {
            self.last = Some(self.buf[len - 1]);
        }
        self.buf.drain(..len);
        self.start += len as u64;
        lines
    }
}

impl<R: Read> Read for LineSource<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = self.source.read(out)?;
        self.buf.extend_from_slice(&out[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read_all(text: &str, types: &[&str]) -> CsvResult<Vec<Vec<CellValue>>> {
        TypedReader::with_type_names(text.as_bytes(), types, &CsvOptions::default())?.collect()
    }

    #[test]
    fn test_reader_success() {
        let data = read_all("foo,1\nbar,2\n", &["s", "i"]).unwrap();
        assert_eq!(
            data,
            vec![
                vec![CellValue::string("foo"), CellValue::Integer(1)],
                vec![CellValue::string("bar"), CellValue::Integer(2)],
            ]
        );
    }

    #[test]
    fn test_reader_none() {
        let data = read_all("foo,1\n,\n", &["s", "i"]).unwrap();
        assert_eq!(data[1], vec![CellValue::string(""), CellValue::Null]);
    }

    #[test]
    fn test_reader_blank_is_null_for_every_non_str_type() {
        let types = ["b", "i", "f", "n", "d", "t", "j"];
        let data = read_all(" ,,\t,,,,\n", &types).unwrap();
        assert_eq!(data, vec![vec![CellValue::Null; types.len()]]);

        let data = read_all("  \n", &["s"]).unwrap();
        assert_eq!(data, vec![vec![CellValue::string("  ")]]);
    }

    #[test]
    fn test_reader_row_length_mismatch() {
        let err = read_all("foo,1\nbar", &["s", "i"]).unwrap_err();
        assert!(matches!(
            err,
            CsvError::RowLengthMismatch {
                row: 1,
                actual: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_reader_continues_after_bad_row() {
        let mut reader =
            TypedReader::with_type_names("1\nx\n3\n".as_bytes(), ["i"], &CsvOptions::default())
                .unwrap();
        assert_eq!(reader.next().unwrap().unwrap(), vec![CellValue::Integer(1)]);
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            CsvError::Cell {
                row: 1,
                column: 0,
                source: csvfile_core::Error::InvalidInt(_)
            }
        ));
        assert_eq!(reader.next().unwrap().unwrap(), vec![CellValue::Integer(3)]);
        assert!(reader.next().is_none());
        assert_eq!(reader.rows_read(), 3);
    }

    #[test]
    fn test_reader_unknown_type_name() {
        let err = read_all("1\n", &["integer"]).unwrap_err();
        assert!(matches!(
            err,
            CsvError::Core(csvfile_core::Error::UnknownType(ref name)) if name == "integer"
        ));
    }

    #[test]
    fn test_reader_quoted_fields_and_delimiter() {
        let options = CsvOptions::excel_tab();
        let reader = TypedReader::with_type_names(
            "\"a\tb\"\t{\"k\": [1]}\n".as_bytes(),
            ["s", "j"],
            &options,
        )
        .unwrap();
        let rows: Vec<_> = reader.collect::<CsvResult<_>>().unwrap();
        assert_eq!(rows[0][0], CellValue::string("a\tb"));
        assert_eq!(rows[0][1], CellValue::Json(serde_json::json!({"k": [1]})));
    }

    fn row_errors(text: &str, types: &[&str]) -> Vec<Result<Vec<CellValue>, (usize, usize)>> {
        TypedReader::with_type_names(text.as_bytes(), types, &CsvOptions::default())
            .unwrap()
            .map(|r| {
                r.map_err(|e| match e {
                    CsvError::RowLengthMismatch { row, actual, .. } => (row, actual),
                    CsvError::Cell { row, column, .. } => (row, 100 + column),
                    other => panic!("unexpected error {other}"),
                })
            })
            .collect()
    }

    #[test]
    fn test_reader_blank_line_is_an_empty_row() {
        let one = |n: i64| -> Result<Vec<CellValue>, (usize, usize)> {
            Ok(vec![CellValue::Integer(n)])
        };
        assert_eq!(row_errors("1\n\n2\n", &["i"]), vec![one(1), Err((1, 0)), one(2)]);
        assert_eq!(row_errors("1\r\n\r\n2\r\n", &["i"]), vec![one(1), Err((1, 0)), one(2)]);
        assert_eq!(row_errors("\n1\n", &["i"]), vec![Err((0, 0)), one(1)]);
        assert_eq!(row_errors("1\n\n", &["i"]), vec![one(1), Err((1, 0))]);
        assert_eq!(row_errors("1\r\n2\r\n", &["i"]), vec![one(1), one(2)]);
        assert_eq!(
            row_errors("1\n\n\n2", &["i"]),
            vec![one(1), Err((1, 0)), Err((2, 0)), one(2)]
        );
    }

    #[test]
    fn test_reader_blank_line_keeps_later_row_numbers() {
        assert_eq!(
            row_errors("a,1\n\nb,x\n", &["s", "i"]),
            vec![
                Ok(vec![CellValue::string("a"), CellValue::Integer(1)]),
                Err((1, 0)),
                Err((2, 101)),
            ]
        );
    }

    #[test]
    fn test_reader_quoted_newlines_are_not_blank_lines() {
        let data = read_all("\"a\n\nb\",1\nc,2\n", &["s", "i"]).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0][0], CellValue::string("a\n\nb"));
    }

    #[test]
    fn test_reader_blank_line_without_columns() {
        let reader = TypedReader::new("\n".as_bytes(), Vec::new(), &CsvOptions::default()).unwrap();
        let rows: Vec<_> = reader.collect::<CsvResult<_>>().unwrap();
        assert_eq!(rows, vec![Vec::<CellValue>::new()]);
    }

    #[test]
    fn test_reader_encoding() {
        let options = CsvOptions::excel().with_encoding(encoding_rs::WINDOWS_1252).unwrap();
        let reader =
            TypedReader::with_type_names(&b"caf\xe9,1\n"[..], ["s", "i"], &options).unwrap();
        let rows: Vec<_> = reader.collect::<CsvResult<_>>().unwrap();
        assert_eq!(rows[0][0], CellValue::string("café"));

        let err = read_all_bytes(b"ok,1\ncaf\xe9,2\n", &["s", "i"]).unwrap_err();
        assert!(matches!(
            err,
            CsvError::Decode {
                row: 1,
                column: 0,
                encoding: "UTF-8"
            }
        ));
    }

    fn read_all_bytes(bytes: &[u8], types: &[&str]) -> CsvResult<Vec<Vec<CellValue>>> {
        TypedReader::with_type_names(bytes, types, &CsvOptions::default())?.collect()
    }
}
