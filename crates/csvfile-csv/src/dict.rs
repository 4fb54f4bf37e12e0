//! Header-driven record reader and writer
//!
//! The first line of the source is the header: each field declares a column
//! name and type (see [`HeaderCell`]). Data rows are decoded through the typed
//! reader and projected into [`Record`]s keyed by column name.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csvfile_core::{CellValue, HeaderCell, Record};

use crate::error::{CsvError, CsvResult};
use crate::options::CsvOptions;
use crate::reader::{self, TypedReader};
use crate::writer::TypedWriter;

/// Reads records from a CSV source whose first line is a typed header
pub struct DictReader<R> {
    header: Vec<HeaderCell>,
    rows: TypedReader<R>,
}

impl DictReader<File> {
    /// Open a file and read its header
    pub fn from_path<P: AsRef<Path>>(path: P, options: &CsvOptions) -> CsvResult<Self> {
        let file = File::open(path)?;
        Self::new(file, options)
    }
}

impl<R: Read> DictReader<R> {
    /// Read the header line from `source`
    ///
    /// Fails with [`CsvError::EmptyFile`] when there is no header line.
    pub fn new(source: R, options: &CsvOptions) -> CsvResult<Self> {
        let mut inner = reader::csv_reader(source, options)?;
        let mut first = csv::ByteRecord::new();
        if !inner.read_byte_record(&mut first)? {
            return Err(CsvError::EmptyFile);
        }
        let fields = reader::decode_text(&first, options.encoding).map_err(|column| {
            CsvError::HeaderEncoding {
                column,
                encoding: options.encoding.name(),
            }
        })?;
        let header = HeaderCell::parse_row(&fields)?;
        tracing::debug!(columns = header.len(), "parsed csv header");

        let types = header.iter().map(|h| h.cell_type).collect();
        Ok(Self {
            header,
            rows: TypedReader::from_csv(inner, types, options.encoding),
        })
    }

    /// Parsed header cells, in column order
    pub fn header(&self) -> &[HeaderCell] {
        &self.header
    }

    /// Read the next record, `None` at end of input
    pub fn read_record(&mut self) -> CsvResult<Option<Record>> {
        let values = match self.rows.read_row()? {
            Some(values) => values,
            None => return Ok(None),
        };
        let record = self
            .header
            .iter()
            .map(|h| h.name.as_str())
            .zip(values)
            .collect();
        Ok(Some(record))
    }

    /// Number of data rows consumed so far
    pub fn rows_read(&self) -> usize {
        self.rows.rows_read()
    }
}

impl<R: Read> Iterator for DictReader<R> {
    type Item = CsvResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

/// Writes records under a typed header
pub struct DictWriter<W: Write> {
    header: Vec<HeaderCell>,
    rows: TypedWriter<W>,
}

impl DictWriter<File> {
    /// Create (or truncate) a file for record writing
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        header: Vec<HeaderCell>,
        options: &CsvOptions,
    ) -> CsvResult<Self> {
        let file = File::create(path)?;
        Self::new(file, header, options)
    }
}

impl<W: Write> DictWriter<W> {
    /// Create a writer over `sink`; the header is not written until
    /// [`DictWriter::write_header`] is called
    pub fn new(sink: W, header: Vec<HeaderCell>, options: &CsvOptions) -> CsvResult<Self> {
        let types = header.iter().map(|h| h.cell_type).collect();
        Ok(Self {
            header,
            rows: TypedWriter::new(sink, types, options)?,
        })
    }

    /// Header cells, in column order
    pub fn header(&self) -> &[HeaderCell] {
        &self.header
    }

    /// Write the header's raw text
    pub fn write_header(&mut self) -> CsvResult<()> {
        self.rows.write_header(&self.header)
    }

    /// Write one record, taking values in header order
    ///
    /// Fields absent from the header are ignored; a header name absent from
    /// the record fails with [`CsvError::MissingKey`].
    pub fn write_record(&mut self, record: &Record) -> CsvResult<()> {
        let values = self
            .header
            .iter()
            .map(|h| {
                record
                    .get(&h.name)
                    .ok_or_else(|| CsvError::MissingKey(h.name.clone()))
            })
            .collect::<CsvResult<Vec<&CellValue>>>()?;
        self.rows.write_fields(values.into_iter())
    }

    /// Write records until the first failure
    pub fn write_records<'a, I>(&mut self, records: I) -> CsvResult<()>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Number of records written so far
    pub fn rows_written(&self) -> usize {
        self.rows.rows_written()
    }

    /// Flush buffered output to the sink
    pub fn flush(&mut self) -> CsvResult<()> {
        self.rows.flush()
    }

    /// Flush and return the sink
    pub fn into_inner(self) -> CsvResult<W> {
        self.rows.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LineTerminator;
    use csvfile_core::CellType;
    use pretty_assertions::assert_eq;

    fn read_all(text: &str) -> CsvResult<Vec<Record>> {
        DictReader::new(text.as_bytes(), &CsvOptions::default())?.collect()
    }

    #[test]
    fn test_dictreader_success() {
        let data = read_all("name:s,num:i\nfoo,1\n").unwrap();
        assert_eq!(data, vec![Record::from([("name", CellValue::from("foo")), ("num", 1.into())])]);
    }

    #[test]
    fn test_dictreader_success_no_types() {
        let data = read_all("name,num\nfoo,1\n").unwrap();
        assert_eq!(data, vec![Record::from([("name", "foo"), ("num", "1")])]);
    }

    #[test]
    fn test_dictreader_header() {
        let reader = DictReader::new("a:i, b :d,c\n".as_bytes(), &CsvOptions::default()).unwrap();
        let types: Vec<_> = reader.header().iter().map(|h| h.cell_type).collect();
        assert_eq!(types, vec![CellType::Int, CellType::Date, CellType::Str]);
        assert_eq!(reader.header()[1].name, "b");
        assert_eq!(reader.header()[1].raw, " b :d");
    }

    #[test]
    fn test_dictreader_row_length_mismatch() {
        let err = read_all("name,num\nfoo,1,2\n").unwrap_err();
        assert!(matches!(
            err,
            CsvError::RowLengthMismatch {
                row: 0,
                actual: 3,
                expected: 2
            }
        ));
        let err = read_all("name,num\nfoo\n").unwrap_err();
        assert!(matches!(
            err,
            CsvError::RowLengthMismatch {
                row: 0,
                actual: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_dictreader_blank_line_counts_as_row() {
        let err = read_all("name,num:i\nfoo,1\n\nbar,x\n").unwrap_err();
        assert!(matches!(
            err,
            CsvError::RowLengthMismatch {
                row: 1,
                actual: 0,
                expected: 2
            }
        ));

        let text = "name,num:i\r\n\r\nbar,x\r\n";
        let reader = DictReader::new(text.as_bytes(), &CsvOptions::default()).unwrap();
        let rows: Vec<_> = reader.collect();
        assert!(matches!(rows[0], Err(CsvError::RowLengthMismatch { row: 0, .. })));
        assert!(matches!(rows[1], Err(CsvError::Cell { row: 1, column: 1, .. })));
    }

    #[test]
    fn test_dictreader_blank_lines_before_header_are_skipped() {
        let data = read_all("\n\nname\nfoo\n").unwrap();
        assert_eq!(data, vec![Record::from([("name", "foo")])]);
    }

    #[test]
    fn test_dictreader_empty_file() {
        assert!(matches!(read_all(""), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_dictreader_unknown_header_type() {
        let err = read_all("foo:wrong\n1\n").unwrap_err();
        assert!(matches!(
            err,
            CsvError::Core(csvfile_core::Error::UnknownType(_))
        ));
    }

    #[test]
    fn test_dictreader_duplicate_names_last_wins() {
        let data = read_all("x:i,x:i\n1,2\n").unwrap();
        assert_eq!(data, vec![Record::from([("x", 2)])]);
    }

    #[test]
    fn test_dict_round_trip_is_byte_identical() {
        let text = "name:s,num:i\nfoo,1\n";
        let options = CsvOptions::excel().with_line_terminator(LineTerminator::LF);
        let reader = DictReader::new(text.as_bytes(), &options).unwrap();
        let header = reader.header().to_vec();
        let records = reader.collect::<CsvResult<Vec<_>>>().unwrap();

        let mut writer = DictWriter::new(Vec::new(), header, &options).unwrap();
        writer.write_header().unwrap();
        writer.write_records(&records).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn test_dict_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let header = HeaderCell::parse_row(["id:i", "tags:j"]).unwrap();
        let record = Record::from([
            ("id", CellValue::from(1)),
            ("tags", serde_json::json!(["a", "b"]).into()),
        ]);

        let mut writer = DictWriter::from_path(&path, header, &CsvOptions::default()).unwrap();
        writer.write_header().unwrap();
        writer.write_record(&record).unwrap();
        assert_eq!(writer.rows_written(), 1);
        writer.flush().unwrap();
        drop(writer);

        let reader = DictReader::from_path(&path, &CsvOptions::default()).unwrap();
        assert_eq!(reader.collect::<CsvResult<Vec<_>>>().unwrap(), vec![record]);
    }

    #[test]
    fn test_dictwriter_missing_key() {
        let header = HeaderCell::parse_row(["name", "num:i"]).unwrap();
        let mut writer = DictWriter::new(Vec::new(), header, &CsvOptions::default()).unwrap();
        let err = writer
            .write_record(&Record::from([("name", "foo")]))
            .unwrap_err();
        assert!(matches!(err, CsvError::MissingKey(ref name) if name == "num"));
    }

    #[test]
    fn test_dictwriter_uses_header_order() {
        let header = HeaderCell::parse_row(["a:i", "b"]).unwrap();
        let mut writer = DictWriter::new(Vec::new(), header, &CsvOptions::default()).unwrap();
        let record = Record::from([
            ("extra", CellValue::from(true)),
            ("b", "x".into()),
            ("a", 7.into()),
        ]);
        writer.write_record(&record).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "7,x\r\n");
    }
}
