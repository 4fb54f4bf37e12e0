//! Typed CSV writer

use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use csvfile_core::{CellType, CellValue, HeaderCell};
use encoding_rs::Encoding;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvOptions;

/// Writes rows of typed values, dumping each through its column's type
pub struct TypedWriter<W: Write> {
    inner: csv::Writer<W>,
    types: Vec<CellType>,
    encoding: &'static Encoding,
    row: usize,
}

impl TypedWriter<File> {
    /// Create (or truncate) a file for typed writing
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        types: Vec<CellType>,
        options: &CsvOptions,
    ) -> CsvResult<Self> {
        let file = File::create(path)?;
        Self::new(file, types, options)
    }
}

impl<W: Write> TypedWriter<W> {
    /// Create a writer over `sink` with one type per column
    pub fn new(sink: W, types: Vec<CellType>, options: &CsvOptions) -> CsvResult<Self> {
        Ok(Self {
            inner: options.writer_builder()?.from_writer(sink),
            types,
            encoding: options.encoding,
            row: 0,
        })
    }

    /// Create a writer from type names or aliases such as `["s", "i"]`
    pub fn with_type_names<I, S>(sink: W, identifiers: I, options: &CsvOptions) -> CsvResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types = CellType::resolve_all(identifiers)?;
        Self::new(sink, types, options)
    }

    /// Column types, in column order
    pub fn types(&self) -> &[CellType] {
        &self.types
    }

    /// Number of data rows written so far
    pub fn rows_written(&self) -> usize {
        self.row
    }

    /// Write the raw text of each header cell
    pub fn write_header(&mut self, header: &[HeaderCell]) -> CsvResult<()> {
        let encoding = self.encoding;
        let fields = header
            .iter()
            .enumerate()
            .map(|(column, h)| {
                encode_text(&h.raw, encoding).ok_or(CsvError::HeaderEncoding {
                    column,
                    encoding: encoding.name(),
                })
            })
            .collect::<CsvResult<Vec<_>>>()?;
        self.inner.write_record(&fields)?;
        Ok(())
    }

    /// Write one row; null values are written blank for every type
    pub fn write_row(&mut self, values: &[CellValue]) -> CsvResult<()> {
        self.write_fields(values.iter())
    }

    /// Write rows until the first failure
    pub fn write_rows<I>(&mut self, rows: I) -> CsvResult<()>
    where
        I: IntoIterator,
        I::Item: AsRef<[CellValue]>,
    {
        for row in rows {
            self.write_row(row.as_ref())?;
        }
        Ok(())
    }

    pub(crate) fn write_fields<'a, I>(&mut self, values: I) -> CsvResult<()>
    where
        I: ExactSizeIterator<Item = &'a CellValue>,
    {
        let row = self.row;
        let encoding = self.encoding;
        crate::check_row_length(row, values.len(), self.types.len())?;
        let fields = values
            .zip(&self.types)
            .enumerate()
            .map(|(column, (value, ty))| {
                let text = encode_field(*ty, value).map_err(|source| CsvError::Cell {
                    row,
                    column,
                    source,
                })?;
                encode_text(&text, encoding)
                    .map(Cow::into_owned)
                    .ok_or(CsvError::Encode {
                        row,
                        column,
                        encoding: encoding.name(),
                    })
            })
            .collect::<CsvResult<Vec<_>>>()?;
        self.inner.write_record(&fields)?;
        tracing::trace!(row, "encoded row");
        self.row += 1;
        Ok(())
    }

    /// Flush buffered output to the sink
    pub fn flush(&mut self) -> CsvResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and return the sink
    pub fn into_inner(self) -> CsvResult<W> {
        self.inner
            .into_inner()
            .map_err(|e| CsvError::Io(e.into_error()))
    }
}

fn encode_field(ty: CellType, value: &CellValue) -> csvfile_core::Result<String> {
    match value {
        CellValue::Null => Ok(String::new()),
        value => ty.dumps(value),
    }
}

/// Text as bytes in `encoding`, `None` when a character has no mapping
fn encode_text<'t>(text: &'t str, encoding: &'static Encoding) -> Option<Cow<'t, [u8]>> {
    let (bytes, _, unmappable) = encoding.encode(text);
    if unmappable {
        None
    } else {
        Some(bytes)
    }
}
