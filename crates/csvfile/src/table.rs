//! Whole-file tables
//!
//! A [`Table`] materializes a CSV file in memory. Rows are mutated freely and
//! written back with [`Table::sync`], which always rewrites the whole file.

use std::fs::File;
use std::io;
use std::ops::{Index, IndexMut};
use std::path::{Path, PathBuf};

use csvfile_core::{CellType, HeaderCell, Record};
use csvfile_csv::{CsvError, CsvOptions, CsvResult, DictReader, DictWriter};

use crate::model::Model;

/// Options for loading a table
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// CSV dialect used for both loading and syncing
    pub format: CsvOptions,
    /// Stop after this many data rows
    pub limit: Option<usize>,
}

impl LoadOptions {
    /// Create default options (excel dialect, no limit)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CSV dialect
    pub fn with_format(mut self, format: CsvOptions) -> Self {
        self.format = format;
        self
    }

    /// Load at most `limit` data rows
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// An in-memory CSV file
#[derive(Debug, Clone)]
pub struct Table<M = Record> {
    path: PathBuf,
    options: LoadOptions,
    header: Vec<HeaderCell>,
    rows: Vec<M>,
}

impl<M: Model> Table<M> {
    /// Create an empty table bound to `path` with the given columns
    pub fn new<P: AsRef<Path>>(path: P, header: Vec<HeaderCell>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options: LoadOptions::default(),
            header,
            rows: Vec::new(),
        }
    }

    /// Load a whole file with default options
    pub fn load<P: AsRef<Path>>(path: P) -> CsvResult<Self> {
        Self::load_with(path, LoadOptions::default())
    }

    /// Load a whole file
    ///
    /// A missing or empty file gives an empty table rather than an error.
    pub fn load_with<P: AsRef<Path>>(path: P, options: LoadOptions) -> CsvResult<Self> {
        let mut table = Self {
            path: path.as_ref().to_path_buf(),
            options,
            header: Vec::new(),
            rows: Vec::new(),
        };
        table.reload()?;
        Ok(table)
    }

    /// Replace the in-memory rows and header with the file's current content
    ///
    /// On failure the table keeps its current header and rows.
    pub fn reload(&mut self) -> CsvResult<()> {
        let (header, rows) = self.read_file()?;
        self.header = header;
        self.rows = rows;
        tracing::debug!(
            path = %self.path.display(),
            rows = self.rows.len(),
            "loaded table"
        );
        Ok(())
    }

    fn read_file(&self) -> CsvResult<(Vec<HeaderCell>, Vec<M>)> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no file yet, starting empty");
                return Ok((Vec::new(), Vec::new()));
            }
            Err(e) => return Err(e.into()),
        };
        let mut reader = match DictReader::new(file, &self.options.format) {
            Ok(reader) => reader,
            Err(CsvError::EmptyFile) => {
                tracing::debug!(path = %self.path.display(), "empty file, starting empty");
                return Ok((Vec::new(), Vec::new()));
            }
            Err(e) => return Err(e),
        };

        let mut rows = Vec::new();
        while self.options.limit.map_or(true, |limit| rows.len() < limit) {
            let record = match reader.read_record()? {
                Some(record) => record,
                None => break,
            };
            let row = reader.rows_read() - 1;
            let item = M::from_record(record).map_err(|e| CsvError::Model {
                row,
                source: e.into(),
            })?;
            rows.push(item);
        }
        Ok((reader.header().to_vec(), rows))
    }

    /// Rewrite the whole file: header, then every row
    ///
    /// Does nothing (and creates no file) when the table is empty.
    pub fn sync(&self) -> CsvResult<()> {
        if self.rows.is_empty() {
            tracing::debug!(path = %self.path.display(), "empty table, nothing to sync");
            return Ok(());
        }

        let header = self.resolve_header()?;
        let mut writer = DictWriter::from_path(&self.path, header, &self.options.format)?;
        writer.write_header()?;
        for row in &self.rows {
            writer.write_record(&row.to_record())?;
        }
        writer.flush()?;

        tracing::debug!(
            path = %self.path.display(),
            rows = self.rows.len(),
            "synced table"
        );
        Ok(())
    }

    /// Columns to write: the model's declared columns, else the loaded
    /// header, else one inferred from the rows
    fn resolve_header(&self) -> CsvResult<Vec<HeaderCell>> {
        let declared = M::columns();
        if !declared.is_empty() {
            return Ok(HeaderCell::parse_row(declared)?);
        }
        if !self.header.is_empty() {
            return Ok(self.header.clone());
        }
        Ok(self.infer_header())
    }

    /// Column names come from the first row; each column takes the type of
    /// its first non-null value, `str` when there is none
    fn infer_header(&self) -> Vec<HeaderCell> {
        let first = match self.rows.first() {
            Some(row) => row.to_record(),
            None => return Vec::new(),
        };
        first
            .iter()
            .map(|(name, value)| {
                let cell_type = CellType::of(value)
                    .or_else(|| {
                        self.rows[1..].iter().find_map(|row| {
                            row.to_record().get(name).and_then(CellType::of)
                        })
                    })
                    .unwrap_or(CellType::Str);
                HeaderCell::new(name, cell_type)
            })
            .collect()
    }

    /// Path the table loads from and syncs to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options the table was loaded with
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Set the CSV dialect used by later syncs
    pub fn set_format(&mut self, format: CsvOptions) {
        self.options.format = format;
    }

    /// Header loaded from the file (empty if there was none)
    pub fn header(&self) -> &[HeaderCell] {
        &self.header
    }

    /// Replace the header used by later syncs
    pub fn set_header(&mut self, header: Vec<HeaderCell>) {
        self.header = header;
    }

    /// All rows, in order
    pub fn rows(&self) -> &[M] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by index
    pub fn get(&self, index: usize) -> Option<&M> {
        self.rows.get(index)
    }

    /// Get a mutable row by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut M> {
        self.rows.get_mut(index)
    }

    /// Iterate over rows
    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.rows.iter()
    }

    /// Iterate mutably over rows
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, M> {
        self.rows.iter_mut()
    }

    /// Append a row
    pub fn push<T: Into<M>>(&mut self, row: T) {
        self.rows.push(row.into());
    }

    /// Insert a row at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert<T: Into<M>>(&mut self, index: usize, row: T) {
        self.rows.insert(index, row.into());
    }

    /// Replace the row at `index`, returning the old one
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set<T: Into<M>>(&mut self, index: usize, row: T) -> M {
        std::mem::replace(&mut self.rows[index], row.into())
    }

    /// Remove and return the row at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> M {
        self.rows.remove(index)
    }

    /// Keep the first `len` rows
    pub fn truncate(&mut self, len: usize) {
        self.rows.truncate(len);
    }

    /// Remove every row; the header is kept
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

impl<M> Index<usize> for Table<M> {
    type Output = M;

    fn index(&self, index: usize) -> &M {
        &self.rows[index]
    }
}

impl<M> IndexMut<usize> for Table<M> {
    fn index_mut(&mut self, index: usize) -> &mut M {
        &mut self.rows[index]
    }
}

impl<M: Model, T: Into<M>> Extend<T> for Table<M> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, rows: I) {
        self.rows.extend(rows.into_iter().map(Into::into));
    }
}

impl<'a, M> IntoIterator for &'a Table<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<'a, M> IntoIterator for &'a mut Table<M> {
    type Item = &'a mut M;
    type IntoIter = std::slice::IterMut<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter_mut()
    }
}

impl<M> IntoIterator for Table<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
