//! CSV format options

use encoding_rs::{Encoding, UTF_8};

use crate::error::{CsvError, CsvResult};

/// Dialect and format options shared by readers and writers
///
/// The default is the "excel" dialect: comma delimiter, double-quote
/// quoting with doubled quotes, minimal quoting, CRLF line endings and UTF-8
/// text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Escape quotes by doubling them (default: true)
    pub double_quote: bool,
    /// Escape character used when `double_quote` is off
    pub escape: Option<u8>,
    /// When fields are quoted on write
    pub quoting: QuoteStyle,
    /// Line terminator written after each record
    pub line_terminator: LineTerminator,
    /// Text encoding of the file; must be ASCII-compatible
    pub encoding: &'static Encoding,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self::excel()
    }
}

impl CsvOptions {
    /// Comma-separated, CRLF-terminated
    pub fn excel() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            double_quote: true,
            escape: None,
            quoting: QuoteStyle::Minimal,
            line_terminator: LineTerminator::CRLF,
            encoding: UTF_8,
        }
    }

    /// Like [`CsvOptions::excel`] but tab-separated
    pub fn excel_tab() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::excel()
        }
    }

    /// LF-terminated with every field quoted
    pub fn unix() -> Self {
        Self {
            quoting: QuoteStyle::All,
            line_terminator: LineTerminator::LF,
            ..Self::excel()
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Set the escape character and turn off quote doubling
    pub fn with_escape(mut self, escape: u8) -> Self {
        self.escape = Some(escape);
        self.double_quote = false;
        self
    }

    /// Set the quoting style
    pub fn with_quoting(mut self, quoting: QuoteStyle) -> Self {
        self.quoting = quoting;
        self
    }

    /// Set the line terminator
    pub fn with_line_terminator(mut self, line_terminator: LineTerminator) -> Self {
        self.line_terminator = line_terminator;
        self
    }

    /// Set the text encoding
    ///
    /// Fields are split on raw bytes, so only encodings that keep ASCII
    /// bytes as-is are supported; UTF-16 and ISO-2022-JP are rejected.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> CsvResult<Self> {
        self.encoding = encoding;
        self.check_encoding()?;
        Ok(self)
    }

    /// Set the text encoding from a label such as `"latin1"` or `"windows-1252"`
    pub fn with_encoding_label(self, label: &str) -> CsvResult<Self> {
        match Encoding::for_label(label.as_bytes()) {
            Some(encoding) => self.with_encoding(encoding),
            None => Err(CsvError::UnsupportedEncoding(label.to_string())),
        }
    }

    fn check_encoding(&self) -> CsvResult<()> {
        if !self.encoding.is_ascii_compatible() {
            return Err(CsvError::UnsupportedEncoding(self.encoding.name().to_string()));
        }
        Ok(())
    }

    /// Reader builder for the underlying CSV primitive
    ///
    /// Headers and row lengths are handled by the typed layer, so the
    /// primitive reads every line as a record and accepts ragged rows.
    pub(crate) fn reader_builder(&self) -> CsvResult<csv::ReaderBuilder> {
        self.check_encoding()?;
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(self.double_quote)
            .escape(self.escape)
            .has_headers(false)
            .flexible(true);
        Ok(builder)
    }

    /// Writer builder for the underlying CSV primitive
    pub(crate) fn writer_builder(&self) -> CsvResult<csv::WriterBuilder> {
        self.check_encoding()?;
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(self.double_quote)
            .quote_style(self.quoting.into())
            .terminator(self.line_terminator.into())
            .has_headers(false);
        if let Some(escape) = self.escape {
            builder.escape(escape);
        }
        Ok(builder)
    }
}

/// Quoting policy on write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Quote only fields that need it
    Minimal,
    /// Quote every field
    All,
    /// Quote every field that is not a number
    NonNumeric,
    /// Never quote
    Never,
}

impl From<QuoteStyle> for csv::QuoteStyle {
    fn from(style: QuoteStyle) -> Self {
        match style {
            QuoteStyle::Minimal => csv::QuoteStyle::Necessary,
            QuoteStyle::All => csv::QuoteStyle::Always,
            QuoteStyle::NonNumeric => csv::QuoteStyle::NonNumeric,
            QuoteStyle::Never => csv::QuoteStyle::Never,
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
    /// Mac classic (CR)
    CR,
}

impl From<LineTerminator> for csv::Terminator {
    fn from(terminator: LineTerminator) -> Self {
        match terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
            LineTerminator::CR => csv::Terminator::Any(b'\r'),
        }
    }
}
