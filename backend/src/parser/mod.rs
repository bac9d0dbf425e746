//! Listing table loader with encoding and delimiter auto-detection.
//!
//! Reads a CSV export into a [`RawTable`]:
//!
//! - bytes are decoded after `chardet` detection (UTF-8, Latin-1, CP1252, ...)
//! - the delimiter is picked from `; , TAB |` by counting them in the header
//! - header names are trimmed and matched to the required columns ignoring
//!   case and runs of whitespace
//! - string cells are trimmed, blank cells become missing
//! - numeric cells that cannot be read become missing and are reported as
//!   [`CellWarning`]s rather than errors

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::models::{
    RawRow, RawTable, ADDRESS, CUISINE, DELIVERY_RATING, DELIVERY_RATING_COUNT, DINING_RATING,
    DINING_RATING_COUNT, FEATURES, LOCATION, NAME, PRICE_FOR_TWO, REQUIRED_COLUMNS, TOP_DISHES,
};

/// Candidate delimiters, in tie-break order.
const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// A numeric cell that could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct CellWarning {
    pub line: u64,
    pub column: String,
    pub value: String,
}

impl std::fmt::Display for CellWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line {}, column '{}': '{}' is not a number",
            self.line, self.column, self.value
        )
    }
}

/// Result of loading with metadata.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub table: RawTable,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
    pub warnings: Vec<CellWarning>,
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _confidence, _language) = chardet::detect(bytes);

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes using the given encoding label.
///
/// UTF-8 decoding is lossy and never fails; other labels must be known to
/// `encoding_rs`.
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    let text = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        label => {
            let codec = encoding_rs::Encoding::for_label(label.as_bytes())
                .ok_or_else(|| LoadError::Encoding(format!("unsupported encoding '{}'", label)))?;
            codec.decode(bytes).0.into_owned()
        }
    };
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Pick the delimiter that occurs most often in the header line,
/// ignoring quoted sections.
pub fn detect_delimiter(content: &str) -> char {
    let header = content.lines().next().unwrap_or("");
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut in_quotes = false;

    for c in header.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if !in_quotes && DELIMITERS.contains(&c) => *counts.entry(c).or_default() += 1,
            _ => {}
        }
    }

    DELIMITERS
        .iter()
        .copied()
        .fold((',', 0), |best, d| {
            let n = counts.get(&d).copied().unwrap_or(0);
            if n > best.1 {
                (d, n)
            } else {
                best
            }
        })
        .0
}

/// Canonical form of a header for matching: lowercase, single spaces.
pub fn header_key(header: &str) -> String {
    WHITESPACE
        .replace_all(header.trim(), " ")
        .to_lowercase()
}

/// Load a listing file with auto-detection.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> LoadResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Load listing bytes with auto-detection.
pub fn parse_bytes_auto(bytes: &[u8]) -> LoadResult<ParseResult> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::EmptyFile);
    }

    let detected = detect_encoding(bytes);
    let (content, encoding) = match decode_content(bytes, &detected) {
        Ok(text) => (text, detected),
        Err(_) => (decode_content(bytes, "utf-8")?, "utf-8".to_string()),
    };

    let delimiter = detect_delimiter(&content);
    let (table, warnings) = parse_table(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
        warnings,
    })
}

/// Parse decoded CSV text with an explicit delimiter.
pub fn parse_table(content: &str, delimiter: char) -> LoadResult<(RawTable, Vec<CellWarning>)> {
    if content.trim().is_empty() {
        return Err(LoadError::EmptyFile);
    }
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| LoadError::Encoding(format!("delimiter '{}' is not ASCII", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    let mut warnings = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        rows.push(columns.read_row(&record, line, &mut warnings));
    }

    Ok((RawTable::new(headers, rows), warnings))
}

/// Positions of the required columns within a header row.
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> LoadResult<Self> {
        let keys: Vec<String> = headers.iter().map(|h| header_key(h)).collect();
        let mut positions = HashMap::new();

        for column in REQUIRED_COLUMNS {
            let wanted = header_key(column);
            let idx = keys
                .iter()
                .position(|k| *k == wanted)
                .ok_or_else(|| LoadError::MissingColumn(column.to_string()))?;
            positions.insert(column, idx);
        }

        Ok(Self { positions })
    }

    fn text(&self, record: &csv::StringRecord, column: &str) -> Option<String> {
        let raw = record.get(*self.positions.get(column)?)?.trim();
        (!raw.is_empty()).then(|| raw.to_string())
    }

    fn number(
        &self,
        record: &csv::StringRecord,
        column: &str,
        line: u64,
        warnings: &mut Vec<CellWarning>,
    ) -> Option<f64> {
        let text = self.text(record, column)?;
        match parse_number(&text) {
            Some(v) => Some(v),
            None => {
                if !is_missing_marker(&text) {
                    warnings.push(CellWarning {
                        line,
                        column: column.to_string(),
                        value: text,
                    });
                }
                None
            }
        }
    }

    fn read_row(
        &self,
        record: &csv::StringRecord,
        line: u64,
        warnings: &mut Vec<CellWarning>,
    ) -> RawRow {
        RawRow {
            name: self.text(record, NAME),
            location: self.text(record, LOCATION),
            address: self.text(record, ADDRESS),
            cuisine: self.text(record, CUISINE),
            top_dishes: self.text(record, TOP_DISHES),
            features: self.text(record, FEATURES),
            price_for_two: self.number(record, PRICE_FOR_TWO, line, warnings),
            dining_rating: self.number(record, DINING_RATING, line, warnings),
            dining_rating_count: self.number(record, DINING_RATING_COUNT, line, warnings),
            delivery_rating: self.number(record, DELIVERY_RATING, line, warnings),
            delivery_rating_count: self.number(record, DELIVERY_RATING_COUNT, line, warnings),
        }
    }
}

/// Read a numeric cell. Missing markers and non-finite values yield `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if is_missing_marker(text) {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_missing_marker(text: &str) -> bool {
    matches!(
        text.to_lowercase().as_str(),
        "" | "nan" | "na" | "n/a" | "null" | "none" | "-"
    )
}
