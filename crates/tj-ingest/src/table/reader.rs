//! CSV table reading.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use super::header::{dedupe_headers, normalize_header};
use crate::error::{IngestError, Result};

/// Candidate delimiters, in tie-break order.
const DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Lines inspected when detecting the delimiter.
const DELIMITER_PROBE_LINES: usize = 10;

/// One data row as read from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// 1-based position among data rows (header excluded).
    pub index: usize,
    /// Trimmed cells, padded to the header width.
    pub cells: Vec<String>,
}

impl SourceRow {
    /// True when every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(String::is_empty)
    }
}

/// A data row keyed by header, as consumed by the row parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub row_index: usize,
    pub cells: BTreeMap<String, String>,
}

impl RawRow {
    /// Trimmed cell under `header`; `None` when the header is unknown or the cell is empty.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .get(header)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Parsed CSV: normalized unique headers plus data rows.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<SourceRow>,
}

impl CsvTable {
    /// Position of a header.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cells of one column, in row order, including empty ones.
    pub fn column<'a>(&'a self, header: &str) -> impl Iterator<Item = &'a str> + 'a {
        let idx = self.column_index(header);
        self.rows.iter().filter_map(move |row| {
            idx.map(|i| row.cells.get(i).map(String::as_str).unwrap_or(""))
        })
    }

    /// Rows converted to header-keyed maps. Blank rows are included.
    pub fn raw_rows(&self) -> impl Iterator<Item = RawRow> + '_ {
        self.rows.iter().map(|row| RawRow {
            row_index: row.index,
            cells: self
                .headers
                .iter()
                .cloned()
                .zip(row.cells.iter().cloned())
                .collect(),
        })
    }

    /// Number of data rows with at least one non-empty cell.
    pub fn non_blank_rows(&self) -> usize {
        self.rows.iter().filter(|row| !row.is_blank()).count()
    }
}

/// Forward-only line counter over the raw CSV text.
///
/// `\r\n`, `\n` and a lone `\r` each end one line.
struct LineCursor<'a> {
    bytes: &'a [u8],
    byte: usize,
    line: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            byte: 0,
            line: 1,
        }
    }

    /// 1-based line on which the record reported at `start` begins.
    ///
    /// The reader may report a position before the empty lines it skipped,
    /// so leading line terminators are stepped over first.
    fn record_line(&mut self, start: usize) -> usize {
        let mut start = start.max(self.byte).min(self.bytes.len());
        while matches!(self.bytes.get(start), Some(b'\r' | b'\n')) {
            start += 1;
        }
        for idx in self.byte..start {
            match self.bytes[idx] {
                b'\n' => self.line += 1,
                b'\r' if self.bytes.get(idx + 1) != Some(&b'\n') => self.line += 1,
                _ => {}
            }
        }
        self.byte = start;
        self.line
    }
}

fn count_line_breaks(field: &str) -> usize {
    field.matches('\n').count() + field.matches('\r').count() - field.matches("\r\n").count()
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Counts delimiter occurrences outside double quotes.
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Picks the delimiter whose per-line count is highest and most consistent.
///
/// Falls back to a comma when no candidate appears on the first line.
pub fn detect_delimiter(text: &str) -> u8 {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(DELIMITER_PROBE_LINES)
        .collect();
    let mut best = b',';
    let mut best_score = 0usize;
    for delimiter in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_unquoted(line, delimiter))
            .collect();
        let Some(&first) = counts.first() else {
            continue;
        };
        if first == 0 {
            continue;
        }
        let consistent = counts.iter().filter(|&&c| c == first).count();
        let score = first * consistent;
        if score > best_score {
            best_score = score;
            best = delimiter;
        }
    }
    best
}

/// Reads CSV text into a table.
///
/// The first non-blank record is the header row. Data rows are numbered from 1
/// by their position after the header. Records made only of separators and
/// fully empty lines between records both keep their number as blank rows.
pub fn read_csv_str(text: &str) -> Result<CsvTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(IngestError::EmptyCsv);
    }
    let delimiter = detect_delimiter(text);
    let shown = (delimiter as char).escape_default().to_string();
    debug!(delimiter = %shown, "detected CSV delimiter");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut truncated = 0usize;
    // Line where the header record ends, and line breaks quoted inside data
    // records so far. Together they turn a record's start line into its
    // data row number.
    let mut lines = LineCursor::new(text);
    let mut header_end_line = 0usize;
    let mut quoted_newlines = 0usize;
    for record in reader.records() {
        let record = record?;
        let line = record
            .position()
            .and_then(|pos| usize::try_from(pos.byte()).ok())
            .map_or(0, |byte| lines.record_line(byte));
        let embedded: usize = record.iter().map(count_line_breaks).sum();
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        if let Some(names) = headers.as_ref() {
            if cells.len() > names.len() {
                truncated += 1;
            }
            let index = line
                .saturating_sub(header_end_line + quoted_newlines)
                .max(rows.len() + 1);
            // Empty lines never reach us as records; keep their numbers.
            while rows.len() + 1 < index {
                rows.push(SourceRow {
                    index: rows.len() + 1,
                    cells: vec![String::new(); names.len()],
                });
            }
            quoted_newlines += embedded;
            let mut row = Vec::with_capacity(names.len());
            for idx in 0..names.len() {
                row.push(cells.get(idx).cloned().unwrap_or_default());
            }
            rows.push(SourceRow { index, cells: row });
        } else if !cells.iter().all(String::is_empty) {
            header_end_line = line + embedded;
            let names = cells.iter().map(|c| normalize_header(c)).collect();
            headers = Some(dedupe_headers(names));
        }
    }

    let Some(headers) = headers else {
        return Err(IngestError::NoHeaders);
    };
    if truncated > 0 {
        warn!(rows = truncated, "ignored cells beyond the last header column");
    }
    debug!(columns = headers.len(), rows = rows.len(), "read CSV table");
    Ok(CsvTable { headers, rows })
}

/// Reads a CSV file, replacing invalid UTF-8 sequences.
pub fn read_csv_file(path: &Path) -> Result<CsvTable> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                path = %path.display(),
                valid_up_to = err.utf8_error().valid_up_to(),
                "file is not valid UTF-8; some characters will be replaced"
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };
    read_csv_str(&text)
}
