//! CSV reading utilities.

mod header;
mod reader;

pub use reader::{CsvTable, RawRow, SourceRow, detect_delimiter, read_csv_file, read_csv_str};
