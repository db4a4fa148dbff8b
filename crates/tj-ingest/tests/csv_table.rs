use std::io::Write;

use tj_ingest::{IngestError, collect_samples, read_csv_file, read_csv_str};

#[test]
fn quoted_fields_keep_commas_and_newlines() {
    let text = "Date,Market,Notes\n\
                2024-01-02,EURUSD,\"waited for the retest, then entered\"\n\
                2024-01-03,GBPUSD,\"line one\nline two\"\n";
    let table = read_csv_str(text).expect("read csv");
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].cells[2], "waited for the retest, then entered");
    assert_eq!(table.rows[1].cells[2], "line one\nline two");
    assert_eq!(table.rows[1].index, 2);
}

#[test]
fn ragged_rows_are_padded() {
    let table = read_csv_str("A,B,C\n1\n1,2,3,4\n").expect("read csv");
    assert_eq!(table.rows[0].cells, vec!["1", "", ""]);
    assert_eq!(table.rows[1].cells, vec!["1", "2", "3"]);
}

#[test]
fn semicolon_exports_with_decimal_commas() {
    let text = "Datum;Symbol;Risiko\n31.12.2023;DAX;0,5\n02.01.2024;DAX;1,0\n";
    let table = read_csv_str(text).expect("read csv");
    assert_eq!(table.headers, vec!["Datum", "Symbol", "Risiko"]);
    assert_eq!(table.rows[0].cells[2], "0,5");
}

#[test]
fn bom_and_duplicate_headers() {
    let text = "\u{feff}Market,Market,Time\nEURUSD,GBPUSD,09:00\n";
    let table = read_csv_str(text).expect("read csv");
    assert_eq!(table.headers, vec!["Market", "Market (2)", "Time"]);
    let raw = table.raw_rows().next().expect("one row");
    assert_eq!(raw.get("Market (2)"), Some("GBPUSD"));
}

#[test]
fn separator_only_rows_keep_numbering() {
    let table = read_csv_str("A,B\n1,2\n,\n3,4\n").expect("read csv");
    assert_eq!(table.rows.len(), 3);
    assert!(table.rows[1].is_blank());
    assert_eq!(table.rows[2].index, 3);
    assert_eq!(table.non_blank_rows(), 2);
}

#[test]
fn empty_input_is_structural_error() {
    assert!(matches!(read_csv_str(""), Err(IngestError::EmptyCsv)));
    assert!(matches!(read_csv_str("  \n \n"), Err(IngestError::EmptyCsv)));
}

#[test]
fn reads_file_with_invalid_utf8() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"Market,Notes\nEURUSD,caf\xe9\n").expect("write");
    let table = read_csv_file(file.path()).expect("read file");
    assert_eq!(table.rows[0].cells[0], "EURUSD");
    assert!(table.rows[0].cells[1].starts_with("caf"));
}

#[test]
fn missing_file_reports_path() {
    let err = read_csv_file(std::path::Path::new("/nonexistent/trades.csv")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/trades.csv"));
}

#[test]
fn samples_follow_file_order() {
    let table = read_csv_str("Side\n,\nsell\nbuy\nsell\n").expect("read csv");
    let samples = collect_samples(&table, 5);
    assert_eq!(samples.get("Side"), ["sell", "buy"]);
}
