//! Session ordering, poisoning, cancellation and file-backed output.

use std::fs::File;
use std::io::{self, Cursor, Seek, SeekFrom, Write};

use crate::{new_session, session_with, Package};
use rowforge_core::{CancellationToken, Cell, Error};
use rowforge_xlsx::{Spreadsheet, SpreadsheetOptions, WorksheetOptions, XlsxError};

#[test]
fn test_finish_without_worksheet_is_incomplete() {
    let sheet = new_session();
    assert!(matches!(
        sheet.finish(),
        Err(XlsxError::IncompleteDocument(_))
    ));
}

#[test]
fn test_finish_with_open_worksheet_fails() {
    let mut sheet = new_session();
    sheet.start_worksheet("Open", WorksheetOptions::default()).unwrap();
    assert!(matches!(
        sheet.finish(),
        Err(XlsxError::Core(Error::OutOfOrderWrite(_)))
    ));
}

#[test]
fn test_out_of_order_calls_abort_the_session() {
    let mut sheet = new_session();
    sheet.start_worksheet("One", WorksheetOptions::default()).unwrap();
    let err = sheet
        .start_worksheet("Two", WorksheetOptions::default())
        .unwrap_err();
    assert!(matches!(err, XlsxError::Core(Error::OutOfOrderWrite(_))));
    assert!(sheet.is_aborted());

    for result in [
        sheet.add_row(&[Cell::from(1)]),
        sheet.end_worksheet(),
        sheet.merge_cells("A1:B1".parse().unwrap()),
    ] {
        assert!(matches!(result, Err(XlsxError::SessionAborted)));
    }
    assert!(matches!(sheet.finish(), Err(XlsxError::SessionAborted)));
}

#[test]
fn test_end_without_start_aborts() {
    let mut sheet = new_session();
    assert!(matches!(
        sheet.end_worksheet(),
        Err(XlsxError::Core(Error::OutOfOrderWrite(_)))
    ));
    assert!(matches!(
        sheet.add_style(&rowforge_core::Style::new()),
        Err(XlsxError::SessionAborted)
    ));
}

#[test]
fn test_cancellation_before_first_call() {
    let token = CancellationToken::new();
    token.cancel();
    let mut sheet = session_with(SpreadsheetOptions::new().with_cancellation(token));
    let err = sheet
        .start_worksheet("Late", WorksheetOptions::default())
        .unwrap_err();
    assert!(err.is_cancelled());
    assert!(sheet.finish().unwrap_err().is_cancelled());
}

#[test]
fn test_cancellation_mid_document() {
    let token = CancellationToken::new();
    let mut sheet = session_with(SpreadsheetOptions::new().with_cancellation(token.clone()));
    sheet.start_worksheet("Data", WorksheetOptions::default()).unwrap();
    sheet.add_row(&[Cell::from("before")]).unwrap();
    token.cancel();

    assert!(sheet.add_row(&[Cell::from("after")]).unwrap_err().is_cancelled());
    assert!(sheet.add_style(&rowforge_core::Style::new().bold(true)).unwrap_err().is_cancelled());
    assert!(sheet.end_worksheet().unwrap_err().is_cancelled());
    assert!(sheet.finish().unwrap_err().is_cancelled());
}

/// Writer that fails after `budget` bytes
struct FailingWriter {
    inner: Cursor<Vec<u8>>,
    budget: usize,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() > self.budget {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.budget -= buf.len();
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FailingWriter {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[test]
fn test_io_failure_aborts_the_session() {
    let writer = FailingWriter {
        inner: Cursor::new(Vec::new()),
        budget: 4_096,
    };
    let mut sheet = Spreadsheet::new(
        writer,
        SpreadsheetOptions::new()
            .with_buffer_size(1_024)
            .with_compression_level(rowforge_xlsx::CompressionLevel::Stored),
    )
    .unwrap();
    sheet.start_worksheet("Big", WorksheetOptions::default()).unwrap();

    let text = "y".repeat(512);
    let mut failure = None;
    for _ in 0..100 {
        if let Err(e) = sheet.add_row(&[Cell::from(text.as_str())]) {
            failure = Some(e);
            break;
        }
    }
    let failure = failure.expect("the writer should run out of space");
    assert!(!failure.is_validation());
    assert!(sheet.is_aborted());
    assert!(matches!(
        sheet.add_row(&[Cell::from(1)]),
        Err(XlsxError::SessionAborted)
    ));
}

#[test]
fn test_file_backed_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");

    let mut sheet = Spreadsheet::create_file(&path, SpreadsheetOptions::default()).unwrap();
    sheet.start_worksheet("Report", WorksheetOptions::default()).unwrap();
    sheet.add_header_row(&["Name", "Score"], None).unwrap();
    sheet.add_row(&[Cell::from("Ada"), Cell::from(97)]).unwrap();
    sheet.end_worksheet().unwrap();
    let file: File = sheet.finish().unwrap();
    drop(file);

    let bytes = std::fs::read(&path).unwrap();
    let mut package = Package::open(bytes);
    package.assert_all_well_formed();
    let worksheet = package.xml("xl/worksheets/sheet1.xml");
    assert!(worksheet.contains(r#"<row r="2"><c t="inlineStr"><is><t>Ada</t></is></c><c><v>97</v></c></row>"#));
}

#[test]
fn test_create_file_rejects_invalid_options_before_creating() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.xlsx");
    let err = Spreadsheet::create_file(&path, SpreadsheetOptions::new().with_buffer_size(10))
        .unwrap_err();
    assert!(matches!(err, XlsxError::InvalidOptions(_)));
    assert!(!path.exists());
}

#[test]
fn test_document_properties() {
    use chrono::{TimeZone, Utc};
    use rowforge_xlsx::DocumentProperties;

    let properties = DocumentProperties::new()
        .with_title("Quarterly")
        .with_author("Ops")
        .with_created(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap());
    let mut sheet = session_with(SpreadsheetOptions::new().with_properties(properties));
    sheet.start_worksheet("S", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = crate::finish(sheet);
    let core = package.xml("docProps/core.xml");
    assert!(core.contains("<dc:title>Quarterly</dc:title>"));
    assert!(core.contains("<dc:creator>Ops</dc:creator>"));
    assert!(core.contains(r#"<dcterms:created xsi:type="dcterms:W3CDTF">2023-12-31T23:59:59Z</dcterms:created>"#));
    let app = package.xml("docProps/app.xml");
    assert!(app.contains("<vt:lpstr>S</vt:lpstr>"));
}
