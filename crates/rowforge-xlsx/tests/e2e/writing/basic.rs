//! Smallest complete documents.

use crate::{finish, new_session, sheet_data};
use pretty_assertions::assert_eq;
use rowforge_core::Cell;
use rowforge_xlsx::WorksheetOptions;

#[test]
fn test_two_row_document() {
    let mut sheet = new_session();
    sheet.start_worksheet("Sheet1", WorksheetOptions::default()).unwrap();
    sheet.add_row(&[Cell::from("A"), Cell::from("B")]).unwrap();
    sheet.add_row(&[Cell::from(1), Cell::from(2.5)]).unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    package.assert_all_well_formed();

    let worksheet = package.xml("xl/worksheets/sheet1.xml");
    assert_eq!(
        sheet_data(&worksheet),
        concat!(
            r#"<row r="1"><c t="inlineStr"><is><t>A</t></is></c><c t="inlineStr"><is><t>B</t></is></c></row>"#,
            r#"<row r="2"><c><v>1</v></c><c><v>2.5</v></c></row>"#
        )
    );

    let styles = package.xml("xl/styles.xml");
    assert!(styles.contains(r#"<cellXfs count="2">"#));
    assert!(styles.contains(r#"<fonts count="1">"#));
    assert!(styles.contains(r#"<fills count="2">"#));
}

#[test]
fn test_mandatory_parts_present() {
    let mut sheet = new_session();
    sheet.start_worksheet("Only", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();

    let package = finish(sheet);
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "docProps/app.xml",
        "xl/workbook.xml",
        "xl/_rels/workbook.xml.rels",
        "xl/styles.xml",
        "xl/worksheets/sheet1.xml",
    ] {
        assert!(package.has_part(part), "missing {}", part);
    }
    assert_eq!(package.names().len(), 8);
}

#[test]
fn test_empty_worksheet_has_empty_sheet_data() {
    let mut sheet = new_session();
    sheet.start_worksheet("Blank", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let worksheet = package.xml("xl/worksheets/sheet1.xml");
    assert_eq!(sheet_data(&worksheet), "");
}

#[test]
fn test_workbook_lists_sheets_in_order() {
    let mut sheet = new_session();
    for name in ["First", "Second", "Third"] {
        sheet.start_worksheet(name, WorksheetOptions::default()).unwrap();
        sheet.add_row(&[Cell::from(name)]).unwrap();
        sheet.end_worksheet().unwrap();
    }

    let mut package = finish(sheet);
    let workbook = package.xml("xl/workbook.xml");
    assert!(workbook.contains(concat!(
        r#"<sheet name="First" sheetId="1" r:id="rId1"/>"#,
        r#"<sheet name="Second" sheetId="2" r:id="rId2"/>"#,
        r#"<sheet name="Third" sheetId="3" r:id="rId3"/>"#
    )));
    let rels = package.xml("xl/_rels/workbook.xml.rels");
    assert!(rels.contains(r#"Target="worksheets/sheet3.xml""#));
    assert!(rels.contains(r#"<Relationship Id="rId4""#));

    let second = package.xml("xl/worksheets/sheet2.xml");
    assert_eq!(
        sheet_data(&second),
        r#"<row r="1"><c t="inlineStr"><is><t>Second</t></is></c></row>"#
    );
}

#[test]
fn test_many_rows_through_small_buffer() {
    use rowforge_xlsx::SpreadsheetOptions;

    let mut sheet = crate::session_with(SpreadsheetOptions::new().with_buffer_size(1_024));
    sheet.start_worksheet("Bulk", WorksheetOptions::default()).unwrap();
    let text = "x".repeat(3_000);
    for i in 0..2_000i64 {
        sheet
            .add_row(&[Cell::from(i), Cell::from(text.as_str())])
            .unwrap();
    }
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let worksheet = package.xml("xl/worksheets/sheet1.xml");
    assert_eq!(worksheet.matches("<row ").count(), 2_000);
    assert!(worksheet.contains(r#"<row r="2000"><c><v>1999</v></c>"#));
}
