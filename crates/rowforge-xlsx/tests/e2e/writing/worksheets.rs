//! Worksheet names, options, merges and row options.

use crate::{finish, new_session, sheet_data};
use pretty_assertions::assert_eq;
use rowforge_core::{Cell, CellRange, Error, Style};
use rowforge_xlsx::{
    ColumnOptions, RowOptions, SheetVisibility, WorksheetOptions, XlsxError,
};

#[test]
fn test_sheet_name_rules() {
    let mut sheet = new_session();
    for bad in ["", "Q1/Q2", "[draft]", "what?", "'quoted'", "this name is far too long to fit"] {
        let err = sheet
            .start_worksheet(bad, WorksheetOptions::default())
            .unwrap_err();
        assert!(
            matches!(err, XlsxError::Core(Error::InvalidSheetName(_))),
            "{:?} -> {:?}",
            bad,
            err
        );
    }
    assert!(!sheet.is_aborted());
    assert_eq!(sheet.sheet_count(), 0);

    sheet.start_worksheet("Data", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();
    assert!(matches!(
        sheet.start_worksheet("data", WorksheetOptions::default()),
        Err(XlsxError::Core(Error::DuplicateSheetName(_)))
    ));
    sheet.start_worksheet("Data 2", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();
    finish(sheet);
}

#[test]
fn test_merged_cells() {
    let mut sheet = new_session();
    sheet.start_worksheet("Merged", WorksheetOptions::default()).unwrap();
    sheet.add_row(&[Cell::from("Title")]).unwrap();
    sheet.merge_cells(CellRange::parse("A1:D1").unwrap()).unwrap();
    sheet.merge_cells(CellRange::parse("A3:B4").unwrap()).unwrap();

    let err = sheet
        .merge_cells(CellRange::parse("B4:C5").unwrap())
        .unwrap_err();
    assert!(matches!(err, XlsxError::Core(Error::InvalidRange(_))));
    assert!(!sheet.is_aborted());
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let xml = package.xml("xl/worksheets/sheet1.xml");
    assert!(xml.ends_with(concat!(
        r#"</sheetData><mergeCells count="2"><mergeCell ref="A1:D1"/>"#,
        r#"<mergeCell ref="A3:B4"/></mergeCells></worksheet>"#
    )));
}

#[test]
fn test_worksheet_layout_options() {
    let mut sheet = new_session();
    let shaded = sheet
        .add_style(&Style::new().fill_color(rowforge_core::Color::LIGHT_GRAY))
        .unwrap();
    let options = WorksheetOptions::new()
        .with_frozen_panes(1, 1)
        .with_column_width(1, 30.0)
        .with_column(3, ColumnOptions::new().with_hidden(true).with_style(shaded))
        .with_auto_filter(CellRange::parse("A1:C1").unwrap());
    sheet.start_worksheet("Layout", options).unwrap();
    sheet.add_header_row(&["Name", "Value", "Note"], None).unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let xml = package.xml("xl/worksheets/sheet1.xml");
    assert!(xml.contains(
        r#"<pane xSplit="1" ySplit="1" topLeftCell="B2" activePane="bottomRight" state="frozen"/>"#
    ));
    assert!(xml.contains(concat!(
        r#"<cols><col min="1" max="1" width="30" customWidth="1"/>"#,
        r#"<col min="3" max="3" style="2" hidden="1"/></cols>"#
    )));
    assert!(xml.contains(r#"<autoFilter ref="A1:C1"/>"#));

    let workbook = package.xml("xl/workbook.xml");
    assert!(workbook.contains(
        r#"<definedName name="_xlnm._FilterDatabase" localSheetId="0" hidden="1">&apos;Layout&apos;!$A$1:$C$1</definedName>"#
    ));
}

#[test]
fn test_invalid_worksheet_options() {
    let mut sheet = new_session();
    let err = sheet
        .start_worksheet("Wide", WorksheetOptions::new().with_column_width(1, 300.0))
        .unwrap_err();
    assert!(matches!(err, XlsxError::Core(Error::InvalidValue(_))));
    assert!(!sheet.is_aborted());
    assert_eq!(sheet.sheet_count(), 0);
}

#[test]
fn test_row_options_and_header_style() {
    let mut sheet = new_session();
    let bold = sheet.add_style(&Style::new().bold(true)).unwrap();
    sheet.start_worksheet("Rows", WorksheetOptions::default()).unwrap();
    sheet.add_header_row(&["Id", "Amount"], Some(bold)).unwrap();
    sheet
        .add_row_with_options(
            &[Cell::from(1), Cell::from(9.75)],
            &RowOptions::new().with_height(24.0),
        )
        .unwrap();
    sheet
        .add_row_with_options(&[], &RowOptions::new().with_hidden(true))
        .unwrap();
    let err = sheet
        .add_row_with_options(&[Cell::from(2)], &RowOptions::new().with_height(500.0))
        .unwrap_err();
    assert!(err.is_validation());
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let xml = package.xml("xl/worksheets/sheet1.xml");
    assert_eq!(
        sheet_data(&xml),
        concat!(
            r#"<row r="1"><c s="2" t="inlineStr"><is><t>Id</t></is></c><c s="2" t="inlineStr"><is><t>Amount</t></is></c></row>"#,
            r#"<row r="2" ht="24" customHeight="1"><c><v>1</v></c><c><v>9.75</v></c></row>"#,
            r#"<row r="3" hidden="1"/>"#
        )
    );
}

#[test]
fn test_hidden_worksheets() {
    let mut sheet = new_session();
    sheet
        .start_worksheet(
            "Lookup",
            WorksheetOptions::new().with_visibility(SheetVisibility::VeryHidden),
        )
        .unwrap();
    sheet.end_worksheet().unwrap();
    sheet.start_worksheet("Visible", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let workbook = package.xml("xl/workbook.xml");
    assert!(workbook.contains(r#"<workbookView firstSheet="1" activeTab="1"/>"#));
    assert!(workbook.contains(r#"<sheet name="Lookup" sheetId="1" state="veryHidden" r:id="rId1"/>"#));
}

#[test]
fn test_all_hidden_worksheets_can_be_caught_before_finish() {
    let mut sheet = new_session();
    sheet
        .start_worksheet(
            "Hidden",
            WorksheetOptions::new().with_visibility(SheetVisibility::Hidden),
        )
        .unwrap();
    sheet.end_worksheet().unwrap();
    assert!(!sheet.has_visible_worksheet());

    sheet.start_worksheet("Shown", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();
    assert!(sheet.has_visible_worksheet());
    finish(sheet);

    let mut sheet = new_session();
    sheet
        .start_worksheet(
            "Only",
            WorksheetOptions::new().with_visibility(SheetVisibility::VeryHidden),
        )
        .unwrap();
    sheet.end_worksheet().unwrap();
    assert!(matches!(
        sheet.finish(),
        Err(XlsxError::InvalidOptions(_))
    ));
}

#[test]
fn test_control_characters_in_sheet_names() {
    let mut sheet = new_session();
    for bad in ["\u{1}", "a\u{2}", "x\u{FFFF}"] {
        assert!(matches!(
            sheet.start_worksheet(bad, WorksheetOptions::default()),
            Err(XlsxError::Core(Error::InvalidSheetName(_)))
        ));
    }
    assert_eq!(sheet.sheet_count(), 0);
    sheet.start_worksheet("a", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let workbook = package.xml("xl/workbook.xml");
    assert!(workbook.contains(r#"<sheets><sheet name="a" sheetId="1" r:id="rId1"/></sheets>"#));
}

#[test]
fn test_ranges_outside_the_sheet() {
    let mut sheet = new_session();
    let err = sheet
        .start_worksheet(
            "Filtered",
            WorksheetOptions::new()
                .with_auto_filter(CellRange::from_indices(0, 0, 2_000_000, 20_000)),
        )
        .unwrap_err();
    assert!(matches!(err, XlsxError::Core(Error::InvalidRange(_))));
    assert_eq!(sheet.sheet_count(), 0);

    sheet.start_worksheet("Merged", WorksheetOptions::default()).unwrap();
    let err = sheet
        .merge_cells(CellRange::from_indices(0, 0, 0, 20_000))
        .unwrap_err();
    assert!(matches!(err, XlsxError::Core(Error::InvalidRange(_))));
    assert!(!sheet.is_aborted());
    sheet.merge_cells(CellRange::from_indices(0, 0, 0, 16_383)).unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let xml = package.xml("xl/worksheets/sheet1.xml");
    assert!(xml.contains(r#"<mergeCell ref="A1:XFD1"/>"#));
}

#[test]
fn test_too_many_cells_in_a_row() {
    let mut sheet = new_session();
    sheet.start_worksheet("Wide", WorksheetOptions::default()).unwrap();
    let cells: Vec<Cell<'_>> = (0..16_385).map(|_| Cell::empty()).collect();
    let err = sheet.add_row(&cells).unwrap_err();
    assert!(matches!(err, XlsxError::Core(Error::InvalidValue(_))));

    let cells: Vec<Cell<'_>> = (0..16_384).map(|_| Cell::empty()).collect();
    sheet.add_row(&cells).unwrap();
    sheet.end_worksheet().unwrap();
    finish(sheet);
}
