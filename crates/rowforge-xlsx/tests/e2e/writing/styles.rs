//! Style registration and the styles part.

use crate::{finish, new_session, session_with, sheet_data};
use pretty_assertions::assert_eq;
use rowforge_core::style::registry::DEFAULT_DATETIME_FORMAT;
use rowforge_core::{BorderStyle, Cell, Color, Error, NumberFormat, Style};
use rowforge_xlsx::{SpreadsheetOptions, WorksheetOptions, XlsxError};

#[test]
fn test_custom_number_formats_get_sequential_ids() {
    let mut sheet = new_session();
    let two = sheet.add_style(&Style::new().number_format("0.00")).unwrap();
    let four = sheet.add_style(&Style::new().number_format("0.0000")).unwrap();
    assert_ne!(two, four);

    sheet.start_worksheet("Numbers", WorksheetOptions::default()).unwrap();
    sheet
        .add_row(&[Cell::styled(1.5, two), Cell::styled(1.5, four)])
        .unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let styles = package.xml("xl/styles.xml");
    assert!(styles.contains(concat!(
        r#"<numFmts count="3">"#,
        r#"<numFmt numFmtId="164" formatCode="yyyy\-mm\-dd\ hh:mm:ss"/>"#,
        r#"<numFmt numFmtId="165" formatCode="0.00"/>"#,
        r#"<numFmt numFmtId="166" formatCode="0.0000"/>"#,
        "</numFmts>"
    )));
    assert!(styles.contains(r#"<cellXfs count="4">"#));
    assert!(styles.contains(r#"<xf numFmtId="165" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#));
    assert!(styles.contains(r#"<xf numFmtId="166" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#));

    let worksheet = package.xml("xl/worksheets/sheet1.xml");
    assert_eq!(
        sheet_data(&worksheet),
        r#"<row r="1"><c s="2"><v>1.5</v></c><c s="3"><v>1.5</v></c></row>"#
    );
}

#[test]
fn test_equal_styles_share_an_id() {
    let mut sheet = new_session();
    let a = sheet
        .add_style(&Style::new().bold(true).fill_color(Color::YELLOW))
        .unwrap();
    let b = sheet
        .add_style(&Style::new().fill_color(Color::YELLOW).bold(true))
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(sheet.add_style(&Style::default()).unwrap().index(), 0);
    assert_eq!(
        sheet
            .add_style(&Style::new().with_number_format(NumberFormat::Custom(
                DEFAULT_DATETIME_FORMAT.to_string()
            )))
            .unwrap()
            .index(),
        1
    );

    sheet.start_worksheet("S", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();
    let mut package = finish(sheet);
    let styles = package.xml("xl/styles.xml");
    assert!(styles.contains(r#"<cellXfs count="3">"#));
    assert!(styles.contains(r#"<fonts count="2">"#));
    assert!(styles.contains(r#"<fills count="3">"#));
}

#[test]
fn test_builtin_formats_keep_their_ids() {
    let mut sheet = new_session();
    sheet.add_style(&Style::new().with_number_format(NumberFormat::percent())).unwrap();
    sheet.start_worksheet("S", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let styles = package.xml("xl/styles.xml");
    assert!(styles.contains(r#"<numFmts count="1">"#));
    assert!(styles.contains(r#"<xf numFmtId="9" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#));
}

#[test]
fn test_border_and_font_tables() {
    let mut sheet = new_session();
    let boxed = sheet
        .add_style(&Style::new().with_border(BorderStyle::all(
            rowforge_core::BorderLineStyle::Medium,
            Color::BLACK,
        )))
        .unwrap();
    let red = sheet
        .add_style(&Style::new().font_color(Color::RED).font_size(14.0))
        .unwrap();
    sheet.start_worksheet("S", WorksheetOptions::default()).unwrap();
    sheet
        .add_row(&[Cell::styled("boxed", boxed), Cell::styled("red", red)])
        .unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let styles = package.xml("xl/styles.xml");
    assert!(styles.contains(r#"<bottom style="medium"><color rgb="FF000000"/></bottom>"#));
    assert!(styles.contains(r#"<font><sz val="14"/><color rgb="FFFF0000"/><name val="Calibri"/></font>"#));
    assert!(styles.contains(r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="0" applyBorder="1"/>"#));
    assert!(styles.contains(r#"<xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>"#));
}

#[test]
fn test_invalid_styles_are_rejected() {
    let mut sheet = new_session();
    let err = sheet.add_style(&Style::new().font_size(0.0)).unwrap_err();
    assert!(matches!(err, XlsxError::Core(Error::InvalidStyle(_))));
    let err = sheet.add_style(&Style::new().number_format("")).unwrap_err();
    assert!(matches!(err, XlsxError::Core(Error::InvalidStyle(_))));
    assert!(!sheet.is_aborted());
}

#[test]
fn test_custom_default_datetime_format() {
    let mut sheet = session_with(
        SpreadsheetOptions::new().with_default_datetime_format("dd/mm/yyyy hh:mm"),
    );
    sheet.start_worksheet("S", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let styles = package.xml("xl/styles.xml");
    assert!(styles.contains(r#"<numFmt numFmtId="164" formatCode="dd/mm/yyyy hh:mm"/>"#));
}
