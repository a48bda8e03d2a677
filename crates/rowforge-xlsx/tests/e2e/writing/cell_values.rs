//! Every cell value kind written through a session.

use crate::{finish, new_session, sheet_data};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rowforge_core::{CachedValue, Cell, Error};
use rowforge_xlsx::{WorksheetOptions, XlsxError};

fn single_row(cells: &[Cell<'_>]) -> String {
    let mut sheet = new_session();
    sheet.start_worksheet("Values", WorksheetOptions::default()).unwrap();
    sheet.add_row(cells).unwrap();
    sheet.end_worksheet().unwrap();
    let mut package = finish(sheet);
    let xml = package.xml("xl/worksheets/sheet1.xml");
    sheet_data(&xml).to_string()
}

#[test]
fn test_dates_use_reserved_style() {
    let noon = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    assert_eq!(
        single_row(&[Cell::from(noon)]),
        r#"<row r="1"><c s="1"><v>45306.5</v></c></row>"#
    );
}

#[test]
fn test_booleans_and_blanks() {
    assert_eq!(
        single_row(&[Cell::from(true), Cell::empty(), Cell::from(false)]),
        r#"<row r="1"><c t="b"><v>1</v></c><c/><c t="b"><v>0</v></c></row>"#
    );
}

#[test]
fn test_formulas() {
    assert_eq!(
        single_row(&[
            Cell::formula("=SUM(A1:A3)"),
            Cell::formula_with_cached("A1&\"x\"", CachedValue::String("1x".into())),
        ]),
        concat!(
            r#"<row r="1"><c><f>SUM(A1:A3)</f></c>"#,
            r#"<c t="str"><f>A1&amp;&quot;x&quot;</f><v>1x</v></c></row>"#
        )
    );
}

#[test]
fn test_text_escaping_and_whitespace() {
    assert_eq!(
        single_row(&[Cell::from("  <tag> & more "), Cell::from("bell\u{7}")]),
        concat!(
            r#"<row r="1"><c t="inlineStr"><is><t xml:space="preserve">  &lt;tag&gt; &amp; more </t></is></c>"#,
            r#"<c t="inlineStr"><is><t>bell</t></is></c></row>"#
        )
    );
}

#[test]
fn test_unsupported_values_are_rejected() {
    let mut sheet = new_session();
    sheet.start_worksheet("Values", WorksheetOptions::default()).unwrap();

    let err = sheet.add_row(&[Cell::from(f64::NAN)]).unwrap_err();
    assert!(matches!(err, XlsxError::Core(Error::UnsupportedValue(_))));

    let ancient = NaiveDate::from_ymd_opt(1850, 6, 1).unwrap();
    let err = sheet.add_row(&[Cell::from(ancient)]).unwrap_err();
    assert!(err.is_validation());

    let err = sheet.add_row(&[Cell::formula("")]).unwrap_err();
    assert!(matches!(err, XlsxError::Core(Error::InvalidValue(_))));

    sheet.add_row(&[Cell::from("after")]).unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    let xml = package.xml("xl/worksheets/sheet1.xml");
    assert_eq!(
        sheet_data(&xml),
        r#"<row r="1"><c t="inlineStr"><is><t>after</t></is></c></row>"#
    );
}
