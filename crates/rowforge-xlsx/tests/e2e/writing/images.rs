//! Embedded images.

use std::io::Cursor;

use crate::{finish, new_session, png_bytes};
use pretty_assertions::assert_eq;
use rowforge_core::{Cell, Error};
use rowforge_xlsx::{WorksheetOptions, XlsxError};

#[test]
fn test_png_dimensions_and_bytes() {
    let png = png_bytes(320, 200);
    let mut sheet = new_session();
    let image = sheet.embed_image(Cursor::new(png.clone())).unwrap();
    assert_eq!((image.width, image.height), (320, 200));
    assert_eq!(image.part_name, "xl/media/image1.png");

    sheet.start_worksheet("S", WorksheetOptions::default()).unwrap();
    sheet.add_row(&[Cell::from("see image")]).unwrap();
    sheet.end_worksheet().unwrap();

    let mut package = finish(sheet);
    assert_eq!(package.bytes("xl/media/image1.png"), png);
    let types = package.xml("[Content_Types].xml");
    assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
    assert!(!types.contains(r#"Extension="bin""#));
}

#[test]
fn test_unknown_image_is_zero_sized() {
    let data = b"\xFF\xD8\xFF\xE0 pretend jpeg payload".to_vec();
    let mut sheet = new_session();
    sheet.start_worksheet("S", WorksheetOptions::default()).unwrap();
    sheet.end_worksheet().unwrap();

    let first = sheet.embed_image(Cursor::new(png_bytes(1, 1))).unwrap();
    let second = sheet.embed_image(Cursor::new(data.clone())).unwrap();
    assert_eq!(first.part_name, "xl/media/image1.png");
    assert_eq!((second.width, second.height), (0, 0));
    assert_eq!(second.part_name, "xl/media/image2.bin");

    let mut package = finish(sheet);
    assert_eq!(package.bytes("xl/media/image2.bin"), data);
    let types = package.xml("[Content_Types].xml");
    assert!(types.contains(r#"<Default Extension="bin" ContentType="application/octet-stream"/>"#));
}

#[test]
fn test_image_inside_open_worksheet_fails() {
    let mut sheet = new_session();
    sheet.start_worksheet("S", WorksheetOptions::default()).unwrap();
    let err = sheet.embed_image(Cursor::new(png_bytes(2, 2))).unwrap_err();
    assert!(matches!(err, XlsxError::Core(Error::OutOfOrderWrite(_))));
}
