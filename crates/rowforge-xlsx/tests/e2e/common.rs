//! Common utilities for E2E tests.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use rowforge_xlsx::{Spreadsheet, SpreadsheetOptions};
use zip::ZipArchive;

/// In-memory session with default options
pub fn new_session() -> Spreadsheet<Cursor<Vec<u8>>> {
    session_with(SpreadsheetOptions::default())
}

/// In-memory session with the given options
pub fn session_with(options: SpreadsheetOptions) -> Spreadsheet<Cursor<Vec<u8>>> {
    Spreadsheet::new(Cursor::new(Vec::new()), options).expect("valid options")
}

/// Finish `sheet` and open the resulting archive
pub fn finish(sheet: Spreadsheet<Cursor<Vec<u8>>>) -> Package {
    let cursor = sheet.finish().expect("document should finish");
    Package::open(cursor.into_inner())
}

/// A finished document opened for inspection
pub struct Package {
    zip: ZipArchive<Cursor<Vec<u8>>>,
}

impl Package {
    pub fn open(bytes: Vec<u8>) -> Self {
        let zip = ZipArchive::new(Cursor::new(bytes)).expect("output should be a valid ZIP");
        Self { zip }
    }

    /// Names of every entry, in archive order
    pub fn names(&self) -> Vec<String> {
        self.zip.file_names().map(str::to_string).collect()
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.zip.file_names().any(|n| n == name)
    }

    /// Raw bytes of a part
    pub fn bytes(&mut self, name: &str) -> Vec<u8> {
        let mut entry = self
            .zip
            .by_name(name)
            .unwrap_or_else(|e| panic!("missing part {}: {}", name, e));
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        data
    }

    /// Text of an XML part, checked for well-formedness
    pub fn xml(&mut self, name: &str) -> String {
        let text = String::from_utf8(self.bytes(name)).expect("parts are UTF-8");
        assert_well_formed(name, &text);
        text
    }

    /// Every `.xml` and `.rels` part must parse
    pub fn assert_all_well_formed(&mut self) {
        for name in self.names() {
            if name.ends_with(".xml") || name.ends_with(".rels") {
                self.xml(&name);
            }
        }
    }
}

pub fn assert_well_formed(name: &str, xml: &str) {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!(
                "{} is not well-formed at byte {}: {}",
                name,
                reader.buffer_position(),
                e
            ),
        }
    }
}

/// Content between `<sheetData>` and `</sheetData>`
pub fn sheet_data(xml: &str) -> &str {
    let start = xml.find("<sheetData>").expect("sheetData start") + "<sheetData>".len();
    let end = xml.find("</sheetData>").expect("sheetData end");
    &xml[start..end]
}

/// Minimal PNG stream: signature and IHDR chunk
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 2, 0, 0, 0]);
    data.extend_from_slice(&[0x90, 0x77, 0x53, 0xDE]);
    data
}
