//! Package boilerplate parts: content types, relationships, workbook and
//! document properties

use std::io::Write;

use chrono::SecondsFormat;
use rowforge_core::{ByteBuffer, CellAddress, CellRange, Result};

use crate::image::ImageFormat;
use crate::options::{DocumentProperties, SheetVisibility};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// What the workbook part needs to know about a finished worksheet
#[derive(Debug, Clone)]
pub(crate) struct SheetEntry {
    pub name: String,
    pub visibility: SheetVisibility,
    pub auto_filter: Option<CellRange>,
}

impl SheetEntry {
    pub(crate) fn is_visible(&self) -> bool {
        self.visibility == SheetVisibility::Visible
    }
}

/// `/xl/worksheets/sheet{index}.xml`
pub(crate) fn worksheet_part_name(index: usize) -> String {
    format!("xl/worksheets/sheet{}.xml", index)
}

pub(crate) fn write_content_types<W: Write + ?Sized>(
    sheet_count: usize,
    media: &[ImageFormat],
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    buffer.write_str(XML_DECLARATION, sink)?;
    buffer.write_str(
        concat!(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        ),
        sink,
    )?;
    for format in media {
        buffer.write_str(r#"<Default Extension=""#, sink)?;
        buffer.write_str(format.extension(), sink)?;
        buffer.write_str(r#"" ContentType=""#, sink)?;
        buffer.write_str(format.content_type(), sink)?;
        buffer.write_str(r#""/>"#, sink)?;
    }
    buffer.write_str(
        concat!(
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        ),
        sink,
    )?;
    for i in 1..=sheet_count {
        buffer.write_str(r#"<Override PartName="/xl/worksheets/sheet"#, sink)?;
        buffer.write_u32(i as u32, sink)?;
        buffer.write_str(
            r#".xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            sink,
        )?;
    }
    buffer.write_str(
        concat!(
            r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
            r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
            "</Types>"
        ),
        sink,
    )
}

pub(crate) fn write_root_rels<W: Write + ?Sized>(buffer: &mut ByteBuffer, sink: &mut W) -> Result<()> {
    buffer.write_str(XML_DECLARATION, sink)?;
    buffer.write_str(
        concat!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
            r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
            "</Relationships>"
        ),
        sink,
    )
}

pub(crate) fn write_workbook<W: Write + ?Sized>(
    sheets: &[SheetEntry],
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    buffer.write_str(XML_DECLARATION, sink)?;
    buffer.write_str(
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r=""#,
        sink,
    )?;
    buffer.write_str(REL_NS, sink)?;
    buffer.write_str(r#""><bookViews><workbookView"#, sink)?;
    let active = sheets.iter().position(SheetEntry::is_visible).unwrap_or(0);
    if active > 0 {
        buffer.write_str(r#" firstSheet=""#, sink)?;
        buffer.write_u32(active as u32, sink)?;
        buffer.write_str(r#"" activeTab=""#, sink)?;
        buffer.write_u32(active as u32, sink)?;
        buffer.write_str("\"", sink)?;
    }
    buffer.write_str("/></bookViews><sheets>", sink)?;

    for (i, sheet) in sheets.iter().enumerate() {
        let id = i as u32 + 1;
        buffer.write_str(r#"<sheet name=""#, sink)?;
        buffer.write_escaped(&sheet.name, sink)?;
        buffer.write_str(r#"" sheetId=""#, sink)?;
        buffer.write_u32(id, sink)?;
        buffer.write_str("\"", sink)?;
        if let Some(state) = sheet.visibility.state_attr() {
            buffer.write_str(r#" state=""#, sink)?;
            buffer.write_str(state, sink)?;
            buffer.write_str("\"", sink)?;
        }
        buffer.write_str(r#" r:id="rId"#, sink)?;
        buffer.write_u32(id, sink)?;
        buffer.write_str(r#""/>"#, sink)?;
    }
    buffer.write_str("</sheets>", sink)?;

    if sheets.iter().any(|s| s.auto_filter.is_some()) {
        buffer.write_str("<definedNames>", sink)?;
        for (i, sheet) in sheets.iter().enumerate() {
            let Some(range) = &sheet.auto_filter else {
                continue;
            };
            buffer.write_str(
                r#"<definedName name="_xlnm._FilterDatabase" localSheetId=""#,
                sink,
            )?;
            buffer.write_u32(i as u32, sink)?;
            buffer.write_str(r#"" hidden="1">"#, sink)?;
            buffer.write_escaped(&sheet_reference(&sheet.name, range), sink)?;
            buffer.write_str("</definedName>", sink)?;
        }
        buffer.write_str("</definedNames>", sink)?;
    }

    buffer.write_str("</workbook>", sink)
}

/// `'Sheet Name'!$A$1:$C$10`
fn sheet_reference(name: &str, range: &CellRange) -> String {
    fn absolute(addr: &CellAddress) -> String {
        format!(
            "${}${}",
            CellAddress::column_to_letters(addr.col),
            addr.row + 1
        )
    }
    format!(
        "'{}'!{}:{}",
        name.replace('\'', "''"),
        absolute(&range.start),
        absolute(&range.end)
    )
}

pub(crate) fn write_workbook_rels<W: Write + ?Sized>(
    sheet_count: usize,
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    buffer.write_str(XML_DECLARATION, sink)?;
    buffer.write_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        sink,
    )?;
    for i in 1..=sheet_count as u32 {
        buffer.write_str(r#"<Relationship Id="rId"#, sink)?;
        buffer.write_u32(i, sink)?;
        buffer.write_str(r#"" Type=""#, sink)?;
        buffer.write_str(REL_NS, sink)?;
        buffer.write_str(r#"/worksheet" Target="worksheets/sheet"#, sink)?;
        buffer.write_u32(i, sink)?;
        buffer.write_str(r#".xml"/>"#, sink)?;
    }
    buffer.write_str(r#"<Relationship Id="rId"#, sink)?;
    buffer.write_u32(sheet_count as u32 + 1, sink)?;
    buffer.write_str(r#"" Type=""#, sink)?;
    buffer.write_str(REL_NS, sink)?;
    buffer.write_str(r#"/styles" Target="styles.xml"/></Relationships>"#, sink)
}

fn write_text_element<W: Write + ?Sized>(
    tag: &str,
    value: Option<&str>,
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    buffer.write_str("<", sink)?;
    buffer.write_str(tag, sink)?;
    buffer.write_str(">", sink)?;
    buffer.write_escaped(value, sink)?;
    buffer.write_str("</", sink)?;
    buffer.write_str(tag, sink)?;
    buffer.write_str(">", sink)
}

pub(crate) fn write_core_properties<W: Write + ?Sized>(
    properties: &DocumentProperties,
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    buffer.write_str(XML_DECLARATION, sink)?;
    buffer.write_str(
        concat!(
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
        ),
        sink,
    )?;
    write_text_element("dc:title", properties.title.as_deref(), buffer, sink)?;
    write_text_element("dc:subject", properties.subject.as_deref(), buffer, sink)?;
    write_text_element("dc:creator", properties.author.as_deref(), buffer, sink)?;
    write_text_element("cp:keywords", properties.keywords.as_deref(), buffer, sink)?;
    write_text_element("dc:description", properties.description.as_deref(), buffer, sink)?;
    write_text_element("cp:lastModifiedBy", properties.author.as_deref(), buffer, sink)?;

    let stamp = properties
        .created
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    for tag in ["dcterms:created", "dcterms:modified"] {
        buffer.write_str("<", sink)?;
        buffer.write_str(tag, sink)?;
        buffer.write_str(r#" xsi:type="dcterms:W3CDTF">"#, sink)?;
        buffer.write_str(&stamp, sink)?;
        buffer.write_str("</", sink)?;
        buffer.write_str(tag, sink)?;
        buffer.write_str(">", sink)?;
    }
    buffer.write_str("</cp:coreProperties>", sink)
}

pub(crate) fn write_app_properties<W: Write + ?Sized>(
    sheets: &[SheetEntry],
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    let count = sheets.len() as u32;
    buffer.write_str(XML_DECLARATION, sink)?;
    buffer.write_str(
        concat!(
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
            r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            "<Application>rowforge</Application><DocSecurity>0</DocSecurity><ScaleCrop>false</ScaleCrop>",
            r#"<HeadingPairs><vt:vector size="2" baseType="variant">"#,
            "<vt:variant><vt:lpstr>Worksheets</vt:lpstr></vt:variant><vt:variant><vt:i4>"
        ),
        sink,
    )?;
    buffer.write_u32(count, sink)?;
    buffer.write_str(
        r#"</vt:i4></vt:variant></vt:vector></HeadingPairs><TitlesOfParts><vt:vector size=""#,
        sink,
    )?;
    buffer.write_u32(count, sink)?;
    buffer.write_str(r#"" baseType="lpstr">"#, sink)?;
    for sheet in sheets {
        buffer.write_str("<vt:lpstr>", sink)?;
        buffer.write_escaped(&sheet.name, sink)?;
        buffer.write_str("</vt:lpstr>", sink)?;
    }
    buffer.write_str(
        "</vt:vector></TitlesOfParts><LinksUpToDate>false</LinksUpToDate></Properties>",
        sink,
    )
}
