//! `xl/styles.xml` writer

use std::io::Write;

use rowforge_core::{
    BorderEdge, BorderStyle, ByteBuffer, Color, DiagonalDirection, FillStyle, FontStyle,
    MetadataTables, Result, Underline, XfEntry,
};

const STYLESHEET_PROLOGUE: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#
);

const STYLESHEET_EPILOGUE: &str = concat!(
    r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
    r#"<dxfs count="0"/>"#,
    r#"<tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>"#,
    "</styleSheet>"
);

/// Render finalized style tables as the styles part
///
/// Table order follows the schema: numFmts, fonts, fills, borders,
/// cellStyleXfs, cellXfs, cellStyles, dxfs, tableStyles.
pub fn write_styles<W: Write + ?Sized>(
    tables: &MetadataTables,
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    buffer.write_str(STYLESHEET_PROLOGUE, sink)?;

    open_counted("numFmts", tables.number_formats.len(), buffer, sink)?;
    for format in &tables.number_formats {
        buffer.write_str(r#"<numFmt numFmtId=""#, sink)?;
        buffer.write_u32(format.id, sink)?;
        buffer.write_str(r#"" formatCode=""#, sink)?;
        buffer.write_escaped(&format.code, sink)?;
        buffer.write_str(r#""/>"#, sink)?;
    }
    buffer.write_str("</numFmts>", sink)?;

    open_counted("fonts", tables.fonts.len(), buffer, sink)?;
    for font in &tables.fonts {
        write_font(font, buffer, sink)?;
    }
    buffer.write_str("</fonts>", sink)?;

    open_counted("fills", tables.fills.len(), buffer, sink)?;
    for fill in &tables.fills {
        write_fill(fill, buffer, sink)?;
    }
    buffer.write_str("</fills>", sink)?;

    open_counted("borders", tables.borders.len(), buffer, sink)?;
    for border in &tables.borders {
        write_border(border, buffer, sink)?;
    }
    buffer.write_str("</borders>", sink)?;

    buffer.write_str(
        r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
        sink,
    )?;

    open_counted("cellXfs", tables.cell_xfs.len(), buffer, sink)?;
    for xf in &tables.cell_xfs {
        write_xf(xf, buffer, sink)?;
    }
    buffer.write_str("</cellXfs>", sink)?;

    buffer.write_str(STYLESHEET_EPILOGUE, sink)
}

fn open_counted<W: Write + ?Sized>(
    tag: &str,
    count: usize,
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    buffer.write_str("<", sink)?;
    buffer.write_str(tag, sink)?;
    buffer.write_str(r#" count=""#, sink)?;
    buffer.write_u32(count as u32, sink)?;
    buffer.write_str(r#"">"#, sink)
}

fn write_attr_u32<W: Write + ?Sized>(
    name: &str,
    value: u32,
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    buffer.write_str(" ", sink)?;
    buffer.write_str(name, sink)?;
    buffer.write_str(r#"=""#, sink)?;
    buffer.write_u32(value, sink)?;
    buffer.write_str("\"", sink)
}

/// `<tag .../>` for a color; automatic colors use the system foreground index
fn write_color<W: Write + ?Sized>(
    tag: &str,
    color: &Color,
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    buffer.write_str("<", sink)?;
    buffer.write_str(tag, sink)?;
    match color {
        Color::Auto => write_attr_u32("indexed", 64, buffer, sink)?,
        Color::Rgb { .. } | Color::Argb { .. } => {
            buffer.write_str(r#" rgb=""#, sink)?;
            buffer.write_str(&color.argb_hex().unwrap_or_default(), sink)?;
            buffer.write_str("\"", sink)?;
        }
        Color::Indexed(i) => write_attr_u32("indexed", *i as u32, buffer, sink)?,
        Color::Theme { index, tint } => {
            write_attr_u32("theme", *index as u32, buffer, sink)?;
            if *tint != 0 {
                buffer.write_str(r#" tint=""#, sink)?;
                buffer.write_f64(*tint as f64 / 100.0, sink)?;
                buffer.write_str("\"", sink)?;
            }
        }
    }
    buffer.write_str("/>", sink)
}

fn write_font<W: Write + ?Sized>(
    font: &FontStyle,
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    buffer.write_str("<font>", sink)?;
    if font.bold {
        buffer.write_str("<b/>", sink)?;
    }
    if font.italic {
        buffer.write_str("<i/>", sink)?;
    }
    if font.strikethrough {
        buffer.write_str("<strike/>", sink)?;
    }
    let underline = match font.underline {
        Underline::None => None,
        Underline::Single => Some("<u/>"),
        Underline::Double => Some(r#"<u val="double"/>"#),
        Underline::SingleAccounting => Some(r#"<u val="singleAccounting"/>"#),
        Underline::DoubleAccounting => Some(r#"<u val="doubleAccounting"/>"#),
    };
    if let Some(u) = underline {
        buffer.write_str(u, sink)?;
    }
    buffer.write_str(r#"<sz val=""#, sink)?;
    buffer.write_f64(font.size, sink)?;
    buffer.write_str(r#""/>"#, sink)?;
    if !font.color.is_auto() {
        write_color("color", &font.color, buffer, sink)?;
    }
    buffer.write_str(r#"<name val=""#, sink)?;
    buffer.write_escaped(&font.name, sink)?;
    buffer.write_str(r#""/></font>"#, sink)
}

fn write_fill<W: Write + ?Sized>(
    fill: &FillStyle,
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    match fill {
        FillStyle::None => buffer.write_str(r#"<fill><patternFill patternType="none"/></fill>"#, sink),
        FillStyle::Solid { color } => {
            buffer.write_str(r#"<fill><patternFill patternType="solid">"#, sink)?;
            write_color("fgColor", color, buffer, sink)?;
            buffer.write_str(r#"<bgColor indexed="64"/></patternFill></fill>"#, sink)
        }
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => {
            buffer.write_str(r#"<fill><patternFill patternType=""#, sink)?;
            buffer.write_str(pattern.as_str(), sink)?;
            if foreground.is_auto() && background.is_auto() {
                return buffer.write_str(r#""/></fill>"#, sink);
            }
            buffer.write_str(r#"">"#, sink)?;
            if !foreground.is_auto() {
                write_color("fgColor", foreground, buffer, sink)?;
            }
            if !background.is_auto() {
                write_color("bgColor", background, buffer, sink)?;
            }
            buffer.write_str("</patternFill></fill>", sink)
        }
    }
}

fn write_border_edge<W: Write + ?Sized>(
    tag: &str,
    edge: Option<&BorderEdge>,
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    buffer.write_str("<", sink)?;
    buffer.write_str(tag, sink)?;
    let Some((edge, style)) = edge.and_then(|e| e.style.as_str().map(|s| (e, s))) else {
        return buffer.write_str("/>", sink);
    };
    buffer.write_str(r#" style=""#, sink)?;
    buffer.write_str(style, sink)?;
    buffer.write_str(r#"">"#, sink)?;
    write_color("color", &edge.color, buffer, sink)?;
    buffer.write_str("</", sink)?;
    buffer.write_str(tag, sink)?;
    buffer.write_str(">", sink)
}

fn write_border<W: Write + ?Sized>(
    border: &BorderStyle,
    buffer: &mut ByteBuffer,
    sink: &mut W,
) -> Result<()> {
    let attrs = match border.diagonal_direction {
        DiagonalDirection::None => "",
        DiagonalDirection::Down => r#" diagonalDown="1""#,
        DiagonalDirection::Up => r#" diagonalUp="1""#,
        DiagonalDirection::Both => r#" diagonalDown="1" diagonalUp="1""#,
    };
    buffer.write_str("<border", sink)?;
    buffer.write_str(attrs, sink)?;
    buffer.write_str(">", sink)?;
    write_border_edge("left", border.left.as_ref(), buffer, sink)?;
    write_border_edge("right", border.right.as_ref(), buffer, sink)?;
    write_border_edge("top", border.top.as_ref(), buffer, sink)?;
    write_border_edge("bottom", border.bottom.as_ref(), buffer, sink)?;
    write_border_edge("diagonal", border.diagonal.as_ref(), buffer, sink)?;
    buffer.write_str("</border>", sink)
}

fn write_xf<W: Write + ?Sized>(xf: &XfEntry, buffer: &mut ByteBuffer, sink: &mut W) -> Result<()> {
    buffer.write_str("<xf", sink)?;
    write_attr_u32("numFmtId", xf.num_fmt_id, buffer, sink)?;
    write_attr_u32("fontId", xf.font_id, buffer, sink)?;
    write_attr_u32("fillId", xf.fill_id, buffer, sink)?;
    write_attr_u32("borderId", xf.border_id, buffer, sink)?;
    write_attr_u32("xfId", 0, buffer, sink)?;
    if xf.apply_number_format() {
        buffer.write_str(r#" applyNumberFormat="1""#, sink)?;
    }
    if xf.apply_font() {
        buffer.write_str(r#" applyFont="1""#, sink)?;
    }
    if xf.apply_fill() {
        buffer.write_str(r#" applyFill="1""#, sink)?;
    }
    if xf.apply_border() {
        buffer.write_str(r#" applyBorder="1""#, sink)?;
    }
    buffer.write_str("/>", sink)
}
