use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::format::{BatchRow, FormatError, row_from_columns};

/// Minimal xlsx reader: an xlsx file is a zip holding worksheet XML.
/// Only the first worksheet's first two columns matter here.
pub(crate) fn parse_workbook(bytes: &[u8]) -> Result<Vec<BatchRow>, FormatError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| FormatError::Xlsx(format!("not a valid workbook: {e}")))?;

    let shared = match read_member(&mut archive, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet = read_member(&mut archive, "xl/worksheets/sheet1.xml")?
        .ok_or_else(|| FormatError::Xlsx("workbook has no first worksheet".to_string()))?;

    parse_worksheet(&sheet, &shared)
}

fn read_member(
    archive: &mut zip::ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<Vec<u8>>, FormatError> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut content = Vec::new();
            file.read_to_end(&mut content)
                .map_err(|e| FormatError::Xlsx(e.to_string()))?;
            Ok(Some(content))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(FormatError::Xlsx(e.to_string())),
    }
}

/// `<si>` items in document order; each may split its text over several
/// `<t>` runs.
fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>, FormatError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_item = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"si" => {
                    in_item = true;
                    current.clear();
                }
                b"t" if in_item => in_text = true,
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| FormatError::Xlsx(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"t" => in_text = false,
                b"si" => {
                    strings.push(current.clone());
                    in_item = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(FormatError::Xlsx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

fn parse_worksheet(xml: &[u8], shared: &[String]) -> Result<Vec<BatchRow>, FormatError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut rows = Vec::new();
    let mut line = 0usize;
    // only columns A and B are meaningful
    let mut columns: [String; 2] = Default::default();
    let mut column: Option<usize> = None;
    let mut cell_type = CellType::Number;
    let mut in_value = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"row" => {
                    line += 1;
                    columns = Default::default();
                }
                b"c" => {
                    column = None;
                    cell_type = CellType::Number;
                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).into_owned();
                        match attr.key.as_ref() {
                            b"r" => column = Some(column_index(&value)),
                            b"t" => {
                                cell_type = match value.as_str() {
                                    "s" => CellType::Shared,
                                    "inlineStr" => CellType::Inline,
                                    _ => CellType::Number,
                                }
                            }
                            _ => {}
                        }
                    }
                }
                b"v" => in_value = true,
                b"t" if cell_type == CellType::Inline => in_value = true,
                _ => {}
            },
            // self-closing blank rows still advance the line counter
            Ok(Event::Empty(e)) if e.name().as_ref() == b"row" => line += 1,
            Ok(Event::Text(t)) if in_value => {
                let text = t
                    .unescape()
                    .map_err(|e| FormatError::Xlsx(e.to_string()))?;
                let resolved = match cell_type {
                    CellType::Shared => {
                        let index: usize = text
                            .trim()
                            .parse()
                            .map_err(|_| FormatError::Xlsx("bad shared-string index".to_string()))?;
                        shared
                            .get(index)
                            .ok_or_else(|| {
                                FormatError::Xlsx("shared-string index out of range".to_string())
                            })?
                            .clone()
                    }
                    _ => text.into_owned(),
                };
                if let Some(col) = column.filter(|c| *c < columns.len()) {
                    columns[col].push_str(&resolved);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"row" => {
                    if let Some(row) = row_from_columns(line, &columns) {
                        rows.push(row);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(FormatError::Xlsx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Number,
    Shared,
    Inline,
}

/// "B12" -> 1
fn column_index(cell_ref: &str) -> usize {
    cell_ref
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .fold(0usize, |acc, b| {
            acc * 26 + (b.to_ascii_uppercase() - b'A' + 1) as usize
        })
        .saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use kartei_core::language::Language;
    use zip::write::SimpleFileOptions;

    use super::*;
    use crate::format::{BatchFormat, parse};

    fn workbook(shared_strings: Option<&str>, sheet: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        if let Some(strings) = shared_strings {
            writer
                .start_file("xl/sharedStrings.xml", options)
                .unwrap();
            writer.write_all(strings.as_bytes()).unwrap();
        }
        writer
            .start_file("xl/worksheets/sheet1.xml", options)
            .unwrap();
        writer.write_all(sheet.as_bytes()).unwrap();

        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn reads_shared_string_cells() {
        let bytes = workbook(
            Some(
                r#"<sst><si><t>laufen</t></si><si><t>de</t></si><si><t>geh</t><t>en</t></si></sst>"#,
            ),
            r#"<worksheet><sheetData>
                <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
                <row r="2"><c r="A2" t="s"><v>2</v></c></row>
            </sheetData></worksheet>"#,
        );

        let rows = parse(&bytes, BatchFormat::Xlsx).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].word, "laufen");
        assert_eq!(rows[0].language, Some(Language::German));
        assert_eq!(rows[1].word, "gehen");
        assert_eq!(rows[1].language, None);
    }

    #[test]
    fn reads_inline_string_cells_and_skips_blank_rows() {
        let bytes = workbook(
            None,
            r#"<worksheet><sheetData>
                <row r="1"><c r="A1" t="inlineStr"><is><t>run</t></is></c></row>
                <row r="2"></row>
                <row r="3"><c r="A3" t="inlineStr"><is><t>  walk </t></is></c></row>
            </sheetData></worksheet>"#,
        );

        let rows = parse(&bytes, BatchFormat::Xlsx).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].word, "run");
        assert_eq!(rows[1].word, "walk");
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn not_a_workbook_is_fatal() {
        let err = parse(b"definitely not a zip", BatchFormat::Xlsx).unwrap_err();
        assert!(matches!(err, FormatError::Xlsx(_)));
    }

    #[test]
    fn workbook_without_sheet_is_fatal() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = parse(&bytes, BatchFormat::Xlsx).unwrap_err();
        assert!(matches!(err, FormatError::Xlsx(_)));
    }

    #[test]
    fn column_letters_map_to_indices() {
        assert_eq!(column_index("A1"), 0);
        assert_eq!(column_index("B12"), 1);
        assert_eq!(column_index("AA3"), 26);
    }
}
