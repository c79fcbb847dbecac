//! XLSX text extraction.
//!
//! Each worksheet becomes a `=== <sheet name> ===` section; rows are
//! newline-separated and cells tab-separated. Gaps between referenced
//! cells are kept as empty columns.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::ExtractionError;

pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Parse(format!("Failed to open XLSX: {}", e)))?;

    let shared_strings = match read_entry(&mut archive, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let workbook = read_entry(&mut archive, "xl/workbook.xml")?
        .ok_or_else(|| ExtractionError::Parse("Missing xl/workbook.xml".to_string()))?;
    let targets = match read_entry(&mut archive, "xl/_rels/workbook.xml.rels")? {
        Some(xml) => parse_relationships(&xml)?,
        None => HashMap::new(),
    };

    let mut text = String::new();
    for (index, sheet) in parse_sheets(&workbook)?.into_iter().enumerate() {
        let path = sheet
            .rel_id
            .as_ref()
            .and_then(|id| targets.get(id))
            .map(|target| sheet_path(target))
            .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", index + 1));

        let Some(xml) = read_entry(&mut archive, &path)? else {
            tracing::debug!(sheet = %sheet.name, path = %path, "Worksheet part missing");
            continue;
        };

        text.push_str(&format!("\n\n=== {} ===\n\n", sheet.name));
        text.push_str(&parse_worksheet(&xml, &shared_strings)?);
    }

    Ok(text)
}

struct SheetEntry {
    name: String,
    rel_id: Option<String>,
}

fn read_entry<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, ExtractionError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(ExtractionError::Parse(format!(
                "Failed to open {}: {}",
                name, e
            )))
        }
    };

    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| ExtractionError::Parse(format!("Failed to read {}: {}", name, e)))?;
    Ok(Some(content))
}

// Relationship targets are relative to xl/ unless absolute.
fn sheet_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

fn attribute(e: &BytesStart, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn xml_error(e: quick_xml::Error) -> ExtractionError {
    ExtractionError::Parse(format!("XML parsing error: {}", e))
}

fn push_entity(out: &mut String, name: &[u8]) {
    let resolved = match name {
        b"amp" => "&",
        b"lt" => "<",
        b"gt" => ">",
        b"quot" => "\"",
        b"apos" => "'",
        _ => "",
    };
    out.push_str(resolved);
}

fn parse_sheets(xml: &str) -> Result<Vec<SheetEntry>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut sheets = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"sheet" =>
            {
                sheets.push(SheetEntry {
                    name: attribute(e, b"name").unwrap_or_else(|| format!("Sheet{}", sheets.len() + 1)),
                    rel_id: attribute(e, b"id"),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }
    Ok(sheets)
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut targets = HashMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attribute(e, b"Id"), attribute(e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }
    Ok(targets)
}

fn parse_shared_strings(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_item = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = true;
                    current.clear();
                }
                b"t" => in_text = in_item,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::Text(e)) if in_text => {
                current.push_str(&e.decode().unwrap_or_default());
            }
            Ok(Event::GeneralRef(e)) if in_text => push_entity(&mut current, &e),
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }
    Ok(strings)
}

#[derive(Default)]
struct Cell {
    column: Option<usize>,
    kind: Option<String>,
    value: String,
}

impl Cell {
    fn render(self, shared_strings: &[String]) -> String {
        match self.kind.as_deref() {
            Some("s") => self
                .value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|i| shared_strings.get(i).cloned())
                .unwrap_or_default(),
            Some("b") => match self.value.trim() {
                "1" => "TRUE".to_string(),
                "0" => "FALSE".to_string(),
                other => other.to_string(),
            },
            _ => self.value,
        }
    }
}

fn parse_worksheet(xml: &str, shared_strings: &[String]) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);

    let mut lines = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell: Option<Cell> = None;
    let mut in_value = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => row.clear(),
                b"c" => {
                    let column = match attribute(e, b"r") {
                        Some(reference) => column_index(&reference)?,
                        None => None,
                    };
                    cell = Some(Cell {
                        column,
                        kind: attribute(e, b"t"),
                        value: String::new(),
                    })
                }
                b"v" | b"t" => in_value = cell.is_some(),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some(finished) = cell.take() {
                        place_cell(&mut row, finished.column, finished.render(shared_strings));
                    }
                }
                b"row" => lines.push(row.join("\t")),
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"row" => lines.push(String::new()),
            Ok(Event::Text(e)) if in_value => {
                if let Some(cell) = cell.as_mut() {
                    cell.value.push_str(&e.decode().unwrap_or_default());
                }
            }
            Ok(Event::GeneralRef(e)) if in_value => {
                if let Some(cell) = cell.as_mut() {
                    push_entity(&mut cell.value, &e);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    Ok(lines.join("\n"))
}

fn place_cell(row: &mut Vec<String>, column: Option<usize>, value: String) {
    match column {
        Some(column) if column >= row.len() => {
            row.resize(column, String::new());
            row.push(value);
        }
        Some(column) => row[column] = value,
        None => row.push(value),
    }
}

/// Last column Excel allows ("XFD").
const MAX_COLUMN: usize = 16_383;

/// Zero-based column of an A1-style reference: "A1" -> 0, "AB12" -> 27.
/// References past XFD are rejected.
fn column_index(reference: &str) -> Result<Option<usize>, ExtractionError> {
    let letters = reference.bytes().take_while(|b| b.is_ascii_alphabetic());

    let mut number: usize = 0;
    for letter in letters {
        let digit = (letter.to_ascii_uppercase() - b'A' + 1) as usize;
        number = number
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .filter(|n| *n <= MAX_COLUMN + 1)
            .ok_or_else(|| {
                ExtractionError::Parse(format!("Cell reference out of range: {}", reference))
            })?;
    }

    Ok(number.checked_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_xlsx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Income Statement" sheetId="1" r:id="rId1"/>
    <sheet name="Segments" sheetId="2" r:id="rId2"/>
  </sheets>
</workbook>"#;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="worksheet" Target="worksheets/sheet2.xml"/>
</Relationships>"#;

    const SHARED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">
  <si><t>Metric</t></si>
  <si><t>Revenue</t></si>
  <si><r><t>Data</t></r><r><t xml:space="preserve"> Center</t></r></si>
</sst>"#;

    const SHEET1: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>Q3 2025</t></is></c></row>
    <row r="2"><c r="A2" t="s"><v>1</v></c><c r="C2"><v>51240</v></c></row>
  </sheetData>
</worksheet>"#;

    const SHEET2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>2</v></c><c r="B1" t="b"><v>1</v></c></row>
  </sheetData>
</worksheet>"#;

    #[test]
    fn test_extracts_sheets_in_workbook_order() {
        let bytes = build_xlsx(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", SHEET1),
            ("xl/worksheets/sheet2.xml", SHEET2),
        ]);

        let text = extract_text(&bytes).unwrap();

        let income = text.find("=== Income Statement ===").unwrap();
        let segments = text.find("=== Segments ===").unwrap();
        assert!(income < segments);
        assert!(text.contains("Metric\tQ3 2025\n"));
        assert!(text.contains("Revenue\t\t51240"));
        assert!(text.contains("Data Center\tTRUE"));
    }

    #[test]
    fn test_missing_rels_falls_back_to_sheet_index() {
        let bytes = build_xlsx(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", SHEET1),
        ]);

        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("=== Income Statement ==="));
        assert!(!text.contains("=== Segments ==="));
    }

    #[test]
    fn test_not_a_zip_is_parse_error() {
        let err = extract_text(b"PK-ish but not really").unwrap_err();
        assert!(matches!(err, ExtractionError::Parse(_)));
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A1").unwrap(), Some(0));
        assert_eq!(column_index("C2").unwrap(), Some(2));
        assert_eq!(column_index("AB12").unwrap(), Some(27));
        assert_eq!(column_index("XFD1").unwrap(), Some(16_383));
        assert_eq!(column_index("12").unwrap(), None);
    }

    #[test]
    fn test_column_past_xfd_is_rejected() {
        assert!(matches!(column_index("XFE1"), Err(ExtractionError::Parse(_))));
        assert!(matches!(column_index("ZZZZZZZ1"), Err(ExtractionError::Parse(_))));
        assert!(matches!(
            column_index("ZZZZZZZZZZZZZZZ1"),
            Err(ExtractionError::Parse(_))
        ));
    }

    #[test]
    fn test_oversized_cell_reference_fails_extraction() {
        let sheet = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="ZZZZZZZ1" t="inlineStr"><is><t>boom</t></is></c></row>
  </sheetData>
</worksheet>"#;
        let bytes = build_xlsx(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);

        let err = extract_text(&bytes).unwrap_err();
        assert!(matches!(err, ExtractionError::Parse(m) if m.contains("ZZZZZZZ1")));
    }
}
