// SPDX-License-Identifier: MIT
//! XML codec
//!
//! Markup needs a single document element, so the records are written as
//! repeated `<employee>` children of `<root>`:
//!
//! ```text
//! <root><employee><id>1</id><name>Ali</name><salary>9000</salary></employee>...</root>
//! ```
//!
//! Text content is significant: names keep their leading and trailing
//! whitespace through a round trip. Whitespace-only text between elements is
//! ignored on decode, so indented documents are still accepted.

use std::mem;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::{Codec, CodecError};
use crate::record::{Dataset, Record};

const ROOT_ELEMENT: &str = "root";
const RECORD_ELEMENT: &str = "employee";

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl Codec for XmlCodec {
    fn name(&self) -> &str {
        "XML"
    }

    fn extension(&self) -> &str {
        "xml"
    }

    fn encode(&self, dataset: &Dataset) -> Result<Vec<u8>, CodecError> {
        write_document(dataset).map_err(|reason| CodecError::encode(self.name(), reason))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Dataset, CodecError> {
        let text = std::str::from_utf8(bytes).map_err(|e| CodecError::decode(self.name(), e))?;
        read_document(text)
            .map(Dataset::new)
            .map_err(|reason| CodecError::decode(self.name(), reason))
    }
}

fn write_document(dataset: &Dataset) -> Result<Vec<u8>, String> {
    let mut writer = Writer::new(Vec::new());
    emit(&mut writer, Event::Start(BytesStart::new(ROOT_ELEMENT)))?;

    for record in dataset.iter() {
        emit(&mut writer, Event::Start(BytesStart::new(RECORD_ELEMENT)))?;
        write_field(&mut writer, "id", &record.id().to_string())?;
        write_field(&mut writer, "name", record.name())?;
        write_field(&mut writer, "salary", &record.salary().to_string())?;
        emit(&mut writer, Event::End(BytesEnd::new(RECORD_ELEMENT)))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
    Ok(writer.into_inner())
}

fn write_field(writer: &mut Writer<Vec<u8>>, element: &str, text: &str) -> Result<(), String> {
    emit(writer, Event::Start(BytesStart::new(element)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(element)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), String> {
    writer.write_event(event).map_err(|e| e.to_string())
}

fn read_document(text: &str) -> Result<Vec<Record>, String> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut document = DocumentReader::default();
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => document.start(element_name(start.name().as_ref())?)?,
            Event::Empty(start) => {
                document.start(element_name(start.name().as_ref())?)?;
                document.end()?;
            }
            Event::End(_) => document.end()?,
            Event::Text(content) => document.text(&content.unescape().map_err(|e| e.to_string())?)?,
            Event::CData(content) => {
                document.text(std::str::from_utf8(&content).map_err(|e| e.to_string())?)?
            }
            Event::Eof => break,
            _ => {}
        }
    }
    document.finish()
}

fn element_name(raw: &[u8]) -> Result<String, String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| e.to_string())
}

#[derive(Debug, Default)]
struct RecordFields {
    id: Option<i64>,
    name: Option<String>,
    salary: Option<f64>,
}

impl RecordFields {
    fn set(&mut self, field: &str, text: String) -> Result<(), String> {
        let duplicate = match field {
            "id" => {
                let id = text.parse().map_err(|e| format!("id {text:?}: {e}"))?;
                self.id.replace(id).is_some()
            }
            "name" => self.name.replace(text).is_some(),
            "salary" => {
                let salary = text.parse().map_err(|e| format!("salary {text:?}: {e}"))?;
                self.salary.replace(salary).is_some()
            }
            other => return Err(format!("unexpected element <{other}>")),
        };

        if duplicate {
            return Err(format!("duplicate <{field}>"));
        }
        Ok(())
    }

    fn build(self, index: usize) -> Result<Record, String> {
        let missing = |field: &str| format!("{RECORD_ELEMENT}[{index}] is missing <{field}>");
        Ok(Record::new(
            self.id.ok_or_else(|| missing("id"))?,
            self.name.ok_or_else(|| missing("name"))?,
            self.salary.ok_or_else(|| missing("salary"))?,
        ))
    }
}

/// Tracks nesting while events stream in; depth 0 is outside `<root>`
#[derive(Debug, Default)]
struct DocumentReader {
    open: Vec<String>,
    current: RecordFields,
    text: String,
    records: Vec<Record>,
    closed: bool,
}

impl DocumentReader {
    fn start(&mut self, name: String) -> Result<(), String> {
        match (self.open.len(), name.as_str()) {
            (0, ROOT_ELEMENT) if !self.closed => {}
            (1, RECORD_ELEMENT) => self.current = RecordFields::default(),
            (2, "id" | "name" | "salary") => self.text.clear(),
            _ => return Err(format!("unexpected element <{name}>")),
        }
        self.open.push(name);
        Ok(())
    }

    fn text(&mut self, content: &str) -> Result<(), String> {
        if self.open.len() == 3 {
            self.text.push_str(content);
        } else if !content.trim().is_empty() {
            return Err(format!("unexpected text {content:?}"));
        }
        Ok(())
    }

    fn end(&mut self) -> Result<(), String> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| "unbalanced end tag".to_string())?;

        match self.open.len() {
            0 => self.closed = true,
            1 => {
                let record = mem::take(&mut self.current).build(self.records.len())?;
                self.records.push(record);
            }
            2 => {
                let text = mem::take(&mut self.text);
                self.current.set(&name, text)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Record>, String> {
        if !self.closed {
            return Err(format!("missing </{ROOT_ELEMENT}>"));
        }
        Ok(self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(dataset: &Dataset) -> Dataset {
        XmlCodec.decode(&XmlCodec.encode(dataset).unwrap()).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let dataset = Dataset::sample();
        assert_eq!(round_trip(&dataset), dataset);
    }

    #[test]
    fn test_encoded_shape() {
        let dataset = Dataset::new(vec![Record::new(1, "Ali", 9000.0)]);
        let text = String::from_utf8(XmlCodec.encode(&dataset).unwrap()).unwrap();

        assert_eq!(
            text,
            "<root><employee><id>1</id><name>Ali</name><salary>9000</salary></employee></root>"
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_preserved() {
        let dataset = Dataset::new(vec![
            Record::new(1, " Ali ", 9000.0),
            Record::new(2, "Kamal\t", 22000.0),
            Record::new(3, "   ", 23000.0),
        ]);
        assert_eq!(round_trip(&dataset), dataset);
    }

    #[test]
    fn test_empty_and_multiline_names() {
        let dataset = Dataset::new(vec![
            Record::new(1, "", 1.0),
            Record::new(2, "line one\r\nline two", 2.0),
            Record::new(3, "Amal ☕", 3.0),
        ]);
        assert_eq!(round_trip(&dataset), dataset);
    }

    #[test]
    fn test_markup_is_escaped() {
        let dataset = Dataset::new(vec![Record::new(4, "Salma & <Co>", 1.25)]);
        let bytes = XmlCodec.encode(&dataset).unwrap();

        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(!text.contains("<Co>"));
        assert_eq!(XmlCodec.decode(&bytes).unwrap(), dataset);
    }

    #[test]
    fn test_empty_dataset() {
        let bytes = XmlCodec.encode(&Dataset::empty()).unwrap();
        assert_eq!(bytes, b"<root></root>");
        assert!(XmlCodec.decode(&bytes).unwrap().is_empty());
        assert!(XmlCodec.decode(b"<root/>").unwrap().is_empty());
    }

    #[test]
    fn test_decode_indented_document() {
        let text = "<root>\n  <employee>\n    <id>7</id>\n    <name/>\n    <salary>1.5</salary>\n  </employee>\n</root>\n";
        let dataset = XmlCodec.decode(text.as_bytes()).unwrap();
        assert_eq!(dataset, Dataset::new(vec![Record::new(7, "", 1.5)]));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = XmlCodec.decode(&[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
    }

    #[test]
    fn test_decode_malformed() {
        let err = XmlCodec
            .decode(b"<root><employee><id>one</id><name>Ali</name><salary>1</salary></employee></root>")
            .unwrap_err();
        assert!(matches!(err, CodecError::Decode { ref codec, .. } if codec == "XML"));
    }

    #[test]
    fn test_decode_missing_field() {
        let err = XmlCodec
            .decode(b"<root><employee><id>1</id><salary>1</salary></employee></root>")
            .unwrap_err();
        assert!(err.to_string().contains("employee[0] is missing <name>"), "{err}");
    }

    #[test]
    fn test_decode_unclosed_root() {
        let err = XmlCodec.decode(b"<root><employee>").unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
    }
}
