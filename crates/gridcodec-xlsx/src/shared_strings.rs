//! The shared string table (`xl/sharedStrings.xml`)

use std::io::{BufReader, Read};

use ahash::AHashMap;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::{decode_excel_escapes, encode_excel_escapes, escape_xml};

/// Ordered list of unique strings referenced by text cells by index.
///
/// Insertion deduplicates: the first occurrence of a string fixes its index.
#[derive(Debug, Clone, Default)]
pub struct SharedStringTable {
    strings: Vec<String>,
    index: AHashMap<String, u32>,
}

impl SharedStringTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from strings in stored order, e.g. as read from a document.
    /// Duplicates keep their own slots; lookups by value resolve to the first.
    pub fn from_strings(strings: Vec<String>) -> Self {
        let mut index = AHashMap::with_capacity(strings.len());
        for (i, s) in strings.iter().enumerate() {
            index.entry(s.clone()).or_insert(i as u32);
        }
        Self { strings, index }
    }

    /// Return the index of `s`, adding it if it is new
    pub fn insert(&mut self, s: &str) -> u32 {
        if let Some(&i) = self.index.get(s) {
            return i;
        }
        let i = self.strings.len() as u32;
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), i);
        i
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get(index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }

    /// Serialise as `sharedStrings.xml`. `count` is the number of cells
    /// referencing the table.
    pub(crate) fn to_xml(&self, count: usize) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
            count,
            self.strings.len()
        );

        for s in &self.strings {
            let text = escape_xml(&encode_excel_escapes(s));
            if needs_preserve(s) {
                xml.push_str(&format!("<si><t xml:space=\"preserve\">{}</t></si>", text));
            } else {
                xml.push_str(&format!("<si><t>{}</t></si>", text));
            }
        }

        xml.push_str("</sst>");
        xml
    }
}

fn needs_preserve(s: &str) -> bool {
    s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) || s.contains('\n')
}

/// Parse `sharedStrings.xml`. Each `<si>` becomes one entry: the
/// concatenation of all its `<t>` runs (rich text is flattened, phonetic
/// runs are skipped).
pub(crate) fn read_shared_strings_xml<R: Read>(reader: R) -> XlsxResult<SharedStringTable> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    // whitespace inside <t> is content
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"si" => {
                    strings.push(decode_excel_escapes(&current));
                    current.clear();
                    in_si = false;
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_t => {
                let text = e.unescape()?;
                current.push_str(&text);
            }
            Ok(Event::CData(e)) if in_t => {
                current.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    log::debug!("read {} shared strings", strings.len());
    Ok(SharedStringTable::from_strings(strings))
}
