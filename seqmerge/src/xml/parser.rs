//! XML parser that reads patch documents.
//!
//! This parser uses quick-xml's streaming API and rebuilds the patch
//! delta by delta.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::PatchDocument;
use crate::error::{Error, Result};
use crate::model::{Chunk, Delta, DeltaType, Patch};

/// XML parser for patch documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchParser;

impl PatchParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        PatchParser
    }

    /// Parses a document from a string.
    pub fn parse_str(&self, xml: &str) -> Result<PatchDocument> {
        let mut reader = Reader::from_str(xml);
        // Element text is significant, including surrounding whitespace
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses a document from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<PatchDocument> {
        let file = File::open(path)?;
        let mut reader = Reader::from_reader(BufReader::new(file));
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    fn parse_reader<R: BufRead>(&self, reader: &mut Reader<R>) -> Result<PatchDocument> {
        let mut builder = DocumentBuilder::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => builder.start(e)?,
                Ok(Event::Empty(ref e)) => {
                    // Self-closing tag - handle like Start + End
                    builder.start(e)?;
                    builder.end(&tag_name(e.name().as_ref())?)?;
                }
                Ok(Event::End(ref e)) => builder.end(&tag_name(e.name().as_ref())?)?,
                Ok(Event::Text(ref e)) => {
                    let raw =
                        std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                    let text = unescape(raw).map_err(|e| Error::Parse(e.to_string()))?;
                    builder.text(&text)?;
                }
                Ok(Event::CData(ref e)) => {
                    let text = String::from_utf8_lossy(e.as_ref());
                    builder.text(&text)?;
                }
                Ok(Event::GeneralRef(ref e)) => {
                    let name =
                        std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                    builder.text(&resolve_reference(name)?)?;
                }
                Ok(Event::Eof) => break,
                Ok(Event::Decl(_))
                | Ok(Event::PI(_))
                | Ok(Event::Comment(_))
                | Ok(Event::DocType(_)) => {}
                Err(e) => return Err(Error::Xml(e)),
            }
            buf.clear();
        }

        builder.finish()
    }
}

/// Parses a patch document from a file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<PatchDocument> {
    PatchParser::new().parse_file(path)
}

/// Parses a patch document from a string.
pub fn parse_str(xml: &str) -> Result<PatchDocument> {
    PatchParser::new().parse_str(xml)
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Previous,
    Next,
}

struct PendingDelta {
    delta_type: DeltaType,
    previous: Option<Chunk<String>>,
    next: Option<Chunk<String>>,
}

struct PendingChunk {
    side: Side,
    index: Option<usize>,
    elements: Vec<String>,
}

/// Collects deltas while the document is read.
#[derive(Default)]
struct DocumentBuilder {
    seen_root: bool,
    digest: Option<String>,
    deltas: Vec<Delta<String>>,
    delta: Option<PendingDelta>,
    chunk: Option<PendingChunk>,
    element: Option<String>,
}

impl DocumentBuilder {
    fn start(&mut self, e: &BytesStart) -> Result<()> {
        let name = tag_name(e.name().as_ref())?;

        match name.as_str() {
            "patch" => {
                if self.seen_root {
                    return Err(Error::Parse("nested <patch> element".to_string()));
                }
                self.seen_root = true;
                self.digest = attribute(e, "digest")?;
            }
            "previous" | "next" => {
                if self.delta.is_none() || self.chunk.is_some() {
                    return Err(Error::Parse(format!("unexpected <{}>", name)));
                }
                let index = attribute(e, "index")?
                    .map(|value| {
                        value
                            .parse::<usize>()
                            .map_err(|_| Error::Parse(format!("invalid index \"{}\"", value)))
                    })
                    .transpose()?;
                let side = if name == "previous" {
                    Side::Previous
                } else {
                    Side::Next
                };
                self.chunk = Some(PendingChunk {
                    side,
                    index,
                    elements: Vec::new(),
                });
            }
            "e" => {
                if self.chunk.is_none() || self.element.is_some() {
                    return Err(Error::Parse("<e> outside of a chunk".to_string()));
                }
                self.element = Some(String::new());
            }
            other => {
                let delta_type = DeltaType::from_tag_name(other)
                    .ok_or_else(|| Error::Parse(format!("unknown element <{}>", other)))?;
                if !self.seen_root || self.delta.is_some() {
                    return Err(Error::Parse(format!("unexpected <{}>", other)));
                }
                self.delta = Some(PendingDelta {
                    delta_type,
                    previous: None,
                    next: None,
                });
            }
        }
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        match name {
            "patch" => {}
            "e" => {
                let text = self
                    .element
                    .take()
                    .ok_or_else(|| Error::Parse("unbalanced </e>".to_string()))?;
                if let Some(chunk) = self.chunk.as_mut() {
                    chunk.elements.push(text);
                }
            }
            "previous" | "next" => {
                let pending = self
                    .chunk
                    .take()
                    .ok_or_else(|| Error::Parse(format!("unbalanced </{}>", name)))?;
                let chunk = match pending.index {
                    Some(index) => Chunk::new(index, pending.elements),
                    None => Chunk::detached(pending.elements),
                };
                let delta = self
                    .delta
                    .as_mut()
                    .ok_or_else(|| Error::Parse(format!("<{}> outside of a delta", name)))?;
                match pending.side {
                    Side::Previous => delta.previous = Some(chunk),
                    Side::Next => delta.next = Some(chunk),
                }
            }
            other => {
                let pending = self
                    .delta
                    .take()
                    .ok_or_else(|| Error::Parse(format!("unbalanced </{}>", other)))?;
                let previous = pending
                    .previous
                    .ok_or_else(|| Error::Parse(format!("<{}> without <previous>", other)))?;
                let next = pending
                    .next
                    .ok_or_else(|| Error::Parse(format!("<{}> without <next>", other)))?;
                self.deltas
                    .push(Delta::new(pending.delta_type, previous, next));
            }
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        match self.element.as_mut() {
            Some(element) => element.push_str(text),
            None if text.trim().is_empty() => {}
            None => return Err(Error::Parse(format!("unexpected text {:?}", text))),
        }
        Ok(())
    }

    fn finish(self) -> Result<PatchDocument> {
        if !self.seen_root {
            return Err(Error::Parse("missing <patch> element".to_string()));
        }
        if self.delta.is_some() {
            return Err(Error::Parse("unterminated delta".to_string()));
        }
        Ok(PatchDocument::from_parts(
            Patch::from_deltas(self.deltas),
            self.digest,
        ))
    }
}

fn tag_name(raw: &[u8]) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| Error::Parse(e.to_string()))
}

/// Returns the unescaped value of an attribute, if present.
fn attribute(e: &BytesStart, key: &str) -> Result<Option<String>> {
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| Error::Parse(format!("Attribute error: {}", e)))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Parse(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Resolves a predefined entity or a character reference.
fn resolve_reference(name: &str) -> Result<String> {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => name.strip_prefix('#').and_then(|code| {
            let value = match code.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            value.and_then(char::from_u32)
        }),
    };

    resolved
        .map(String::from)
        .ok_or_else(|| Error::Parse(format!("unknown entity &{};", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_document() {
        let xml = r#"<?xml version="1.0"?>
<patch digest="abc">
  <delete>
    <previous index="2"><e>c</e></previous>
    <next index="2" />
  </delete>
</patch>"#;
        let document = parse_str(xml).unwrap();
        assert_eq!(document.digest(), Some("abc"));
        assert_eq!(
            document.patch().deltas(),
            &[Delta::delete(
                Chunk::new(2, vec!["c".to_string()]),
                Chunk::empty(2)
            )]
        );
    }

    #[test]
    fn test_parse_references() {
        let xml = "<patch><insert><previous index=\"0\"/>\
                   <next index=\"0\"><e>a&amp;b&#10;&#x41;</e></next></insert></patch>";
        let document = parse_str(xml).unwrap();
        assert_eq!(document.digest(), None);
        assert_eq!(
            document.patch().deltas()[0].next().elements(),
            &["a&b\nA".to_string()]
        );
    }

    #[test]
    fn test_whitespace_in_elements_is_kept() {
        let xml = "<patch><insert><previous index=\"0\"/>\
                   <next index=\"0\"><e>  two  </e></next></insert></patch>";
        let document = parse_str(xml).unwrap();
        assert_eq!(
            document.patch().deltas()[0].next().elements(),
            &["  two  ".to_string()]
        );
    }

    #[test]
    fn test_missing_chunk() {
        let xml = "<patch><change><previous index=\"0\"><e>a</e></previous></change></patch>";
        let err = parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("without <next>")));
    }

    #[test]
    fn test_unknown_element() {
        let err = parse_str("<patch><move /></patch>").unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("<move>")));
    }

    #[test]
    fn test_invalid_index() {
        let xml = "<patch><insert><previous index=\"-1\"/><next/></insert></patch>";
        assert!(matches!(parse_str(xml), Err(Error::Parse(_))));
    }

    #[test]
    fn test_missing_root() {
        assert!(matches!(parse_str(""), Err(Error::Parse(_))));
    }

    #[test]
    fn test_resolve_reference() {
        assert_eq!(resolve_reference("lt").unwrap(), "<");
        assert_eq!(resolve_reference("#9").unwrap(), "\t");
        assert_eq!(resolve_reference("#x263A").unwrap(), "\u{263A}");
        assert!(resolve_reference("nbsp").is_err());
    }
}
