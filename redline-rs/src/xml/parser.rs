//! Markup parser that builds element models.
//!
//! This parser uses quick-xml's streaming API and records, for every element,
//! the byte spans of its fragment, content and leading gap so that raw markup
//! can be sliced back out of the source buffer without re-serializing.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::constants::DEFAULT_ID_ATTRIBUTE;
use crate::error::{Error, Result};
use crate::node::{Document, NodeData, NodeId};

/// Markup parser that builds [`Document`]s.
#[derive(Debug, Clone)]
pub struct XmlParser {
    id_attribute: String,
}

impl Default for XmlParser {
    fn default() -> Self {
        Self::new(DEFAULT_ID_ATTRIBUTE)
    }
}

/// An element whose end tag has not been seen yet.
struct OpenElement {
    id: NodeId,
    /// End of the last child, where the next child's gap starts.
    last_end: usize,
}

impl XmlParser {
    /// Creates a parser reading stable identifiers from `id_attribute`.
    pub fn new(id_attribute: impl Into<String>) -> Self {
        XmlParser {
            id_attribute: id_attribute.into(),
        }
    }

    /// Parses markup from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let source = fs::read_to_string(path)?;
        self.parse_string(source)
    }

    /// Parses markup from a string slice.
    pub fn parse_str(&self, xml: &str) -> Result<Document> {
        self.parse_string(xml.to_string())
    }

    /// Parses markup, taking ownership of the buffer.
    ///
    /// A buffer holding only whitespace yields an empty document.
    pub fn parse_string(&self, source: String) -> Result<Document> {
        let (nodes, root_span) = self.parse_nodes(&source)?;
        let (prolog, epilog) = match root_span {
            Some((start, end)) => (0..start, end..source.len()),
            None => (0..source.len(), source.len()..source.len()),
        };
        tracing::debug!(elements = nodes.len(), bytes = source.len(), "parsed document");
        Ok(Document::new(source, nodes, prolog, epilog))
    }

    fn parse_nodes(&self, xml: &str) -> Result<(Vec<NodeData>, Option<(usize, usize)>)> {
        let mut reader = Reader::from_str(xml);
        // Whitespace is kept verbatim; gaps are sliced from the buffer.
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        let mut nodes: Vec<NodeData> = Vec::new();
        let mut stack: Vec<OpenElement> = Vec::new();
        let mut root_span: Option<(usize, usize)> = None;

        loop {
            let before = reader.buffer_position() as usize;
            let event = reader
                .read_event()
                .map_err(|e| Error::malformed(e.to_string(), before))?;
            let after = reader.buffer_position() as usize;

            match event {
                Event::Start(ref e) => {
                    let id = self.open_element(e, &mut nodes, &stack, root_span, before)?;
                    nodes[id.0].content = after..after;
                    stack.push(OpenElement {
                        id,
                        last_end: after,
                    });
                }
                Event::Empty(ref e) => {
                    let id = self.open_element(e, &mut nodes, &stack, root_span, before)?;
                    let node = &mut nodes[id.0];
                    node.fragment = before..after;
                    node.content = after..after;
                    node.self_closing = true;
                    match stack.last_mut() {
                        Some(parent) => parent.last_end = after,
                        None => root_span = Some((before, after)),
                    }
                }
                Event::End(_) => {
                    let open = stack
                        .pop()
                        .ok_or_else(|| Error::malformed("unmatched end tag", before))?;
                    let node = &mut nodes[open.id.0];
                    node.content.end = before;
                    node.fragment.end = after;
                    match stack.last_mut() {
                        Some(parent) => parent.last_end = after,
                        None => root_span = Some((node.fragment.start, after)),
                    }
                }
                Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) => {
                    let raw = &xml[before..after];
                    let is_blank = matches!(event, Event::Text(_))
                        && raw.chars().all(char::is_whitespace);
                    if !is_blank {
                        match stack.last() {
                            Some(parent) => nodes[parent.id.0].has_text_child = true,
                            None => return Err(Error::malformed("text outside the root element", before)),
                        }
                    }
                }
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {
                    // Kept verbatim inside gaps, prolog or epilog
                }
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::malformed(
                format!("unclosed element <{}>", nodes[open.id.0].tag_name),
                xml.len(),
            ));
        }

        Ok((nodes, root_span))
    }

    /// Records a new element and links it to its parent.
    fn open_element(
        &self,
        e: &BytesStart<'_>,
        nodes: &mut Vec<NodeData>,
        stack: &[OpenElement],
        root_span: Option<(usize, usize)>,
        start: usize,
    ) -> Result<NodeId> {
        if stack.is_empty() && (root_span.is_some() || !nodes.is_empty()) {
            return Err(Error::malformed("more than one root element", start));
        }

        let tag_name = std::str::from_utf8(e.name().as_ref())
            .map_err(|err| Error::malformed(err.to_string(), start))?
            .to_string();

        let mut attributes = Vec::new();
        for attr_result in e.attributes() {
            let attr = attr_result
                .map_err(|err| Error::malformed(format!("attribute error: {err}"), start))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|err| Error::malformed(err.to_string(), start))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|err| Error::malformed(err.to_string(), start))?
                .to_string();
            attributes.push((key, value));
        }

        let stable_id = attributes
            .iter()
            .find(|(key, _)| *key == self.id_attribute)
            .map(|(_, value)| value.clone());

        let id = NodeId(nodes.len());
        let parent = stack.last();
        nodes.push(NodeData {
            tag_name,
            attributes,
            stable_id,
            parent: parent.map(|p| p.id),
            children: Vec::new(),
            has_text_child: false,
            fragment: start..start,
            content: start..start,
            gap_start: parent.map(|p| p.last_end).unwrap_or(start),
            self_closing: false,
        });
        if let Some(parent) = parent {
            nodes[parent.id.0].children.push(id);
        }
        Ok(id)
    }
}

/// Parses markup from a file with the default identifier attribute.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    XmlParser::default().parse_file(path)
}

/// Parses markup from a string with the default identifier attribute.
pub fn parse_str(xml: &str) -> Result<Document> {
    XmlParser::default().parse_str(xml)
}
