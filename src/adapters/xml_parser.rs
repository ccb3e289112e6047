// SPDX-License-Identifier: MIT OR Apache-2.0

//! XML tree parser adapter.
//!
//! This module turns an XML document rooted at `<config>` into the generic
//! configuration tree.

use crate::domain::{ConfigError, ConfigNode, Result};
use crate::ports::TreeParser;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Name the document element of every XML configuration must have.
pub const ROOT_ELEMENT: &str = "config";

/// XML parser implementation.
///
/// Elements map to nodes and their trimmed text to node values. Attributes
/// become leaf children of their element, CDATA sections count as text, and
/// comments, declarations and processing instructions are skipped. Repeated
/// elements are kept as repeated siblings.
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::XmlParser;
/// use treecfg::ports::TreeParser;
///
/// let parser = XmlParser::new();
/// let root = parser
///     .parse("<config><httpport>8080</httpport></config>")
///     .unwrap();
/// assert_eq!(root.children()[0].name(), "httpport");
/// assert_eq!(root.children()[0].text(), Some("8080"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmlParser;

/// An element whose end tag has not been seen yet.
struct OpenElement {
    node: ConfigNode,
    text: String,
}

impl OpenElement {
    fn finish(mut self) -> ConfigNode {
        let text = self
            .text
            .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        if !text.is_empty() {
            self.node.set_text(Some(text.to_string()));
        }
        self.node
    }
}

impl XmlParser {
    /// Creates a new XML parser.
    pub fn new() -> Self {
        XmlParser
    }

    /// Builds a node for a start (or empty) tag, attributes included.
    fn open_node(start: &BytesStart<'_>, content: &str, offset: usize) -> Result<ConfigNode> {
        let qname = start.name();
        let name = std::str::from_utf8(qname.as_ref())
            .map_err(|e| position_error(content, offset, "invalid UTF-8 in element name", e))?;
        let mut node = ConfigNode::new(name);

        for attr in start.attributes() {
            let attr = attr
                .map_err(|e| position_error(content, offset, "malformed attribute", e))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| position_error(content, offset, "invalid UTF-8 in attribute name", e))?;
            let value = attr
                .unescape_value()
                .map_err(|e| position_error(content, offset, "invalid attribute value", e))?;
            node.push_child(ConfigNode::leaf(key, value.into_owned()));
        }

        Ok(node)
    }

    /// Hands a completed node to its parent, or makes it the document root.
    fn attach(
        node: ConfigNode,
        stack: &mut [OpenElement],
        root: &mut Option<ConfigNode>,
        content: &str,
        offset: usize,
    ) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.node.push_child(node),
            None if root.is_some() => {
                return Err(syntax_error(content, offset, "multiple root elements"));
            }
            None => *root = Some(node),
        }
        Ok(())
    }
}

impl TreeParser for XmlParser {
    fn parse(&self, content: &str) -> Result<ConfigNode> {
        let mut reader = Reader::from_str(content);
        let mut stack: Vec<OpenElement> = Vec::new();
        let mut root: Option<ConfigNode> = None;

        loop {
            let offset = reader.buffer_position() as usize;
            let event = reader.read_event().map_err(|e| {
                position_error(content, reader.buffer_position() as usize, "malformed XML", e)
            })?;

            match event {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(syntax_error(content, offset, "multiple root elements"));
                    }
                    let node = Self::open_node(&start, content, offset)?;
                    stack.push(OpenElement {
                        node,
                        text: String::new(),
                    });
                }
                Event::Empty(start) => {
                    let node = Self::open_node(&start, content, offset)?;
                    Self::attach(node, &mut stack, &mut root, content, offset)?;
                }
                Event::End(_) => {
                    let open = stack
                        .pop()
                        .ok_or_else(|| syntax_error(content, offset, "unexpected closing tag"))?;
                    Self::attach(open.finish(), &mut stack, &mut root, content, offset)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| position_error(content, offset, "invalid text", e))?;
                    match stack.last_mut() {
                        Some(open) => open.text.push_str(&text),
                        None if text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}').is_empty() => {}
                        None => {
                            return Err(syntax_error(content, offset, "text outside the root element"));
                        }
                    }
                }
                Event::CData(data) => {
                    let text = std::str::from_utf8(&data)
                        .map_err(|e| position_error(content, offset, "invalid UTF-8 in CDATA", e))?;
                    if let Some(open) = stack.last_mut() {
                        open.text.push_str(text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(syntax_error(
                content,
                content.len(),
                &format!("unterminated element <{}>", open.node.name()),
            ));
        }

        let root = root.ok_or_else(|| syntax_error(content, 0, "document has no root element"))?;
        if root.name() != ROOT_ELEMENT {
            return Err(syntax_error(
                content,
                0,
                &format!(
                    "root element must be <{}>, found <{}>",
                    ROOT_ELEMENT,
                    root.name()
                ),
            ));
        }

        tracing::debug!("Parsed XML document with {} top-level nodes", root.children().len());
        Ok(root)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["xml"]
    }
}

/// Returns the 1-based line and column of a byte offset.
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let prefix = &content.as_bytes()[..offset.min(content.len())];
    let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = prefix
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    (line, prefix.len() - line_start + 1)
}

fn syntax_error(content: &str, offset: usize, message: &str) -> ConfigError {
    let (line, column) = line_column(content, offset);
    ConfigError::ParseError {
        message: format!("{} at line {}, column {}", message, line, column),
        source: None,
    }
}

fn position_error<E>(content: &str, offset: usize, message: &str, err: E) -> ConfigError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let (line, column) = line_column(content, offset);
    ConfigError::ParseError {
        message: format!("{} at line {}, column {}: {}", message, line, column, err),
        source: Some(Box::new(err)),
    }
}
