//! Generic XML tree decoding and encoding
//!
//! The coverage code never touches XML events directly; it works on an
//! ordered tree of elements. Each element is a list of `(key, value)`
//! entries in document order, where a key starting with `@` is an
//! attribute and any other key is a child element. A child key that
//! occurs more than once maps to a list, so zero/one/many occurrences
//! decode to no entry / a bare node / a list.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::Result;

/// One decoded value: element text, a nested element, or a repeated child.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    Text(String),
    Node(XmlNode),
    List(Vec<XmlValue>),
}

/// An element's attributes and children, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    entries: Vec<(String, XmlValue)>,
}

impl XmlNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry as-is.
    pub fn push(&mut self, key: impl Into<String>, value: XmlValue) {
        self.entries.push((key.into(), value));
    }

    /// Append a child element; a repeated key promotes the entry to a list.
    pub fn push_child(&mut self, key: &str, value: XmlValue) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, XmlValue::List(items))) => items.push(value),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, XmlValue::List(Vec::new()));
                if let XmlValue::List(items) = existing {
                    items.push(first);
                    items.push(value);
                }
            }
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Attribute text, looked up under the `@`-prefixed key.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self.get(&format!("@{name}")) {
            Some(XmlValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn entries(&self) -> &[(String, XmlValue)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decode an XML document into a tree.
///
/// The returned node represents the document itself: one child entry per
/// root element (so exactly one for well-formed input).
pub fn decode(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut document = XmlNode::new();
    let mut stack: Vec<(String, XmlNode, String)> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let node = node_with_attributes(e)?;
                stack.push((name, node, String::new()));
            }
            Event::Empty(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let node = node_with_attributes(e)?;
                attach(&mut stack, &mut document, &name, XmlValue::Node(node));
            }
            Event::Text(ref e) => {
                if let Some((_, _, text)) = stack.last_mut() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::End(_) => {
                if let Some((name, node, text)) = stack.pop() {
                    attach(&mut stack, &mut document, &name, finish_element(node, text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(document)
}

fn node_with_attributes(e: &BytesStart) -> Result<XmlNode> {
    let mut node = XmlNode::new();
    for attr in e.attributes().filter_map(|a| a.ok()) {
        let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
        let value = attr.unescape_value()?.into_owned();
        node.push(key, XmlValue::Text(value));
    }
    Ok(node)
}

/// A text-only element becomes a bare text value; text alongside
/// attributes or children is kept under the `#text` key.
fn finish_element(mut node: XmlNode, text: String) -> XmlValue {
    if node.is_empty() && !text.is_empty() {
        XmlValue::Text(text)
    } else {
        if !text.is_empty() {
            node.push("#text", XmlValue::Text(text));
        }
        XmlValue::Node(node)
    }
}

fn attach(
    stack: &mut [(String, XmlNode, String)],
    document: &mut XmlNode,
    name: &str,
    value: XmlValue,
) {
    match stack.last_mut() {
        Some((_, parent, _)) => parent.push_child(name, value),
        None => document.push_child(name, value),
    }
}

/// Encode a document tree as pretty-printed XML with 2-space indentation.
pub fn encode(document: &XmlNode) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    for (key, value) in document.entries() {
        write_value(&mut writer, key, value)?;
    }
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_value(writer: &mut Writer<Vec<u8>>, name: &str, value: &XmlValue) -> Result<()> {
    match value {
        XmlValue::List(items) => {
            for item in items {
                write_value(writer, name, item)?;
            }
        }
        XmlValue::Text(text) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        XmlValue::Node(node) => {
            let mut start = BytesStart::new(name);
            for (key, value) in node.entries() {
                if let (Some(attr_name), XmlValue::Text(text)) = (key.strip_prefix('@'), value) {
                    start.push_attribute((attr_name, text.as_str()));
                }
            }

            let children: Vec<_> = node
                .entries()
                .iter()
                .filter(|(key, _)| !key.starts_with('@'))
                .collect();

            if children.is_empty() {
                writer.write_event(Event::Empty(start))?;
            } else {
                writer.write_event(Event::Start(start))?;
                for (key, value) in children {
                    if key == "#text" {
                        if let XmlValue::Text(text) = value {
                            writer.write_event(Event::Text(BytesText::new(text)))?;
                        }
                    } else {
                        write_value(writer, key, value)?;
                    }
                }
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        }
    }
    Ok(())
}
