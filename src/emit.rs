//! Conversion of coverage values back into XML trees
//!
//! The mirror of [`crate::parse`]: fields emit in a fixed per-type order
//! regardless of how a value was built, unset optionals are omitted
//! entirely, and integral floats keep a trailing `.0`, so identical
//! logical content always serializes to identical bytes.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::{Class, Condition, Coverage, Line, Method, Package};
use crate::xmltree::{self, XmlNode, XmlValue};

/// Write a coverage document as pretty-printed Cobertura XML.
pub fn write_coverage(coverage: &Coverage, path: &Path) -> Result<()> {
    let xml = to_xml_string(coverage)?;
    fs::write(path, xml)?;
    Ok(())
}

/// Render a coverage document to an XML string.
pub fn to_xml_string(coverage: &Coverage) -> Result<String> {
    xmltree::encode(&coverage_to_tree(coverage))
}

/// Build the document tree for a coverage value.
pub fn coverage_to_tree(coverage: &Coverage) -> XmlNode {
    let mut root = XmlNode::new();
    push_float(&mut root, "@line-rate", coverage.line_rate);
    push_float(&mut root, "@branch-rate", coverage.branch_rate);
    push_text(&mut root, "@lines-covered", coverage.lines_covered.to_string());
    push_text(&mut root, "@lines-valid", coverage.lines_valid.to_string());
    push_text(&mut root, "@branches-covered", coverage.branches_covered.to_string());
    push_text(&mut root, "@branches-valid", coverage.branches_valid.to_string());
    push_float(&mut root, "@complexity", coverage.complexity);
    push_text(&mut root, "@version", coverage.version.clone());
    push_text(&mut root, "@timestamp", coverage.timestamp.to_string());

    root.push("packages", wrapper("package", coverage.packages.iter().map(package_node)));

    if let Some(sources) = &coverage.sources {
        root.push(
            "sources",
            wrapper("source", sources.iter().map(|s| XmlValue::Text(s.clone()))),
        );
    }

    let mut document = XmlNode::new();
    document.push("coverage", XmlValue::Node(root));
    document
}

fn package_node(package: &Package) -> XmlValue {
    let mut node = XmlNode::new();
    push_text(&mut node, "@name", package.name.clone());
    push_float(&mut node, "@line-rate", package.line_rate);
    push_float(&mut node, "@branch-rate", package.branch_rate);
    if let Some(complexity) = package.complexity {
        push_float(&mut node, "@complexity", complexity);
    }
    if let Some(classes) = &package.classes {
        node.push("classes", wrapper("class", classes.iter().map(class_node)));
    }
    XmlValue::Node(node)
}

fn class_node(class: &Class) -> XmlValue {
    let mut node = XmlNode::new();
    push_text(&mut node, "@name", class.name.clone());
    push_text(&mut node, "@filename", class.filename.clone());
    push_float(&mut node, "@line-rate", class.line_rate);
    push_float(&mut node, "@branch-rate", class.branch_rate);
    if let Some(complexity) = class.complexity {
        push_float(&mut node, "@complexity", complexity);
    }
    if let Some(methods) = &class.methods {
        node.push("methods", wrapper("method", methods.iter().map(method_node)));
    }
    if let Some(lines) = &class.lines {
        node.push("lines", wrapper("line", lines.iter().map(line_node)));
    }
    XmlValue::Node(node)
}

fn method_node(method: &Method) -> XmlValue {
    let mut node = XmlNode::new();
    push_text(&mut node, "@name", method.name.clone());
    push_text(&mut node, "@signature", method.signature.clone());
    push_float(&mut node, "@line-rate", method.line_rate);
    push_float(&mut node, "@branch-rate", method.branch_rate);
    if let Some(complexity) = method.complexity {
        push_float(&mut node, "@complexity", complexity);
    }
    XmlValue::Node(node)
}

fn line_node(line: &Line) -> XmlValue {
    let mut node = XmlNode::new();
    push_text(&mut node, "@hits", line.hits.to_string());
    push_text(&mut node, "@number", line.number.to_string());
    if let Some(branch) = line.branch {
        push_text(&mut node, "@branch", branch.to_string());
    }
    if let Some(condition_coverage) = &line.condition_coverage {
        push_text(&mut node, "@condition-coverage", condition_coverage.clone());
    }
    if let Some(conditions) = &line.conditions {
        node.push(
            "conditions",
            wrapper("condition", conditions.iter().map(condition_node)),
        );
    }
    XmlValue::Node(node)
}

fn condition_node(condition: &Condition) -> XmlValue {
    let mut node = XmlNode::new();
    push_text(&mut node, "@number", condition.number.to_string());
    push_text(&mut node, "@type", condition.kind.clone());
    push_text(&mut node, "@coverage", condition.coverage.clone());
    XmlValue::Node(node)
}

/// A wrapper element holding a repeated child, e.g. `<packages>` holding
/// `<package>`. Zero items encode as an empty wrapper.
fn wrapper(item: &str, values: impl Iterator<Item = XmlValue>) -> XmlValue {
    let items: Vec<XmlValue> = values.collect();
    let mut node = XmlNode::new();
    if !items.is_empty() {
        node.push(item, XmlValue::List(items));
    }
    XmlValue::Node(node)
}

fn push_text(node: &mut XmlNode, key: &str, value: String) {
    node.push(key, XmlValue::Text(value));
}

fn push_float(node: &mut XmlNode, key: &str, value: f64) {
    push_text(node, key, format_float(value));
}

/// Integral floats keep a trailing `.0`, matching the text form the rates
/// were read from.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
