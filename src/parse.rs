//! Cobertura XML normalization
//!
//! Converts decoded XML trees into typed [`Coverage`] values. The
//! list-or-scalar ambiguity of the decoded tree is resolved by one rule
//! applied at every repeatable field: absent → empty sequence, bare node
//! → one-element sequence, list → unchanged. Attribute parsing is strict;
//! a missing required attribute or an unparseable value is an error,
//! never a default.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{MergeError, Result};
use crate::model::{Class, Condition, Coverage, Line, Method, Package};
use crate::xmltree::{self, XmlNode, XmlValue};

/// Read and normalize one Cobertura XML report.
pub fn parse_coverage(path: &Path) -> Result<Coverage> {
    let content = fs::read_to_string(path)?;
    parse_coverage_string(&content)
}

/// Normalize Cobertura XML content from a string.
pub fn parse_coverage_string(xml: &str) -> Result<Coverage> {
    let document = xmltree::decode(xml)?;
    coverage_from_tree(&document)
}

/// Build a [`Coverage`] from a decoded document tree.
pub fn coverage_from_tree(document: &XmlNode) -> Result<Coverage> {
    let root = document
        .get("coverage")
        .ok_or(MergeError::MissingElement("coverage"))?;
    let root = as_node(root, "coverage")?;

    let packages_node = as_node(
        root.get("packages")
            .ok_or(MergeError::MissingElement("packages"))?,
        "packages",
    )?;
    let packages = child_list(packages_node, "package")
        .into_iter()
        .map(package_from)
        .collect::<Result<Vec<_>>>()?;

    let sources = match root.get("sources") {
        None => None,
        Some(value) => {
            let node = as_node(value, "sources")?;
            let roots = child_list(node, "source")
                .into_iter()
                .map(source_from)
                .collect::<Result<Vec<_>>>()?;
            Some(roots)
        }
    };

    Ok(Coverage {
        line_rate: required(root, "coverage", "line-rate")?,
        branch_rate: required(root, "coverage", "branch-rate")?,
        lines_covered: required(root, "coverage", "lines-covered")?,
        lines_valid: required(root, "coverage", "lines-valid")?,
        branches_covered: required(root, "coverage", "branches-covered")?,
        branches_valid: required(root, "coverage", "branches-valid")?,
        complexity: required(root, "coverage", "complexity")?,
        version: required_text(root, "coverage", "version")?,
        timestamp: required(root, "coverage", "timestamp")?,
        packages,
        sources,
    })
}

fn package_from(value: &XmlValue) -> Result<Package> {
    let node = as_node(value, "package")?;
    Ok(Package {
        name: required_text(node, "package", "name")?,
        line_rate: required(node, "package", "line-rate")?,
        branch_rate: required(node, "package", "branch-rate")?,
        complexity: optional(node, "package", "complexity")?,
        classes: wrapped_list(node, "classes", "class", class_from)?,
    })
}

fn class_from(value: &XmlValue) -> Result<Class> {
    let node = as_node(value, "class")?;
    Ok(Class {
        name: required_text(node, "class", "name")?,
        filename: required_text(node, "class", "filename")?,
        line_rate: required(node, "class", "line-rate")?,
        branch_rate: required(node, "class", "branch-rate")?,
        complexity: optional(node, "class", "complexity")?,
        methods: wrapped_list(node, "methods", "method", method_from)?,
        lines: wrapped_list(node, "lines", "line", line_from)?,
    })
}

fn method_from(value: &XmlValue) -> Result<Method> {
    let node = as_node(value, "method")?;
    Ok(Method {
        name: required_text(node, "method", "name")?,
        signature: required_text(node, "method", "signature")?,
        line_rate: required(node, "method", "line-rate")?,
        branch_rate: required(node, "method", "branch-rate")?,
        complexity: optional(node, "method", "complexity")?,
    })
}

fn line_from(value: &XmlValue) -> Result<Line> {
    let node = as_node(value, "line")?;
    Ok(Line {
        hits: required(node, "line", "hits")?,
        number: required(node, "line", "number")?,
        branch: optional(node, "line", "branch")?,
        condition_coverage: node.attr("condition-coverage").map(str::to_string),
        conditions: wrapped_list(node, "conditions", "condition", condition_from)?,
    })
}

fn condition_from(value: &XmlValue) -> Result<Condition> {
    let node = as_node(value, "condition")?;
    Ok(Condition {
        number: required(node, "condition", "number")?,
        kind: required_text(node, "condition", "type")?,
        coverage: required_text(node, "condition", "coverage")?,
    })
}

fn source_from(value: &XmlValue) -> Result<String> {
    match value {
        XmlValue::Text(text) => Ok(text.clone()),
        _ => Err(MergeError::Malformed(
            "<source> must contain a path".to_string(),
        )),
    }
}

/// The single normalization rule for repeatable children.
fn child_list<'a>(node: &'a XmlNode, key: &str) -> Vec<&'a XmlValue> {
    match node.get(key) {
        None => Vec::new(),
        Some(XmlValue::List(items)) => items.iter().collect(),
        Some(single) => vec![single],
    }
}

/// An optional wrapper element holding a repeatable child, e.g.
/// `<lines>` holding `<line>`. Absent wrapper → `None`; present wrapper
/// → its children normalized per [`child_list`].
fn wrapped_list<T>(
    node: &XmlNode,
    wrapper: &'static str,
    item: &str,
    build: impl Fn(&XmlValue) -> Result<T>,
) -> Result<Option<Vec<T>>> {
    match node.get(wrapper) {
        None => Ok(None),
        Some(value) => {
            let wrapper_node = as_node(value, wrapper)?;
            let items = child_list(wrapper_node, item)
                .into_iter()
                .map(build)
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(items))
        }
    }
}

fn as_node<'a>(value: &'a XmlValue, element: &'static str) -> Result<&'a XmlNode> {
    match value {
        XmlValue::Node(node) => Ok(node),
        _ => Err(MergeError::Malformed(format!(
            "<{element}> must be an element"
        ))),
    }
}

fn required_text(node: &XmlNode, element: &'static str, attribute: &'static str) -> Result<String> {
    node.attr(attribute)
        .map(str::to_string)
        .ok_or(MergeError::MissingAttribute { element, attribute })
}

fn required<T: FromStr>(
    node: &XmlNode,
    element: &'static str,
    attribute: &'static str,
) -> Result<T> {
    let raw = node
        .attr(attribute)
        .ok_or(MergeError::MissingAttribute { element, attribute })?;
    raw.parse().map_err(|_| MergeError::InvalidAttribute {
        element,
        attribute,
        value: raw.to_string(),
    })
}

fn optional<T: FromStr>(
    node: &XmlNode,
    element: &'static str,
    attribute: &'static str,
) -> Result<Option<T>> {
    match node.attr(attribute) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| MergeError::InvalidAttribute {
            element,
            attribute,
            value: raw.to_string(),
        }),
    }
}
