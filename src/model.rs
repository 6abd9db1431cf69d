//! Typed model of one Cobertura coverage document
//!
//! Mirrors the coverage-04 DTD: coverage → packages → classes →
//! methods/lines → conditions. Wrapper elements (`<methods>`, `<lines>`,
//! `<conditions>`, `<classes>`) are `Option<Vec<_>>`: `None` when the
//! wrapper is absent from the document, an empty vec when it is present
//! with no children. Merging never mutates a document in place.

/// One branch condition's outcome on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub number: u64,
    /// The `type` attribute, e.g. "jump".
    pub kind: String,
    pub coverage: String,
}

/// One source line's execution count.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub hits: u64,
    pub number: u64,
    pub branch: Option<bool>,
    pub condition_coverage: Option<String>,
    pub conditions: Option<Vec<Condition>>,
}

/// Per-method summary statistics. Methods are parallel summaries; line
/// data belongs to the owning class.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub signature: String,
    pub line_rate: f64,
    pub branch_rate: f64,
    pub complexity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    /// Path relative to the document's first source root; rewritten
    /// during merge.
    pub filename: String,
    pub line_rate: f64,
    pub branch_rate: f64,
    pub complexity: Option<f64>,
    pub methods: Option<Vec<Method>>,
    pub lines: Option<Vec<Line>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    pub line_rate: f64,
    pub branch_rate: f64,
    pub complexity: Option<f64>,
    pub classes: Option<Vec<Class>>,
}

/// The root aggregate: one per input file, one for the merged output.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    pub line_rate: f64,
    pub branch_rate: f64,
    pub lines_covered: u64,
    pub lines_valid: u64,
    pub branches_covered: u64,
    pub branches_valid: u64,
    pub complexity: f64,
    pub version: String,
    /// Generation time in milliseconds since the epoch.
    pub timestamp: i64,
    pub packages: Vec<Package>,
    /// Base directories class filenames are relative to.
    pub sources: Option<Vec<String>>,
}
