//! Error types for coverage parsing and merging

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MergeError>;

/// Everything that can go wrong between reading an input report and
/// writing the merged output.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("required element <{0}> not found")]
    MissingElement(&'static str),

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("<{element}> attribute '{attribute}' has invalid value {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("malformed coverage input: {0}")]
    Malformed(String),

    #[error("cannot express {dir} relative to {base}")]
    PathResolution { dir: PathBuf, base: PathBuf },

    #[error("no coverage documents to merge")]
    EmptyInput,

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
