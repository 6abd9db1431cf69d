//! Covmerge - Cobertura coverage report merger
//!
//! A library for combining Cobertura XML coverage reports:
//! - Generic XML tree decoding/encoding with list-or-scalar normalization
//! - Typed coverage model (coverage → packages → classes → methods/lines)
//! - Pairwise merge with summed counters, recomputed rates and rebased
//!   class filenames
//! - Deterministic, canonically-ordered XML output

pub mod emit;
pub mod error;
pub mod merge;
pub mod model;
pub mod parse;
pub mod paths;
pub mod xmltree;

pub use emit::{to_xml_string, write_coverage};
pub use error::{MergeError, Result};
pub use merge::{merge, merge_all, MERGED_VERSION};
pub use model::{Class, Condition, Coverage, Line, Method, Package};
pub use parse::{parse_coverage, parse_coverage_string};
