//! Pairwise combination of coverage documents
//!
//! Counters sum and rates are recomputed from the summed counters;
//! complexity is the maximum observed; package lists concatenate in input
//! order with filenames rebased per [`crate::paths`]; version, timestamp
//! and sources are stamped fresh on every combination. Inputs are never
//! mutated. N documents merge as a left fold, so output is deterministic
//! for a given input order.

use std::path::Path;

use chrono::Utc;

use crate::error::{MergeError, Result};
use crate::model::Coverage;
use crate::paths::rebased_packages;

/// Version stamped on merged output, replacing both inputs' versions.
pub const MERGED_VERSION: &str = "1.0";

/// Combine two coverage documents into a new one.
pub fn merge(a: &Coverage, b: &Coverage) -> Result<Coverage> {
    let cwd = std::env::current_dir()?;
    merge_in(a, b, &cwd, Utc::now().timestamp_millis())
}

/// [`merge`] with an explicit working directory and clock.
pub(crate) fn merge_in(
    a: &Coverage,
    b: &Coverage,
    cwd: &Path,
    timestamp: i64,
) -> Result<Coverage> {
    let branches_covered = a.branches_covered + b.branches_covered;
    let branches_valid = a.branches_valid + b.branches_valid;
    let branch_rate = if branches_valid > 0 {
        branches_covered as f64 / branches_valid as f64
    } else {
        0.0
    };

    let lines_covered = a.lines_covered + b.lines_covered;
    let lines_valid = a.lines_valid + b.lines_valid;
    let line_rate = if lines_valid > 0 {
        lines_covered as f64 / lines_valid as f64
    } else {
        0.0
    };

    let mut packages = rebased_packages(a, cwd)?;
    packages.extend(rebased_packages(b, cwd)?);

    Ok(Coverage {
        line_rate,
        branch_rate,
        lines_covered,
        lines_valid,
        branches_covered,
        branches_valid,
        complexity: a.complexity.max(b.complexity),
        version: MERGED_VERSION.to_string(),
        timestamp,
        packages,
        sources: Some(vec![cwd.display().to_string()]),
    })
}

/// Left fold of [`merge`] over the input list.
///
/// A single document is returned unchanged, with no combination logic
/// executed. Zero documents is an error; no output is produced.
pub fn merge_all(inputs: &[Coverage]) -> Result<Coverage> {
    let (first, rest) = inputs.split_first().ok_or(MergeError::EmptyInput)?;
    let mut merged = first.clone();
    for next in rest {
        merged = merge(&merged, next)?;
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Class, Package};

    fn package(name: &str, classes: Option<Vec<Class>>) -> Package {
        Package {
            name: name.to_string(),
            line_rate: 0.5,
            branch_rate: 0.5,
            complexity: None,
            classes,
        }
    }

    fn class(filename: &str) -> Class {
        Class {
            name: "C".to_string(),
            filename: filename.to_string(),
            line_rate: 0.5,
            branch_rate: 0.5,
            complexity: None,
            methods: None,
            lines: None,
        }
    }

    fn coverage(
        lines: (u64, u64),
        branches: (u64, u64),
        complexity: f64,
        packages: Vec<Package>,
    ) -> Coverage {
        let line_rate = if lines.1 > 0 { lines.0 as f64 / lines.1 as f64 } else { 0.0 };
        let branch_rate = if branches.1 > 0 { branches.0 as f64 / branches.1 as f64 } else { 0.0 };
        Coverage {
            line_rate,
            branch_rate,
            lines_covered: lines.0,
            lines_valid: lines.1,
            branches_covered: branches.0,
            branches_valid: branches.1,
            complexity,
            version: "1.9".to_string(),
            timestamp: 1_706_000_000_000,
            packages,
            sources: None,
        }
    }

    #[test]
    fn test_merge_two_documents() {
        let a = coverage(
            (10, 20),
            (2, 4),
            5.0,
            vec![package("p1", Some(vec![class("src/a.rs")]))],
        );
        let b = coverage((5, 5), (0, 0), 8.0, vec![package("p2", None)]);

        let merged = merge_in(&a, &b, Path::new("/work"), 42).unwrap();

        assert_eq!(merged.lines_covered, 15);
        assert_eq!(merged.lines_valid, 25);
        assert!((merged.line_rate - 0.6).abs() < 1e-12);
        assert_eq!(merged.branches_covered, 2);
        assert_eq!(merged.branches_valid, 4);
        assert!((merged.branch_rate - 0.5).abs() < 1e-12);
        assert_eq!(merged.complexity, 8.0);
        assert_eq!(merged.version, MERGED_VERSION);
        assert_eq!(merged.timestamp, 42);
        assert_eq!(merged.sources, Some(vec!["/work".to_string()]));

        let names: Vec<_> = merged.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["p1", "p2"]);
    }

    #[test]
    fn test_merge_zero_denominators() {
        let a = coverage((0, 0), (0, 0), 0.0, vec![]);
        let b = coverage((0, 0), (0, 0), 0.0, vec![]);

        let merged = merge_in(&a, &b, Path::new("/work"), 0).unwrap();
        assert_eq!(merged.line_rate, 0.0);
        assert_eq!(merged.branch_rate, 0.0);
    }

    #[test]
    fn test_merge_preserves_duplicate_packages_in_order() {
        let a = coverage((1, 2), (0, 0), 0.0, vec![package("p1", None), package("p2", None)]);
        let b = coverage((1, 2), (0, 0), 0.0, vec![package("p1", None)]);

        let merged = merge_in(&a, &b, Path::new("/work"), 0).unwrap();
        let names: Vec<_> = merged.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["p1", "p2", "p1"]);
    }

    #[test]
    fn test_merge_rebases_filenames_of_sourced_input() {
        let mut a = coverage(
            (1, 2),
            (0, 0),
            0.0,
            vec![package("p1", Some(vec![class("build")]))],
        );
        a.sources = Some(vec!["/repo".to_string()]);
        let b = coverage((1, 2), (0, 0), 0.0, vec![package("p2", None)]);

        let merged = merge_in(&a, &b, Path::new("/repo/build/out"), 0).unwrap();
        assert_eq!(
            merged.packages[0].classes.as_ref().unwrap()[0].filename,
            "out"
        );
    }

    #[test]
    fn test_merge_all_single_input_is_identity() {
        let doc = coverage((3, 4), (1, 2), 2.5, vec![package("p1", None)]);
        let merged = merge_all(std::slice::from_ref(&doc)).unwrap();

        assert_eq!(merged.line_rate, doc.line_rate);
        assert_eq!(merged.branch_rate, doc.branch_rate);
        assert_eq!(merged.lines_covered, doc.lines_covered);
        assert_eq!(merged.lines_valid, doc.lines_valid);
        assert_eq!(merged.branches_covered, doc.branches_covered);
        assert_eq!(merged.branches_valid, doc.branches_valid);
        assert_eq!(merged.complexity, doc.complexity);
        assert_eq!(merged.packages, doc.packages);
        assert_eq!(merged.sources, doc.sources);
    }

    #[test]
    fn test_merge_all_folds_left_to_right() {
        let inputs = vec![
            coverage((1, 2), (0, 0), 1.0, vec![package("p1", None)]),
            coverage((2, 3), (1, 1), 2.0, vec![package("p2", None)]),
            coverage((3, 5), (0, 2), 3.0, vec![package("p3", None)]),
        ];

        let merged = merge_all(&inputs).unwrap();
        assert_eq!(merged.lines_covered, 6);
        assert_eq!(merged.lines_valid, 10);
        assert_eq!(merged.branches_covered, 1);
        assert_eq!(merged.branches_valid, 3);
        assert_eq!(merged.complexity, 3.0);

        let names: Vec<_> = merged.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["p1", "p2", "p3"]);
    }

    #[test]
    fn test_merge_all_empty_input() {
        let err = merge_all(&[]).unwrap_err();
        assert!(matches!(err, MergeError::EmptyInput));
    }
}
