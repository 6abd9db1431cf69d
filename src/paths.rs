//! Class filename rebasing
//!
//! When a document declares source roots, each class filename is relative
//! to the first root. During merge the filename is replaced by the working
//! directory expressed relative to the class's location under that root,
//! anchoring the merged report at the directory the merge ran in.

use std::path::Path;

use crate::error::{MergeError, Result};
use crate::model::{Class, Coverage, Package};

/// Rewrite `class.filename` as `cwd` expressed relative to
/// `source_root.join(filename)`.
///
/// Strict prefix computation: fails unless the joined path is a prefix of
/// `cwd`, and yields `.` when the two are equal.
pub fn rewrite_class(class: &Class, source_root: &str, cwd: &Path) -> Result<Class> {
    let base = Path::new(source_root).join(&class.filename);
    let relative = cwd
        .strip_prefix(&base)
        .map_err(|_| MergeError::PathResolution {
            dir: cwd.to_path_buf(),
            base: base.clone(),
        })?;

    let filename = if relative.as_os_str().is_empty() {
        ".".to_string()
    } else {
        relative.display().to_string()
    };

    Ok(Class {
        filename,
        ..class.clone()
    })
}

/// Rewrite every class of a package; a package without classes passes
/// through untouched.
pub fn rewrite_package(package: &Package, source_root: &str, cwd: &Path) -> Result<Package> {
    match &package.classes {
        Some(classes) if !classes.is_empty() => {
            let rewritten = classes
                .iter()
                .map(|class| rewrite_class(class, source_root, cwd))
                .collect::<Result<Vec<_>>>()?;
            Ok(Package {
                classes: Some(rewritten),
                ..package.clone()
            })
        }
        _ => Ok(package.clone()),
    }
}

/// A document's packages with filenames rebased against its first declared
/// source root. Documents without source roots pass through unrewritten;
/// roots past the first are ignored.
pub fn rebased_packages(coverage: &Coverage, cwd: &Path) -> Result<Vec<Package>> {
    match coverage.sources.as_ref().and_then(|roots| roots.first()) {
        Some(root) => coverage
            .packages
            .iter()
            .map(|package| rewrite_package(package, root, cwd))
            .collect(),
        None => Ok(coverage.packages.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(filename: &str) -> Class {
        Class {
            name: "C".to_string(),
            filename: filename.to_string(),
            line_rate: 1.0,
            branch_rate: 0.0,
            complexity: None,
            methods: None,
            lines: None,
        }
    }

    fn package(classes: Option<Vec<Class>>) -> Package {
        Package {
            name: "p".to_string(),
            line_rate: 1.0,
            branch_rate: 0.0,
            complexity: None,
            classes,
        }
    }

    #[test]
    fn test_rewrite_class_under_cwd() {
        let rewritten = rewrite_class(&class("build"), "/repo", Path::new("/repo/build/debug")).unwrap();
        assert_eq!(rewritten.filename, "debug");
        assert_eq!(rewritten.name, "C");
    }

    #[test]
    fn test_rewrite_class_equal_paths() {
        let rewritten = rewrite_class(&class("build"), "/repo", Path::new("/repo/build")).unwrap();
        assert_eq!(rewritten.filename, ".");
    }

    #[test]
    fn test_rewrite_class_not_a_prefix() {
        let err = rewrite_class(&class("src/main.rs"), "/repo", Path::new("/elsewhere")).unwrap_err();
        assert!(matches!(err, MergeError::PathResolution { .. }));
    }

    #[test]
    fn test_rewrite_package_without_classes() {
        let no_classes = package(None);
        let rewritten = rewrite_package(&no_classes, "/repo", Path::new("/elsewhere")).unwrap();
        assert_eq!(rewritten, no_classes);

        let empty = package(Some(vec![]));
        let rewritten = rewrite_package(&empty, "/repo", Path::new("/elsewhere")).unwrap();
        assert_eq!(rewritten, empty);
    }

    fn coverage(sources: Option<Vec<String>>, packages: Vec<Package>) -> Coverage {
        Coverage {
            line_rate: 1.0,
            branch_rate: 0.0,
            lines_covered: 1,
            lines_valid: 1,
            branches_covered: 0,
            branches_valid: 0,
            complexity: 0.0,
            version: "1.9".to_string(),
            timestamp: 0,
            packages,
            sources,
        }
    }

    #[test]
    fn test_rebased_packages_without_sources() {
        let doc = coverage(None, vec![package(Some(vec![class("src/main.rs")]))]);
        let packages = rebased_packages(&doc, Path::new("/elsewhere")).unwrap();
        assert_eq!(packages, doc.packages);

        let doc = coverage(Some(vec![]), doc.packages.clone());
        let packages = rebased_packages(&doc, Path::new("/elsewhere")).unwrap();
        assert_eq!(packages, doc.packages);
    }

    #[test]
    fn test_rebased_packages_uses_first_root_only() {
        let doc = coverage(
            Some(vec!["/repo".to_string(), "/other".to_string()]),
            vec![package(Some(vec![class("build")]))],
        );
        let packages = rebased_packages(&doc, Path::new("/repo/build/out")).unwrap();
        assert_eq!(packages[0].classes.as_ref().unwrap()[0].filename, "out");
    }
}
