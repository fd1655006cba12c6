//! Decomposition of slash-separated benchmark identifiers.
//!
//! Every collector, the comparison engine, the reshaper and all renderers go
//! through [`decompose`]; nothing else in the crate splits names on `/`.

use std::fmt;

/// Semantic view of a benchmark identifier such as
/// `single_alloc_dealloc/rt_nightly/8`.
///
/// Borrows from the input string; decomposition never allocates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BenchmarkName<'a> {
    group: &'a str,
    variant: &'a str,
    parameter: Option<&'a str>,
    single_segment: bool,
}

impl<'a> BenchmarkName<'a> {
    /// First path segment.
    pub fn group(&self) -> &'a str {
        self.group
    }

    /// Second path segment, or the group itself for single-segment names.
    pub fn variant(&self) -> &'a str {
        self.variant
    }

    /// Third path segment when present.
    pub fn parameter(&self) -> Option<&'a str> {
        self.parameter
    }

    /// True when the name had no `/` at all.
    pub fn is_single_segment(&self) -> bool {
        self.single_segment
    }

    /// Re-joins the decomposed segments. Identical to the input for names
    /// with at most three segments; deeper segments are not retained.
    pub fn rejoin(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BenchmarkName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.single_segment {
            return f.write_str(self.group);
        }
        write!(f, "{}/{}", self.group, self.variant)?;
        if let Some(param) = self.parameter {
            write!(f, "/{param}")?;
        }
        Ok(())
    }
}

/// Splits `name` into `(group, variant, parameter)`. Total: empty segments
/// are kept as empty strings.
pub fn decompose(name: &str) -> BenchmarkName<'_> {
    let mut parts = name.split('/');
    let group = parts.next().unwrap_or_default();
    let (variant, single_segment) = match parts.next() {
        Some(variant) => (variant, false),
        None => (group, true),
    };
    BenchmarkName {
        group,
        variant,
        parameter: parts.next(),
        single_segment,
    }
}

/// Builds a full name from its parts, omitting an absent parameter.
pub fn join(group: &str, variant: &str, parameter: Option<&str>) -> String {
    match parameter {
        Some(param) => format!("{group}/{variant}/{param}"),
        None => format!("{group}/{variant}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_segments() {
        let name = decompose("single_alloc_dealloc/rt_nightly/8");
        assert_eq!(name.group(), "single_alloc_dealloc");
        assert_eq!(name.variant(), "rt_nightly");
        assert_eq!(name.parameter(), Some("8"));
        assert_eq!(name.rejoin(), "single_alloc_dealloc/rt_nightly/8");
    }

    #[test]
    fn test_single_segment_is_its_own_variant() {
        let name = decompose("startup");
        assert_eq!(name.group(), "startup");
        assert_eq!(name.variant(), "startup");
        assert_eq!(name.parameter(), None);
        assert!(name.is_single_segment());
        assert_eq!(name.rejoin(), "startup");
    }

    #[test]
    fn test_empty_segments_preserved() {
        let name = decompose("a//c");
        assert_eq!(name.group(), "a");
        assert_eq!(name.variant(), "");
        assert_eq!(name.parameter(), Some("c"));
        assert_eq!(name.rejoin(), "a//c");

        let empty = decompose("");
        assert_eq!(empty.group(), "");
        assert_eq!(empty.rejoin(), "");
    }

    #[test]
    fn test_deep_names_keep_third_segment() {
        let name = decompose("a/b/c/d");
        assert_eq!(name.parameter(), Some("c"));
        assert_eq!(name.rejoin(), "a/b/c");
    }
}
