//! Source locations carried by lowered nodes and syntax diagnostics.

use std::fmt;
use std::ops::Range;

/// Where a construct sits in the text it was parsed from.
///
/// Lines and columns count from one. Columns are byte offsets within the
/// line, matching what Tree-sitter reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Bytes the construct occupies.
    pub byte_range: Range<usize>,
    /// Line of the first byte.
    pub line: u32,
    /// Column of the first byte.
    pub column: u32,
}

impl Span {
    pub(crate) fn of(node: tree_sitter::Node<'_>) -> Self {
        let start = node.start_position();
        Self {
            byte_range: node.byte_range(),
            line: one_based(start.row),
            column: one_based(start.column),
        }
    }

    /// Returns the text the span covers, if it lies within `source`.
    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.byte_range.clone())
    }
}

fn one_based(index: usize) -> u32 {
    u32::try_from(index).map_or(u32::MAX, |zero_based| zero_based.saturating_add(1))
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_slices_the_source() {
        let span = Span {
            byte_range: 4..10,
            line: 1,
            column: 5,
        };
        assert_eq!(span.text("let config = {};"), Some("config"));
        assert_eq!(span.text("let"), None);
        assert_eq!(span.to_string(), "1:5");
    }

    #[test]
    fn huge_indices_saturate() {
        assert_eq!(one_based(0), 1);
        assert_eq!(one_based(usize::MAX), u32::MAX);
    }
}
