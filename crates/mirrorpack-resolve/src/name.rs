//! Plugin name validation.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Returns `true` when `name` is unchanged by URI component encoding.
#[must_use]
pub fn is_uri_safe(name: &str) -> bool {
    matches!(Cow::from(utf8_percent_encode(name, URI_COMPONENT)), Cow::Borrowed(_))
}

/// Returns `true` when `name` can be used as a plugin directory name.
///
/// On top of URI safety, empty names and the `.`/`..` segments are refused
/// since they would address the resolution root or its parent.
#[must_use]
pub fn is_valid_plugin_name(name: &str) -> bool {
    !matches!(name, "" | "." | "..") && is_uri_safe(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("clock", true)]
    #[case("MMM-Weather_2.0", true)]
    #[case("it's(ok)!~*", true)]
    #[case("a/b", false)]
    #[case("hello world", false)]
    #[case("naïve", false)]
    #[case("a%20b", false)]
    #[case("a?b", false)]
    fn uri_safety_matches_component_encoding(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_uri_safe(name), expected);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    fn path_segments_are_refused(#[case] name: &str) {
        assert!(!is_valid_plugin_name(name));
    }
}
