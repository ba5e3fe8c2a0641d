//! Settings that shape how resolved modules are handed to the bundler.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether resolved module paths are emitted eagerly or as deferred imports.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CodeSplitMode {
    /// `_path` holds the absolute path as a string.
    #[default]
    Eager,
    /// `_path` holds a function returning a dynamic import.
    Lazy,
}

/// Comment style attached to deferred imports.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PragmaStyle {
    /// `/* webpackChunkName: "<name>" */`.
    #[default]
    Webpack,
    /// No chunk comment.
    Bare,
}

/// Errors encountered while parsing [`CodeSplitMode`] or [`PragmaStyle`].
pub type BundlingParseError = strum::ParseError;
