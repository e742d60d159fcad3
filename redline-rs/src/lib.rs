//! xml-redline - structural "track changes" for legislative XML
//!
//! This library compares versions of a semi-structured markup document and
//! renders the differences as annotated markup that stays well-formed.
//!
//! # Overview
//!
//! A comparison runs in three stages:
//!
//! - Both buffers are parsed into element trees that remember the verbatim
//!   source of every element.
//! - A tree differ pairs corresponding elements (by stable identifier, or by
//!   tag name, position and content similarity) and records every decision in
//!   an edit script. Leaf content is diffed word by word with an LCS diff.
//! - A renderer turns the script into single-column, two-column or three-way
//!   markup.
//!
//! # Example
//!
//! ```
//! let old = r#"<article id="a1"><num>1</num></article>"#;
//! let new = r#"<article id="a1"><num>2</num></article>"#;
//! let merged = xml_redline::compare(old, new).unwrap();
//! assert_eq!(
//!     merged,
//!     r#"<article id="a1"><num><span class="content-removed">1</span><span class="content-added">2</span></num></article>"#
//! );
//! ```

pub mod comparator;
pub mod config;
pub mod constants;
pub mod diff;
pub mod error;
pub mod matching;
pub mod measure;
pub mod node;
pub mod render;
pub mod xml;

// Re-export commonly used types
pub use comparator::{compare, compare_three_way, compare_two_column, ChangeSummary, Comparator};
pub use config::{
    CompareOptions, CompareOptionsBuilder, MarkerStyle, MatchWeights, PolicyFlags, ThreeWayMode,
};
pub use diff::{EditScript, MoveId, Step, TextEdit, Token, TokenKind};
pub use error::{Error, Result};
pub use matching::{ComparePolicy, MatchResult, NodeMatcher, OptionsPolicy};
pub use measure::{ContentSimilarity, QGramSimilarity};
pub use node::{Document, Element, NodeId};
pub use render::{Renderer, SingleColumn, ThreeWay, TwoColumn};
pub use xml::{parse_file, parse_str, XmlParser};
