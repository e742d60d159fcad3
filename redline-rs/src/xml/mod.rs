//! Markup parsing and raw markup helpers.
//!
//! The parser turns a buffer into a [`Document`](crate::node::Document); the
//! `markup` helpers edit and emit verbatim markup for the renderers.

pub mod markup;
mod parser;

pub use markup::set_attribute;
pub use parser::{parse_file, parse_str, XmlParser};
