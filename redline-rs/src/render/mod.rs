//! Rendering policies.
//!
//! A renderer walks an [`EditScript`](crate::diff::EditScript) once, front to
//! back, and assembles annotated markup from verbatim slices of the inputs.

mod inline;
mod single;
mod three_way;
mod two_column;

pub use single::SingleColumn;
pub use three_way::ThreeWay;
pub use two_column::TwoColumn;

use std::borrow::Cow;

use crate::config::MarkerStyle;
use crate::diff::{EditScript, MoveId};
use crate::node::Element;
use crate::xml::markup::{end_tag, open_form, set_attributes};

/// Turns an edit script into output markup.
pub trait Renderer {
    type Output;

    fn render(self, script: &EditScript) -> Self::Output;
}

/// Closing form of an element: its end tag, or a synthesized one for a
/// self-closing element that was rendered open.
fn close_tag(element: Element<'_>) -> Cow<'_, str> {
    if element.is_self_closing() {
        Cow::Owned(end_tag(element.tag_name()))
    } else {
        Cow::Borrowed(element.end_tag())
    }
}

/// Writes an element with replaced content, keeping the self-closing form
/// when there is nothing inside.
fn push_element(out: &mut String, element: Element<'_>, start_tag: &str, content: &str) {
    if element.is_self_closing() && content.is_empty() {
        out.push_str(start_tag);
    } else {
        out.push_str(&open_form(start_tag));
        out.push_str(content);
        out.push_str(&close_tag(element));
    }
}

/// Annotates a whole element as a block.
fn block(
    element: Element<'_>,
    class: &str,
    moved: Option<MoveId>,
    read_only: bool,
    markers: &MarkerStyle,
) -> String {
    let move_value = moved.map(|id| id.to_string());
    let mut attributes = vec![(markers.attribute.as_str(), class)];
    if let Some(value) = move_value.as_deref() {
        attributes.push((markers.move_id_attribute.as_str(), value));
    }
    if read_only {
        attributes.push((markers.readonly.0.as_str(), markers.readonly.1.as_str()));
    }
    set_attributes(element.raw_fragment(), attributes)
}
