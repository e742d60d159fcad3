//! Tree- and text-level differencing.
//!
//! The [`TreeDiffer`] produces an [`EditScript`] that the renderers turn into
//! annotated markup. Leaf content is compared by the [`TextDiffer`].

mod moves;
mod script;
mod text;
mod tree;

pub use script::{EditScript, MoveId, Step};
pub use text::{diff_tokens, TextDiffer, TextEdit, Token, TokenKind};
pub use tree::TreeDiffer;
