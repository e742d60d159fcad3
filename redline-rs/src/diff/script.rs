//! Edit script types.
//!
//! The tree differ produces an [`EditScript`]: a flat, document-ordered list
//! of [`Step`]s that the renderers consume without recursion.

use std::fmt;

use crate::diff::text::TextEdit;
use crate::node::NodeId;

/// Identifier linking the removed and added ends of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveId(pub usize);

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One decision of the tree differ.
///
/// `old` ids refer to the old document, `new` ids to the new one.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The pair is identical.
    Unchanged { old: NodeId, new: NodeId },
    /// Start of a matched pair whose children follow as further steps.
    Open { old: NodeId, new: NodeId },
    /// End of the pair started by the matching `Open`.
    Close { old: NodeId, new: NodeId },
    /// A matched pair with text content, diffed token by token.
    TextChanged {
        old: NodeId,
        new: NodeId,
        edits: Vec<TextEdit>,
    },
    /// A numbering element whose content changed while renumbering is ignored.
    Renumbered { old: NodeId, new: NodeId },
    /// An element only present in the new version.
    Added { new: NodeId, moved: Option<MoveId> },
    /// An element only present in the old version.
    Removed { old: NodeId, moved: Option<MoveId> },
    /// An ignored new element passed through as-is.
    Kept { new: NodeId },
}

impl Step {
    /// The old element this step covers, if any.
    pub fn old(&self) -> Option<NodeId> {
        match *self {
            Step::Unchanged { old, .. }
            | Step::Open { old, .. }
            | Step::TextChanged { old, .. }
            | Step::Renumbered { old, .. }
            | Step::Removed { old, .. } => Some(old),
            Step::Close { .. } | Step::Added { .. } | Step::Kept { .. } => None,
        }
    }

    /// The new element this step covers, if any.
    pub fn new_side(&self) -> Option<NodeId> {
        match *self {
            Step::Unchanged { new, .. }
            | Step::Open { new, .. }
            | Step::TextChanged { new, .. }
            | Step::Renumbered { new, .. }
            | Step::Added { new, .. }
            | Step::Kept { new } => Some(new),
            Step::Close { .. } | Step::Removed { .. } => None,
        }
    }

    /// The move marker carried by an added or removed step.
    pub fn move_id(&self) -> Option<MoveId> {
        match *self {
            Step::Added { moved, .. } | Step::Removed { moved, .. } => moved,
            _ => None,
        }
    }
}

/// Ordered steps of one comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditScript {
    steps: Vec<Step>,
}

impl EditScript {
    pub fn new(steps: Vec<Step>) -> Self {
        EditScript { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub(crate) fn steps_mut(&mut self) -> &mut [Step] {
        &mut self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
