//! Constants used throughout the comparator.
//!
//! Scoring constants feed the node matcher; the marker names are the defaults
//! of [`MarkerStyle`](crate::config::MarkerStyle).

/// Attribute carrying an element's stable identifier.
pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

/// Tags whose whole subtree is one comparison unit.
pub const DEFAULT_ATOMIC_TAGS: &[&str] = &["authorialNote", "img", "ref", "mref", "math"];

/// Tags holding numbering that may be ignored when renumbering happens.
pub const DEFAULT_NUMBERING_TAGS: &[&str] = &["num"];

/// Distance score given to a candidate at node-index distance zero.
pub const MAX_DISTANCE_SCORE: f64 = 1.0;

/// Weight of content similarity in a candidate's rank.
pub const SIMILARITY_WEIGHT: f64 = 2.0;

/// Node-index distance at which the distance score reaches zero.
pub const MAX_NODE_DISTANCE: usize = 200;

/// Element used to wrap inline added/removed runs.
pub const MARKER_ELEMENT: &str = "span";

/// Attribute that carries the marker values below.
pub const MARKER_ATTRIBUTE: &str = "class";

pub const INLINE_ADDED: &str = "content-added";
pub const INLINE_REMOVED: &str = "content-removed";
pub const BLOCK_ADDED: &str = "block-added";
pub const BLOCK_REMOVED: &str = "block-removed";
pub const BLOCK_MODIFIED: &str = "block-modified";
pub const BLOCK_TRANSPARENT: &str = "block-transparent";
pub const BLOCK_ACCEPTED: &str = "block-accepted";
pub const BLOCK_RENUMBERED: &str = "block-renumbered";

/// Attribute set on content that must not be edited.
pub const READONLY_ATTRIBUTE: &str = "data-readonly";
pub const READONLY_VALUE: &str = "true";

/// Attribute linking both ends of a move.
pub const MOVE_ID_ATTRIBUTE: &str = "data-move-id";

/// Name prefix of the hidden two-column modification marker.
pub const MODIFICATION_PREFIX: &str = "modification_";
