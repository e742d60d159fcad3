//! Comparison options.
//!
//! [`CompareOptions`] is immutable once built and shared by every stage of a
//! comparison call. Use [`CompareOptions::builder`] to change the defaults.

use bitflags::bitflags;

use crate::constants::*;

bitflags! {
    /// Policy switches that change how decisions are rendered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PolicyFlags: u8 {
        /// Differences confined to numbering elements are not shown as changes.
        const IGNORE_RENUMBERING = 1;
        /// Removed blocks are marked read-only.
        const REMOVED_AS_READ_ONLY = 1 << 1;
        /// The comparison runs against an intermediate baseline.
        const THREE_WAY = 1 << 2;
    }
}

/// How a three-way comparison shows changes already present in the
/// intermediate version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreeWayMode {
    /// External changes are folded in as plain content.
    #[default]
    AcceptExternal,
    /// External changes stay visible with the accepted marker.
    MarkExternal,
}

/// Names and values used to annotate the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Element wrapping inline added/removed runs.
    pub element: String,
    /// Attribute receiving the marker values.
    pub attribute: String,
    pub inline_added: String,
    pub inline_removed: String,
    pub block_added: String,
    pub block_removed: String,
    pub block_modified: String,
    pub block_transparent: String,
    pub block_accepted: String,
    pub block_renumbered: String,
    /// Attribute and value marking read-only content.
    pub readonly: (String, String),
    /// Attribute carrying the move id on both ends of a move.
    pub move_id_attribute: String,
    /// Name prefix of the hidden modification marker.
    pub modification_prefix: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyle {
            element: MARKER_ELEMENT.to_string(),
            attribute: MARKER_ATTRIBUTE.to_string(),
            inline_added: INLINE_ADDED.to_string(),
            inline_removed: INLINE_REMOVED.to_string(),
            block_added: BLOCK_ADDED.to_string(),
            block_removed: BLOCK_REMOVED.to_string(),
            block_modified: BLOCK_MODIFIED.to_string(),
            block_transparent: BLOCK_TRANSPARENT.to_string(),
            block_accepted: BLOCK_ACCEPTED.to_string(),
            block_renumbered: BLOCK_RENUMBERED.to_string(),
            readonly: (READONLY_ATTRIBUTE.to_string(), READONLY_VALUE.to_string()),
            move_id_attribute: MOVE_ID_ATTRIBUTE.to_string(),
            modification_prefix: MODIFICATION_PREFIX.to_string(),
        }
    }
}

/// Weights of the node matcher's rank formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchWeights {
    /// Distance score at node-index distance zero.
    pub max_distance_score: f64,
    /// Multiplier of the content similarity.
    pub similarity_weight: f64,
    /// Distance at which the distance score reaches zero.
    pub max_node_distance: usize,
}

impl Default for MatchWeights {
    fn default() -> Self {
        MatchWeights {
            max_distance_score: MAX_DISTANCE_SCORE,
            similarity_weight: SIMILARITY_WEIGHT,
            max_node_distance: MAX_NODE_DISTANCE,
        }
    }
}

/// Options for one comparison call.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    id_attribute: String,
    atomic_tags: Vec<String>,
    numbering_tags: Vec<String>,
    ignored_tags: Vec<String>,
    ignored_attribute: Option<(String, String)>,
    flags: PolicyFlags,
    weights: MatchWeights,
    markers: MarkerStyle,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
            atomic_tags: DEFAULT_ATOMIC_TAGS.iter().map(|t| t.to_string()).collect(),
            numbering_tags: DEFAULT_NUMBERING_TAGS.iter().map(|t| t.to_string()).collect(),
            ignored_tags: Vec::new(),
            ignored_attribute: None,
            flags: PolicyFlags::empty(),
            weights: MatchWeights::default(),
            markers: MarkerStyle::default(),
        }
    }
}

impl CompareOptions {
    /// Starts a builder from the default options.
    pub fn builder() -> CompareOptionsBuilder {
        CompareOptionsBuilder {
            options: CompareOptions::default(),
        }
    }

    /// Returns a builder seeded with these options.
    pub fn to_builder(&self) -> CompareOptionsBuilder {
        CompareOptionsBuilder {
            options: self.clone(),
        }
    }

    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    /// Returns true if `tag` is compared as one indivisible unit.
    pub fn is_atomic(&self, tag: &str) -> bool {
        self.atomic_tags.iter().any(|t| t == tag)
    }

    /// Returns true if `tag` holds numbering.
    pub fn is_numbering(&self, tag: &str) -> bool {
        self.numbering_tags.iter().any(|t| t == tag)
    }

    pub fn ignored_tags(&self) -> &[String] {
        &self.ignored_tags
    }

    pub fn ignored_attribute(&self) -> Option<(&str, &str)> {
        self.ignored_attribute
            .as_ref()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn flags(&self) -> PolicyFlags {
        self.flags
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    pub fn markers(&self) -> &MarkerStyle {
        &self.markers
    }
}

/// Builder for [`CompareOptions`].
#[derive(Debug, Clone)]
pub struct CompareOptionsBuilder {
    options: CompareOptions,
}

impl CompareOptionsBuilder {
    /// Sets the attribute holding stable identifiers.
    pub fn id_attribute(mut self, name: impl Into<String>) -> Self {
        self.options.id_attribute = name.into();
        self
    }

    /// Replaces the atomic tag list.
    pub fn atomic_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.atomic_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one atomic tag.
    pub fn atomic_tag(mut self, tag: impl Into<String>) -> Self {
        self.options.atomic_tags.push(tag.into());
        self
    }

    /// Replaces the numbering tag list.
    pub fn numbering_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.numbering_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a tag whose elements are left out of the comparison.
    pub fn ignored_tag(mut self, tag: impl Into<String>) -> Self {
        self.options.ignored_tags.push(tag.into());
        self
    }

    /// Elements carrying `name="value"` are left out of the comparison.
    pub fn ignored_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.ignored_attribute = Some((name.into(), value.into()));
        self
    }

    pub fn ignore_renumbering(mut self, on: bool) -> Self {
        self.options.flags.set(PolicyFlags::IGNORE_RENUMBERING, on);
        self
    }

    pub fn removed_as_read_only(mut self, on: bool) -> Self {
        self.options.flags.set(PolicyFlags::REMOVED_AS_READ_ONLY, on);
        self
    }

    pub fn flags(mut self, flags: PolicyFlags) -> Self {
        self.options.flags = flags;
        self
    }

    pub fn weights(mut self, weights: MatchWeights) -> Self {
        self.options.weights = weights;
        self
    }

    pub fn markers(mut self, markers: MarkerStyle) -> Self {
        self.options.markers = markers;
        self
    }

    pub fn build(self) -> CompareOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompareOptions::default();
        assert_eq!(options.id_attribute(), "id");
        assert!(options.is_atomic("authorialNote"));
        assert!(!options.is_atomic("p"));
        assert!(options.is_numbering("num"));
        assert!(options.flags().is_empty());
        assert_eq!(options.markers().element, "span");
    }

    #[test]
    fn test_builder_flags() {
        let options = CompareOptions::builder()
            .ignore_renumbering(true)
            .removed_as_read_only(true)
            .build();
        assert!(options.flags().contains(PolicyFlags::IGNORE_RENUMBERING));
        assert!(options.flags().contains(PolicyFlags::REMOVED_AS_READ_ONLY));
        assert!(!options.flags().contains(PolicyFlags::THREE_WAY));

        let cleared = options.to_builder().ignore_renumbering(false).build();
        assert!(!cleared.flags().contains(PolicyFlags::IGNORE_RENUMBERING));
        assert!(cleared.flags().contains(PolicyFlags::REMOVED_AS_READ_ONLY));
    }

    #[test]
    fn test_builder_tags() {
        let options = CompareOptions::builder()
            .atomic_tags(["note"])
            .atomic_tag("img")
            .ignored_tag("placeholder")
            .ignored_attribute("editable", "false")
            .id_attribute("eId")
            .build();
        assert!(options.is_atomic("note"));
        assert!(options.is_atomic("img"));
        assert!(!options.is_atomic("authorialNote"));
        assert_eq!(options.ignored_tags(), ["placeholder".to_string()]);
        assert_eq!(options.ignored_attribute(), Some(("editable", "false")));
        assert_eq!(options.id_attribute(), "eId");
    }
}
