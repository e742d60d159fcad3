//! Comparison policy: which elements take part, and which pairs may be
//! compared in place.

use crate::config::CompareOptions;
use crate::node::Element;

/// Decides participation and comparability of elements.
pub trait ComparePolicy {
    /// True if the element is excluded from matching and diffing.
    fn is_ignored(&self, element: Element<'_>) -> bool;

    /// True if an old and a new element may be diffed against each other.
    fn is_comparable(&self, old: Element<'_>, new: Element<'_>) -> bool;
}

/// The policy described by a [`CompareOptions`].
///
/// Elements are ignored by tag name or by a configured attribute value; pairs
/// are comparable when their tag names agree.
#[derive(Debug, Clone, Copy)]
pub struct OptionsPolicy<'o> {
    options: &'o CompareOptions,
}

impl<'o> OptionsPolicy<'o> {
    pub fn new(options: &'o CompareOptions) -> Self {
        OptionsPolicy { options }
    }
}

impl ComparePolicy for OptionsPolicy<'_> {
    fn is_ignored(&self, element: Element<'_>) -> bool {
        let tag = element.tag_name();
        if self.options.ignored_tags().iter().any(|t| t == tag) {
            return true;
        }
        self.options
            .ignored_attribute()
            .is_some_and(|(name, value)| element.attribute(name) == Some(value))
    }

    fn is_comparable(&self, old: Element<'_>, new: Element<'_>) -> bool {
        old.tag_name() == new.tag_name()
    }
}
