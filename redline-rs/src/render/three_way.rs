//! Three-way rendering.
//!
//! The script compares the original version with the current one. An
//! intermediate version decides how each change is shown: content the
//! intermediate already holds is accepted, and removals the intermediate
//! already made are read-only.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::{CompareOptions, ThreeWayMode};
use crate::diff::{EditScript, Step};
use crate::node::{Document, Element};
use crate::render::{Renderer, SingleColumn};

/// Element fingerprints of the intermediate version.
struct Baseline<'a> {
    by_id: FxHashMap<&'a str, [u8; 16]>,
    digests: FxHashSet<[u8; 16]>,
}

impl<'a> Baseline<'a> {
    fn new(intermediate: &'a Document) -> Self {
        let mut by_id = FxHashMap::default();
        let mut digests = FxHashSet::default();
        for element in intermediate.elements() {
            let digest = element.digest();
            if let Some(id) = element.stable_id() {
                by_id.insert(id, digest);
            }
            digests.insert(digest);
        }
        Baseline { by_id, digests }
    }

    /// True if the intermediate holds this exact element.
    fn holds(&self, element: Element<'_>) -> bool {
        let digest = element.digest();
        match element.stable_id().and_then(|id| self.by_id.get(id)) {
            Some(known) => *known == digest,
            None => self.digests.contains(&digest),
        }
    }

    /// True if the intermediate has a counterpart by id or fingerprint.
    fn has_counterpart(&self, element: Element<'_>) -> bool {
        element
            .stable_id()
            .is_some_and(|id| self.by_id.contains_key(id))
            || self.digests.contains(&element.digest())
    }
}

/// Renders an original-to-current comparison against an intermediate version.
pub struct ThreeWay<'a> {
    inner: SingleColumn<'a>,
    baseline: Baseline<'a>,
    mode: ThreeWayMode,
}

impl<'a> ThreeWay<'a> {
    pub fn new(
        original: &'a Document,
        intermediate: &'a Document,
        current: &'a Document,
        options: &'a CompareOptions,
        mode: ThreeWayMode,
    ) -> Self {
        ThreeWay {
            inner: SingleColumn::new(original, current, options),
            baseline: Baseline::new(intermediate),
            mode,
        }
    }

    fn step(&mut self, step: &Step) {
        let original = self.inner.old_document();
        let current = self.inner.new_document();
        match step {
            Step::Added { new, moved } => {
                let new = current.element(*new);
                if self.baseline.holds(new) {
                    self.inner.accepted(new, self.mode);
                } else {
                    self.inner.added(new, *moved);
                }
            }
            Step::TextChanged { new, edits, .. } => {
                let new = current.element(*new);
                if self.baseline.holds(new) {
                    self.inner.accepted(new, self.mode);
                } else {
                    self.inner.text_changed(new, edits);
                }
            }
            Step::Removed { old, moved } => {
                let old = original.element(*old);
                let external = !self.baseline.has_counterpart(old);
                self.inner.removed(old, *moved, external);
            }
            other => self.inner.step(other),
        }
    }
}

impl Renderer for ThreeWay<'_> {
    type Output = String;

    fn render(mut self, script: &EditScript) -> String {
        for step in script {
            self.step(step);
        }
        self.inner.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyFlags;
    use crate::diff::TreeDiffer;
    use crate::matching::OptionsPolicy;
    use crate::measure::QGramSimilarity;
    use crate::xml::parse_str;
    use pretty_assertions::assert_eq;

    fn render(original: &str, intermediate: &str, current: &str, mode: ThreeWayMode) -> String {
        let options = CompareOptions::builder()
            .flags(PolicyFlags::THREE_WAY)
            .build();
        let original = parse_str(original).unwrap();
        let intermediate = parse_str(intermediate).unwrap();
        let current = parse_str(current).unwrap();
        let policy = OptionsPolicy::new(&options);
        let script = TreeDiffer::new(&original, &current, &options, &policy, &QGramSimilarity)
            .diff()
            .unwrap();
        ThreeWay::new(&original, &intermediate, &current, &options, mode).render(&script)
    }

    #[test]
    fn test_external_addition_accepted() {
        let original = r#"<a><p id="1">one</p></a>"#;
        let intermediate = r#"<a><p id="1">one</p><p id="2">two</p></a>"#;
        let current = intermediate;

        assert_eq!(
            render(original, intermediate, current, ThreeWayMode::AcceptExternal),
            r#"<a><p id="1">one</p><p id="2">two</p></a>"#
        );
        assert_eq!(
            render(original, intermediate, current, ThreeWayMode::MarkExternal),
            r#"<a><p id="1">one</p><p id="2" class="block-accepted">two</p></a>"#
        );
    }

    #[test]
    fn test_local_addition_stays_marked() {
        let original = r#"<a><p id="1">one</p></a>"#;
        let current = r#"<a><p id="1">one</p><p id="3">three</p></a>"#;
        assert_eq!(
            render(original, original, current, ThreeWayMode::AcceptExternal),
            r#"<a><p id="1">one</p><p id="3" class="block-added">three</p></a>"#
        );
    }

    #[test]
    fn test_external_removal_is_read_only() {
        let original = r#"<a><p id="1">one</p><p id="2">two</p></a>"#;
        let intermediate = r#"<a><p id="1">one</p></a>"#;
        let out = render(original, intermediate, intermediate, ThreeWayMode::AcceptExternal);
        assert_eq!(
            out,
            r#"<a><p id="1">one</p><p id="2" class="block-removed" data-readonly="true">two</p></a>"#
        );
    }

    #[test]
    fn test_local_removal_is_deletable() {
        let original = r#"<a><p id="1">one</p><p id="2">two</p></a>"#;
        let current = r#"<a><p id="1">one</p></a>"#;
        let out = render(original, original, current, ThreeWayMode::AcceptExternal);
        assert_eq!(
            out,
            r#"<a><p id="1">one</p><p id="2" class="block-removed">two</p></a>"#
        );
    }

    #[test]
    fn test_external_text_change_accepted() {
        let original = "<a><p>old text</p></a>";
        let intermediate = "<a><p>new text</p></a>";
        assert_eq!(
            render(original, intermediate, intermediate, ThreeWayMode::AcceptExternal),
            "<a><p>new text</p></a>"
        );
    }
}
