//! Single-column rendering: both versions merged into one annotated document.

use crate::config::{CompareOptions, PolicyFlags, ThreeWayMode};
use crate::diff::{EditScript, MoveId, Step, TextEdit};
use crate::node::{Document, Element};
use crate::render::inline::{render_edits, Skeleton};
use crate::render::{block, close_tag, push_element, Renderer};
use crate::xml::markup::{open_form, set_attribute};

/// Renders merged markup into one buffer.
pub struct SingleColumn<'a> {
    old: &'a Document,
    new: &'a Document,
    options: &'a CompareOptions,
    out: String,
}

impl<'a> SingleColumn<'a> {
    pub fn new(old: &'a Document, new: &'a Document, options: &'a CompareOptions) -> Self {
        SingleColumn {
            old,
            new,
            options,
            out: String::with_capacity(old.source().len().max(new.source().len())),
        }
    }

    /// Renders one step with the default treatment.
    pub(crate) fn step(&mut self, step: &Step) {
        match step {
            Step::Unchanged { new, .. } | Step::Kept { new } => {
                let new = self.new.element(*new);
                self.out.push_str(new.gap_before());
                self.out.push_str(new.raw_fragment());
            }
            Step::Open { new, .. } => {
                let new = self.new.element(*new);
                self.out.push_str(new.gap_before());
                self.out.push_str(&open_form(new.start_tag()));
            }
            Step::Close { new, .. } => {
                let new = self.new.element(*new);
                self.out.push_str(new.trailing_gap());
                self.out.push_str(&close_tag(new));
            }
            Step::TextChanged { new, edits, .. } => {
                self.text_changed(self.new.element(*new), edits);
            }
            Step::Renumbered { new, .. } => {
                let new = self.new.element(*new);
                let markers = self.options.markers();
                self.out.push_str(new.gap_before());
                self.out.push_str(&set_attribute(
                    new.raw_fragment(),
                    &markers.attribute,
                    &markers.block_renumbered,
                ));
            }
            Step::Added { new, moved } => self.added(self.new.element(*new), *moved),
            Step::Removed { old, moved } => self.removed(self.old.element(*old), *moved, false),
        }
    }

    pub(crate) fn text_changed(&mut self, new: Element<'_>, edits: &[TextEdit]) {
        let mut content = String::with_capacity(new.raw_content().len() * 2);
        render_edits(&mut content, edits, Skeleton::Merged, self.options.markers());
        self.out.push_str(new.gap_before());
        push_element(&mut self.out, new, new.start_tag(), &content);
    }

    pub(crate) fn added(&mut self, new: Element<'_>, moved: Option<MoveId>) {
        let markers = self.options.markers();
        self.out.push_str(new.gap_before());
        self.out
            .push_str(&block(new, &markers.block_added, moved, false, markers));
    }

    /// Renders a removed block. Outside three-way comparisons the removed
    /// read-only flag also makes it read-only.
    pub(crate) fn removed(&mut self, old: Element<'_>, moved: Option<MoveId>, read_only: bool) {
        let flags = self.options.flags();
        let read_only = read_only
            || (flags.contains(PolicyFlags::REMOVED_AS_READ_ONLY)
                && !flags.contains(PolicyFlags::THREE_WAY));
        let markers = self.options.markers();
        self.out.push_str(old.gap_before());
        self.out
            .push_str(&block(old, &markers.block_removed, moved, read_only, markers));
    }

    /// Renders new content that an intermediate version already holds.
    pub(crate) fn accepted(&mut self, new: Element<'_>, mode: ThreeWayMode) {
        self.out.push_str(new.gap_before());
        match mode {
            ThreeWayMode::AcceptExternal => self.out.push_str(new.raw_fragment()),
            ThreeWayMode::MarkExternal => {
                let markers = self.options.markers();
                self.out.push_str(&set_attribute(
                    new.raw_fragment(),
                    &markers.attribute,
                    &markers.block_accepted,
                ));
            }
        }
    }

    pub(crate) fn old_document(&self) -> &'a Document {
        self.old
    }

    pub(crate) fn new_document(&self) -> &'a Document {
        self.new
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

impl Renderer for SingleColumn<'_> {
    type Output = String;

    fn render(mut self, script: &EditScript) -> String {
        for step in script {
            self.step(step);
        }
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::TreeDiffer;
    use crate::matching::OptionsPolicy;
    use crate::measure::QGramSimilarity;
    use crate::xml::parse_str;
    use pretty_assertions::assert_eq;

    fn render(old: &str, new: &str, options: &CompareOptions) -> String {
        let old = parse_str(old).unwrap();
        let new = parse_str(new).unwrap();
        let policy = OptionsPolicy::new(options);
        let script = TreeDiffer::new(&old, &new, options, &policy, &QGramSimilarity)
            .diff()
            .unwrap();
        SingleColumn::new(&old, &new, options).render(&script)
    }

    #[test]
    fn test_numbering_change() {
        let out = render(
            r#"<article id="a1"><num>1</num></article>"#,
            r#"<article id="a1"><num>2</num></article>"#,
            &CompareOptions::default(),
        );
        assert_eq!(
            out,
            r#"<article id="a1"><num><span class="content-removed">1</span><span class="content-added">2</span></num></article>"#
        );
    }

    #[test]
    fn test_renumbered_block() {
        let options = CompareOptions::builder().ignore_renumbering(true).build();
        let out = render(
            "<article><num>1</num></article>",
            "<article><num>2</num></article>",
            &options,
        );
        assert_eq!(
            out,
            r#"<article><num class="block-renumbered">2</num></article>"#
        );
    }

    #[test]
    fn test_added_and_removed_blocks() {
        let out = render(
            "<list>\n  <item>a</item>\n</list>",
            "<list>\n  <entry>b</entry>\n</list>",
            &CompareOptions::default(),
        );
        assert_eq!(
            out,
            "<list>\n  <item class=\"block-removed\">a</item>\n  <entry class=\"block-added\">b</entry>\n</list>"
        );
    }

    #[test]
    fn test_removed_read_only() {
        let options = CompareOptions::builder().removed_as_read_only(true).build();
        let out = render("<a><b/><c/></a>", "<a><c/></a>", &options);
        assert_eq!(
            out,
            r#"<a><b class="block-removed" data-readonly="true"/><c/></a>"#
        );
    }

    #[test]
    fn test_moved_blocks_carry_move_id() {
        let out = render(
            r#"<a><p id="A">a</p><p id="B">b</p></a>"#,
            r#"<a><p id="B">b</p><p id="A">a</p></a>"#,
            &CompareOptions::default(),
        );
        assert_eq!(
            out,
            concat!(
                r#"<a><p id="B" class="block-added" data-move-id="1">b</p>"#,
                r#"<p id="A">a</p>"#,
                r#"<p id="B" class="block-removed" data-move-id="1">b</p></a>"#
            )
        );
    }

    #[test]
    fn test_attribute_change_keeps_self_closing_form() {
        let out = render(
            r#"<a><img src="x"/></a>"#,
            r#"<a><img src="y"/></a>"#,
            &CompareOptions::default(),
        );
        assert_eq!(out, r#"<a><img src="y"/></a>"#);
    }
}
