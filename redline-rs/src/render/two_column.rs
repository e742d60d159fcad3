//! Two-column rendering: old content on the left, new content on the right.
//!
//! Every step writes exactly once to each column. Content missing from one
//! version is still written to that column, as a transparent read-only copy,
//! so both columns keep the same vertical layout. Each content-level change is
//! preceded on both sides by a hidden marker with a shared, increasing index.
//!
//! Root-level changes are the exception: the marker goes just inside the root
//! element, and a column that already has a root of its own gets no
//! transparent copy, so each column stays a single-rooted document.

use std::borrow::Cow;

use crate::config::{CompareOptions, PolicyFlags};
use crate::diff::{EditScript, Step, TextEdit};
use crate::node::{Document, Element};
use crate::render::inline::{render_edits, Skeleton};
use crate::render::{block, close_tag, push_element, Renderer};
use crate::xml::markup::{
    hidden_marker, insert_content, open_form, remove_attribute, set_attribute, set_attributes,
};

/// Renders old and new markup side by side.
pub struct TwoColumn<'a> {
    old: &'a Document,
    new: &'a Document,
    options: &'a CompareOptions,
    left: String,
    right: String,
    modifications: usize,
    /// Marker of a removed root, reused by the added root that replaces it.
    root_marker: Option<String>,
}

impl<'a> TwoColumn<'a> {
    pub fn new(old: &'a Document, new: &'a Document, options: &'a CompareOptions) -> Self {
        TwoColumn {
            old,
            new,
            options,
            left: String::with_capacity(old.source().len()),
            right: String::with_capacity(new.source().len()),
            modifications: 0,
            root_marker: None,
        }
    }

    fn step(&mut self, step: &Step) {
        let options = self.options;
        let markers = options.markers();
        match *step {
            Step::Unchanged { old, new } => {
                let (old, new) = (self.old.element(old), self.new.element(new));
                push_gapped(&mut self.left, old, old.raw_fragment());
                push_gapped(&mut self.right, new, new.raw_fragment());
            }
            Step::Open { old, new } => {
                let (old, new) = (self.old.element(old), self.new.element(new));
                push_gapped(&mut self.left, old, &open_form(old.start_tag()));
                push_gapped(&mut self.right, new, &open_form(new.start_tag()));
            }
            Step::Close { old, new } => {
                let (old, new) = (self.old.element(old), self.new.element(new));
                self.left.push_str(old.trailing_gap());
                self.left.push_str(&close_tag(old));
                self.right.push_str(new.trailing_gap());
                self.right.push_str(&close_tag(new));
            }
            Step::TextChanged {
                old,
                new,
                ref edits,
            } => {
                let (old, new) = (self.old.element(old), self.new.element(new));
                self.modified(old, new, edits);
            }
            Step::Renumbered { old, new } => {
                let (old, new) = (self.old.element(old), self.new.element(new));
                push_gapped(&mut self.left, old, old.raw_fragment());
                push_gapped(
                    &mut self.right,
                    new,
                    &set_attribute(new.raw_fragment(), &markers.attribute, &markers.block_renumbered),
                );
            }
            Step::Added { new, moved } => {
                let new = self.new.element(new);
                let added = block(new, &markers.block_added, moved, false, markers);
                if new.parent().is_some() {
                    let marker = self.next_marker();
                    push_marked(&mut self.left, new, &marker, &transparent(new, options));
                    push_marked(&mut self.right, new, &marker, &added);
                    return;
                }
                let marker = self.root_marker.take().unwrap_or_else(|| self.next_marker());
                if self.old.is_empty() {
                    push_gapped(
                        &mut self.left,
                        new,
                        &insert_content(&transparent(new, options), &marker),
                    );
                }
                push_gapped(&mut self.right, new, &insert_content(&added, &marker));
            }
            Step::Removed { old, moved } => {
                let old = self.old.element(old);
                let read_only = options.flags().contains(PolicyFlags::REMOVED_AS_READ_ONLY);
                let removed = block(old, &markers.block_removed, moved, read_only, markers);
                let marker = self.next_marker();
                if old.parent().is_some() {
                    push_marked(&mut self.left, old, &marker, &removed);
                    push_marked(&mut self.right, old, &marker, &transparent(old, options));
                    return;
                }
                push_gapped(&mut self.left, old, &insert_content(&removed, &marker));
                if self.new.is_empty() {
                    push_gapped(
                        &mut self.right,
                        old,
                        &insert_content(&transparent(old, options), &marker),
                    );
                } else {
                    self.root_marker = Some(marker);
                }
            }
            Step::Kept { new } => {
                let new = self.new.element(new);
                push_gapped(&mut self.left, new, &transparent(new, options));
                push_gapped(&mut self.right, new, new.raw_fragment());
            }
        }
    }

    fn modified(&mut self, old: Element<'_>, new: Element<'_>, edits: &[TextEdit]) {
        let options = self.options;
        let markers = options.markers();
        let marker = self.next_marker();
        // A root cannot have a sibling, so its marker goes inside it.
        let inside = old.parent().is_none();

        let mut content = String::new();
        if inside {
            content.push_str(&marker);
        }
        render_edits(&mut content, edits, Skeleton::Old, markers);
        let start = set_attribute(old.start_tag(), &markers.attribute, &markers.block_modified);
        self.left.push_str(old.gap_before());
        if !inside {
            self.left.push_str(&marker);
        }
        push_element(&mut self.left, old, &start, &content);

        content.clear();
        if inside {
            content.push_str(&marker);
        }
        render_edits(&mut content, edits, Skeleton::New, markers);
        let start = set_attribute(new.start_tag(), &markers.attribute, &markers.block_modified);
        self.right.push_str(new.gap_before());
        if !inside {
            self.right.push_str(&marker);
        }
        push_element(&mut self.right, new, &start, &content);
    }

    fn next_marker(&mut self) -> String {
        self.modifications += 1;
        hidden_marker(&self.options.markers().modification_prefix, self.modifications)
    }
}

/// Placeholder copy for the column where the element does not exist. Stable
/// identifiers are dropped so that no column repeats one.
fn transparent(element: Element<'_>, options: &CompareOptions) -> String {
    let markers = options.markers();
    set_attributes(
        &without_ids(element, options.id_attribute()),
        [
            (markers.attribute.as_str(), markers.block_transparent.as_str()),
            (markers.readonly.0.as_str(), markers.readonly.1.as_str()),
        ],
    )
}

/// The raw fragment with the identifier attribute removed from every start
/// tag in it.
fn without_ids<'d>(element: Element<'d>, id_attribute: &str) -> Cow<'d, str> {
    let source = element.document().source();
    let span = element.source_span();
    let mut stripped: Option<String> = None;
    let mut cursor = span.start;
    for inner in element.subtree().filter(|e| e.stable_id().is_some()) {
        let start = inner.source_span().start;
        let tag = inner.start_tag();
        let out = stripped.get_or_insert_with(|| String::with_capacity(span.len()));
        out.push_str(&source[cursor..start]);
        out.push_str(&remove_attribute(tag, id_attribute));
        cursor = start + tag.len();
    }
    match stripped {
        Some(mut out) => {
            out.push_str(&source[cursor..span.end]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(element.raw_fragment()),
    }
}

fn push_gapped(out: &mut String, element: Element<'_>, markup: &str) {
    out.push_str(element.gap_before());
    out.push_str(markup);
}

fn push_marked(out: &mut String, element: Element<'_>, marker: &str, markup: &str) {
    out.push_str(element.gap_before());
    out.push_str(marker);
    out.push_str(markup);
}

impl Renderer for TwoColumn<'_> {
    type Output = (String, String);

    fn render(mut self, script: &EditScript) -> (String, String) {
        for step in script {
            self.step(step);
        }
        tracing::debug!(modifications = self.modifications, "rendered two columns");
        (self.left, self.right)
    }
}
