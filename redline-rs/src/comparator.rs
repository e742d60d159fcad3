//! Comparator façade.
//!
//! Every entry point parses its inputs afresh, diffs them and renders the
//! result. Calls are synchronous, leave the inputs untouched and give the
//! same output for the same inputs.

use std::fmt;

use crate::config::{CompareOptions, PolicyFlags, ThreeWayMode};
use crate::diff::{EditScript, Step, TreeDiffer};
use crate::error::Result;
use crate::matching::{ComparePolicy, OptionsPolicy};
use crate::measure::{ContentSimilarity, QGramSimilarity};
use crate::node::Document;
use crate::render::{Renderer, SingleColumn, ThreeWay, TwoColumn};
use crate::xml::XmlParser;

/// Counts of the decisions in an edit script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub unchanged: usize,
    pub modified: usize,
    pub added: usize,
    pub removed: usize,
    /// Moves, counted once per pair of ends.
    pub moved: usize,
    pub renumbered: usize,
}

impl ChangeSummary {
    pub fn from_script(script: &EditScript) -> Self {
        let mut summary = ChangeSummary::default();
        for step in script {
            match step {
                Step::Unchanged { .. } | Step::Kept { .. } => summary.unchanged += 1,
                Step::TextChanged { .. } => summary.modified += 1,
                Step::Renumbered { .. } => summary.renumbered += 1,
                Step::Added { moved: Some(_), .. } => summary.moved += 1,
                Step::Added { moved: None, .. } => summary.added += 1,
                Step::Removed { moved: Some(_), .. } => {}
                Step::Removed { moved: None, .. } => summary.removed += 1,
                Step::Open { .. } | Step::Close { .. } => {}
            }
        }
        summary
    }

    /// True if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.modified == 0
            && self.added == 0
            && self.removed == 0
            && self.moved == 0
            && self.renumbered == 0
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} unchanged, {} modified, {} added, {} removed, {} moved, {} renumbered",
            self.unchanged, self.modified, self.added, self.removed, self.moved, self.renumbered
        )
    }
}

/// Compares document versions with a fixed set of options.
pub struct Comparator {
    options: CompareOptions,
    similarity: Box<dyn ContentSimilarity>,
    policy: Option<Box<dyn ComparePolicy + Send + Sync>>,
}

impl Default for Comparator {
    fn default() -> Self {
        Comparator::new(CompareOptions::default())
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator")
            .field("options", &self.options)
            .field("custom_policy", &self.policy.is_some())
            .finish()
    }
}

impl Comparator {
    /// Creates a comparator using Q-gram similarity and the options' policy.
    pub fn new(options: CompareOptions) -> Self {
        Comparator {
            options,
            similarity: Box::new(QGramSimilarity),
            policy: None,
        }
    }

    /// Replaces the content similarity function.
    pub fn with_similarity(mut self, similarity: impl ContentSimilarity + 'static) -> Self {
        self.similarity = Box::new(similarity);
        self
    }

    /// Replaces the comparison policy derived from the options.
    pub fn with_policy(mut self, policy: impl ComparePolicy + Send + Sync + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Parses a buffer with the configured identifier attribute.
    pub fn parse(&self, markup: &str) -> Result<Document> {
        XmlParser::new(self.options.id_attribute()).parse_str(markup)
    }

    /// Computes the edit script between two parsed documents.
    pub fn diff(&self, old: &Document, new: &Document) -> Result<EditScript> {
        self.diff_with(old, new, &self.options)
    }

    fn diff_with(
        &self,
        old: &Document,
        new: &Document,
        options: &CompareOptions,
    ) -> Result<EditScript> {
        let default_policy = OptionsPolicy::new(options);
        let policy: &dyn ComparePolicy = match &self.policy {
            Some(custom) => custom.as_ref(),
            None => &default_policy,
        };
        TreeDiffer::new(old, new, options, policy, self.similarity.as_ref()).diff()
    }

    /// Merged single-column markup.
    pub fn compare(&self, old: &str, new: &str) -> Result<String> {
        self.compare_with_summary(old, new).map(|(markup, _)| markup)
    }

    /// Merged single-column markup and a count of the changes shown.
    pub fn compare_with_summary(&self, old: &str, new: &str) -> Result<(String, ChangeSummary)> {
        let old = self.parse(old)?;
        let new = self.parse(new)?;
        let script = self.diff(&old, &new)?;
        let body = SingleColumn::new(&old, &new, &self.options).render(&script);
        Ok((wrap(&new, &old, body), ChangeSummary::from_script(&script)))
    }

    /// Side-by-side markup: `(left, right)`, old on the left.
    pub fn compare_two_column(&self, old: &str, new: &str) -> Result<(String, String)> {
        let old = self.parse(old)?;
        let new = self.parse(new)?;
        let script = self.diff(&old, &new)?;
        let (left, right) = TwoColumn::new(&old, &new, &self.options).render(&script);
        Ok((wrap(&old, &new, left), wrap(&new, &old, right)))
    }

    /// Merged markup of `original` against `current`, with changes already
    /// present in `intermediate` shown as accepted.
    pub fn compare_three_way(
        &self,
        original: &str,
        intermediate: &str,
        current: &str,
        mode: ThreeWayMode,
    ) -> Result<String> {
        let options = self
            .options
            .to_builder()
            .flags(self.options.flags() | PolicyFlags::THREE_WAY)
            .build();
        let original = self.parse(original)?;
        let intermediate = self.parse(intermediate)?;
        let current = self.parse(current)?;
        let script = self.diff_with(&original, &current, &options)?;
        let body = ThreeWay::new(&original, &intermediate, &current, &options, mode).render(&script);
        Ok(wrap(&current, &original, body))
    }
}

/// Surrounds a rendered root with the prolog and epilog of `primary`, or of
/// `fallback` when `primary` has no root.
fn wrap(primary: &Document, fallback: &Document, body: String) -> String {
    let frame = if primary.is_empty() && !fallback.is_empty() {
        fallback
    } else {
        primary
    };
    if frame.is_empty() {
        return body;
    }
    let mut out = String::with_capacity(frame.prolog().len() + body.len() + frame.epilog().len());
    out.push_str(frame.prolog());
    out.push_str(&body);
    out.push_str(frame.epilog());
    out
}

/// [`Comparator::compare`] with default options.
pub fn compare(old: &str, new: &str) -> Result<String> {
    Comparator::default().compare(old, new)
}

/// [`Comparator::compare_two_column`] with default options.
pub fn compare_two_column(old: &str, new: &str) -> Result<(String, String)> {
    Comparator::default().compare_two_column(old, new)
}

/// [`Comparator::compare_three_way`] with default options.
pub fn compare_three_way(
    original: &str,
    intermediate: &str,
    current: &str,
    mode: ThreeWayMode,
) -> Result<String> {
    Comparator::default().compare_three_way(original, intermediate, current, mode)
}
