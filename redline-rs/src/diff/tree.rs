//! Tree-level differ.
//!
//! Walks the children of a matched pair with one cursor per version and
//! classifies every element as equal, changed, added, removed or moved. The
//! result is an [`EditScript`]; nothing is rendered here.

use rustc_hash::FxHashSet;

use crate::config::{CompareOptions, PolicyFlags};
use crate::diff::moves::{self, Placeholder, Side};
use crate::diff::script::{EditScript, MoveId, Step};
use crate::diff::text::TextDiffer;
use crate::error::Result;
use crate::matching::{ComparePolicy, MatchResult, NodeMatcher};
use crate::measure::ContentSimilarity;
use crate::node::{Document, Element, NodeId};

/// Diffs two documents into an edit script.
pub struct TreeDiffer<'a> {
    old: &'a Document,
    new: &'a Document,
    options: &'a CompareOptions,
    policy: &'a dyn ComparePolicy,
    matcher: NodeMatcher<'a>,
    text: TextDiffer<'a>,
    placeholders: Vec<Placeholder>,
}

impl<'a> TreeDiffer<'a> {
    pub fn new(
        old: &'a Document,
        new: &'a Document,
        options: &'a CompareOptions,
        policy: &'a dyn ComparePolicy,
        similarity: &'a dyn ContentSimilarity,
    ) -> Self {
        let new_ids = new.stable_ids();
        let shared_ids: FxHashSet<&'a str> = old
            .stable_ids()
            .into_iter()
            .filter(|id| new_ids.contains(*id))
            .collect();

        TreeDiffer {
            old,
            new,
            options,
            policy,
            matcher: NodeMatcher::new(policy, similarity, *options.weights(), shared_ids),
            text: TextDiffer::new(options),
            placeholders: Vec::new(),
        }
    }

    /// Runs the comparison and resolves moves.
    pub fn diff(mut self) -> Result<EditScript> {
        let steps = match (self.old.root(), self.new.root()) {
            (None, None) => Vec::new(),
            (None, Some(new)) => vec![Step::Added {
                new: new.id(),
                moved: None,
            }],
            (Some(old), None) => vec![Step::Removed {
                old: old.id(),
                moved: None,
            }],
            (Some(old), Some(new)) if self.policy.is_comparable(old, new) => {
                self.diff_pair(old, new)?
            }
            (Some(old), Some(new)) => vec![
                Step::Removed {
                    old: old.id(),
                    moved: None,
                },
                Step::Added {
                    new: new.id(),
                    moved: None,
                },
            ],
        };

        let mut script = EditScript::new(steps);
        moves::resolve(&mut script, &self.placeholders)?;
        tracing::debug!(steps = script.len(), "diffed documents");
        Ok(script)
    }

    /// Compares a matched pair.
    fn diff_pair(&mut self, old: Element<'a>, new: Element<'a>) -> Result<Vec<Step>> {
        let (o, n) = (old.id(), new.id());

        if old.raw_fragment() == new.raw_fragment() {
            return Ok(vec![Step::Unchanged { old: o, new: n }]);
        }
        if self.options.flags().contains(PolicyFlags::IGNORE_RENUMBERING)
            && self.options.is_numbering(new.tag_name())
        {
            return Ok(vec![Step::Renumbered { old: o, new: n }]);
        }
        let childless = old.child_count() == 0 && new.child_count() == 0;
        if old.has_text_child() || new.has_text_child() || childless {
            let edits = self.text.diff(old.raw_content(), new.raw_content())?;
            return Ok(vec![Step::TextChanged {
                old: o,
                new: n,
                edits,
            }]);
        }

        let mut steps = vec![Step::Open { old: o, new: n }];
        steps.extend(self.diff_children(old, new)?);
        steps.push(Step::Close { old: o, new: n });
        Ok(steps)
    }

    /// Lock-step walk over the children of a matched pair.
    fn diff_children(&mut self, old: Element<'a>, new: Element<'a>) -> Result<Vec<Step>> {
        let olds = old.children();
        let news = new.children();
        let mut steps = Vec::with_capacity(olds.len().max(news.len()));
        let (mut i, mut j) = (0, 0);

        while i < olds.len() && j < news.len() {
            let (o, n) = (olds[i], news[j]);

            let n_match = self.matcher.best_match(&olds, n, i);
            if n_match.is_ignored() {
                steps.push(Step::Kept { new: n.id() });
                j += 1;
                continue;
            }
            let o_match = self.matcher.best_match(&news, o, j);
            if o_match.is_ignored() {
                i += 1;
                continue;
            }

            let o_at = o_match.index();
            let n_at = n_match.index();

            if o_at == Some(j) && self.policy.is_comparable(o, n) {
                steps.extend(self.diff_pair(o, n)?);
                i += 1;
                j += 1;
                continue;
            }

            match (o_at, n_at) {
                (None, None) => {
                    steps.push(Step::Removed {
                        old: o.id(),
                        moved: None,
                    });
                    steps.push(Step::Added {
                        new: n.id(),
                        moved: None,
                    });
                    i += 1;
                    j += 1;
                }
                (Some(oa), Some(na)) if oa > j && na > i => {
                    let old_shift = oa - j;
                    let new_shift = na - i;
                    let compared = self.policy.is_comparable(o, news[oa])
                        && self.policy.is_comparable(olds[na], n);
                    tracing::debug!(
                        old = ?o,
                        new = ?n,
                        old_shift,
                        new_shift,
                        "crossed matches"
                    );
                    if compared && old_shift > new_shift {
                        let moved = self.placeholder(Side::Old, o.id(), news[oa].id());
                        steps.push(Step::Removed {
                            old: o.id(),
                            moved: Some(moved),
                        });
                        i += 1;
                    } else {
                        let moved = self.placeholder(Side::New, n.id(), olds[na].id());
                        steps.push(Step::Added {
                            new: n.id(),
                            moved: Some(moved),
                        });
                        j += 1;
                    }
                }
                (Some(oa), _) if oa < j => {
                    let moved = self.placeholder(Side::Old, o.id(), news[oa].id());
                    steps.push(Step::Removed {
                        old: o.id(),
                        moved: Some(moved),
                    });
                    i += 1;
                }
                (_, Some(na)) if na < i => {
                    let moved = self.placeholder(Side::New, n.id(), olds[na].id());
                    steps.push(Step::Added {
                        new: n.id(),
                        moved: Some(moved),
                    });
                    j += 1;
                }
                (None, _) => {
                    steps.push(Step::Removed {
                        old: o.id(),
                        moved: None,
                    });
                    i += 1;
                }
                (_, n_at) => {
                    let moved = n_at.map(|na| self.placeholder(Side::New, n.id(), olds[na].id()));
                    steps.push(Step::Added { new: n.id(), moved });
                    j += 1;
                }
            }
        }

        for &o in &olds[i..] {
            match self.matcher.best_match(&news, o, news.len()) {
                MatchResult::Ignored => {}
                MatchResult::Matched { index, .. } => {
                    let moved = self.placeholder(Side::Old, o.id(), news[index].id());
                    steps.push(Step::Removed {
                        old: o.id(),
                        moved: Some(moved),
                    });
                }
                MatchResult::Unmatched => steps.push(Step::Removed {
                    old: o.id(),
                    moved: None,
                }),
            }
        }
        for &n in &news[j..] {
            match self.matcher.best_match(&olds, n, olds.len()) {
                MatchResult::Ignored => steps.push(Step::Kept { new: n.id() }),
                MatchResult::Matched { index, .. } => {
                    let moved = self.placeholder(Side::New, n.id(), olds[index].id());
                    steps.push(Step::Added {
                        new: n.id(),
                        moved: Some(moved),
                    });
                }
                MatchResult::Unmatched => steps.push(Step::Added {
                    new: n.id(),
                    moved: None,
                }),
            }
        }

        Ok(steps)
    }

    fn placeholder(&mut self, side: Side, element: NodeId, counterpart: NodeId) -> MoveId {
        let id = MoveId(self.placeholders.len() + 1);
        self.placeholders.push(Placeholder {
            id,
            side,
            element,
            counterpart,
        });
        id
    }
}
