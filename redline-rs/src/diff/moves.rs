//! Move resolution.
//!
//! While walking sibling lists the tree differ cannot know whether the other
//! end of a move will really be shown as added or removed: the counterpart may
//! still be compared as equal to some other element. Moved steps are
//! therefore emitted with provisional [`MoveId`]s and a [`Placeholder`] naming
//! the counterpart. [`resolve`] pairs the placeholders once the script is
//! complete, numbers the surviving moves in document order and demotes the
//! rest to plain additions and removals.

use rustc_hash::FxHashMap;

use crate::diff::script::{EditScript, MoveId, Step};
use crate::error::{Error, Result};
use crate::node::NodeId;

/// Which version a placeholder's element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Old,
    New,
}

/// A provisional move marker.
#[derive(Debug, Clone)]
pub(crate) struct Placeholder {
    pub(crate) id: MoveId,
    pub(crate) side: Side,
    /// The element carrying the marker.
    pub(crate) element: NodeId,
    /// Its match in the other version.
    pub(crate) counterpart: NodeId,
}

/// Pairs placeholders and rewrites the script's move ids.
///
/// Fails with [`Error::BrokenMoveInvariant`] when a counterpart does not
/// occur in the script at all.
pub(crate) fn resolve(script: &mut EditScript, placeholders: &[Placeholder]) -> Result<()> {
    if placeholders.is_empty() {
        return Ok(());
    }

    let mut old_steps: FxHashMap<NodeId, usize> = FxHashMap::default();
    let mut new_steps: FxHashMap<NodeId, usize> = FxHashMap::default();
    for (index, step) in script.iter().enumerate() {
        if let Some(old) = step.old() {
            old_steps.insert(old, index);
        }
        if let Some(new) = step.new_side() {
            new_steps.insert(new, index);
        }
    }
    let by_id: FxHashMap<MoveId, &Placeholder> = placeholders.iter().map(|p| (p.id, p)).collect();

    let mut partners: FxHashMap<MoveId, MoveId> = FxHashMap::default();
    for placeholder in placeholders {
        let steps = match placeholder.side {
            Side::Old => &new_steps,
            Side::New => &old_steps,
        };
        let index = steps
            .get(&placeholder.counterpart)
            .copied()
            .ok_or(Error::BrokenMoveInvariant {
                move_id: placeholder.id.0,
                node_index: placeholder.element.index(),
            })?;

        let partner = script.steps()[index]
            .move_id()
            .and_then(|id| by_id.get(&id))
            .filter(|other| other.counterpart == placeholder.element && other.side != placeholder.side);
        match partner {
            Some(other) => {
                partners.insert(placeholder.id, other.id);
            }
            None => {
                tracing::debug!(
                    move_id = placeholder.id.0,
                    element = placeholder.element.index(),
                    counterpart = placeholder.counterpart.index(),
                    "move demoted, counterpart shown elsewhere"
                );
            }
        }
    }

    // Final ids follow document order of the first end of each move.
    let mut numbering: FxHashMap<MoveId, MoveId> = FxHashMap::default();
    for step in script.steps_mut() {
        let moved = match step {
            Step::Added { moved, .. } | Step::Removed { moved, .. } => moved,
            _ => continue,
        };
        let Some(provisional) = *moved else {
            continue;
        };
        *moved = partners.get(&provisional).map(|&partner| {
            let key = provisional.min(partner);
            let next = MoveId(numbering.len() + 1);
            *numbering.entry(key).or_insert(next)
        });
    }

    tracing::debug!(
        placeholders = placeholders.len(),
        moves = numbering.len(),
        "resolved moves"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(id: usize, side: Side, element: usize, counterpart: usize) -> Placeholder {
        Placeholder {
            id: MoveId(id),
            side,
            element: NodeId(element),
            counterpart: NodeId(counterpart),
        }
    }

    #[test]
    fn test_pairs_both_ends() {
        let mut script = EditScript::new(vec![
            Step::Added {
                new: NodeId(2),
                moved: Some(MoveId(7)),
            },
            Step::Unchanged {
                old: NodeId(1),
                new: NodeId(1),
            },
            Step::Removed {
                old: NodeId(2),
                moved: Some(MoveId(9)),
            },
        ]);
        let placeholders = vec![
            placeholder(7, Side::New, 2, 2),
            placeholder(9, Side::Old, 2, 2),
        ];
        resolve(&mut script, &placeholders).unwrap();

        assert_eq!(script.steps()[0].move_id(), Some(MoveId(1)));
        assert_eq!(script.steps()[2].move_id(), Some(MoveId(1)));
    }

    #[test]
    fn test_demotes_when_counterpart_compared_equal() {
        // Old #2 was matched to new #1, which was instead shown equal to old #1
        let mut script = EditScript::new(vec![
            Step::Unchanged {
                old: NodeId(1),
                new: NodeId(1),
            },
            Step::Removed {
                old: NodeId(2),
                moved: Some(MoveId(1)),
            },
        ]);
        let placeholders = vec![placeholder(1, Side::Old, 2, 1)];
        resolve(&mut script, &placeholders).unwrap();

        assert_eq!(
            script.steps()[1],
            Step::Removed {
                old: NodeId(2),
                moved: None
            }
        );
    }

    #[test]
    fn test_missing_counterpart_is_fatal() {
        let mut script = EditScript::new(vec![Step::Removed {
            old: NodeId(4),
            moved: Some(MoveId(3)),
        }]);
        let placeholders = vec![placeholder(3, Side::Old, 4, 8)];
        let err = resolve(&mut script, &placeholders).unwrap_err();

        assert!(matches!(
            err,
            Error::BrokenMoveInvariant {
                move_id: 3,
                node_index: 4
            }
        ));
    }
}
