//! Inline rendering of text-level edit scripts.
//!
//! Inserted and deleted runs are wrapped in marker elements. A marker only
//! ever wraps a balanced token sequence; tags of a run whose partner lies
//! outside the run are written bare when they belong to the skeleton side,
//! and dropped otherwise. The skeleton side's tokens are exactly that
//! version's content, so the result is always well-formed.

use crate::config::MarkerStyle;
use crate::diff::{TextEdit, Token, TokenKind};
use crate::xml::markup::wrap;

/// Which version provides the element structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Skeleton {
    /// Both sides inline, structured like the new version.
    Merged,
    /// Old content only (insertions omitted).
    Old,
    /// New content only (deletions omitted).
    New,
}

/// Appends the rendered edits to `out`.
///
/// Consecutive changed tokens form one group: its deletions are contiguous in
/// the old content and its insertions in the new content. In a merged
/// rendering, inserted end tags that lead the group close their elements
/// before the deleted text, so removed words never land inside an element
/// that only exists in the new version.
pub(crate) fn render_edits(
    out: &mut String,
    edits: &[TextEdit],
    skeleton: Skeleton,
    markers: &MarkerStyle,
) {
    let mut k = 0;
    while k < edits.len() {
        if let TextEdit::Equal(token) = &edits[k] {
            out.push_str(token.text());
            k += 1;
            continue;
        }

        let end = edits[k..]
            .iter()
            .position(TextEdit::is_equal)
            .map_or(edits.len(), |offset| k + offset);
        let (deleted, inserted): (Vec<&TextEdit>, Vec<&TextEdit>) = edits[k..end]
            .iter()
            .partition(|e| matches!(e, TextEdit::Delete(_)));
        let deleted: Vec<&Token> = deleted.into_iter().map(TextEdit::token).collect();
        let inserted: Vec<&Token> = inserted.into_iter().map(TextEdit::token).collect();
        k = end;

        match skeleton {
            Skeleton::Old => {
                render_run(out, &deleted, &markers.inline_removed, true, markers);
            }
            Skeleton::New => {
                render_run(out, &inserted, &markers.inline_added, true, markers);
            }
            Skeleton::Merged => {
                let closing = leading_unbalanced_end_tags(&inserted);
                for token in &inserted[..closing] {
                    out.push_str(token.text());
                }
                render_run(out, &deleted, &markers.inline_removed, false, markers);
                render_run(out, &inserted[closing..], &markers.inline_added, true, markers);
            }
        }
    }
}

/// Length of the prefix of `run` made of end tags with no start in the run.
fn leading_unbalanced_end_tags(run: &[&Token]) -> usize {
    balanced(run)
        .iter()
        .zip(run)
        .take_while(|(paired, token)| !**paired && matches!(token.kind(), TokenKind::EndTag(_)))
        .count()
}

/// Marks which tokens of a run belong to a balanced sequence.
fn balanced(run: &[&Token]) -> Vec<bool> {
    let mut flags = vec![false; run.len()];
    let mut open: Vec<(usize, &str)> = Vec::new();
    for (i, token) in run.iter().enumerate() {
        match token.kind() {
            TokenKind::StartTag(name) => open.push((i, name)),
            TokenKind::EndTag(name) => {
                if let Some(&(start, open_name)) = open.last() {
                    if open_name == name {
                        open.pop();
                        flags[start] = true;
                        flags[i] = true;
                    }
                }
            }
            _ => flags[i] = true,
        }
    }
    flags
}

/// Wraps each balanced segment of a run in a marker.
fn render_run(
    out: &mut String,
    run: &[&Token],
    class: &str,
    keep_unbalanced: bool,
    markers: &MarkerStyle,
) {
    let mut segment = String::new();
    for (token, balanced) in run.iter().zip(balanced(run)) {
        if balanced {
            segment.push_str(token.text());
            continue;
        }
        flush(out, &mut segment, class, markers);
        if keep_unbalanced {
            out.push_str(token.text());
        }
    }
    flush(out, &mut segment, class, markers);
}

fn flush(out: &mut String, segment: &mut String, class: &str, markers: &MarkerStyle) {
    if !segment.is_empty() {
        out.push_str(&wrap(segment, &markers.element, &markers.attribute, class));
        segment.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompareOptions;
    use crate::diff::TextDiffer;
    use pretty_assertions::assert_eq;

    fn render(old: &str, new: &str, skeleton: Skeleton) -> String {
        let options = CompareOptions::default();
        let edits = TextDiffer::new(&options).diff(old, new).unwrap();
        let mut out = String::new();
        render_edits(&mut out, &edits, skeleton, options.markers());
        out
    }

    #[test]
    fn test_merged_replacement() {
        assert_eq!(
            render("1", "2", Skeleton::Merged),
            r#"<span class="content-removed">1</span><span class="content-added">2</span>"#
        );
    }

    #[test]
    fn test_appended_word() {
        assert_eq!(
            render("hello", "hello world", Skeleton::Merged),
            r#"hello<span class="content-added"> world</span>"#
        );
        assert_eq!(render("hello", "hello world", Skeleton::Old), "hello");
        assert_eq!(
            render("hello world", "hello", Skeleton::Old),
            r#"hello<span class="content-removed"> world</span>"#
        );
    }

    #[test]
    fn test_balanced_element_inside_marker() {
        assert_eq!(
            render("a", "a <b>bold</b>", Skeleton::Merged),
            r#"a<span class="content-added"> <b>bold</b></span>"#
        );
    }

    fn strip_markers(s: &str) -> String {
        s.replace(r#"<span class="content-added">"#, "")
            .replace(r#"<span class="content-removed">"#, "")
            .replace("</span>", "")
    }

    #[test]
    fn test_unbalanced_tags_follow_skeleton() {
        let (old, new) = ("<b>x</b> y", "<b>x y</b>");

        let left = render(old, new, Skeleton::Old);
        assert_eq!(strip_markers(&left), old);

        let right = render(old, new, Skeleton::New);
        assert_eq!(strip_markers(&right), new);

        let merged = render(old, new, Skeleton::Merged);
        let wrapped = format!("<root>{merged}</root>");
        assert!(crate::xml::parse_str(&wrapped).is_ok(), "{merged}");
    }

    #[test]
    fn test_wrapping_new_element_around_text() {
        // The added <i> tags open and close around unchanged text
        let merged = render("plain text", "<i>plain text</i>", Skeleton::Merged);
        assert_eq!(merged, "<i>plain text</i>");
    }

    #[test]
    fn test_removed_unbalanced_tags_dropped_in_merge() {
        let merged = render("<i>plain text</i>", "plain text", Skeleton::Merged);
        assert_eq!(merged, "plain text");
        let left = render("<i>plain text</i>", "plain text", Skeleton::Old);
        assert_eq!(left, "<i>plain text</i>");
    }

    #[test]
    fn test_deleted_text_stays_outside_swapped_element() {
        let merged = render("one <i>two</i> three", "one <b>two</b> four", Skeleton::Merged);
        assert_eq!(
            merged,
            concat!(
                "one <b>two</b>",
                r#"<span class="content-removed"> three</span>"#,
                r#"<span class="content-added"> four</span>"#
            )
        );
    }
}
