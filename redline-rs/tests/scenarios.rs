//! End-to-end comparison scenarios through the public façade.

use pretty_assertions::assert_eq;
use test_case::test_case;
use xml_redline::{
    compare, compare_three_way, compare_two_column, parse_str, CompareOptions, Comparator, Error,
    ThreeWayMode,
};

const MARKERS: [&str; 5] = [
    "content-added",
    "content-removed",
    "block-added",
    "block-removed",
    "block-modified",
];

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Removes inline marker elements, keeping their content.
fn strip_inline_markers(markup: &str) -> String {
    markup
        .replace(r#"<span class="content-added">"#, "")
        .replace(r#"<span class="content-removed">"#, "")
        .replace("</span>", "")
}

#[test_case("<doc/>" ; "self closing root")]
#[test_case("<doc><p>text</p></doc>" ; "simple")]
#[test_case("<?xml version=\"1.0\"?>\n<!-- c -->\n<doc>\n  <p id=\"1\">a &amp; b</p>\n</doc>\n" ; "prolog and entities")]
#[test_case("<doc><p>mixed <b>bold</b> and <ref href=\"x\">atomic</ref></p><![CDATA[raw]]></doc>" ; "mixed content")]
#[test_case("<doc><sec><num>1</num><p>x</p></sec><sec><num>2</num><p>y</p></sec></doc>" ; "nested")]
fn test_idempotence(doc: &str) {
    let merged = compare(doc, doc).unwrap();
    assert_eq!(merged, doc);
    for marker in MARKERS {
        assert_eq!(count(&merged, marker), 0);
    }

    let (left, right) = compare_two_column(doc, doc).unwrap();
    assert_eq!(left, doc);
    assert_eq!(right, doc);
}

#[test]
fn test_numbering_example() {
    let merged = compare(
        r#"<article id="a1"><num>1</num></article>"#,
        r#"<article id="a1"><num>2</num></article>"#,
    )
    .unwrap();
    assert!(merged.starts_with(r#"<article id="a1">"#));
    assert!(merged.contains(r#"<span class="content-removed">1</span>"#));
    assert!(merged.contains(r#"<span class="content-added">2</span>"#));
    assert!(merged.ends_with("</article>"));
    assert_eq!(count(&merged, "class="), 2);
}

#[test]
fn test_heuristic_match_example() {
    let merged = compare(
        r#"<body><p id="x">hello</p></body>"#,
        r#"<body><p id="y">hello world</p></body>"#,
    )
    .unwrap();
    assert_eq!(
        merged,
        r#"<body><p id="y">hello<span class="content-added"> world</span></p></body>"#
    );
}

#[test]
fn test_empty_old_is_one_added_block() {
    let new = "<act>\n  <p>one</p>\n  <p>two</p>\n</act>\n";
    let merged = compare("", new).unwrap();
    assert_eq!(
        merged,
        "<act class=\"block-added\">\n  <p>one</p>\n  <p>two</p>\n</act>\n"
    );
    assert_eq!(count(&merged, "block-added"), 1);
}

#[test]
fn test_empty_new_is_all_removed() {
    let old = "<act><p>one</p></act>";
    let merged = compare(old, "").unwrap();
    assert_eq!(merged, r#"<act class="block-removed"><p>one</p></act>"#);
}

#[test]
fn test_marker_symmetry() {
    let a = r#"<doc><p>one two</p><p>three</p></doc>"#;
    let b = r#"<doc><p>one two four</p><p>three</p><q>new</q></doc>"#;

    let forward = compare(a, b).unwrap();
    let backward = compare(b, a).unwrap();

    assert_eq!(count(&forward, "content-added"), count(&backward, "content-removed"));
    assert_eq!(count(&forward, "content-removed"), count(&backward, "content-added"));
    assert_eq!(count(&forward, "block-added"), count(&backward, "block-removed"));
    assert_eq!(count(&forward, "block-removed"), count(&backward, "block-added"));
    assert_eq!(count(&forward, "content-added"), 1);
    assert_eq!(count(&forward, "block-added"), 1);
}

#[test]
fn test_summary_symmetry() {
    let comparator = Comparator::default();
    let a = r#"<doc><p>one</p><div>gone</div></doc>"#;
    let b = r#"<doc><p>one</p><q>new</q><q>newer</q></doc>"#;

    let (_, forward) = comparator.compare_with_summary(a, b).unwrap();
    let (_, backward) = comparator.compare_with_summary(b, a).unwrap();
    assert_eq!(forward.added, backward.removed);
    assert_eq!(forward.removed, backward.added);
    assert_eq!(forward.unchanged, backward.unchanged);
}

#[test_case("<doc><p>a <b>b</b> c</p></doc>", "<doc><p>a <i>b</i> c</p></doc>" ; "inline tag swap")]
#[test_case("<doc><p>one</p></doc>", "<doc><p><b>one</b> two</p></doc>" ; "new wrapper")]
#[test_case("<doc><p><b>x</b> y</p></doc>", "<doc><p><b>x y</b></p></doc>" ; "moved end tag")]
#[test_case("<doc><p>see <ref>A</ref></p></doc>", "<doc><p>see <ref>B</ref> now</p></doc>" ; "atomic changed")]
#[test_case("<doc><sec><p>x</p></sec></doc>", "<doc><p>x</p><sec/></doc>" ; "structure change")]
fn test_tag_integrity(old: &str, new: &str) {
    let merged = compare(old, new).unwrap();
    parse_str(&merged).unwrap_or_else(|e| panic!("not well-formed: {merged}: {e}"));
    parse_str(&strip_inline_markers(&merged)).unwrap();

    let (left, right) = compare_two_column(old, new).unwrap();
    parse_str(&left).unwrap();
    parse_str(&right).unwrap();
}

#[test]
fn test_completeness_of_text_tokens() {
    let merged = compare("<p>the quick fox</p>", "<p>the slow fox jumps</p>").unwrap();
    let plain = strip_inline_markers(&merged);
    for word in ["the", "quick", "slow", "fox", "jumps"] {
        assert_eq!(count(&plain, word), 1, "{word} in {plain}");
    }
}

#[test]
fn test_two_column_alignment() {
    let old = r#"<doc><p id="1">one</p><note>two</note><p>three</p></doc>"#;
    let new = r#"<doc><p id="1">one!</p><p>three</p><table>four</table></doc>"#;
    let (left, right) = compare_two_column(old, new).unwrap();

    let left_doc = parse_str(&left).unwrap();
    let right_doc = parse_str(&right).unwrap();
    let left_children = left_doc.root().unwrap().children();
    let right_children = right_doc.root().unwrap().children();

    // Every element of either version shows up once per column, markers
    // included, so the columns line up child by child.
    assert_eq!(left_children.len(), right_children.len());
    for (l, r) in left_children.iter().zip(&right_children) {
        assert_eq!(l.tag_name(), r.tag_name());
    }
    assert_eq!(count(&left, "modification_"), count(&right, "modification_"));
    assert_eq!(count(&left, "block-transparent"), 1);
    assert_eq!(count(&right, "block-transparent"), 1);
}

#[test_case("<p>a</p>", "<p>b</p>" ; "changed leaf root")]
#[test_case("", "<p>b</p>" ; "empty old")]
#[test_case("<p>a</p>", "" ; "empty new")]
#[test_case("<a>x</a>", "<b>y</b>" ; "incomparable roots")]
#[test_case("<a><p>x</p></a>", "<a>text<p>x</p></a>" ; "text added to root")]
fn test_root_level_change_keeps_one_root_per_column(old: &str, new: &str) {
    let (left, right) = compare_two_column(old, new).unwrap();
    parse_str(&left).unwrap_or_else(|e| panic!("left not well-formed: {left}: {e}"));
    parse_str(&right).unwrap_or_else(|e| panic!("right not well-formed: {right}: {e}"));
    assert_eq!(count(&left, "modification_1"), 1);
    assert_eq!(count(&right, "modification_1"), 1);
}

#[test]
fn test_shared_id_on_ignored_element() {
    let options = CompareOptions::builder()
        .ignored_attribute("data-skip", "yes")
        .build();
    let comparator = Comparator::new(options);
    let old = r#"<a><p id="x" data-skip="yes">t</p></a>"#;
    let new = r#"<a><p id="x">t</p></a>"#;

    let merged = comparator.compare(old, new).unwrap();
    assert_eq!(merged, r#"<a><p id="x" class="block-added">t</p></a>"#);

    let (left, right) = comparator.compare_two_column(old, new).unwrap();
    parse_str(&left).unwrap();
    parse_str(&right).unwrap();
}

#[test]
fn test_three_way_modes() {
    let original = r#"<doc><p id="1">one</p></doc>"#;
    let intermediate = r#"<doc><p id="1">one</p><p id="2">external</p></doc>"#;
    let current = r#"<doc><p id="1">one</p><p id="2">external</p><p id="3">local</p></doc>"#;

    let accepted = compare_three_way(original, intermediate, current, ThreeWayMode::AcceptExternal)
        .unwrap();
    assert_eq!(
        accepted,
        r#"<doc><p id="1">one</p><p id="2">external</p><p id="3" class="block-added">local</p></doc>"#
    );

    let marked =
        compare_three_way(original, intermediate, current, ThreeWayMode::MarkExternal).unwrap();
    assert!(marked.contains(r#"<p id="2" class="block-accepted">external</p>"#));
    assert!(marked.contains(r#"<p id="3" class="block-added">local</p>"#));
}

#[test]
fn test_custom_id_attribute() {
    let options = CompareOptions::builder().id_attribute("eId").build();
    let comparator = Comparator::new(options);
    let merged = comparator
        .compare(
            r#"<doc><p eId="a">first</p><p eId="b">second</p></doc>"#,
            r#"<doc><p eId="b">second</p><p eId="a">first</p></doc>"#,
        )
        .unwrap();
    assert_eq!(count(&merged, "data-move-id"), 2);
}

#[test]
fn test_custom_markers() {
    let mut markers = xml_redline::MarkerStyle::default();
    markers.element = "mark".to_string();
    markers.inline_added = "ins".to_string();
    markers.inline_removed = "del".to_string();
    let comparator = Comparator::new(CompareOptions::builder().markers(markers).build());
    let merged = comparator.compare("<p>a</p>", "<p>b</p>").unwrap();
    assert_eq!(merged, r#"<p><mark class="del">a</mark><mark class="ins">b</mark></p>"#);
}

#[test_case("<a>" ; "unclosed")]
#[test_case("<a></b>" ; "mismatched")]
#[test_case("<a/><b/>" ; "two roots")]
#[test_case("text <a/>" ; "text before root")]
fn test_malformed_input(bad: &str) {
    let err = compare(bad, "<a/>").unwrap_err();
    assert!(matches!(err, Error::MalformedMarkup { .. }), "{err:?}");
    let err = compare("<a/>", bad).unwrap_err();
    assert!(matches!(err, Error::MalformedMarkup { .. }), "{err:?}");
}
