//! Element model for parsed documents.
//!
//! A [`Document`] owns its source buffer and a flat pre-order arena of
//! element records. Elements never change after parsing; they are addressed
//! with [`NodeId`]s and inspected through the cheap [`Element`] handle, whose
//! raw fragment and content are slices of the source buffer produced on
//! demand.

use std::fmt;
use std::ops::Range;

use md5::{Digest, Md5};
use rustc_hash::FxHashSet;

/// Index of an element in its document's arena.
///
/// Arena order is pre-order, so the id doubles as the element's
/// document-order index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the document-order index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stored data of one element.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) tag_name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) stable_id: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) has_text_child: bool,
    /// Whole element including its tags.
    pub(crate) fragment: Range<usize>,
    /// Inner content. Empty for self-closing elements.
    pub(crate) content: Range<usize>,
    /// Start of the text between the previous sibling (or the parent's start
    /// tag) and this element.
    pub(crate) gap_start: usize,
    pub(crate) self_closing: bool,
}

/// A parsed markup document.
#[derive(Clone)]
pub struct Document {
    source: String,
    nodes: Vec<NodeData>,
    prolog: Range<usize>,
    epilog: Range<usize>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.nodes.len())
            .field("bytes", &self.source.len())
            .finish()
    }
}

impl Document {
    pub(crate) fn new(
        source: String,
        nodes: Vec<NodeData>,
        prolog: Range<usize>,
        epilog: Range<usize>,
    ) -> Self {
        Document {
            source,
            nodes,
            prolog,
            epilog,
        }
    }

    /// Returns the root element, or `None` for an empty document.
    pub fn root(&self) -> Option<Element<'_>> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(self.element(NodeId(0)))
        }
    }

    /// Returns the element with the given id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this document.
    pub fn element(&self, id: NodeId) -> Element<'_> {
        assert!(id.0 < self.nodes.len(), "node id out of range");
        Element { doc: self, id }
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the document has no root element.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The original buffer.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Everything before the root element (declaration, doctype, comments).
    pub fn prolog(&self) -> &str {
        &self.source[self.prolog.clone()]
    }

    /// Everything after the root element.
    pub fn epilog(&self) -> &str {
        &self.source[self.epilog.clone()]
    }

    /// Iterates over all elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = Element<'_>> + '_ {
        (0..self.nodes.len()).map(move |i| Element {
            doc: self,
            id: NodeId(i),
        })
    }

    /// Collects the stable identifiers used in this document.
    pub fn stable_ids(&self) -> FxHashSet<&str> {
        self.nodes
            .iter()
            .filter_map(|n| n.stable_id.as_deref())
            .collect()
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

/// Borrowed handle to one element of a [`Document`].
#[derive(Clone, Copy)]
pub struct Element<'d> {
    doc: &'d Document,
    id: NodeId,
}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>#{}", self.tag_name(), self.id.0)
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Element<'_> {}

impl<'d> Element<'d> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Position in a pre-order traversal of the whole document.
    pub fn node_index(&self) -> usize {
        self.id.0
    }

    /// The document this element belongs to.
    pub fn document(&self) -> &'d Document {
        self.doc
    }

    pub fn tag_name(&self) -> &'d str {
        &self.data().tag_name
    }

    /// The explicit identifier attribute, if present.
    pub fn stable_id(&self) -> Option<&'d str> {
        self.data().stable_id.as_deref()
    }

    /// Returns the unescaped value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&'d str> {
        self.data()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn parent(&self) -> Option<Element<'d>> {
        self.data().parent.map(|id| self.doc.element(id))
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Child elements in document order.
    pub fn children(&self) -> Vec<Element<'d>> {
        let doc = self.doc;
        self.data()
            .children
            .iter()
            .map(|&id| Element { doc, id })
            .collect()
    }

    /// The element itself followed by everything nested in it, in document
    /// order.
    pub fn subtree(&self) -> impl Iterator<Item = Element<'d>> + 'd {
        let doc = self.doc;
        let end = self.data().fragment.end;
        (self.id.0..doc.nodes.len())
            .take_while(move |&i| doc.nodes[i].fragment.start < end)
            .map(move |i| Element { doc, id: NodeId(i) })
    }

    /// Byte range of the raw fragment in the document source.
    pub(crate) fn source_span(&self) -> Range<usize> {
        self.data().fragment.clone()
    }

    /// True if the element directly contains non-whitespace text.
    pub fn has_text_child(&self) -> bool {
        self.data().has_text_child
    }

    pub fn is_self_closing(&self) -> bool {
        self.data().self_closing
    }

    /// The verbatim element, tags included.
    pub fn raw_fragment(&self) -> &'d str {
        &self.doc.source[self.data().fragment.clone()]
    }

    /// The verbatim inner content.
    pub fn raw_content(&self) -> &'d str {
        &self.doc.source[self.data().content.clone()]
    }

    /// The start tag, or the whole tag of a self-closing element.
    pub fn start_tag(&self) -> &'d str {
        let data = self.data();
        if data.self_closing {
            &self.doc.source[data.fragment.clone()]
        } else {
            &self.doc.source[data.fragment.start..data.content.start]
        }
    }

    /// The end tag; empty for a self-closing element.
    pub fn end_tag(&self) -> &'d str {
        let data = self.data();
        if data.self_closing {
            ""
        } else {
            &self.doc.source[data.content.end..data.fragment.end]
        }
    }

    /// Text between the previous sibling (or the parent's start tag) and this
    /// element.
    pub fn gap_before(&self) -> &'d str {
        let data = self.data();
        &self.doc.source[data.gap_start..data.fragment.start]
    }

    /// Content between the last child element and the end tag.
    pub fn trailing_gap(&self) -> &'d str {
        let data = self.data();
        let start = data
            .children
            .last()
            .map(|&c| self.doc.data(c).fragment.end)
            .unwrap_or(data.content.start);
        &self.doc.source[start..data.content.end]
    }

    /// MD5 digest of the raw fragment.
    pub fn digest(&self) -> [u8; 16] {
        let mut hasher = Md5::new();
        hasher.update(self.raw_fragment().as_bytes());
        hasher.finalize().into()
    }

    fn data(&self) -> &'d NodeData {
        self.doc.data(self.id)
    }
}

#[cfg(test)]
mod tests {
    use crate::xml::parse_str;

    #[test]
    fn test_node_indices_are_preorder() {
        let doc = parse_str("<a><b><c/></b><d/></a>").unwrap();
        let names: Vec<(usize, &str)> = doc
            .elements()
            .map(|e| (e.node_index(), e.tag_name()))
            .collect();
        assert_eq!(names, vec![(0, "a"), (1, "b"), (2, "c"), (3, "d")]);
    }

    #[test]
    fn test_fragment_and_content() {
        let doc = parse_str(r#"<a x="1"> <b>hi</b> </a>"#).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(root.start_tag(), r#"<a x="1">"#);
        assert_eq!(root.end_tag(), "</a>");
        assert_eq!(root.raw_content(), " <b>hi</b> ");

        let b = root.children()[0];
        assert_eq!(b.raw_fragment(), "<b>hi</b>");
        assert_eq!(b.raw_content(), "hi");
        assert_eq!(b.gap_before(), " ");
        assert_eq!(root.trailing_gap(), " ");
        assert!(b.has_text_child());
        assert!(!root.has_text_child());
        assert_eq!(b.parent(), Some(root));
    }

    #[test]
    fn test_self_closing() {
        let doc = parse_str(r#"<a><img src="x.png"/></a>"#).unwrap();
        let img = doc.root().unwrap().children()[0];
        assert!(img.is_self_closing());
        assert_eq!(img.start_tag(), r#"<img src="x.png"/>"#);
        assert_eq!(img.end_tag(), "");
        assert_eq!(img.raw_content(), "");
        assert_eq!(img.attribute("src"), Some("x.png"));
    }

    #[test]
    fn test_digest_tracks_fragment() {
        let doc = parse_str("<a><p>same</p><p>same</p><p>other</p></a>").unwrap();
        let children = doc.root().unwrap().children();
        assert_eq!(children[0].digest(), children[1].digest());
        assert_ne!(children[0].digest(), children[2].digest());
    }

    #[test]
    fn test_stable_ids() {
        let doc = parse_str(r#"<a id="r"><b id="x"/><b/></a>"#).unwrap();
        let ids = doc.stable_ids();
        assert!(ids.contains("r"));
        assert!(ids.contains("x"));
        assert_eq!(ids.len(), 2);
        assert_eq!(doc.root().unwrap().children()[1].stable_id(), None);
    }

    #[test]
    fn test_subtree() {
        let doc = parse_str("<a><b><c/><d/></b><e/></a>").unwrap();
        let b = doc.root().unwrap().children()[0];
        let names: Vec<&str> = b.subtree().map(|e| e.tag_name()).collect();
        assert_eq!(names, vec!["b", "c", "d"]);
        assert_eq!(&doc.source()[b.source_span()], "<b><c/><d/></b>");
    }
}
