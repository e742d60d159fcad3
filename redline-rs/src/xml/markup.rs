//! Helpers that edit and emit raw markup.
//!
//! Output is assembled from verbatim slices of the input, so these functions
//! work on strings rather than on a serialized tree.

use std::borrow::Cow;

use quick_xml::escape::escape;

/// Sets an attribute on the root start tag of a fragment.
///
/// An existing attribute of the same name has its value replaced; otherwise
/// the attribute is appended to the tag. Fragments that do not start with a
/// start tag are returned unchanged.
pub fn set_attribute(fragment: &str, name: &str, value: &str) -> String {
    let Some(tag) = scan_start_tag(fragment) else {
        return fragment.to_string();
    };
    let escaped = escape(value);

    let mut out = String::with_capacity(fragment.len() + name.len() + escaped.len() + 4);
    match tag.attributes.iter().find(|a| &fragment[a.name.clone()] == name) {
        Some(attr) => {
            out.push_str(&fragment[..attr.value.start]);
            out.push_str(&escaped);
            out.push_str(&fragment[attr.value.end..]);
        }
        None => {
            out.push_str(fragment[..tag.insert_at].trim_end());
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escaped);
            out.push('"');
            out.push_str(&fragment[tag.insert_at..]);
        }
    }
    out
}

/// Removes an attribute from the root start tag of a fragment.
pub fn remove_attribute<'a>(fragment: &'a str, name: &str) -> Cow<'a, str> {
    let Some(tag) = scan_start_tag(fragment) else {
        return Cow::Borrowed(fragment);
    };
    match tag.attributes.iter().find(|a| &fragment[a.name.clone()] == name) {
        Some(attr) => {
            let start = fragment[..attr.name.start].trim_end().len();
            let mut out = String::with_capacity(fragment.len());
            out.push_str(&fragment[..start]);
            out.push_str(&fragment[attr.value.end + 1..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(fragment),
    }
}

/// Inserts content right after the root start tag of a fragment, opening a
/// self-closing element.
pub fn insert_content(fragment: &str, content: &str) -> String {
    let Some(tag) = scan_start_tag(fragment) else {
        return format!("{content}{fragment}");
    };
    let mut out = String::with_capacity(fragment.len() + content.len() + 8);
    if fragment[tag.insert_at..].starts_with("/>") {
        out.push_str(fragment[..tag.insert_at].trim_end());
        out.push('>');
        out.push_str(content);
        out.push_str(&end_tag(&fragment[1..tag.name_end]));
        out.push_str(&fragment[tag.insert_at + 2..]);
    } else {
        out.push_str(&fragment[..=tag.insert_at]);
        out.push_str(content);
        out.push_str(&fragment[tag.insert_at + 1..]);
    }
    out
}

/// Sets several attributes in order.
pub fn set_attributes<'a, I>(fragment: &str, attributes: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    attributes
        .into_iter()
        .fold(fragment.to_string(), |acc, (name, value)| {
            set_attribute(&acc, name, value)
        })
}

/// Returns the opening form of a start tag, turning `<a/>` into `<a>`.
pub fn open_form(start_tag: &str) -> Cow<'_, str> {
    match start_tag.strip_suffix("/>") {
        Some(head) => Cow::Owned(format!("{}>", head.trim_end())),
        None => Cow::Borrowed(start_tag),
    }
}

/// Builds an end tag.
pub fn end_tag(name: &str) -> String {
    format!("</{name}>")
}

/// Wraps content in `<element attribute="value">…</element>`.
pub fn wrap(content: &str, element: &str, attribute: &str, value: &str) -> String {
    format!(
        "<{element} {attribute}=\"{}\">{content}</{element}>",
        escape(value)
    )
}

/// Builds the hidden marker that correlates modifications across columns.
pub fn hidden_marker(prefix: &str, index: usize) -> String {
    format!("<input type=\"hidden\" name=\"{}{index}\"/>", escape(prefix))
}

/// Byte spans of one attribute inside a start tag.
#[derive(Debug)]
struct AttrSpan {
    name: std::ops::Range<usize>,
    /// The value between the quotes.
    value: std::ops::Range<usize>,
}

/// Layout of a fragment's leading start tag.
#[derive(Debug)]
struct StartTag {
    /// End of the tag name.
    name_end: usize,
    attributes: Vec<AttrSpan>,
    /// Position of `>` or `/>`, where new attributes go.
    insert_at: usize,
}

fn scan_start_tag(fragment: &str) -> Option<StartTag> {
    let bytes = fragment.as_bytes();
    if bytes.first() != Some(&b'<')
        || matches!(bytes.get(1).copied(), Some(b'/' | b'!' | b'?') | None)
    {
        return None;
    }

    let mut pos = 1;
    while pos < bytes.len() && !is_tag_delimiter(bytes[pos]) {
        pos += 1;
    }
    let name_end = pos;

    let mut attributes = Vec::new();
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        match *bytes.get(pos)? {
            b'>' => {
                return Some(StartTag {
                    name_end,
                    attributes,
                    insert_at: pos,
                })
            }
            b'/' if bytes.get(pos + 1) == Some(&b'>') => {
                return Some(StartTag {
                    name_end,
                    attributes,
                    insert_at: pos,
                })
            }
            _ => {}
        }

        let name_start = pos;
        while pos < bytes.len() && !is_tag_delimiter(bytes[pos]) && bytes[pos] != b'=' {
            pos += 1;
        }
        let name = name_start..pos;
        if name.is_empty() {
            return None;
        }

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if bytes.get(pos) != Some(&b'=') {
            return None;
        }
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let quote = *bytes.get(pos)?;
        if quote != b'"' && quote != b'\'' {
            return None;
        }
        let value_start = pos + 1;
        let value_len = bytes[value_start..].iter().position(|&b| b == quote)?;
        let value = value_start..value_start + value_len;
        pos = value.end + 1;
        attributes.push(AttrSpan { name, value });
    }
}

fn is_tag_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'>' || b == b'/'
}
