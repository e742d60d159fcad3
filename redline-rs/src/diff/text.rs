//! Text-level differ.
//!
//! Leaf content is split into tokens, with tags before words: every tag is
//! its own token (an atomic element and its whole subtree form a single
//! token), and text runs are split at the start of each whitespace run, so
//! `"hello world"` becomes `"hello"` and `" world"`. The token sequences are
//! then compared with an LCS diff.

use quick_xml::events::Event;
use quick_xml::Reader;
use similar::{capture_diff_slices, Algorithm, DiffOp};

use crate::config::CompareOptions;
use crate::error::{Error, Result};

/// What a token is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    /// A word, possibly led by whitespace.
    Word,
    /// A start tag of an ordinary element.
    StartTag(String),
    /// An end tag of an ordinary element.
    EndTag(String),
    /// A self-closing tag.
    EmptyTag,
    /// An atomic element including its subtree.
    Atomic,
    /// Comments, processing instructions and CDATA sections.
    Markup,
}

/// One comparison unit of leaf content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Word, text)
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// The verbatim source text of the token.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One operation of a text-level edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    Equal(Token),
    Insert(Token),
    Delete(Token),
}

impl TextEdit {
    pub fn token(&self) -> &Token {
        match self {
            TextEdit::Equal(t) | TextEdit::Insert(t) | TextEdit::Delete(t) => t,
        }
    }

    pub fn is_equal(&self) -> bool {
        matches!(self, TextEdit::Equal(_))
    }
}

/// Tokenizes and diffs leaf content.
#[derive(Debug, Clone, Copy)]
pub struct TextDiffer<'o> {
    options: &'o CompareOptions,
}

/// An atomic element being skipped over.
struct AtomicSpan {
    start: usize,
    name: Vec<u8>,
    depth: usize,
}

impl<'o> TextDiffer<'o> {
    pub fn new(options: &'o CompareOptions) -> Self {
        TextDiffer { options }
    }

    /// Computes the edit script turning `old` content into `new` content.
    pub fn diff(&self, old: &str, new: &str) -> Result<Vec<TextEdit>> {
        let old_tokens = self.tokenize(old)?;
        let new_tokens = self.tokenize(new)?;
        Ok(diff_tokens(&old_tokens, &new_tokens))
    }

    /// Splits element content into tokens.
    ///
    /// Concatenating the token texts gives back `content` exactly.
    pub fn tokenize(&self, content: &str) -> Result<Vec<Token>> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        let mut tokens = Vec::new();
        let mut text_start: Option<usize> = None;
        let mut atomic: Option<AtomicSpan> = None;

        loop {
            let before = reader.buffer_position() as usize;
            let event = reader
                .read_event()
                .map_err(|e| Error::malformed(e.to_string(), before))?;
            let after = reader.buffer_position() as usize;

            if let Some(span) = atomic.as_mut() {
                match event {
                    Event::Start(ref e) if e.name().as_ref() == span.name.as_slice() => {
                        span.depth += 1;
                    }
                    Event::End(ref e) if e.name().as_ref() == span.name.as_slice() => {
                        span.depth -= 1;
                        if span.depth == 0 {
                            tokens.push(Token::new(TokenKind::Atomic, &content[span.start..after]));
                            atomic = None;
                        }
                    }
                    Event::Eof => {
                        return Err(Error::malformed("unclosed atomic element", content.len()));
                    }
                    _ => {}
                }
                continue;
            }

            if matches!(event, Event::Text(_) | Event::GeneralRef(_)) {
                text_start.get_or_insert(before);
                continue;
            }
            if let Some(start) = text_start.take() {
                split_words(&content[start..before], &mut tokens);
            }

            let raw = &content[before..after];
            match event {
                Event::Start(ref e) => {
                    let name = tag_name(e.name().as_ref(), before)?;
                    if self.options.is_atomic(&name) {
                        atomic = Some(AtomicSpan {
                            start: before,
                            name: e.name().as_ref().to_vec(),
                            depth: 1,
                        });
                    } else {
                        tokens.push(Token::new(TokenKind::StartTag(name), raw));
                    }
                }
                Event::End(ref e) => {
                    let name = tag_name(e.name().as_ref(), before)?;
                    tokens.push(Token::new(TokenKind::EndTag(name), raw));
                }
                Event::Empty(ref e) => {
                    let name = tag_name(e.name().as_ref(), before)?;
                    let kind = if self.options.is_atomic(&name) {
                        TokenKind::Atomic
                    } else {
                        TokenKind::EmptyTag
                    };
                    tokens.push(Token::new(kind, raw));
                }
                Event::CData(_)
                | Event::Comment(_)
                | Event::PI(_)
                | Event::Decl(_)
                | Event::DocType(_) => {
                    tokens.push(Token::new(TokenKind::Markup, raw));
                }
                Event::Eof => break,
                Event::Text(_) | Event::GeneralRef(_) => {}
            }
        }

        Ok(tokens)
    }
}

fn tag_name(name: &[u8], position: usize) -> Result<String> {
    std::str::from_utf8(name)
        .map(str::to_string)
        .map_err(|e| Error::malformed(e.to_string(), position))
}

/// Splits text at the start of every whitespace run.
fn split_words(text: &str, tokens: &mut Vec<Token>) {
    let mut start = 0;
    let mut prev_space = false;
    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        if space && !prev_space && i > start {
            tokens.push(Token::word(&text[start..i]));
            start = i;
        }
        prev_space = space;
    }
    if start < text.len() {
        tokens.push(Token::word(&text[start..]));
    }
}

/// LCS diff of two token sequences.
///
/// Within a replaced range the deletions come before the insertions.
pub fn diff_tokens(old: &[Token], new: &[Token]) -> Vec<TextEdit> {
    let ops = capture_diff_slices(Algorithm::Lcs, old, new);
    let mut edits = Vec::with_capacity(old.len().max(new.len()));
    for op in ops {
        match op {
            DiffOp::Equal { new_index, len, .. } => {
                edits.extend(new[new_index..new_index + len].iter().cloned().map(TextEdit::Equal));
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                edits.extend(old[old_index..old_index + old_len].iter().cloned().map(TextEdit::Delete));
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                edits.extend(new[new_index..new_index + new_len].iter().cloned().map(TextEdit::Insert));
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                edits.extend(old[old_index..old_index + old_len].iter().cloned().map(TextEdit::Delete));
                edits.extend(new[new_index..new_index + new_len].iter().cloned().map(TextEdit::Insert));
            }
        }
    }
    edits
}
