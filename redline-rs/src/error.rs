//! Error types for the comparator.

use thiserror::Error;

/// Result type alias for comparator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while comparing documents.
///
/// "No match" and "ignored" outcomes of the node matcher are not errors; they
/// are ordinary [`MatchResult`](crate::matching::MatchResult) values.
#[derive(Error, Debug)]
pub enum Error {
    /// An input buffer is not well-formed markup.
    #[error("malformed markup at byte {position}: {message}")]
    MalformedMarkup {
        /// What went wrong.
        message: String,
        /// Byte offset in the input buffer where the problem was detected.
        position: usize,
    },

    /// A move placeholder refers to an element that never made it into the
    /// edit script.
    #[error("move {move_id} has no counterpart for element #{node_index}")]
    BrokenMoveInvariant {
        /// The move marker that could not be resolved.
        move_id: usize,
        /// Document-order index of the element carrying the marker.
        node_index: usize,
    },

    /// I/O error while reading an input file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a malformed-markup error.
    pub(crate) fn malformed(message: impl Into<String>, position: usize) -> Self {
        Error::MalformedMarkup {
            message: message.into(),
            position,
        }
    }
}
