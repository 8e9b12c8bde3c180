//! Line framing: one message per line as `TYPE:payload`.
//!
//! The payload is opaque here and is not escaped. Callers must not put a line
//! terminator inside it; further `:` characters are fine because only the
//! first one separates the tag.

use core::fmt;

pub const SEPARATOR: char = ':';

/// A line that cannot be split into tag and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// No separator anywhere in the line.
    MissingSeparator(String),
    /// Nothing but whitespace before the separator.
    EmptyTag(String),
    /// The line exceeds the transport limit.
    TooLong { len: usize, max: usize },
    /// The line is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::MissingSeparator(line) => {
                write!(f, "Message without '{}' separator: {:?}", SEPARATOR, line)
            }
            FrameError::EmptyTag(line) => write!(f, "Message without type: {:?}", line),
            FrameError::TooLong { len, max } => {
                write!(f, "Line too long: {} bytes (max: {})", len, max)
            }
            FrameError::InvalidUtf8 => write!(f, "Line is not valid UTF-8"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Join `tag` and an already-serialized `payload` into one line (without
/// terminator).
pub fn encode(tag: &str, payload: &str) -> String {
    let mut line = String::with_capacity(tag.len() + 1 + payload.len());
    line.push_str(tag);
    line.push(SEPARATOR);
    line.push_str(payload);
    line
}

/// Split `line` at the first separator, trimming both halves. A tag that is
/// empty after trimming is rejected.
pub fn decode(line: &str) -> Result<(String, String), FrameError> {
    let Some(idx) = line.find(SEPARATOR) else {
        return Err(FrameError::MissingSeparator(line.to_string()));
    };
    let tag = line[..idx].trim();
    if tag.is_empty() {
        return Err(FrameError::EmptyTag(line.to_string()));
    }
    let payload = line[idx + SEPARATOR.len_utf8()..].trim();
    Ok((tag.to_string(), payload.to_string()))
}
