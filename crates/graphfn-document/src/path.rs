//! Field paths for addressing values inside nested documents
//!
//! Provides [`FieldPath`], the parsed form of the dot/bracket path grammar:
//!
//! - segments are separated by `.`
//! - a segment written as `[literal]` is taken verbatim, dots and slashes included
//!
//! `metadata.[example.org/owner].name` → `metadata`, `example.org/owner`, `name`

use crate::error::DocumentError;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Parsed, non-empty path into a document
///
/// # Examples
/// - `a.b.c` → `["a", "b", "c"]`
/// - `a.[x.y].b` → `["a", "x.y", "b"]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Parse a path string
    ///
    /// # Errors
    /// Returns [`DocumentError::InvalidPath`] for empty input, empty segments
    /// (leading, trailing or consecutive dots, `[]`), unbalanced brackets, or
    /// a `[` inside a bracket segment.
    pub fn parse(raw: &str) -> Result<Self, DocumentError> {
        let mut segments = Vec::new();
        let mut run = String::new();
        // True at the start of input and right after a '.'
        let mut expect_segment = true;
        let mut chars = raw.chars();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if !run.is_empty() {
                        segments.push(std::mem::take(&mut run));
                    } else if expect_segment {
                        return Err(DocumentError::invalid_path(raw, "empty segment"));
                    }
                    expect_segment = true;
                }
                '[' => {
                    if !run.is_empty() {
                        segments.push(std::mem::take(&mut run));
                    }
                    let mut literal = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some('[') => {
                                return Err(DocumentError::invalid_path(
                                    raw,
                                    "'[' inside bracket segment",
                                ))
                            }
                            Some(ch) => literal.push(ch),
                            None => {
                                return Err(DocumentError::invalid_path(
                                    raw,
                                    "unterminated bracket segment",
                                ))
                            }
                        }
                    }
                    if literal.is_empty() {
                        return Err(DocumentError::invalid_path(raw, "empty bracket segment"));
                    }
                    segments.push(literal);
                    expect_segment = false;
                }
                ']' => return Err(DocumentError::invalid_path(raw, "unmatched ']'")),
                _ => {
                    run.push(c);
                    expect_segment = false;
                }
            }
        }

        if !run.is_empty() {
            segments.push(run);
        } else if expect_segment && !segments.is_empty() {
            return Err(DocumentError::invalid_path(raw, "trailing '.'"));
        }

        if segments.is_empty() {
            return Err(DocumentError::invalid_path(raw, "path has no segments"));
        }

        Ok(Self(segments))
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Last segment together with the segments leading to it
    #[inline]
    #[must_use]
    pub fn split_last(&self) -> Option<(&String, &[String])> {
        self.0.split_last()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if segment.contains('.') {
                write!(f, "[{segment}]")?;
            } else {
                f.write_str(segment)?;
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = DocumentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
