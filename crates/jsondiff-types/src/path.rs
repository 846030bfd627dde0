//! Locations inside a JSON document.
//!
//! A [`JsonPath`] is an ordered list of object keys and array indices; the
//! root is the empty path. Paths render to a canonical dot/bracket notation
//! that parses back to the same path:
//!
//! | path segments | notation |
//! |---|---|
//! | *(root)* | `""` |
//! | `user`, `name` | `user.name` |
//! | `tags`, `3` | `tags[3]` |
//! | `a.b` | `["a.b"]` |
//! | `meta`, `""` | `meta[""]` |
//!
//! Keys that are identifiers (`[A-Za-z_$][A-Za-z0-9_$]*`) are written bare;
//! every other key is written as a bracketed JSON string literal.

use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// One step of a [`JsonPath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// An object member.
    Key(String),
    /// An array element.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A location inside a JSON document.
///
/// Paths order segment by segment, with a parent sorting before its
/// descendants, so they can key ordered maps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsonPath(Vec<PathSegment>);

impl JsonPath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.0.push(segment.into());
    }

    /// A new path one level below this one.
    #[must_use]
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    /// The enclosing path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, init)| Self(init.to_vec()))
    }

    /// Returns `true` if `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &JsonPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns `true` if `other` lies strictly below this path.
    pub fn is_ancestor_of(&self, other: &JsonPath) -> bool {
        other.len() > self.len() && other.starts_with(self)
    }
}

impl From<Vec<PathSegment>> for JsonPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for JsonPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_identifier_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_identifier(key: &str) -> bool {
    let bytes = key.as_bytes();
    bytes.first().is_some_and(|&b| is_identifier_start(b))
        && bytes[1..].iter().all(|&b| is_identifier_continue(b))
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if is_identifier(key) => {
                    if i > 0 {
                        f.write_char('.')?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Key(key) => {
                    let literal = serde_json::to_string(key).map_err(|_| fmt::Error)?;
                    write!(f, "[{literal}]")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Cursor over canonical path notation.
struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn error(&self, reason: impl Into<String>) -> TypeError {
        TypeError::invalid_path(self.input, reason)
    }

    fn parse(mut self) -> Result<JsonPath, TypeError> {
        let mut segments = Vec::new();
        while let Some(b) = self.peek() {
            let segment = match b {
                b'[' => self.bracket()?,
                b'.' if !segments.is_empty() => {
                    self.pos += 1;
                    self.identifier()?
                }
                _ if segments.is_empty() => self.identifier()?,
                _ => return Err(self.error(format!("expected '.' or '[' at offset {}", self.pos))),
            };
            segments.push(segment);
        }
        Ok(JsonPath(segments))
    }

    fn identifier(&mut self) -> Result<PathSegment, TypeError> {
        let start = self.pos;
        match self.peek() {
            Some(b) if is_identifier_start(b) => self.pos += 1,
            _ => return Err(self.error(format!("expected a key at offset {start}"))),
        }
        while self.peek().is_some_and(is_identifier_continue) {
            self.pos += 1;
        }
        Ok(PathSegment::Key(self.input[start..self.pos].to_string()))
    }

    fn bracket(&mut self) -> Result<PathSegment, TypeError> {
        self.pos += 1;
        let segment = if self.peek() == Some(b'"') {
            self.quoted_key()?
        } else {
            self.index()?
        };
        if self.peek() != Some(b']') {
            return Err(self.error(format!("expected ']' at offset {}", self.pos)));
        }
        self.pos += 1;
        Ok(segment)
    }

    fn quoted_key(&mut self) -> Result<PathSegment, TypeError> {
        let bytes = self.input.as_bytes();
        let start = self.pos;
        let mut end = start + 1;
        loop {
            match bytes.get(end) {
                None => return Err(self.error("unterminated quoted key")),
                Some(b'\\') => end += 2,
                Some(b'"') => break,
                Some(_) => end += 1,
            }
        }
        let literal = self
            .input
            .get(start..=end)
            .ok_or_else(|| self.error("unterminated quoted key"))?;
        let key: String =
            serde_json::from_str(literal).map_err(|e| self.error(format!("bad quoted key: {e}")))?;
        self.pos = end + 1;
        Ok(PathSegment::Key(key))
    }

    fn index(&mut self) -> Result<PathSegment, TypeError> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits = &self.input[start..self.pos];
        if digits.is_empty() {
            return Err(self.error(format!("expected an index or quoted key at offset {start}")));
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(self.error(format!("index with leading zero at offset {start}")));
        }
        digits
            .parse()
            .map(PathSegment::Index)
            .map_err(|e| self.error(format!("bad index: {e}")))
    }
}

impl FromStr for JsonPath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathParser::new(s).parse()
    }
}

impl Serialize for JsonPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JsonPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
