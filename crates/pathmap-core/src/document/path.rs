//! Dotted path expressions over JSON documents
//!
//! A path is a `.`-separated list of components. Each component is one of:
//!
//! - a plain key (`name`), which also addresses an array element when it is
//!   a non-negative integer and the current node is an array (`items.0`);
//! - a glob pattern containing `*` or `?` that matches the first object key
//!   it fits (`user.na*`);
//! - `#`, which yields the array length as the last component and otherwise
//!   fans the rest of the path out over every element (`items.#.id`);
//! - `-1`, which appends to an array when used in a write.
//!
//! A backslash escapes the next character, so `a\.b` is the single key `a.b`.
//!
//! Copyright (c) 2025 Pathmap Team
//! Licensed under the Apache-2.0 license

use super::error::PathError;
use crate::Result;
use regex::Regex;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Component used in writes to append to an array
pub const APPEND_COMPONENT: &str = "-1";

/// A parsed path expression
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    raw: String,
    segments: Vec<Segment>,
}

/// A single component of a path
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Object key, or array index when numeric
    Key(KeySegment),
    /// Glob pattern over object keys
    Pattern(Pattern),
    /// Array length or fan-out (`#`)
    Each,
}

/// Literal key component with its array index interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySegment {
    /// The unescaped key text
    pub name: String,
    /// The key read as an array index, when it is a non-negative integer
    pub index: Option<usize>,
}

/// Glob pattern compiled to an anchored regular expression
#[derive(Debug, Clone)]
pub struct Pattern {
    glob: String,
    regex: Regex,
}

impl Path {
    /// Parse a path expression
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input)?.parse()
    }

    /// The original path text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed components
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether every component is a literal key
    pub fn is_literal(&self) -> bool {
        self.segments.iter().all(|seg| matches!(seg, Segment::Key(_)))
    }
}

/// Escape a literal object key so that it parses as a single key component
pub fn escape_key(key: &str) -> String {
    if key == "#" {
        return r"\#".to_string();
    }
    let mut escaped = String::with_capacity(key.len());
    for ch in key.chars() {
        if matches!(ch, '.' | '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl KeySegment {
    fn new(name: String) -> Self {
        let index = if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            name.parse().ok()
        } else {
            None
        };
        Self { name, index }
    }

    /// Whether this component appends to an array in writes
    pub fn is_append(&self) -> bool {
        self.name == APPEND_COMPONENT
    }
}

impl Pattern {
    fn compile(glob: String, position: usize, input: &str) -> Result<Self> {
        let mut expr = String::with_capacity(glob.len() + 2);
        expr.push('^');
        let mut chars = glob.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        expr.push_str(&regex::escape(&escaped.to_string()));
                    }
                }
                other => expr.push_str(&regex::escape(&other.to_string())),
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| {
            PathError::parse(format!("Invalid pattern '{}': {}", glob, e), position, input)
        })?;
        Ok(Self { glob, regex })
    }

    /// Whether an object key matches this pattern
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// The pattern text as written
    pub fn as_str(&self) -> &str {
        &self.glob
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.glob == other.glob
    }
}

/// Path expression parser
struct Parser<'a> {
    /// Input string being parsed
    input: &'a str,
    /// Character iterator
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        if input.is_empty() {
            return Err(PathError::empty_path().into());
        }

        Ok(Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        })
    }

    fn parse(mut self) -> Result<Path> {
        let mut segments = Vec::new();

        loop {
            segments.push(self.parse_segment()?);
            match self.advance() {
                Some('.') => continue,
                None => break,
                Some(ch) => {
                    return Err(PathError::parse(
                        format!("Unexpected character '{}'", ch),
                        self.position,
                        self.input,
                    )
                    .into())
                }
            }
        }

        Ok(Path {
            raw: self.input.to_string(),
            segments,
        })
    }

    /// Parse one component, stopping before the next unescaped '.'
    fn parse_segment(&mut self) -> Result<Segment> {
        let start = self.position;
        let mut text = String::new();
        let mut glob = String::new();
        let mut has_wildcard = false;

        while let Some(ch) = self.current_char() {
            match ch {
                '.' => break,
                '\\' => {
                    self.advance();
                    match self.advance() {
                        Some(escaped) => {
                            text.push(escaped);
                            glob.push('\\');
                            glob.push(escaped);
                        }
                        None => {
                            return Err(PathError::parse(
                                "Dangling escape at end of path",
                                self.position,
                                self.input,
                            )
                            .into())
                        }
                    }
                }
                '*' | '?' => {
                    has_wildcard = true;
                    text.push(ch);
                    glob.push(ch);
                    self.advance();
                }
                _ => {
                    text.push(ch);
                    glob.push(ch);
                    self.advance();
                }
            }
        }

        if text.is_empty() {
            return Err(PathError::parse("Empty path component", start, self.input).into());
        }

        if has_wildcard {
            return Ok(Segment::Pattern(Pattern::compile(glob, start, self.input)?));
        }
        if glob == "#" {
            return Ok(Segment::Each);
        }
        Ok(Segment::Key(KeySegment::new(text)))
    }

    fn current_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        Some(ch)
    }
}
