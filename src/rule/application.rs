//! Applying a compiled mapping table to text.
//!
//! The text being rewritten is held as a `Tape`: a sequence of *open* pieces,
//! which later mappings may still match, and *fixed* pieces, whose final text is
//! already decided. Matching a mapping turns the matched span into a fixed
//! piece holding the replacement, so:
//!
//! - no mapping can match inside, or across, text an earlier match consumed;
//! - every position is rewritten at most once per rule application;
//! - replacements never cascade, even when a replacement contains the pattern.
//!
//! Exception spans are fixed up front, holding their own text, which makes them
//! immune to every mapping. Rendering the tape performs all deferred
//! substitutions at once, and no character of the input is reserved for
//! bookkeeping.
//!
//! # Algorithm
//!
//! ```text
//! split off gloss (from first '‣')
//! pad body with one space on each side
//! for each exception template: fix every occurrence as itself
//! for each mapping, in table order:
//!     loop: resolve wildcards, find leftmost open occurrence, fix it as replacement
//! render, remove padding, reattach gloss
//! ```

use super::mapping::Mapping;
use super::syntax::{GLOSS_SEPARATOR, WILDCARD};

/// Character placed on both sides of the input so boundary patterns can match.
pub const BOUNDARY_PADDING: char = ' ';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    /// Text later mappings may still rewrite.
    Open(String),
    /// Final text; never matched again.
    Fixed(String),
}

/// A located occurrence inside one open piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    piece: usize,
    start: usize,
    end: usize,
}

/// Text under rewrite, split into open and fixed pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tape {
    pieces: Vec<Piece>,
}

impl Tape {
    pub fn new(text: String) -> Self {
        Self {
            pieces: vec![Piece::Open(text)],
        }
    }

    /// Leftmost occurrence of `needle` within a single open piece.
    fn find(&self, needle: &str) -> Option<Span> {
        if needle.is_empty() {
            return None;
        }
        self.open_pieces().find_map(|(piece, text)| {
            text.find(needle).map(|start| Span {
                piece,
                start,
                end: start + needle.len(),
            })
        })
    }

    fn open_pieces(&self) -> impl Iterator<Item = (usize, &str)> {
        self.pieces
            .iter()
            .enumerate()
            .filter_map(|(i, piece)| match piece {
                Piece::Open(text) => Some((i, text.as_str())),
                Piece::Fixed(_) => None,
            })
    }

    /// Leftmost occurrence of a chain of wildcard-separated anchors.
    ///
    /// Each anchor is searched after the end of the previous one, within the
    /// same open piece. Returns the whole span and the text captured between
    /// each adjacent pair of anchors.
    fn find_chain(&self, anchors: &[&str]) -> Option<(Span, Vec<String>)> {
        let (first, rest) = anchors.split_first()?;
        self.open_pieces().find_map(|(piece, text)| {
            let start = text.find(first)?;
            let mut pos = start + first.len();
            let mut captures = Vec::with_capacity(rest.len());
            for anchor in rest {
                let at = pos + text[pos..].find(anchor)?;
                captures.push(text[pos..at].to_string());
                pos = at + anchor.len();
            }
            if pos == start {
                return None;
            }
            Some((
                Span {
                    piece,
                    start,
                    end: pos,
                },
                captures,
            ))
        })
    }

    /// Freezes `span` as `text`.
    fn fix(&mut self, span: Span, text: String) {
        let Some(Piece::Open(open)) = self.pieces.get(span.piece) else {
            debug_assert!(false, "span {span:?} does not point at an open piece");
            return;
        };
        let before = &open[..span.start];
        let after = &open[span.end..];

        let mut spliced = Vec::with_capacity(3);
        if !before.is_empty() {
            spliced.push(Piece::Open(before.to_string()));
        }
        spliced.push(Piece::Fixed(text));
        if !after.is_empty() {
            spliced.push(Piece::Open(after.to_string()));
        }
        self.pieces.splice(span.piece..=span.piece, spliced);
    }

    /// Fixes every occurrence of `template` as itself.
    pub fn mask(&mut self, template: &str) {
        while let Some(span) = self.find(template) {
            self.fix(span, template.to_string());
        }
    }

    /// Rewrites every occurrence of the mapping's pattern.
    pub fn rewrite(&mut self, mapping: &Mapping) {
        let pattern = mapping.pattern.trim_matches(WILDCARD);
        let replacement = mapping.replacement.trim_matches(WILDCARD);

        if !pattern.contains(WILDCARD) {
            while let Some(span) = self.find(pattern) {
                self.fix(span, replacement.to_string());
            }
            return;
        }

        // Captures can differ between occurrences, so resolve afresh each time.
        let anchors: Vec<&str> = pattern.split(WILDCARD).collect();
        while let Some((span, captures)) = self.find_chain(&anchors) {
            self.fix(span, fill_wildcards(replacement, &captures));
        }
    }

    pub fn render(self) -> String {
        self.pieces
            .into_iter()
            .map(|piece| match piece {
                Piece::Open(text) | Piece::Fixed(text) => text,
            })
            .collect()
    }
}

/// Substitutes captures, in order, for the wildcards of `replacement`.
/// Wildcards beyond the last capture are kept.
fn fill_wildcards(replacement: &str, captures: &[String]) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut captures = captures.iter();
    for c in replacement.chars() {
        if c == WILDCARD {
            if let Some(capture) = captures.next() {
                out.push_str(capture);
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Applies a mapping table and its exception templates to `input`.
pub(crate) fn apply(mappings: &[Mapping], exceptions: &[String], input: &str) -> String {
    let (body, gloss) = match input.find(GLOSS_SEPARATOR) {
        Some(at) => input.split_at(at),
        None => (input, ""),
    };

    let mut padded = String::with_capacity(body.len() + 2);
    padded.push(BOUNDARY_PADDING);
    padded.push_str(body);
    padded.push(BOUNDARY_PADDING);

    let mut tape = Tape::new(padded);
    for exception in exceptions.iter().filter(|e| !e.is_empty()) {
        tape.mask(exception);
    }
    for mapping in mappings {
        tape.rewrite(mapping);
    }

    let rendered = tape.render();
    let mut rendered = rendered.as_str();
    rendered = rendered.strip_prefix(BOUNDARY_PADDING).unwrap_or(rendered);
    rendered = rendered.strip_suffix(BOUNDARY_PADDING).unwrap_or(rendered);

    let mut output = String::with_capacity(rendered.len() + gloss.len());
    output.push_str(rendered);
    output.push_str(gloss);
    output
}
