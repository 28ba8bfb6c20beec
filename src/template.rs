//! Argument templates with positional `{}` slots.
//!
//! Benchmark argument strings carry up to two slots. The first is always
//! replaced with the core count `P`, the second with `P * 4`. `{{` and `}}`
//! escape literal braces.

use crate::error::{DriverError, Result};
use std::fmt;

/// Text written into the slots for CSV headers
pub const HEADER_PLACEHOLDERS: [&str; 2] = ["<P>", "<P*4>"];

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot,
}

/// A parsed argument template
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl ArgTemplate {
    /// Parse `raw`, allowing at most `max_slots` positional slots.
    ///
    /// `owner` names the benchmark in error messages.
    pub fn parse(owner: &str, raw: &str, max_slots: usize) -> Result<Self> {
        let invalid = |reason: String| DriverError::InvalidTemplate {
            benchmark: owner.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, chars.peek().copied()) {
                ('{', Some('{')) | ('}', Some('}')) => {
                    chars.next();
                    literal.push(c);
                }
                ('{', Some('}')) => {
                    chars.next();
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot);
                }
                ('{', _) => {
                    return Err(invalid(format!(
                        "only empty '{{}}' slots are supported in {:?}",
                        raw
                    )))
                }
                ('}', _) => return Err(invalid(format!("unmatched '}}' in {:?}", raw))),
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let template = Self {
            raw: raw.to_string(),
            segments,
        };
        if template.slot_count() > max_slots {
            return Err(invalid(format!(
                "{} slots in {:?}, at most {} allowed",
                template.slot_count(),
                raw,
                max_slots
            )));
        }
        Ok(template)
    }

    /// Number of `{}` slots
    pub fn slot_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Slot))
            .count()
    }

    /// The template text as configured
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Fill slots in order from `values`. Slots beyond `values` stay empty.
    pub fn render<D: fmt::Display>(&self, values: &[D]) -> String {
        let mut out = String::with_capacity(self.raw.len());
        let mut next = values.iter();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot => {
                    if let Some(v) = next.next() {
                        out.push_str(&v.to_string());
                    }
                }
            }
        }
        out
    }

    /// Render for a concrete core count: `P` and `P * 4`
    pub fn for_cores(&self, cores: usize) -> String {
        self.render(&[cores, cores * 4])
    }

    /// Render with `<P>` and `<P*4>` for CSV headers
    pub fn for_header(&self) -> String {
        self.render(&HEADER_PLACEHOLDERS)
    }
}
