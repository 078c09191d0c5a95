use pest::iterators::Pair;
use pest::Parser;
use std::fmt;

use crate::error::RuleError;
use crate::grammar::{FieldPathParser, Rule};

/// A parsed field path such as `Data["myKey"].StringValue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub segments: Vec<Segment>,
}

/// One member access, optionally followed by a bracketed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub index: Option<IndexKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKey {
    /// `["key"]` or `['key']`
    Text(String),
    /// `[3]`
    Position(usize),
}

impl FieldPath {
    pub fn parse(input: &str) -> Result<Self, RuleError> {
        let invalid = |message: String| RuleError::InvalidPath { path: input.to_string(), message };

        let mut pairs = FieldPathParser::parse(Rule::Path, input).map_err(|e| invalid(e.variant.message().to_string()))?;
        let path = pairs.next().ok_or_else(|| invalid("empty path".to_string()))?;

        let mut segments = Vec::new();
        for pair in path.into_inner() {
            match pair.as_rule() {
                Rule::Segment => segments.push(parse_segment(pair).map_err(invalid)?),
                Rule::EOI => {}
                other => return Err(invalid(format!("unexpected {:?}", other))),
            }
        }
        Ok(FieldPath { segments })
    }

    /// Whether the path is a single plain member with no key
    pub fn is_simple(&self) -> bool { self.segments.len() == 1 && self.segments[0].index.is_none() }
}

fn parse_segment(pair: Pair<Rule>) -> Result<Segment, String> {
    let mut inner = pair.into_inner();
    let name = inner.next().ok_or("segment without a member name")?.as_str().to_string();
    let index = match inner.next() {
        None => None,
        Some(key) => Some(match key.as_rule() {
            Rule::DoubleQuotedKey | Rule::SingleQuotedKey => {
                let raw = key.into_inner().next().map(|p| p.as_str()).unwrap_or_default();
                IndexKey::Text(unescape(raw))
            }
            Rule::Position => IndexKey::Position(key.as_str().parse().map_err(|_| format!("position {} is out of range", key.as_str()))?),
            other => return Err(format!("unexpected {:?}", other)),
        }),
    };
    Ok(Segment { name, index })
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match &self.index {
            None => Ok(()),
            Some(IndexKey::Position(n)) => write!(f, "[{}]", n),
            Some(IndexKey::Text(key)) => write!(f, "[\"{}\"]", key.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }
}
