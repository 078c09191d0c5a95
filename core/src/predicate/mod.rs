//! Compiled predicates.
//!
//! A [`Predicate`] is an inspectable tree rather than a closure: the applier asks it which [`Constructs`] it uses to
//! decide whether a source can evaluate it natively, and [`crate::sql`] translates it. Evaluation against a record
//! is infallible and short-circuits left to right.

mod build;

pub use build::{build, build_condition};

use bitflags::bitflags;
use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

use crate::accessor::{FieldAccessor, Leaf};
use crate::record::{FieldValue, Record};
use crate::value::Value;

#[derive(Debug, Clone)]
pub enum Predicate {
    True,
    False,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    Field(FieldPredicate),
}

/// A test on the value a field path resolves to
#[derive(Debug, Clone)]
pub struct FieldPredicate {
    pub accessor: FieldAccessor,
    pub test: FieldTest,
}

#[derive(Debug, Clone)]
pub enum FieldTest {
    /// Test a scalar leaf
    Value(Test),
    /// True when some element of a collection leaf passes
    AnyElement(Test),
    IsNull,
    /// `is_null` on a non-nullable member: matches the type's zero value
    IsDefault(Value),
    /// Present and zero-length, for strings and collections
    IsEmpty,
}

/// Project a value into a comparison domain, then check it
#[derive(Debug, Clone)]
pub struct Test {
    pub projection: Projection,
    pub check: Check,
}

#[derive(Debug, Clone)]
pub enum Check {
    Compare(Comparison, Operand),
    /// Inclusive on both ends. Bounds are never swapped.
    Between(Operand, Operand),
    In(Vec<Operand>),
    /// The needle is already lowercased
    Text(TextMatch, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    Contains,
    BeginsWith,
    EndsWith,
}

/// Comparison domain both sides of a test are brought into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Lowercased text; uuids render as lowercase hyphenated text
    Text,
    Integer,
    /// Integers widen to floats
    Float,
    Boolean,
    DateTime,
    /// Date-times truncated to the calendar day
    Day,
    Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Day(NaiveDate),
    Uuid(Uuid),
}

bitflags! {
    /// Constructs a predicate relies on, and that a source may or may not evaluate natively
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Constructs: u32 {
        /// Equality, ordering, ranges and membership on scalars
        const COMPARISON       = 1 << 0;
        /// Case-insensitive contains / begins with / ends with
        const TEXT_MATCH       = 1 << 1;
        const NULL_CHECK       = 1 << 2;
        /// `is_null` degraded to a zero-value check on non-nullable members
        const DEFAULT_COALESCE = 1 << 3;
        const EMPTINESS        = 1 << 4;
        /// Tests over collection-valued members
        const COLLECTION       = 1 << 5;
        /// Paths through nested records
        const NAVIGATION       = 1 << 6;
        /// Dictionary, list-position or indexer lookups
        const LOOKUP           = 1 << 7;
        const NEGATION         = 1 << 8;
        const DISJUNCTION      = 1 << 9;
    }
}

impl Predicate {
    pub fn evaluate(&self, record: &dyn Record) -> bool {
        match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::And(children) => children.iter().all(|p| p.evaluate(record)),
            Predicate::Or(children) => children.iter().any(|p| p.evaluate(record)),
            Predicate::Not(inner) => !inner.evaluate(record),
            Predicate::Field(field) => field.evaluate(record),
        }
    }

    pub fn constructs(&self) -> Constructs {
        match self {
            Predicate::True | Predicate::False => Constructs::empty(),
            Predicate::And(children) => children.iter().fold(Constructs::empty(), |acc, p| acc | p.constructs()),
            Predicate::Or(children) => children.iter().fold(Constructs::DISJUNCTION, |acc, p| acc | p.constructs()),
            Predicate::Not(inner) => Constructs::NEGATION | inner.constructs(),
            Predicate::Field(field) => field.constructs(),
        }
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;
    fn not(self) -> Predicate { Predicate::Not(Box::new(self)) }
}

impl FieldPredicate {
    pub fn evaluate(&self, record: &dyn Record) -> bool {
        let value = self.accessor.read(record);
        match &self.test {
            FieldTest::Value(test) => match &value {
                FieldValue::Scalar(v) => test.matches(v),
                _ => false,
            },
            FieldTest::AnyElement(test) => match &value {
                FieldValue::List(items) => items.iter().any(|item| matches!(item, FieldValue::Scalar(v) if test.matches(v))),
                _ => false,
            },
            FieldTest::IsNull => matches!(value, FieldValue::Null),
            FieldTest::IsDefault(default) => matches!(&value, FieldValue::Scalar(v) if v == default),
            FieldTest::IsEmpty => match &value {
                FieldValue::Scalar(Value::String(s)) => s.is_empty(),
                FieldValue::List(items) => items.is_empty(),
                _ => false,
            },
        }
    }

    pub fn constructs(&self) -> Constructs {
        let mut constructs = match &self.test {
            FieldTest::Value(test) | FieldTest::AnyElement(test) => test.check.constructs(),
            FieldTest::IsNull => Constructs::NULL_CHECK,
            FieldTest::IsDefault(_) => Constructs::DEFAULT_COALESCE,
            FieldTest::IsEmpty => Constructs::EMPTINESS,
        };
        if matches!(self.accessor.leaf(), Leaf::Collection(_)) {
            constructs |= Constructs::COLLECTION;
        }
        if self.accessor.depth() > 1 {
            constructs |= Constructs::NAVIGATION;
        }
        if self.accessor.has_lookup() {
            constructs |= Constructs::LOOKUP;
        }
        constructs
    }
}

impl Test {
    pub fn matches(&self, value: &Value) -> bool {
        match self.projection.project(value) {
            Some(subject) => self.check.matches(&subject),
            None => false,
        }
    }
}

impl Check {
    pub fn matches(&self, subject: &Operand) -> bool {
        match self {
            Check::Compare(comparison, operand) => comparison.holds(subject.partial_cmp(operand)),
            Check::Between(low, high) => {
                Comparison::GreaterOrEqual.holds(subject.partial_cmp(low)) && Comparison::LessOrEqual.holds(subject.partial_cmp(high))
            }
            Check::In(operands) => operands.iter().any(|operand| subject == operand),
            Check::Text(text_match, needle) => match subject {
                Operand::Text(haystack) => match text_match {
                    TextMatch::Contains => haystack.contains(needle.as_str()),
                    TextMatch::BeginsWith => haystack.starts_with(needle.as_str()),
                    TextMatch::EndsWith => haystack.ends_with(needle.as_str()),
                },
                _ => false,
            },
        }
    }

    fn constructs(&self) -> Constructs {
        match self {
            Check::Text(..) => Constructs::TEXT_MATCH,
            _ => Constructs::COMPARISON,
        }
    }
}

impl Comparison {
    fn holds(&self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (_, None) => false,
            (Comparison::Equal, Some(o)) => o == Ordering::Equal,
            (Comparison::Less, Some(o)) => o == Ordering::Less,
            (Comparison::LessOrEqual, Some(o)) => o != Ordering::Greater,
            (Comparison::Greater, Some(o)) => o == Ordering::Greater,
            (Comparison::GreaterOrEqual, Some(o)) => o != Ordering::Less,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Equal => "=",
            Comparison::Less => "<",
            Comparison::LessOrEqual => "<=",
            Comparison::Greater => ">",
            Comparison::GreaterOrEqual => ">=",
        }
    }
}

impl Projection {
    pub fn project(&self, value: &Value) -> Option<Operand> {
        Some(match (self, value) {
            (Projection::Text, Value::String(s)) => Operand::Text(s.to_lowercase()),
            (Projection::Text, Value::Uuid(u)) => Operand::Text(u.hyphenated().to_string()),
            (Projection::Integer, Value::I64(n)) => Operand::Integer(*n),
            (Projection::Float, Value::F64(f)) => Operand::Float(*f),
            (Projection::Float, Value::I64(n)) => Operand::Float(*n as f64),
            (Projection::Boolean, Value::Bool(b)) => Operand::Boolean(*b),
            (Projection::DateTime, Value::DateTime(d)) => Operand::DateTime(*d),
            (Projection::Day, Value::DateTime(d)) => Operand::Day(d.date()),
            (Projection::Uuid, Value::Uuid(u)) => Operand::Uuid(*u),
            _ => return None,
        })
    }
}

impl PartialOrd for Operand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Operand::Text(a), Operand::Text(b)) => a.partial_cmp(b),
            (Operand::Integer(a), Operand::Integer(b)) => a.partial_cmp(b),
            (Operand::Float(a), Operand::Float(b)) => a.partial_cmp(b),
            (Operand::Boolean(a), Operand::Boolean(b)) => a.partial_cmp(b),
            (Operand::DateTime(a), Operand::DateTime(b)) => a.partial_cmp(b),
            (Operand::Day(a), Operand::Day(b)) => a.partial_cmp(b),
            (Operand::Uuid(a), Operand::Uuid(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Text(s) => write!(f, "{:?}", s),
            Operand::Integer(n) => write!(f, "{}", n),
            Operand::Float(n) => write!(f, "{:?}", n),
            Operand::Boolean(b) => write!(f, "{}", b),
            Operand::DateTime(d) => write!(f, "{}", d),
            Operand::Day(d) => write!(f, "{}", d),
            Operand::Uuid(u) => write!(f, "{}", u),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Predicate], separator: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", separator)?;
        }
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => write!(f, "TRUE"),
            Predicate::False => write!(f, "FALSE"),
            Predicate::And(children) => write_joined(f, children, "AND"),
            Predicate::Or(children) => write_joined(f, children, "OR"),
            Predicate::Not(inner) => write!(f, "NOT {}", inner),
            Predicate::Field(field) => write!(f, "{}", field),
        }
    }
}

impl fmt::Display for FieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.accessor.path();
        match &self.test {
            FieldTest::Value(test) => write!(f, "{} {}", path, test.check),
            FieldTest::AnyElement(test) => write!(f, "ANY {} {}", path, test.check),
            FieldTest::IsNull => write!(f, "{} IS NULL", path),
            FieldTest::IsDefault(default) => write!(f, "{} = {}", path, default),
            FieldTest::IsEmpty => write!(f, "{} IS EMPTY", path),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Compare(comparison, operand) => write!(f, "{} {}", comparison.as_str(), operand),
            Check::Between(low, high) => write!(f, "BETWEEN {} AND {}", low, high),
            Check::In(operands) => {
                write!(f, "IN (")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, ")")
            }
            Check::Text(TextMatch::Contains, needle) => write!(f, "CONTAINS {:?}", needle),
            Check::Text(TextMatch::BeginsWith, needle) => write!(f, "BEGINS WITH {:?}", needle),
            Check::Text(TextMatch::EndsWith, needle) => write!(f, "ENDS WITH {:?}", needle),
        }
    }
}
