//! The normalized rule tree: groups of conditions joined by a conjunction.
//!
//! Wire shapes (see [`crate::wire`]) are normalized into these types before compilation, so everything downstream
//! works with closed enums instead of strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RuleError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuleNode {
    Group(Group),
    Condition(Condition),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub conjunction: Conjunction,
    pub children: Vec<RuleNode>,
}

/// A single field test as produced by the filter-builder widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Widget filter id, kept for diagnostics only
    pub id: Option<String>,
    /// Field path, e.g. `Name`, `Address.City` or `Data["key"].Value`
    pub field: String,
    pub type_tag: TypeTag,
    pub operator: Operator,
    /// Raw values exactly as the widget sent them; parsed later against `type_tag`
    pub values: Vec<String>,
    /// Widget input hint (`text`, `select`, ...). Informational.
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conjunction {
    And,
    Or,
}

/// Declared semantic type of a condition's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    String,
    Integer,
    Double,
    Boolean,
    Date,
    DateTime,
    Guid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    NotEqual,
    In,
    NotIn,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Between,
    NotBetween,
    Contains,
    NotContains,
    BeginsWith,
    NotBeginsWith,
    EndsWith,
    NotEndsWith,
    IsNull,
    IsNotNull,
    IsEmpty,
    IsNotEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorFamily {
    Equality,
    Range,
    Membership,
    Text,
    Nullability,
    Emptiness,
}

/// How many raw values an operator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// No values; blank placeholders sent by the widget are ignored
    Nullary,
    Unary,
    Binary,
    /// One or more
    Variadic,
}

impl RuleNode {
    pub fn and(children: Vec<RuleNode>) -> Self { RuleNode::Group(Group { conjunction: Conjunction::And, children }) }
    pub fn or(children: Vec<RuleNode>) -> Self { RuleNode::Group(Group { conjunction: Conjunction::Or, children }) }

    /// Shorthand for building a condition in code, mostly useful in tests.
    pub fn condition(field: impl Into<String>, type_tag: TypeTag, operator: Operator, values: &[&str]) -> Self {
        RuleNode::Condition(Condition {
            id: None,
            field: field.into(),
            type_tag,
            operator,
            values: values.iter().map(|v| v.to_string()).collect(),
            input: None,
        })
    }

    /// Number of conditions in the tree
    pub fn condition_count(&self) -> usize {
        match self {
            RuleNode::Condition(_) => 1,
            RuleNode::Group(group) => group.children.iter().map(RuleNode::condition_count).sum(),
        }
    }
}

impl Conjunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conjunction::And => "and",
            Conjunction::Or => "or",
        }
    }
}

impl FromStr for Conjunction {
    type Err = RuleError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("and") {
            Ok(Conjunction::And)
        } else if s.eq_ignore_ascii_case("or") {
            Ok(Conjunction::Or)
        } else {
            Err(RuleError::InvalidGroup(format!("unrecognized conjunction '{}'", s)))
        }
    }
}

impl TypeTag {
    pub const ALL: [TypeTag; 7] =
        [TypeTag::String, TypeTag::Integer, TypeTag::Double, TypeTag::Boolean, TypeTag::Date, TypeTag::DateTime, TypeTag::Guid];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Integer => "integer",
            TypeTag::Double => "double",
            TypeTag::Boolean => "boolean",
            TypeTag::Date => "date",
            TypeTag::DateTime => "datetime",
            TypeTag::Guid => "guid",
        }
    }

    /// Whether the type has a meaningful ordering for range operators
    pub fn is_ordered(&self) -> bool { matches!(self, TypeTag::Integer | TypeTag::Double | TypeTag::Date | TypeTag::DateTime) }
}

impl FromStr for TypeTag {
    type Err = RuleError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(s)).ok_or_else(|| RuleError::UnknownType(s.to_string()))
    }
}

impl Operator {
    pub const ALL: [Operator; 20] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::In,
        Operator::NotIn,
        Operator::Less,
        Operator::LessOrEqual,
        Operator::Greater,
        Operator::GreaterOrEqual,
        Operator::Between,
        Operator::NotBetween,
        Operator::Contains,
        Operator::NotContains,
        Operator::BeginsWith,
        Operator::NotBeginsWith,
        Operator::EndsWith,
        Operator::NotEndsWith,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "equal",
            Operator::NotEqual => "not_equal",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Less => "less",
            Operator::LessOrEqual => "less_or_equal",
            Operator::Greater => "greater",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::Between => "between",
            Operator::NotBetween => "not_between",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::BeginsWith => "begins_with",
            Operator::NotBeginsWith => "not_begins_with",
            Operator::EndsWith => "ends_with",
            Operator::NotEndsWith => "not_ends_with",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
        }
    }

    pub fn family(&self) -> OperatorFamily {
        match self {
            Operator::Equal | Operator::NotEqual => OperatorFamily::Equality,
            Operator::In | Operator::NotIn => OperatorFamily::Membership,
            Operator::Less
            | Operator::LessOrEqual
            | Operator::Greater
            | Operator::GreaterOrEqual
            | Operator::Between
            | Operator::NotBetween => OperatorFamily::Range,
            Operator::Contains
            | Operator::NotContains
            | Operator::BeginsWith
            | Operator::NotBeginsWith
            | Operator::EndsWith
            | Operator::NotEndsWith => OperatorFamily::Text,
            Operator::IsNull | Operator::IsNotNull => OperatorFamily::Nullability,
            Operator::IsEmpty | Operator::IsNotEmpty => OperatorFamily::Emptiness,
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::IsNull | Operator::IsNotNull | Operator::IsEmpty | Operator::IsNotEmpty => Arity::Nullary,
            Operator::Between | Operator::NotBetween => Arity::Binary,
            Operator::In | Operator::NotIn => Arity::Variadic,
            _ => Arity::Unary,
        }
    }

    /// Splits a `not_*` operator into its positive partner and a negation flag.
    ///
    /// Every negated operator is the exact complement of its partner, so the builder only implements positives.
    pub fn positive(&self) -> (Operator, bool) {
        match self {
            Operator::NotEqual => (Operator::Equal, true),
            Operator::NotIn => (Operator::In, true),
            Operator::NotBetween => (Operator::Between, true),
            Operator::NotContains => (Operator::Contains, true),
            Operator::NotBeginsWith => (Operator::BeginsWith, true),
            Operator::NotEndsWith => (Operator::EndsWith, true),
            Operator::IsNotNull => (Operator::IsNull, true),
            Operator::IsNotEmpty => (Operator::IsEmpty, true),
            other => (*other, false),
        }
    }
}

impl FromStr for Operator {
    type Err = RuleError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL.into_iter().find(|o| o.as_str().eq_ignore_ascii_case(s)).ok_or_else(|| RuleError::UnsupportedOperator(s.to_string()))
    }
}

impl Arity {
    /// Whether `count` non-blank values satisfy this arity
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Nullary => count == 0,
            Arity::Unary => count == 1,
            Arity::Binary => count == 2,
            Arity::Variadic => count >= 1,
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Nullary => write!(f, "no values"),
            Arity::Unary => write!(f, "exactly 1 value"),
            Arity::Binary => write!(f, "exactly 2 values"),
            Arity::Variadic => write!(f, "at least 1 value"),
        }
    }
}
