//! Rendering predicates as SQL `WHERE` bodies.
//!
//! Literals are inlined and escaped rather than bound, so the output can be logged or embedded as is. Only
//! single-member paths translate; each member is a column.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::accessor::{FieldAccessor, Leaf};
use crate::predicate::{Check, Constructs, FieldPredicate, FieldTest, Operand, Predicate, Projection, TextMatch};
use crate::value::ValueType;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SqlGenerationError {
    #[error("Unsupported in SQL: {0}")]
    Unsupported(&'static str),
}

impl Constructs {
    /// Everything [`generate_where`] can render
    pub const SQL: Constructs = Constructs::COMPARISON
        .union(Constructs::TEXT_MATCH)
        .union(Constructs::NULL_CHECK)
        .union(Constructs::EMPTINESS)
        .union(Constructs::NEGATION)
        .union(Constructs::DISJUNCTION);
}

pub fn generate_where(predicate: &Predicate) -> Result<String, SqlGenerationError> {
    let mut sql = Sql::new();
    sql.predicate(predicate)?;
    Ok(sql.finish())
}

#[derive(Default)]
struct Sql(String);

impl Sql {
    fn new() -> Self { Self::default() }
    fn sql(&mut self, s: impl AsRef<str>) { self.0.push_str(s.as_ref()); }
    fn finish(self) -> String { self.0 }

    fn predicate(&mut self, predicate: &Predicate) -> Result<(), SqlGenerationError> {
        match predicate {
            Predicate::True => self.sql("TRUE"),
            Predicate::False => self.sql("FALSE"),
            Predicate::And(children) if children.is_empty() => self.sql("TRUE"),
            Predicate::Or(children) if children.is_empty() => self.sql("FALSE"),
            Predicate::And(children) => self.joined(children, " AND ")?,
            Predicate::Or(children) => {
                self.sql("(");
                self.joined(children, " OR ")?;
                self.sql(")");
            }
            Predicate::Not(inner) => {
                self.sql("NOT (");
                self.predicate(inner)?;
                self.sql(")");
            }
            Predicate::Field(field) => self.field(field)?,
        }
        Ok(())
    }

    fn joined(&mut self, children: &[Predicate], separator: &str) -> Result<(), SqlGenerationError> {
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.sql(separator);
            }
            self.predicate(child)?;
        }
        Ok(())
    }

    fn field(&mut self, field: &FieldPredicate) -> Result<(), SqlGenerationError> {
        let column = column(&field.accessor)?;
        if matches!(field.accessor.leaf(), Leaf::Collection(_)) {
            return Err(SqlGenerationError::Unsupported("collection-valued members"));
        }
        match &field.test {
            FieldTest::IsNull => self.sql(format!("{} IS NULL", column)),
            FieldTest::IsEmpty if field.accessor.is_nullable() => self.sql(format!("({0} IS NOT NULL AND {0} = '')", column)),
            FieldTest::IsEmpty => self.sql(format!("{} = ''", column)),
            FieldTest::IsDefault(_) => return Err(SqlGenerationError::Unsupported("is_null on a non-nullable member")),
            FieldTest::Value(test) | FieldTest::AnyElement(test) => {
                // Comparisons against NULL are unknown, and NOT (unknown) would drop rows that should match
                let guarded = field.accessor.is_nullable();
                if guarded {
                    self.sql(format!("({} IS NOT NULL AND ", column));
                }
                let subject = match (test.projection, field.accessor.leaf()) {
                    (Projection::Text, Leaf::Scalar(ValueType::Uuid)) => format!("LOWER(CAST({} AS TEXT))", column),
                    (Projection::Text, _) => format!("LOWER({})", column),
                    (Projection::Day, _) => format!("CAST({} AS DATE)", column),
                    _ => column,
                };
                self.check(&subject, &test.check)?;
                if guarded {
                    self.sql(")");
                }
            }
        }
        Ok(())
    }

    fn check(&mut self, subject: &str, check: &Check) -> Result<(), SqlGenerationError> {
        match check {
            Check::Compare(comparison, operand) => self.sql(format!("{} {} {}", subject, comparison.as_str(), literal(operand)?)),
            Check::Between(low, high) => self.sql(format!("{} BETWEEN {} AND {}", subject, literal(low)?, literal(high)?)),
            Check::In(operands) => {
                let list = operands.iter().map(literal).collect::<Result<Vec<_>, _>>()?.join(", ");
                self.sql(format!("{} IN ({})", subject, list));
            }
            Check::Text(text_match, needle) => {
                let needle = escape_like(needle);
                let pattern = match text_match {
                    TextMatch::Contains => format!("%{}%", needle),
                    TextMatch::BeginsWith => format!("{}%", needle),
                    TextMatch::EndsWith => format!("%{}", needle),
                };
                self.sql(format!("{} LIKE {} ESCAPE '\\'", subject, quote(&pattern)));
            }
        }
        Ok(())
    }
}

fn column(accessor: &FieldAccessor) -> Result<String, SqlGenerationError> {
    let name = accessor.column().ok_or(SqlGenerationError::Unsupported("paths through nested records or lookups"))?;
    Ok(format!(r#""{}""#, name.replace('"', "\"\"")))
}

fn literal(operand: &Operand) -> Result<String, SqlGenerationError> {
    Ok(match operand {
        Operand::Text(s) => quote(s),
        Operand::Integer(n) => n.to_string(),
        Operand::Float(f) if !f.is_finite() => return Err(SqlGenerationError::Unsupported("non-finite float literals")),
        Operand::Float(f) => f.to_string(),
        Operand::Boolean(b) => b.to_string(),
        Operand::DateTime(d) => quote(&format_datetime(d)),
        Operand::Day(d) => quote(&d.format("%Y-%m-%d").to_string()),
        Operand::Uuid(u) => quote(&u.hyphenated().to_string()),
    })
}

fn format_datetime(d: &NaiveDateTime) -> String { d.format("%Y-%m-%d %H:%M:%S%.f").to_string() }

/// Single-quoted string literal. NUL bytes are dropped; quotes are doubled.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\0' => {}
            '\'' => out.push_str("''"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
