use ruleql::{Arity, Condition, Operator, OperatorFamily, TypeTag};
use tracing::trace;

use super::{Check, Comparison, FieldPredicate, FieldTest, Operand, Predicate, Projection, Test, TextMatch};
use crate::accessor::{FieldAccessor, Leaf};
use crate::error::BuildError;
use crate::options::BuildOptions;
use crate::record::RecordSchema;
use crate::value::{coerce, ValueType};

/// Resolve the condition's field against `schema` and build its predicate
pub fn build_condition(condition: &Condition, schema: &'static RecordSchema, options: &BuildOptions) -> Result<Predicate, BuildError> {
    let accessor = FieldAccessor::resolve(&condition.field, schema, options)?;
    build(accessor, condition, options)
}

/// Build the predicate for one condition over an already resolved accessor.
///
/// Negated operators compile to `Not(positive)`, so a null member fails `equal` and passes `not_equal`.
pub fn build(accessor: FieldAccessor, condition: &Condition, options: &BuildOptions) -> Result<Predicate, BuildError> {
    let values = effective_values(condition)?;
    let (operator, negated) = condition.operator.positive();

    let test = match operator.family() {
        OperatorFamily::Nullability => null_test(&accessor),
        OperatorFamily::Emptiness => empty_test(&accessor, condition)?,
        _ => match accessor.leaf() {
            Leaf::Scalar(value_type) => FieldTest::Value(value_test(operator, condition, value_type, &values, options)?),
            Leaf::Collection(element) => FieldTest::AnyElement(value_test(operator, condition, element, &values, options)?),
        },
    };

    trace!(field = %condition.field, operator = %condition.operator, type_tag = %condition.type_tag, "built condition");
    let predicate = Predicate::Field(FieldPredicate { accessor, test });
    Ok(if negated { !predicate } else { predicate })
}

/// Values after the arity check. Null and empty checks ignore the blank placeholders the widget sends.
fn effective_values(condition: &Condition) -> Result<Vec<&str>, BuildError> {
    let arity = condition.operator.arity();
    let values: Vec<&str> = match arity {
        Arity::Nullary => condition.values.iter().map(String::as_str).filter(|v| !v.trim().is_empty()).collect(),
        _ => condition.values.iter().map(String::as_str).collect(),
    };
    if !arity.accepts(values.len()) {
        return Err(BuildError::Arity { field: condition.field.clone(), operator: condition.operator, expected: arity, found: values.len() });
    }
    Ok(values)
}

fn null_test(accessor: &FieldAccessor) -> FieldTest {
    match accessor.leaf() {
        Leaf::Scalar(value_type) if !accessor.is_nullable() => FieldTest::IsDefault(value_type.default_value()),
        _ => FieldTest::IsNull,
    }
}

fn empty_test(accessor: &FieldAccessor, condition: &Condition) -> Result<FieldTest, BuildError> {
    match accessor.leaf() {
        Leaf::Collection(_) | Leaf::Scalar(ValueType::String) => Ok(FieldTest::IsEmpty),
        Leaf::Scalar(other) => Err(unsupported(condition, format!("'{}' is a {} field, not a string or collection", condition.field, other))),
    }
}

fn unsupported(condition: &Condition, reason: String) -> BuildError {
    BuildError::UnsupportedOperator { operator: condition.operator.to_string(), reason }
}

fn value_test(
    operator: Operator,
    condition: &Condition,
    value_type: ValueType,
    values: &[&str],
    options: &BuildOptions,
) -> Result<Test, BuildError> {
    let type_tag = condition.type_tag;
    let mismatch = || BuildError::TypeMismatch { field: condition.field.clone(), type_tag, actual: value_type };

    match operator.family() {
        OperatorFamily::Range if !type_tag.is_ordered() => {
            return Err(unsupported(condition, format!("{} values have no ordering", type_tag)));
        }
        OperatorFamily::Text => {
            if !matches!(type_tag, TypeTag::String | TypeTag::Guid) {
                return Err(unsupported(condition, format!("text matching is not defined for {} values", type_tag)));
            }
            if !matches!(value_type, ValueType::String | ValueType::Uuid) {
                return Err(mismatch());
            }
            let text_match = match operator {
                Operator::BeginsWith => TextMatch::BeginsWith,
                Operator::EndsWith => TextMatch::EndsWith,
                _ => TextMatch::Contains,
            };
            return Ok(Test { projection: Projection::Text, check: Check::Text(text_match, values[0].to_lowercase()) });
        }
        _ => {}
    }

    let projection = projection_for(type_tag, value_type).ok_or_else(mismatch)?;
    let operands = values
        .iter()
        .map(|raw| {
            let value = coerce(raw, type_tag, options.date_mode).map_err(|e| BuildError::InvalidValue {
                field: condition.field.clone(),
                value: e.value,
                type_tag,
            })?;
            projection.project(&value).ok_or_else(mismatch)
        })
        .collect::<Result<Vec<Operand>, BuildError>>()?;

    Ok(Test { projection, check: value_check(operator, condition, operands)? })
}

/// Shape coerced operands into a check. Operand counts are matched here rather than trusted from the arity check.
fn value_check(operator: Operator, condition: &Condition, operands: Vec<Operand>) -> Result<Check, BuildError> {
    Ok(match (operator, operands.as_slice()) {
        (Operator::Between, [low, high]) => Check::Between(low.clone(), high.clone()),
        (Operator::In, all @ [_, ..]) => Check::In(all.to_vec()),
        (operator, [operand]) => match comparison(operator) {
            Some(comparison) => Check::Compare(comparison, operand.clone()),
            None => return Err(unsupported(condition, format!("'{}' does not compare values", operator))),
        },
        (_, found) => {
            let operator = condition.operator;
            return Err(BuildError::Arity { field: condition.field.clone(), operator, expected: operator.arity(), found: found.len() });
        }
    })
}

fn comparison(operator: Operator) -> Option<Comparison> {
    Some(match operator {
        Operator::Equal => Comparison::Equal,
        Operator::Less => Comparison::Less,
        Operator::LessOrEqual => Comparison::LessOrEqual,
        Operator::Greater => Comparison::Greater,
        Operator::GreaterOrEqual => Comparison::GreaterOrEqual,
        _ => return None,
    })
}

/// Comparison domain for a declared type against the member's actual type
fn projection_for(type_tag: TypeTag, value_type: ValueType) -> Option<Projection> {
    Some(match (type_tag, value_type) {
        (TypeTag::String, ValueType::String | ValueType::Uuid) => Projection::Text,
        (TypeTag::Integer, ValueType::I64) => Projection::Integer,
        (TypeTag::Integer | TypeTag::Double, ValueType::F64) | (TypeTag::Double, ValueType::I64) => Projection::Float,
        (TypeTag::Boolean, ValueType::Bool) => Projection::Boolean,
        (TypeTag::Date, ValueType::DateTime) => Projection::Day,
        (TypeTag::DateTime, ValueType::DateTime) => Projection::DateTime,
        (TypeTag::Guid, ValueType::Uuid) => Projection::Uuid,
        (TypeTag::Guid, ValueType::String) => Projection::Text,
        _ => return None,
    })
}
