use ruleql::{FieldPath, IndexKey};

use crate::error::BuildError;
use crate::options::BuildOptions;
use crate::record::{FieldValue, Record, RecordSchema, Shape};
use crate::value::ValueType;

/// One hop along a resolved field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Record member by slot
    Member { slot: usize, name: &'static str },
    /// Dictionary entry
    Key(String),
    /// List element
    Position(usize),
    /// The record's default indexer
    Indexer(String),
}

/// What the path ends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaf {
    Scalar(ValueType),
    /// A list; the element type is what operators compare against
    Collection(ValueType),
}

/// A field path resolved against a record schema
#[derive(Debug, Clone)]
pub struct FieldAccessor {
    path: String,
    steps: Vec<Step>,
    leaf: Leaf,
    nullable: bool,
}

fn unknown(path: &str, reason: impl Into<String>) -> BuildError { BuildError::UnknownField { path: path.to_string(), reason: reason.into() } }

/// Strip nullable wrappers, remembering that we saw one
fn unwrap_nullable(mut shape: Shape, nullable: &mut bool) -> Shape {
    while let Shape::Nullable(inner) = shape {
        *nullable = true;
        shape = *inner;
    }
    shape
}

impl FieldAccessor {
    pub fn resolve(path: &str, schema: &'static RecordSchema, options: &BuildOptions) -> Result<Self, BuildError> {
        let mut nullable = false;
        let mut steps = Vec::new();

        let shape = if options.use_indexed_property {
            let indexer = schema
                .indexer()
                .filter(|indexer| indexer.name.eq_ignore_ascii_case(&options.indexed_property_name))
                .ok_or_else(|| unknown(path, format!("{} has no indexer named '{}'", schema.name(), options.indexed_property_name)))?;
            nullable = true;
            steps.push(Step::Indexer(path.to_string()));
            indexer.shape.clone()
        } else {
            let parsed = FieldPath::parse(path)?;
            let mut current: Option<Shape> = None;
            for segment in &parsed.segments {
                let record = match current.take() {
                    None => schema,
                    Some(shape) => match unwrap_nullable(shape, &mut nullable) {
                        Shape::Record(nested) => nested(),
                        other => return Err(unknown(path, format!("cannot read '{}' from a {}", segment.name, other))),
                    },
                };
                let slot = record.slot(&segment.name).ok_or_else(|| unknown(path, format!("{} has no member '{}'", record.name(), segment.name)))?;
                let member = &record.fields()[slot];
                steps.push(Step::Member { slot, name: member.name });

                let mut shape = member.shape.clone();
                if let Some(key) = &segment.index {
                    shape = match (unwrap_nullable(shape, &mut nullable), key) {
                        (Shape::Map(inner), IndexKey::Text(key)) => {
                            nullable = true;
                            steps.push(Step::Key(key.clone()));
                            *inner
                        }
                        (Shape::Map(inner), IndexKey::Position(n)) => {
                            nullable = true;
                            steps.push(Step::Key(n.to_string()));
                            *inner
                        }
                        (Shape::List(inner), IndexKey::Position(n)) => {
                            nullable = true;
                            steps.push(Step::Position(*n));
                            *inner
                        }
                        (Shape::Record(nested), key) => {
                            let nested = nested();
                            let indexer = nested.indexer().ok_or_else(|| unknown(path, format!("{} has no indexer", nested.name())))?;
                            nullable = true;
                            steps.push(Step::Indexer(match key {
                                IndexKey::Text(key) => key.clone(),
                                IndexKey::Position(n) => n.to_string(),
                            }));
                            indexer.shape.clone()
                        }
                        (other, _) => return Err(unknown(path, format!("'{}' is a {} and cannot be indexed that way", segment.name, other))),
                    };
                }
                current = Some(shape);
            }
            current.ok_or_else(|| unknown(path, "empty path"))?
        };

        let leaf = match unwrap_nullable(shape, &mut nullable) {
            Shape::Scalar(value_type) => Leaf::Scalar(value_type),
            Shape::List(element) => match unwrap_nullable(*element, &mut false) {
                Shape::Scalar(value_type) => Leaf::Collection(value_type),
                other => return Err(unknown(path, format!("lists of {} are not filterable", other))),
            },
            other => return Err(unknown(path, format!("resolves to a {}, not a value", other))),
        };

        Ok(Self { path: path.to_string(), steps, leaf, nullable })
    }

    pub fn path(&self) -> &str { &self.path }
    pub fn steps(&self) -> &[Step] { &self.steps }
    pub fn leaf(&self) -> Leaf { self.leaf }

    /// Whether the leaf can be null: an `Option` anywhere along the path, or any key, position or indexer lookup
    pub fn is_nullable(&self) -> bool { self.nullable }

    /// Member name when the path is a single plain member
    pub fn column(&self) -> Option<&'static str> {
        match self.steps.as_slice() {
            [Step::Member { name, .. }] => Some(*name),
            _ => None,
        }
    }

    /// Number of record members traversed
    pub fn depth(&self) -> usize { self.steps.iter().filter(|step| matches!(step, Step::Member { .. })).count() }

    /// Whether any hop is a key, position or indexer lookup
    pub fn has_lookup(&self) -> bool { self.steps.iter().any(|step| !matches!(step, Step::Member { .. })) }

    /// Read the leaf. Nulls and missing entries along the way yield [`FieldValue::Null`].
    pub fn read<'a>(&self, record: &'a dyn Record) -> FieldValue<'a> {
        let mut current = FieldValue::Record(record);
        for step in &self.steps {
            current = match (current, step) {
                (FieldValue::Record(record), Step::Member { slot, .. }) => record.field(*slot),
                (FieldValue::Record(record), Step::Indexer(key)) => record.index(key),
                (FieldValue::Map(map), Step::Key(key)) => map.lookup(key),
                (FieldValue::List(items), Step::Position(n)) => items.into_iter().nth(*n).unwrap_or(FieldValue::Null),
                _ => return FieldValue::Null,
            };
        }
        current
    }
}
