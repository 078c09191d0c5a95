//! Type descriptors for filterable records.
//!
//! Every record type exposes one `'static` [`RecordSchema`], built lazily the first time it is asked for. Accessors
//! resolve field paths against the schema once and keep slot indices, so reading a record never searches by name.
//! `#[derive(Record)]` generates the [`Record`] and [`Field`] impls for plain structs.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use uuid::Uuid;

use crate::value::{Value, ValueType};

pub trait Record {
    fn schema() -> &'static RecordSchema
    where Self: Sized;

    /// Read the member at `slot`, in schema order
    fn field(&self, slot: usize) -> FieldValue<'_>;

    /// Default indexer, `record[key]`. Only called when the schema declares one.
    fn index(&self, _key: &str) -> FieldValue<'_> { FieldValue::Null }
}

impl<R: Record> Record for &R {
    fn schema() -> &'static RecordSchema { R::schema() }
    fn field(&self, slot: usize) -> FieldValue<'_> { (**self).field(slot) }
    fn index(&self, key: &str) -> FieldValue<'_> { (**self).index(key) }
}

/// String-keyed lookups, i.e. dictionary members
pub trait Lookup {
    fn lookup(&self, key: &str) -> FieldValue<'_>;
}

/// A member type that can appear on a record
pub trait Field {
    fn shape() -> Shape
    where Self: Sized;
    fn read(&self) -> FieldValue<'_>;
}

/// A member value as seen by the predicate evaluator
#[derive(Clone)]
pub enum FieldValue<'a> {
    Null,
    Scalar(Value),
    List(Vec<FieldValue<'a>>),
    Map(&'a dyn Lookup),
    Record(&'a dyn Record),
}

/// Static shape of a member
#[derive(Debug, Clone)]
pub enum Shape {
    Scalar(ValueType),
    Nullable(Box<Shape>),
    List(Box<Shape>),
    Map(Box<Shape>),
    Record(fn() -> &'static RecordSchema),
}

#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub shape: Shape,
}

#[derive(Debug)]
pub struct RecordSchema {
    name: &'static str,
    fields: Vec<FieldSchema>,
    indexer: Option<FieldSchema>,
}

impl FieldSchema {
    pub fn new(name: &'static str, shape: Shape) -> Self { Self { name, shape } }
}

impl RecordSchema {
    pub fn new(name: &'static str, fields: Vec<FieldSchema>) -> Self { Self { name, fields, indexer: None } }

    /// Declare a default indexer `name` whose values have `shape`
    pub fn with_indexer(mut self, name: &'static str, shape: Shape) -> Self {
        self.indexer = Some(FieldSchema::new(name, shape));
        self
    }

    pub fn name(&self) -> &'static str { self.name }
    pub fn fields(&self) -> &[FieldSchema] { &self.fields }
    pub fn indexer(&self) -> Option<&FieldSchema> { self.indexer.as_ref() }

    /// Slot of the member called `name`: exact match first, then ASCII case-insensitive
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name).or_else(|| self.fields.iter().position(|f| f.name.eq_ignore_ascii_case(name)))
    }
}

impl Shape {
    /// Element shape of a map or list, used for indexers declared over a dictionary member
    pub fn into_element(self) -> Shape {
        match self {
            Shape::Map(inner) | Shape::List(inner) => *inner,
            Shape::Nullable(inner) => inner.into_element(),
            other => other,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar(value_type) => write!(f, "{}", value_type),
            Shape::Nullable(inner) => write!(f, "nullable {}", inner),
            Shape::List(inner) => write!(f, "list of {}", inner),
            Shape::Map(inner) => write!(f, "map of {}", inner),
            Shape::Record(schema) => write!(f, "record {}", schema().name()),
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "Null"),
            FieldValue::Scalar(value) => write!(f, "Scalar({:?})", value),
            FieldValue::List(items) => f.debug_tuple("List").field(items).finish(),
            FieldValue::Map(_) => write!(f, "Map(..)"),
            FieldValue::Record(_) => write!(f, "Record(..)"),
        }
    }
}

macro_rules! scalar_field {
    ($($ty:ty => $variant:ident(|$v:ident| $conv:expr)),* $(,)?) => {
        $(
            impl Field for $ty {
                fn shape() -> Shape { Shape::Scalar(ValueType::$variant) }
                fn read(&self) -> FieldValue<'_> {
                    let $v = self;
                    FieldValue::Scalar(Value::$variant($conv))
                }
            }
        )*
    };
}

scalar_field! {
    bool => Bool(|v| *v),
    i8 => I64(|v| i64::from(*v)),
    i16 => I64(|v| i64::from(*v)),
    i32 => I64(|v| i64::from(*v)),
    i64 => I64(|v| *v),
    u8 => I64(|v| i64::from(*v)),
    u16 => I64(|v| i64::from(*v)),
    u32 => I64(|v| i64::from(*v)),
    f32 => F64(|v| f64::from(*v)),
    f64 => F64(|v| *v),
    String => String(|v| v.clone()),
    NaiveDateTime => DateTime(|v| *v),
    NaiveDate => DateTime(|v| v.and_time(NaiveTime::MIN)),
    chrono::DateTime<Utc> => DateTime(|v| v.naive_utc()),
    Uuid => Uuid(|v| *v),
}

impl<T: Field> Field for Option<T> {
    fn shape() -> Shape { Shape::Nullable(Box::new(T::shape())) }
    fn read(&self) -> FieldValue<'_> {
        match self {
            Some(value) => value.read(),
            None => FieldValue::Null,
        }
    }
}

impl<T: Field> Field for Box<T> {
    fn shape() -> Shape { T::shape() }
    fn read(&self) -> FieldValue<'_> { (**self).read() }
}

impl<T: Field> Field for Vec<T> {
    fn shape() -> Shape { Shape::List(Box::new(T::shape())) }
    fn read(&self) -> FieldValue<'_> { FieldValue::List(self.iter().map(Field::read).collect()) }
}

impl<T: Field, S: BuildHasher> Field for HashMap<String, T, S> {
    fn shape() -> Shape { Shape::Map(Box::new(T::shape())) }
    fn read(&self) -> FieldValue<'_> { FieldValue::Map(self) }
}

impl<T: Field, S: BuildHasher> Lookup for HashMap<String, T, S> {
    fn lookup(&self, key: &str) -> FieldValue<'_> { self.get(key).map(Field::read).unwrap_or(FieldValue::Null) }
}

impl<T: Field> Field for BTreeMap<String, T> {
    fn shape() -> Shape { Shape::Map(Box::new(T::shape())) }
    fn read(&self) -> FieldValue<'_> { FieldValue::Map(self) }
}

impl<T: Field> Lookup for BTreeMap<String, T> {
    fn lookup(&self, key: &str) -> FieldValue<'_> { self.get(key).map(Field::read).unwrap_or(FieldValue::Null) }
}
