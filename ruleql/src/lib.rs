//! Rule trees as produced by web filter-builder widgets.
//!
//! [`wire`] accepts the two JSON shapes the widget emits and normalizes them into the [`ast::RuleNode`] tree.
//! [`path`] parses the field paths conditions refer to.

pub mod ast;
pub mod error;
mod grammar;
pub mod path;
pub mod wire;

pub use ast::{Arity, Condition, Conjunction, Group, Operator, OperatorFamily, RuleNode, TypeTag};
pub use error::RuleError;
pub use path::{FieldPath, IndexKey, Segment};
pub use wire::{FilterRule, JsonFilterRule};
