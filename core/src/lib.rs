//! # RuleQL core
//!
//! Compiles [`ruleql`] rule trees (nested AND / OR groups of field conditions, as produced by query-builder widgets)
//! into [`Predicate`]s over typed records, and applies them to record sources.
//!
//! ```rust
//! # use ruleql_core::{BuildOptions, Record, RecordStreamExt};
//! # use ruleql_core::ruleql::FilterRule;
//! #[derive(Record)]
//! struct Album {
//!     name: String,
//!     year: Option<i32>,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rule: FilterRule = serde_json::from_str(
//!     r#"{"condition": "AND", "rules": [{"field": "year", "type": "integer", "operator": "greater", "value": ["2000"]}]}"#,
//! )?;
//! let albums = vec![Album { name: "Showbiz".into(), year: Some(1999) }, Album { name: "Absolution".into(), year: Some(2003) }];
//! let recent: Vec<Album> = albums.into_iter().filter_rule(rule.to_rule_node()?.as_ref(), &BuildOptions::default())?.collect();
//! assert_eq!(recent.len(), 1);
//! # Ok(())
//! # }
//! ```

extern crate self as ruleql_core;

pub mod accessor;
pub mod compile;
pub mod error;
pub mod options;
pub mod predicate;
pub mod query;
pub mod record;
pub mod sql;
pub mod value;

pub use compile::{compile, compile_for};
pub use error::{BuildError, ErrorKind};
pub use options::{BuildOptions, DateMode};
pub use predicate::{Constructs, Predicate};
pub use query::{apply, Filtered, FilteredStream, QuerySource, RecordStreamExt};
pub use record::{Field, FieldSchema, FieldValue, Lookup, Record, RecordSchema, Shape};
pub use value::{Value, ValueType};

pub use ruleql;

#[cfg(feature = "derive")]
pub use ruleql_derive::Record;
