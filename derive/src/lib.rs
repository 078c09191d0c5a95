mod record;

use proc_macro::TokenStream;

/// Implement `ruleql_core::Record` and `ruleql_core::Field` for a struct with named fields.
///
/// Container attributes: `#[record(name = "...")]`, `#[record(rename_all = "PascalCase" | "camelCase" | "snake_case")]`.
/// Field attributes: `#[record(rename = "...")]`, `#[record(skip)]`, and `#[record(indexer)]` /
/// `#[record(indexer = "Item")]` to expose a map member as the record's default indexer.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream { record::derive_record_impl(input) }
