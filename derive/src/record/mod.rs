mod description;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use description::RecordDescription;

pub fn derive_record_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let record = match RecordDescription::parse(&input) {
        Ok(record) => record,
        Err(e) => return e.into_compile_error().into(),
    };
    record_impl(&record).into()
}

fn record_impl(record: &RecordDescription) -> proc_macro2::TokenStream {
    let ident = record.ident();
    let name = record.name();
    let member_names = record.members().iter().map(|m| &m.name);
    let member_types = record.members().iter().map(|m| &m.ty);
    let member_idents = record.members().iter().map(|m| &m.ident);
    let slots = 0..record.members().len();

    let (with_indexer, index_fn) = match record.indexer() {
        Some(indexer) => {
            let (indexer_name, indexer_ident, indexer_ty) = (&indexer.name, &indexer.ident, &indexer.ty);
            (
                quote! { .with_indexer(#indexer_name, <#indexer_ty as ::ruleql_core::Field>::shape().into_element()) },
                quote! {
                    fn index(&self, key: &str) -> ::ruleql_core::FieldValue<'_> {
                        ::ruleql_core::Lookup::lookup(&self.#indexer_ident, key)
                    }
                },
            )
        }
        None => (quote! {}, quote! {}),
    };

    quote! {
        impl ::ruleql_core::Record for #ident {
            fn schema() -> &'static ::ruleql_core::RecordSchema {
                static SCHEMA: ::std::sync::OnceLock<::ruleql_core::RecordSchema> = ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    ::ruleql_core::RecordSchema::new(#name, ::std::vec![
                        #( ::ruleql_core::FieldSchema::new(#member_names, <#member_types as ::ruleql_core::Field>::shape()), )*
                    ])
                    #with_indexer
                })
            }

            fn field(&self, slot: usize) -> ::ruleql_core::FieldValue<'_> {
                match slot {
                    #( #slots => ::ruleql_core::Field::read(&self.#member_idents), )*
                    _ => ::ruleql_core::FieldValue::Null,
                }
            }

            #index_fn
        }

        impl ::ruleql_core::Field for #ident {
            fn shape() -> ::ruleql_core::Shape { ::ruleql_core::Shape::Record(<#ident as ::ruleql_core::Record>::schema) }
            fn read(&self) -> ::ruleql_core::FieldValue<'_> { ::ruleql_core::FieldValue::Record(self) }
        }
    }
}
