mod attribute_parser;
mod codegen;
mod structs;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `querycrate::QueryModel`, describing the struct's fields to the
/// query builder.
///
/// ## Field attributes
///
/// - `#[query(sort, filter, split, detailed, param = "name")]`: capability
///   options stored under the `query` tag
/// - `#[query(flatten)]`: embeds the fields of another `QueryModel` in place
/// - `#[storage(ignore)]`, `#[storage(foreignkey = "OwnerID")]`: storage
///   options; `ignore` and relation keys mark fields that are not columns
/// - `#[tags(ormquery = "sort,filter")]`: raw tags under any name, for use
///   with a custom `Config::tag_name`
///
/// A filterable field's type must implement `querycrate::QueryValue`.
///
/// ## Struct attributes
///
/// - `#[query(search = path::to::fn)]`: free-text search hook with signature
///   `fn(&str) -> (String, Vec<querycrate::Value>)`
///
/// ```rust,ignore
/// use querycrate::{QueryModel, Value};
///
/// fn search(term: &str) -> (String, Vec<Value>) {
///     ("name LIKE ?".into(), vec![Value::String(format!("%{term}%"))])
/// }
///
/// #[derive(QueryModel)]
/// #[query(search = search)]
/// struct Pet {
///     #[query(sort, filter)]
///     name: String,
///     #[query(filter, param = "years")]
///     age: i32,
///     #[query(detailed)]
///     description: String,
///     #[storage(ignore)]
///     cached_score: i64,
/// }
/// ```
#[proc_macro_derive(QueryModel, attributes(query, storage, tags))]
pub fn derive_query_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    codegen::expand_query_model(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
