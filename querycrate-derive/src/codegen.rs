use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields};

use crate::attribute_parser::{parse_field_attrs, parse_model_attrs};

const QUERY_TAG: &str = "query";
const STORAGE_TAG: &str = "storage";

fn named_fields(input: &DeriveInput) -> syn::Result<&syn::punctuated::Punctuated<syn::Field, syn::token::Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(&named.named),
            _ => Err(syn::Error::new_spanned(
                input,
                "QueryModel only supports structs with named fields",
            )),
        },
        _ => Err(syn::Error::new_spanned(input, "QueryModel can only be derived for structs")),
    }
}

/// Builder expression describing one field.
fn field_spec(field: &syn::Field) -> syn::Result<TokenStream> {
    let attrs = parse_field_attrs(field)?;
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
    let name = ident.unraw().to_string();
    let ty = &field.ty;

    let spec = if attrs.query.flatten {
        quote! {
            ::querycrate::schema::FieldSpec::embedded(
                #name,
                <#ty as ::querycrate::schema::QueryModel>::query_schema().into_fields(),
            )
        }
    } else if attrs.is_filterable() {
        quote! { ::querycrate::schema::FieldSpec::of::<#ty>(#name) }
    } else {
        let type_name = quote!(#ty).to_string().replace(' ', "");
        quote! {
            ::querycrate::schema::FieldSpec::new(
                #name,
                ::querycrate::schema::ValueKind::Opaque(::std::string::String::from(#type_name)),
            )
        }
    };

    let mut tags = Vec::new();
    let query_tag = attrs.query.tag_value();
    if !query_tag.is_empty() {
        tags.push((QUERY_TAG.to_string(), query_tag));
    }
    if !attrs.storage.is_empty() {
        tags.push((STORAGE_TAG.to_string(), attrs.storage.join(";")));
    }
    // Raw tags come last so they can override the generated ones.
    tags.extend(attrs.tags);

    let tags = tags.iter().map(|(key, value)| quote! { .tag(#key, #value) });
    Ok(quote! { #spec #(#tags)* })
}

pub(crate) fn expand_query_model(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let model_name = name.to_string();
    let model = parse_model_attrs(&input.attrs)?;
    let fields = named_fields(input)?
        .iter()
        .map(field_spec)
        .collect::<syn::Result<Vec<_>>>()?;
    let search = model.search.map(|path| quote! { .with_search(#path) });
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::querycrate::schema::QueryModel for #name #ty_generics #where_clause {
            fn query_schema() -> ::querycrate::schema::ModelSchema {
                ::querycrate::schema::ModelSchema::new(#model_name)
                    #( .field(#fields) )*
                    #search
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand(input: &DeriveInput) -> String {
        expand_query_model(input).unwrap().to_string()
    }

    #[test]
    fn test_filterable_fields_use_query_value() {
        let input: DeriveInput = parse_quote! {
            struct Pet {
                #[query(sort, filter)]
                name: String,
                #[query(sort)]
                weight: f64,
            }
        };
        let out = expand(&input);
        assert!(out.contains("FieldSpec :: of :: < String > (\"name\")"), "{out}");
        assert!(out.contains(". tag (\"query\" , \"sort,filter\")"), "{out}");
        assert!(out.contains("ValueKind :: Opaque"), "{out}");
        assert!(out.contains("\"f64\""), "{out}");
    }

    #[test]
    fn test_raw_identifiers_are_unescaped() {
        let input: DeriveInput = parse_quote! {
            struct Pet {
                #[query(filter)]
                r#type: String,
            }
        };
        assert!(expand(&input).contains("(\"type\")"));
    }

    #[test]
    fn test_storage_and_flatten() {
        let input: DeriveInput = parse_quote! {
            #[query(search = pets::search)]
            struct Pet {
                #[storage(foreignkey = "OwnerID")]
                owner: Owner,
                #[query(flatten)]
                audit: Audit,
            }
        };
        let out = expand(&input);
        assert!(out.contains(". tag (\"storage\" , \"foreignkey:OwnerID\")"), "{out}");
        assert!(out.contains("< Audit as :: querycrate :: schema :: QueryModel > :: query_schema ()"), "{out}");
        assert!(out.contains(". with_search (pets :: search)"), "{out}");
    }

    #[test]
    fn test_rejects_enums_and_tuple_structs() {
        let input: DeriveInput = parse_quote! { enum Kind { Dog, Cat } };
        assert!(expand_query_model(&input).is_err());

        let input: DeriveInput = parse_quote! { struct Pair(String, i32); };
        assert!(expand_query_model(&input).is_err());
    }
}
