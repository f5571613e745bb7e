use syn::parse::Parser;
use syn::{Lit, Meta, MetaNameValue, punctuated::Punctuated, token::Comma};

use crate::structs::{FieldAttrs, ModelAttrs, QueryOptions};

/// Items of a list attribute such as `#[query(sort, filter)]`.
fn parse_list(attr: &syn::Attribute) -> syn::Result<Punctuated<Meta, Comma>> {
    match &attr.meta {
        Meta::List(meta_list) => Punctuated::<Meta, Comma>::parse_terminated.parse2(meta_list.tokens.clone()),
        meta => Err(syn::Error::new_spanned(
            meta,
            format!("expected a list, e.g. #[{}(...)]", meta.path().get_ident().map_or_else(String::new, ToString::to_string)),
        )),
    }
}

fn lit_str(nv: &MetaNameValue) -> syn::Result<String> {
    if let syn::Expr::Lit(expr_lit) = &nv.value
        && let Lit::Str(s) = &expr_lit.lit
    {
        Ok(s.value())
    } else {
        Err(syn::Error::new_spanned(&nv.value, "expected a string literal"))
    }
}

fn ident_name(path: &syn::Path) -> syn::Result<String> {
    path.get_ident()
        .map(ToString::to_string)
        .ok_or_else(|| syn::Error::new_spanned(path, "expected an identifier"))
}

/// Parses struct-level `#[query(search = path::to::fn)]`.
pub(crate) fn parse_model_attrs(attrs: &[syn::Attribute]) -> syn::Result<ModelAttrs> {
    let mut model = ModelAttrs::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("query")) {
        for item in parse_list(attr)? {
            match item {
                Meta::NameValue(nv) if nv.path.is_ident("search") => match &nv.value {
                    syn::Expr::Path(expr_path) => model.search = Some(expr_path.path.clone()),
                    syn::Expr::Lit(_) => {
                        model.search = Some(syn::parse_str(&lit_str(&nv)?).map_err(|e| {
                            syn::Error::new_spanned(&nv.value, format!("invalid search function path: {e}"))
                        })?);
                    }
                    other => return Err(syn::Error::new_spanned(other, "expected a function path")),
                },
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "unknown model option, expected `search = path::to::fn`",
                    ));
                }
            }
        }
    }
    Ok(model)
}

fn parse_query_options(attr: &syn::Attribute, options: &mut QueryOptions) -> syn::Result<()> {
    for item in parse_list(attr)? {
        match &item {
            Meta::Path(path) => match ident_name(path)?.as_str() {
                "sort" => options.sort = true,
                "filter" => options.filter = true,
                "split" => options.split = true,
                "detailed" => options.detailed = true,
                "flatten" => options.flatten = true,
                _ => {
                    return Err(syn::Error::new_spanned(
                        path,
                        "unknown query option, expected one of: sort, filter, split, detailed, param, flatten",
                    ));
                }
            },
            Meta::NameValue(nv) if nv.path.is_ident("param") => {
                let param = lit_str(nv)?;
                if param.is_empty() {
                    return Err(syn::Error::new_spanned(&nv.value, "param must not be empty"));
                }
                options.param = Some(param);
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "unknown query option, expected one of: sort, filter, split, detailed, param, flatten",
                ));
            }
        }
    }
    Ok(())
}

/// `ignore` becomes `-`, `key = "value"` becomes `key:value`, any other flag
/// is kept as is.
fn parse_storage_options(attr: &syn::Attribute, storage: &mut Vec<String>) -> syn::Result<()> {
    for item in parse_list(attr)? {
        match &item {
            Meta::Path(path) if path.is_ident("ignore") => storage.push("-".to_string()),
            Meta::Path(path) => storage.push(ident_name(path)?),
            Meta::NameValue(nv) => storage.push(format!("{}:{}", ident_name(&nv.path)?, lit_str(nv)?)),
            Meta::List(list) => {
                return Err(syn::Error::new_spanned(list, "nested lists are not supported in #[storage]"));
            }
        }
    }
    Ok(())
}

fn parse_raw_tags(attr: &syn::Attribute, tags: &mut Vec<(String, String)>) -> syn::Result<()> {
    for item in parse_list(attr)? {
        match &item {
            Meta::NameValue(nv) => tags.push((ident_name(&nv.path)?, lit_str(nv)?)),
            other => {
                return Err(syn::Error::new_spanned(other, "expected `tag_name = \"options\"`"));
            }
        }
    }
    Ok(())
}

/// Collects the `query`, `storage` and `tags` attributes of a field.
pub(crate) fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs {
        query: QueryOptions::default(),
        storage: Vec::new(),
        tags: Vec::new(),
    };
    for attr in &field.attrs {
        if attr.path().is_ident("query") {
            parse_query_options(attr, &mut attrs.query)?;
        } else if attr.path().is_ident("storage") {
            parse_storage_options(attr, &mut attrs.storage)?;
        } else if attr.path().is_ident("tags") {
            parse_raw_tags(attr, &mut attrs.tags)?;
        }
    }

    let query = &attrs.query;
    if query.flatten && (query.sort || query.filter || query.split || query.detailed || query.param.is_some()) {
        return Err(syn::Error::new_spanned(
            field,
            "`flatten` embeds another model's fields and cannot be combined with other query options",
        ));
    }
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_parse_query_options() {
        let field: syn::Field = parse_quote! {
            #[query(sort, filter, split, param = "tag_name")]
            tags: Vec<String>
        };
        let attrs = parse_field_attrs(&field).unwrap();
        assert_eq!(attrs.query.tag_value(), "sort,filter,split,param=tag_name");
        assert!(attrs.is_filterable());
    }

    #[test]
    fn test_multiple_query_attributes_merge() {
        let field: syn::Field = parse_quote! {
            #[query(sort)]
            #[query(detailed)]
            notes: String
        };
        let attrs = parse_field_attrs(&field).unwrap();
        assert_eq!(attrs.query.tag_value(), "sort,detailed");
        assert!(!attrs.is_filterable());
    }

    #[test]
    fn test_storage_options() {
        let field: syn::Field = parse_quote! {
            #[storage(ignore)]
            #[storage(foreignkey = "OwnerID", primary_key)]
            owner: String
        };
        let attrs = parse_field_attrs(&field).unwrap();
        assert_eq!(attrs.storage, ["-", "foreignkey:OwnerID", "primary_key"]);
    }

    #[test]
    fn test_raw_tags_can_enable_filtering() {
        let field: syn::Field = parse_quote! {
            #[tags(ormquery = "sort, filter")]
            name: String
        };
        let attrs = parse_field_attrs(&field).unwrap();
        assert_eq!(attrs.tags, [("ormquery".to_string(), "sort, filter".to_string())]);
        assert!(attrs.is_filterable());
    }

    #[test]
    fn test_unknown_query_option_is_an_error() {
        let field: syn::Field = parse_quote! {
            #[query(sortable)]
            name: String
        };
        let err = parse_field_attrs(&field).err().unwrap();
        assert!(err.to_string().starts_with("unknown query option"));
    }

    #[test]
    fn test_flatten_cannot_be_combined() {
        let field: syn::Field = parse_quote! {
            #[query(flatten, sort)]
            audit: Audit
        };
        assert!(parse_field_attrs(&field).is_err());
    }

    #[test]
    fn test_non_string_param_is_an_error() {
        let field: syn::Field = parse_quote! {
            #[query(filter, param = 3)]
            age: i32
        };
        let err = parse_field_attrs(&field).err().unwrap();
        assert_eq!(err.to_string(), "expected a string literal");
    }

    #[test]
    fn test_model_search_path() {
        let attrs: Vec<syn::Attribute> = vec![parse_quote!(#[query(search = crate::pets::search)])];
        let model = parse_model_attrs(&attrs).unwrap();
        let path = model.search.unwrap();
        assert_eq!(path.segments.last().unwrap().ident, "search");

        let attrs: Vec<syn::Attribute> = vec![parse_quote!(#[query(search = "pets::search")])];
        assert!(parse_model_attrs(&attrs).unwrap().search.is_some());

        let attrs: Vec<syn::Attribute> = vec![parse_quote!(#[query(sort)])];
        assert!(parse_model_attrs(&attrs).is_err());
    }
}
