/// Options of a field-level `#[query(...)]` attribute.
#[derive(Debug, Default)]
pub(crate) struct QueryOptions {
    pub(crate) sort: bool,
    pub(crate) filter: bool,
    pub(crate) split: bool,
    pub(crate) detailed: bool,
    pub(crate) param: Option<String>,
    pub(crate) flatten: bool,
}

impl QueryOptions {
    /// The capability tag value, in the runtime's comma-separated form.
    pub(crate) fn tag_value(&self) -> String {
        let mut options = Vec::new();
        for (enabled, name) in [
            (self.sort, "sort"),
            (self.filter, "filter"),
            (self.split, "split"),
            (self.detailed, "detailed"),
        ] {
            if enabled {
                options.push(name.to_string());
            }
        }
        if let Some(param) = &self.param {
            options.push(format!("param={param}"));
        }
        options.join(",")
    }
}

/// Everything the derive knows about one field.
pub(crate) struct FieldAttrs {
    pub(crate) query: QueryOptions,
    /// `;`-separated storage options, e.g. `-` or `foreignkey:OwnerID`.
    pub(crate) storage: Vec<String>,
    /// Raw tags from `#[tags(name = "...")]`.
    pub(crate) tags: Vec<(String, String)>,
}

impl FieldAttrs {
    /// True when any tag enables filtering, so the field's type must describe
    /// itself through `QueryValue`.
    pub(crate) fn is_filterable(&self) -> bool {
        self.query.filter
            || self
                .tags
                .iter()
                .any(|(_, value)| value.split(',').any(|option| option.trim() == "filter"))
    }
}

/// Struct-level `#[query(...)]` options.
#[derive(Default)]
pub(crate) struct ModelAttrs {
    pub(crate) search: Option<syn::Path>,
}
