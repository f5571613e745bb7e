use crate::schema::SearchFn;
use crate::value::Value;

/// Runs the model's search hook for every term and combines the results with
/// `operator`. Several terms are parenthesized as one group.
pub(crate) fn parse_search(terms: &[String], search: &SearchFn, operator: &str) -> (String, Vec<Value>) {
    let mut values = Vec::new();
    let mut expressions = Vec::with_capacity(terms.len());
    for term in terms {
        let (exp, term_values) = search(term);
        expressions.push(exp);
        values.extend(term_values);
    }

    let exp = expressions.join(&format!(" {operator} "));
    if terms.len() > 1 {
        (format!("({exp})"), values)
    } else {
        (exp, values)
    }
}
