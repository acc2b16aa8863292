use bson::{Bson, Document};

use crate::expression::Expression;

/// Evaluate whether a document matches the given expression.
///
/// Values compare by BSON type and content: `"45"` never equals `45`, and an
/// `Int32` never equals an `Int64`.
pub fn matches(doc: &Document, expr: &Expression) -> bool {
    match expr {
        Expression::And(children) => children.iter().all(|child| matches(doc, child)),
        Expression::Or(children) => children.iter().any(|child| matches(doc, child)),
        Expression::Eq(field, val) => {
            // $eq: null matches both missing fields and explicit null values
            if std::matches!(val, Bson::Null) {
                return std::matches!(doc.get(field), None | Some(Bson::Null));
            }
            match doc.get(field) {
                Some(Bson::Array(arr)) => arr.contains(val),
                Some(v) => v == val,
                None => false,
            }
        }
        // $ne is the exact negation of $eq, so missing fields match
        Expression::Ne(field, val) => !matches(doc, &Expression::Eq(field.clone(), val.clone())),
        Expression::Regex(field, re) => match doc.get(field) {
            Some(Bson::String(s)) => re.is_match(s),
            Some(Bson::Array(arr)) => arr
                .iter()
                .any(|elem| std::matches!(elem, Bson::String(s) if re.is_match(s))),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_filter;
    use bson::doc;

    fn bulbasaur() -> Document {
        doc! {
            "dex_number": "#001",
            "name": "Bulbasaur",
            "type_01": "Grass",
            "type_02": "Poison",
            "is_legendary": "False",
            "hp": "45",
            "abilities": ["Overgrow", "Chlorophyll"],
        }
    }

    fn eval(filter: Document) -> bool {
        matches(&bulbasaur(), &parse_filter(&filter).unwrap())
    }

    #[test]
    fn eq_on_string_field() {
        assert!(eval(doc! { "is_legendary": "False" }));
        assert!(!eval(doc! { "is_legendary": "True" }));
    }

    #[test]
    fn case_insensitive_regex_substring() {
        assert!(eval(doc! { "name": { "$regex": "SAUR", "$options": "i" } }));
        assert!(!eval(doc! { "name": { "$regex": "SAUR" } }));
    }

    #[test]
    fn anchored_regex_requires_full_match() {
        assert!(eval(doc! { "type_01": { "$regex": "^grass$", "$options": "i" } }));
        assert!(!eval(doc! { "type_01": { "$regex": "^gras$", "$options": "i" } }));
    }

    #[test]
    fn or_matches_when_any_branch_matches() {
        assert!(eval(doc! { "$or": [{ "type_01": "Poison" }, { "type_02": "Poison" }] }));
        assert!(!eval(doc! { "$or": [{ "type_01": "Fire" }, { "type_02": "Fire" }] }));
    }

    #[test]
    fn ne_matches_missing_and_different_values() {
        assert!(eval(doc! { "type_02": { "$ne": "" } }));
        assert!(eval(doc! { "egg_group": { "$ne": "" } }));
        assert!(!eval(doc! { "type_02": { "$ne": "Poison" } }));
    }

    #[test]
    fn string_number_is_not_coerced() {
        assert!(eval(doc! { "hp": "45" }));
        assert!(!eval(doc! { "hp": 45_i32 }));
    }

    #[test]
    fn null_matches_missing_field() {
        assert!(eval(doc! { "bio": Bson::Null }));
        assert!(!eval(doc! { "name": Bson::Null }));
    }

    #[test]
    fn array_field_matches_any_element() {
        assert!(eval(doc! { "abilities": "Chlorophyll" }));
        assert!(eval(doc! { "abilities": { "$regex": "^over", "$options": "i" } }));
        assert!(!eval(doc! { "abilities": "Blaze" }));
    }
}
