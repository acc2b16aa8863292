use bson::{Document, doc};

use crate::fields;
use crate::identifier::DexNumber;

/// Optional search inputs of one request. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Free text matched against name and dex number.
    pub query: Option<String>,
    /// Type name matched against either type slot.
    pub type_name: Option<String>,
    /// `"true"` / `"false"`; any other value applies no constraint.
    pub legendary: Option<String>,
}

impl Criteria {
    pub fn new(
        query: Option<String>,
        type_name: Option<String>,
        legendary: Option<String>,
    ) -> Self {
        Self {
            query,
            type_name,
            legendary,
        }
    }

    fn query(&self) -> Option<&str> {
        non_empty(&self.query)
    }

    fn type_name(&self) -> Option<&str> {
        non_empty(&self.type_name)
    }

    fn legendary(&self) -> Option<&str> {
        match non_empty(&self.legendary) {
            Some("true") => Some(fields::LEGENDARY_TRUE),
            Some("false") => Some(fields::LEGENDARY_FALSE),
            _ => None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Compose the search filter for `criteria`.
///
/// The text query and the type constraint are each an `$or` over two fields
/// and share the top-level `$or` key: when both are given the type
/// constraint replaces the text query. No criteria yields `{}`.
pub fn build_filter(criteria: &Criteria) -> Document {
    let mut filter = Document::new();

    if let Some(query) = criteria.query() {
        let pattern = regex::escape(query);
        filter.insert(
            "$or",
            vec![
                regex_condition(fields::NAME, &pattern),
                regex_condition(fields::DEX_NUMBER, &pattern),
            ],
        );
    }

    if let Some(type_name) = criteria.type_name() {
        let pattern = anchored(type_name);
        filter.insert(
            "$or",
            vec![
                regex_condition(fields::PRIMARY_TYPE, &pattern),
                regex_condition(fields::SECONDARY_TYPE, &pattern),
            ],
        );
    }

    if let Some(legendary) = criteria.legendary() {
        filter.insert(fields::IS_LEGENDARY, legendary);
    }

    filter
}

/// Exact dex number lookup.
pub fn dex_number_filter(dex_number: &DexNumber) -> Document {
    let mut filter = Document::new();
    filter.insert(fields::DEX_NUMBER, dex_number.as_str());
    filter
}

/// Whole-name match, ignoring case.
pub fn name_filter(name: &str) -> Document {
    regex_condition(fields::NAME, &anchored(name))
}

pub fn legendary_filter() -> Document {
    let mut filter = Document::new();
    filter.insert(fields::IS_LEGENDARY, fields::LEGENDARY_TRUE);
    filter
}

/// Records that carry a second type.
pub fn secondary_type_present_filter() -> Document {
    let mut filter = Document::new();
    filter.insert(fields::SECONDARY_TYPE, doc! { "$ne": "" });
    filter
}

fn anchored(literal: &str) -> String {
    format!("^{}$", regex::escape(literal))
}

fn regex_condition(field: &str, pattern: &str) -> Document {
    let mut condition = Document::new();
    condition.insert(field, doc! { "$regex": pattern, "$options": "i" });
    condition
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(query: Option<&str>, type_name: Option<&str>, legendary: Option<&str>) -> Criteria {
        Criteria::new(
            query.map(String::from),
            type_name.map(String::from),
            legendary.map(String::from),
        )
    }

    #[test]
    fn no_criteria_is_empty_filter() {
        assert_eq!(build_filter(&Criteria::default()), Document::new());
        assert_eq!(build_filter(&criteria(Some(""), Some(""), Some(""))), Document::new());
    }

    #[test]
    fn text_query_matches_name_or_dex_number() {
        let filter = build_filter(&criteria(Some("char"), None, None));
        assert_eq!(
            filter,
            doc! {
                "$or": [
                    { "name": { "$regex": "char", "$options": "i" } },
                    { "dex_number": { "$regex": "char", "$options": "i" } }
                ]
            }
        );
    }

    #[test]
    fn text_query_is_escaped() {
        let filter = build_filter(&criteria(Some("#00"), None, None));
        let or = filter.get_array("$or").unwrap();
        let name = or[0].as_document().unwrap().get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), r"\#00");
    }

    #[test]
    fn type_matches_either_slot_anchored() {
        let filter = build_filter(&criteria(None, Some("fire"), None));
        assert_eq!(
            filter,
            doc! {
                "$or": [
                    { "type_01": { "$regex": "^fire$", "$options": "i" } },
                    { "type_02": { "$regex": "^fire$", "$options": "i" } }
                ]
            }
        );
    }

    #[test]
    fn type_replaces_text_query() {
        let both = build_filter(&criteria(Some("char"), Some("fire"), None));
        let type_only = build_filter(&criteria(None, Some("fire"), None));
        assert_eq!(both, type_only);
        assert_eq!(both.len(), 1);
    }

    #[test]
    fn legendary_true_constrains_only_legendary() {
        let filter = build_filter(&criteria(None, None, Some("true")));
        assert_eq!(filter, doc! { "is_legendary": "True" });
    }

    #[test]
    fn legendary_false_matches_string_literal() {
        let filter = build_filter(&criteria(None, None, Some("false")));
        assert_eq!(filter, doc! { "is_legendary": "False" });
    }

    #[test]
    fn unrecognised_legendary_value_is_ignored() {
        assert_eq!(build_filter(&criteria(None, None, Some("maybe"))), Document::new());
        assert_eq!(build_filter(&criteria(None, None, Some("True"))), Document::new());
    }

    #[test]
    fn combines_type_and_legendary() {
        let filter = build_filter(&criteria(None, Some("Psychic"), Some("true")));
        assert_eq!(filter.len(), 2);
        assert!(filter.contains_key("$or"));
        assert_eq!(filter.get_str("is_legendary").unwrap(), "True");
    }

    #[test]
    fn identical_criteria_build_equal_filters() {
        let c = criteria(Some("saur"), None, Some("false"));
        assert_eq!(build_filter(&c), build_filter(&c));
    }

    #[test]
    fn name_filter_is_anchored_case_insensitive() {
        assert_eq!(
            name_filter("Mr. Mime"),
            doc! { "name": { "$regex": r"^Mr\. Mime$", "$options": "i" } }
        );
    }

    #[test]
    fn lookup_filters() {
        let dex = crate::resolve_identifier("25").unwrap();
        assert_eq!(dex_number_filter(&dex), doc! { "dex_number": "#025" });
        assert_eq!(legendary_filter(), doc! { "is_legendary": "True" });
        assert_eq!(secondary_type_present_filter(), doc! { "type_02": { "$ne": "" } });
    }
}
