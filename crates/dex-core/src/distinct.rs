use std::collections::HashSet;

use bson::Bson;

/// Merge two `distinct` results into one list of unique, non-empty strings.
///
/// Values keep their first-seen order across `first` followed by `second`.
/// Non-string and empty values are dropped.
pub fn merge_distinct(
    first: impl IntoIterator<Item = Bson>,
    second: impl IntoIterator<Item = Bson>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for value in first.into_iter().chain(second) {
        let Bson::String(s) = value else { continue };
        if !s.is_empty() && seen.insert(s.clone()) {
            merged.push(s);
        }
    }

    merged
}
