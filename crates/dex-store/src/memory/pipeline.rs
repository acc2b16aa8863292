use dex_core::{Bson, Document, StoreError};
use dex_query::matches;

use super::store::compile;

/// Apply aggregation `stages` in order. Supported stages: `$match` and
/// `$group` with constant `$sum` accumulators.
pub(crate) fn run(mut docs: Vec<Document>, stages: &[Document]) -> Result<Vec<Document>, StoreError> {
    for stage in stages {
        let mut entries = stage.iter();
        let (name, args) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(StoreError::InvalidQuery(
                    "pipeline stage must have exactly one field".into(),
                ));
            }
        };
        let args = args
            .as_document()
            .ok_or_else(|| StoreError::InvalidQuery(format!("{name} expects a document")))?;

        docs = match name.as_str() {
            "$match" => {
                let predicate = compile(args)?;
                docs.into_iter()
                    .filter(|doc| predicate.as_ref().is_none_or(|expr| matches(doc, expr)))
                    .collect()
            }
            "$group" => group(docs, args)?,
            other => {
                return Err(StoreError::InvalidQuery(format!(
                    "unsupported pipeline stage: {other}"
                )));
            }
        };
    }
    Ok(docs)
}

/// `_id` operand: `"$field"` reads the field, anything else is a constant.
fn group_key(doc: &Document, expr: &Bson) -> Bson {
    match expr {
        Bson::String(s) if s.starts_with('$') => {
            doc.get(&s[1..]).cloned().unwrap_or(Bson::Null)
        }
        constant => constant.clone(),
    }
}

/// `$sum` counts: each document adds a constant integer to its group.
fn sum_step(name: &str, acc: &Bson) -> Result<i64, StoreError> {
    let unsupported = || StoreError::InvalidQuery(format!("unsupported accumulator for {name}"));
    let input = acc.as_document().and_then(|acc| acc.get("$sum")).ok_or_else(unsupported)?;
    match input {
        Bson::Int32(step) => Ok(i64::from(*step)),
        Bson::Int64(step) => Ok(*step),
        _ => Err(StoreError::InvalidQuery(format!(
            "$sum for {name} must be an integer constant"
        ))),
    }
}

fn group(docs: Vec<Document>, args: &Document) -> Result<Vec<Document>, StoreError> {
    let key_expr = args
        .get("_id")
        .ok_or_else(|| StoreError::InvalidQuery("$group requires an _id".into()))?;

    let mut accumulators = Vec::new();
    for (name, acc) in args.iter().filter(|(name, _)| name.as_str() != "_id") {
        accumulators.push((name.clone(), sum_step(name, acc)?));
    }

    // groups keep first-seen order; Bson has no Hash impl
    let mut groups: Vec<(Bson, Vec<i64>)> = Vec::new();
    for doc in &docs {
        let key = group_key(doc, key_expr);
        let index = match groups.iter().position(|(k, _)| *k == key) {
            Some(index) => index,
            None => {
                groups.push((key, vec![0; accumulators.len()]));
                groups.len() - 1
            }
        };
        for (total, (_, step)) in groups[index].1.iter_mut().zip(&accumulators) {
            *total += step;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(key, totals)| {
            let mut row = Document::new();
            row.insert("_id", key);
            for ((name, _), total) in accumulators.iter().zip(totals) {
                row.insert(name.clone(), i32::try_from(total).map_or(Bson::Int64(total), Bson::Int32));
            }
            row
        })
        .collect())
}
