//! Primary-key derivation and grouping of duplicate records.

use std::collections::HashMap;

use recnorm_model::value::group_key;
use recnorm_model::{NormalizationConfig, Record, is_missing};
use serde_json::Value;
use tracing::{debug, warn};

/// All records sharing one derived primary-key value.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordGroup {
    /// The derived primary-key value.
    pub key: Value,
    /// Member records in input order, each with the primary-key field set to `key`.
    pub records: Vec<Record>,
}

/// Records bucketed by primary key, plus those that had none.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    /// Groups in the order their key was first seen.
    pub groups: Vec<RecordGroup>,
    /// Input positions of records without a derivable primary key.
    pub excluded: Vec<usize>,
}

/// Return the first present value among `primary_sources`.
///
/// `null`, `false`, zero, and `""` count as absent; whitespace does not.
pub fn derive_primary_key<'a>(record: &'a Record, primary_sources: &[String]) -> Option<&'a Value> {
    primary_sources
        .iter()
        .filter_map(|field| record.get(field))
        .find(|value| !is_missing(value))
}

/// Group `records` by their derived primary key.
///
/// Records lacking a key are excluded and logged; every other record lands in
/// exactly one group.
pub fn group_records(records: &[Record], config: &NormalizationConfig) -> Grouping {
    let mut grouping = Grouping::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (position, record) in records.iter().enumerate() {
        let Some(key) = derive_primary_key(record, &config.primary_sources) else {
            warn!(
                record_index = position,
                primary_sources = ?config.primary_sources,
                "found record without a primary key; skipping"
            );
            grouping.excluded.push(position);
            continue;
        };

        let mut keyed = record.clone();
        keyed.insert(config.primary_key.clone(), key.clone());

        let slot = *index.entry(group_key(key)).or_insert_with(|| {
            grouping.groups.push(RecordGroup {
                key: key.clone(),
                records: Vec::new(),
            });
            grouping.groups.len() - 1
        });
        grouping.groups[slot].records.push(keyed);
    }

    debug!(
        groups = grouping.groups.len(),
        excluded = grouping.excluded.len(),
        "grouped records by primary key"
    );
    grouping
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    fn config(sources: &[&str]) -> NormalizationConfig {
        NormalizationConfig::new("pk", sources.iter().copied())
    }

    #[test]
    fn first_present_source_wins() {
        let record = &records(json!([{"a": "", "b": false, "c": "x", "d": "y"}]))[0];
        let sources: Vec<String> = ["a", "b", "missing", "c", "d"].map(String::from).to_vec();
        assert_eq!(derive_primary_key(record, &sources), Some(&json!("x")));
    }

    #[test]
    fn whitespace_key_is_present() {
        let record = &records(json!([{"a": "", "b": "  ", "c": "x"}]))[0];
        let sources: Vec<String> = ["a", "b", "c"].map(String::from).to_vec();
        assert_eq!(derive_primary_key(record, &sources), Some(&json!("  ")));
    }

    #[test]
    fn no_key_when_all_missing() {
        let record = &records(json!([{"a": 0, "b": null}]))[0];
        let sources = vec!["a".to_string(), "b".to_string()];
        assert_eq!(derive_primary_key(record, &sources), None);
    }

    #[test]
    fn groups_preserve_first_seen_order() {
        let input = records(json!([
            {"id": "b", "v": 1},
            {"id": "a", "v": 2},
            {"v": 3},
            {"id": "b", "v": 4}
        ]));
        let grouping = group_records(&input, &config(&["id"]));
        let keys: Vec<_> = grouping.groups.iter().map(|g| g.key.clone()).collect();
        assert_eq!(keys, [json!("b"), json!("a")]);
        assert_eq!(grouping.groups[0].records.len(), 2);
        assert_eq!(grouping.groups[0].records[1]["v"], json!(4));
        assert_eq!(grouping.excluded, [2]);
    }

    #[test]
    fn primary_key_field_is_set_on_members() {
        let input = records(json!([{"legacy": 7, "v": 1}]));
        let grouping = group_records(&input, &config(&["id", "legacy"]));
        assert_eq!(grouping.groups[0].records[0]["pk"], json!(7));
    }

    #[test]
    fn number_and_string_keys_are_distinct() {
        let input = records(json!([{"id": 1}, {"id": "1"}, {"id": 1.0}]));
        let grouping = group_records(&input, &config(&["id"]));
        assert_eq!(grouping.groups.len(), 2);
        assert_eq!(grouping.groups[0].records.len(), 2);
    }
}
