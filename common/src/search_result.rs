use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};


/// The latest successful results: opaque backend hit records in backend
/// order, plus the total hit count across all pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResults {
    pub records: Vec<serde_json::Value>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationBucket {
    pub key: serde_json::Value,
    pub doc_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AggregationMeta {
    pub title: String,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Aggregation {
    pub buckets: Vec<AggregationBucket>,
    #[serde(default)]
    pub meta: AggregationMeta,
}

/// Facet histograms keyed by aggregation identifier. Keys here and the
/// selection keys in the query are independent namespaces: a selection may
/// reference an aggregation missing from the latest set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Aggregations(pub BTreeMap<String, Aggregation>);

impl Aggregations {
    pub fn get(&self, key: &str) -> Option<&Aggregation> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in display order: by the backend's order hint, then by key.
    pub fn ordered(&self) -> Vec<(&String, &Aggregation)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by_key(|(key, aggregation)| (aggregation.meta.order, (*key).clone()));
        entries
    }
}
