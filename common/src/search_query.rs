//! Shared search query models and merge helpers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::search_const::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_SORT};


/// A single query parameter value: a scalar or an ordered list.
///
/// Facet selections and base-query filters share this shape, so one type
/// covers both the user-controlled query and the caller-supplied filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    String(String),
    List(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::String(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::List(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::List(values.into_iter().map(String::from).collect())
    }
}


/// The user-controlled search parameters.
///
/// Always fully defined: updates replace whole fields (or a whole facet
/// selection), never partially mutate a nested value. The facet key set is
/// backend-driven and open-ended, hence the map rather than fixed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub page: u64,
    pub size: u64,
    pub sort: String,
    #[serde(flatten)]
    pub facet_selections: BTreeMap<String, QueryValue>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        SearchQuery {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            sort: DEFAULT_SORT.to_string(),
            facet_selections: BTreeMap::new(),
        }
    }
}

impl SearchQuery {
    /// `page` is 1-based; the backend rejects 0.
    pub fn set_page(&mut self, page: u64) {
        self.page = page;
    }

    pub fn set_size(&mut self, size: u64) {
        self.size = size;
    }

    pub fn set_sort(&mut self, sort: impl Into<String>) {
        self.sort = sort.into();
    }

    /// Replaces the whole selection for `aggregation_key`, overwriting any
    /// prior selection under that key.
    pub fn set_selection(&mut self, aggregation_key: impl Into<String>, selection: impl Into<QueryValue>) {
        self.facet_selections.insert(aggregation_key.into(), selection.into());
    }

    /// Flattens into the wire form used for merging and URL serialization.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::default();
        params.insert("page", self.page.to_string());
        params.insert("size", self.size.to_string());
        params.insert("sort", self.sort.clone());
        for (key, selection) in &self.facet_selections {
            params.insert(key.clone(), selection.clone());
        }
        params
    }
}


/// Flattened query parameters keyed by name, ready to merge and serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueryParams(pub BTreeMap<String, QueryValue>);

impl QueryParams {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    /// Expands into `(key, value)` pairs for the URL query string. List
    /// values use the repeated-key form (`key=a&key=b`), never indexed keys.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            match value {
                QueryValue::String(s) => pairs.push((key.clone(), s.clone())),
                QueryValue::List(values) => {
                    for v in values {
                        pairs.push((key.clone(), v.clone()));
                    }
                }
            }
        }
        pairs
    }
}

impl FromIterator<(String, QueryValue)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, QueryValue)>>(iter: I) -> Self {
        QueryParams(BTreeMap::from_iter(iter))
    }
}


/// Key-wise merge where `overlay` wins, except that two list values under
/// the same key concatenate (base's elements first). A list on only one side
/// follows the ordinary overwrite rule.
pub fn merge_with_concatting_arrays(base: &QueryParams, overlay: &QueryParams) -> QueryParams {
    let mut merged = base.0.clone();
    for (key, overlay_value) in &overlay.0 {
        let merged_value = match (merged.get(key), overlay_value) {
            (Some(QueryValue::List(base_values)), QueryValue::List(overlay_values)) => {
                let mut concatted = base_values.clone();
                concatted.extend(overlay_values.iter().cloned());
                QueryValue::List(concatted)
            }
            _ => overlay_value.clone(),
        };
        merged.insert(key.clone(), merged_value);
    }
    QueryParams(merged)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_has_documented_defaults() {
        let query = SearchQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.size, 10);
        assert_eq!(query.sort, "mostrecent");
        assert!(query.facet_selections.is_empty());
    }

    #[test]
    fn field_updates_merge_into_existing_query() {
        let mut query = SearchQuery::default();
        query.set_page(3);
        query.set_sort("mostcited");
        assert_eq!(query.page, 3);
        assert_eq!(query.sort, "mostcited");
        // untouched fields keep their defaults
        assert_eq!(query.size, 10);
    }

    #[test]
    fn repeated_selection_for_same_key_overwrites() {
        let mut query = SearchQuery::default();
        query.set_selection("author", vec!["Smith"]);
        query.set_selection("author", vec!["Jones"]);
        assert_eq!(
            query.facet_selections.get("author"),
            Some(&QueryValue::from(vec!["Jones"]))
        );
    }

    #[test]
    fn selections_for_distinct_keys_are_independent() {
        let mut query = SearchQuery::default();
        query.set_selection("author", vec!["Smith"]);
        query.set_selection("subject", "Physics");
        assert_eq!(query.facet_selections.len(), 2);
        assert_eq!(query.facet_selections.get("subject"), Some(&QueryValue::from("Physics")));
    }

    #[test]
    fn merge_concatenates_lists_on_both_sides() {
        let mut base = QueryParams::default();
        base.insert("category", vec!["a"]);
        let mut overlay = QueryParams::default();
        overlay.insert("category", vec!["b"]);
        let merged = merge_with_concatting_arrays(&base, &overlay);
        assert_eq!(merged.get("category"), Some(&QueryValue::from(vec!["a", "b"])));
    }

    #[test]
    fn merge_overwrites_scalars() {
        let mut base = QueryParams::default();
        base.insert("sort", "x");
        let mut overlay = QueryParams::default();
        overlay.insert("sort", "y");
        let merged = merge_with_concatting_arrays(&base, &overlay);
        assert_eq!(merged.get("sort"), Some(&QueryValue::from("y")));
    }

    #[test]
    fn merge_keeps_keys_unique_to_either_side() {
        let mut base = QueryParams::default();
        base.insert("doc_type", "article");
        let mut overlay = QueryParams::default();
        overlay.insert("page", "2");
        let merged = merge_with_concatting_arrays(&base, &overlay);
        assert_eq!(merged.get("doc_type"), Some(&QueryValue::from("article")));
        assert_eq!(merged.get("page"), Some(&QueryValue::from("2")));
    }

    #[test]
    fn merge_overwrites_when_kinds_differ() {
        let mut base = QueryParams::default();
        base.insert("field", vec!["a"]);
        let mut overlay = QueryParams::default();
        overlay.insert("field", "b");
        let merged = merge_with_concatting_arrays(&base, &overlay);
        assert_eq!(merged.get("field"), Some(&QueryValue::from("b")));
    }

    #[test]
    fn pairs_use_repeated_key_form_for_lists() {
        let mut params = QueryParams::default();
        params.insert("author", vec!["Smith", "Jones"]);
        params.insert("page", "1");
        assert_eq!(
            params.to_pairs(),
            vec![
                ("author".to_string(), "Smith".to_string()),
                ("author".to_string(), "Jones".to_string()),
                ("page".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn query_flattens_to_params_with_selections() {
        let mut query = SearchQuery::default();
        query.set_page(2);
        query.set_selection("author", vec!["Smith"]);
        let params = query.to_params();
        assert_eq!(params.get("page"), Some(&QueryValue::from("2")));
        assert_eq!(params.get("size"), Some(&QueryValue::from("10")));
        assert_eq!(params.get("sort"), Some(&QueryValue::from("mostrecent")));
        assert_eq!(params.get("author"), Some(&QueryValue::from(vec!["Smith"])));
    }

    #[test]
    fn selection_value_json_round_trips_untagged() {
        let single: QueryValue = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(single, QueryValue::from("x"));
        let many: QueryValue = serde_json::from_str("[\"x\",\"y\"]").unwrap();
        assert_eq!(many, QueryValue::from(vec!["x", "y"]));
    }
}
