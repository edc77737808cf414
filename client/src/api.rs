//! Raw wire models and the shared GET helper for the search backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use common::search_result::Aggregation;

#[derive(Debug, Serialize, Deserialize)]
pub struct RawSearchResponse {
    pub hits: RawSearchHits,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RawSearchHits {
    pub hits: Vec<serde_json::Value>,
    pub total: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RawFacetsResponse {
    pub aggregations: BTreeMap<String, Aggregation>,
}

/// GET `url` with the given query pairs and decode the JSON body.
///
/// Transport errors and non-2xx statuses are not distinguished: both come
/// back as a plain error. No retries, no timeout beyond the transport
/// default.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: String,
    pairs: &[(String, String)],
) -> anyhow::Result<T> {
    tracing::debug!("search request: {} ({} params)", url, pairs.len());
    let response = client.get(url).query(&pairs).send().await?;
    let status = response.status();
    let response_txt = response.text().await?;
    if status.is_client_error() || status.is_server_error() {
        anyhow::bail!("Error: {}: {}", status, response_txt);
    }
    tracing::debug!("search response: len = {}", response_txt.len());
    let response: T = serde_json::from_str(&response_txt)?;
    Ok(response)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_parses_backend_body() {
        let parsed: RawSearchResponse = serde_json::from_str(
            r#"{"hits":{"hits":[{"title":"A"},{"title":"B"}],"total":42}}"#,
        )
        .unwrap();
        assert_eq!(parsed.hits.hits.len(), 2);
        assert_eq!(parsed.hits.total, 42);
    }

    #[test]
    fn facets_response_parses_backend_body() {
        let parsed: RawFacetsResponse = serde_json::from_str(
            r#"{"aggregations":{"author":{"buckets":[{"key":"Smith","doc_count":7}],"meta":{"title":"Author","order":1}}}}"#,
        )
        .unwrap();
        let author = parsed.aggregations.get("author").unwrap();
        assert_eq!(author.buckets[0].doc_count, 7);
        assert_eq!(author.meta.title, "Author");
    }
}
