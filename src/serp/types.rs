use serde::Deserialize;

/// Response body from the search provider. Only the organic results are
/// consumed; paid placements and metadata blocks are ignored.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub organic_results: Option<Vec<OrganicResult>>,
}

/// One organic entry as returned on the wire. Every field may be absent.
#[derive(Debug, Deserialize)]
pub struct OrganicResult {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub link: Option<String>,
}

/// One organic search result, attributed to the entity whose expanded query
/// produced it. The entity is the grouping key for aggregation.
#[derive(Debug, Clone)]
pub struct SearchRecord {
    pub entity: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub url: Option<String>,
}
