// API client module: talks to the ITIS JSON web service. It only knows the
// two calls the lookup needs, a search by common name and a full hierarchy
// by TSN, and leaves retries to the `Fetcher` it wraps.

use crate::fetch::{Fetcher, HttpTransport, RetryPolicy, Sleeper, ThreadSleeper, Transport};
use anyhow::{Context, Result};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://www.itis.gov/ITISWebService/jsonservice";

/// One match from a common-name search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub tsn: i64,
}

/// Body of `searchByCommonName`. ITIS reports "no matches" as
/// `"commonNames": [null]`. Records stay raw here so that one malformed
/// record cannot sink the rest of the batch.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub common_names: Option<Vec<Value>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommonNameRecord {
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default, deserialize_with = "tsn_from_string_or_number")]
    pub tsn: Option<i64>,
}

/// Body of `getFullHierarchyFromTSN`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyResponse {
    #[serde(default)]
    pub hierarchy_list: Option<Vec<Option<HierarchyRecord>>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyRecord {
    #[serde(default)]
    pub rank_name: String,
    #[serde(default)]
    pub taxon_name: String,
}

/// ITIS sends TSNs as strings ("180543"); accept plain numbers too. A TSN
/// that is not a number reads as missing.
fn tsn_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
        Other(de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}

/// Turns one raw search record into a candidate, or `None` if it lacks a
/// usable name or TSN.
fn candidate_from_record(raw: Value) -> Option<Candidate> {
    if raw.is_null() {
        return None;
    }
    let record: CommonNameRecord = match serde_json::from_value(raw) {
        Ok(record) => record,
        Err(e) => {
            warn!("Skipping malformed search record: {}", e);
            return None;
        }
    };
    match (record.common_name, record.tsn) {
        (Some(name), Some(tsn)) if !name.trim().is_empty() => Some(Candidate { name, tsn }),
        (name, _) => {
            warn!("Skipping search record without a usable TSN: {:?}", name);
            None
        }
    }
}

/// Thin client over the two ITIS endpoints. `None` from either call means
/// the service could not be reached after all retries; an empty result
/// means it answered with nothing.
pub struct ApiClient<T = HttpTransport, S = ThreadSleeper> {
    fetcher: Fetcher<T, S>,
    base_url: String,
}

impl ApiClient {
    /// Create a client over real HTTP for the given base URL.
    pub fn http(base_url: &str, policy: RetryPolicy) -> Result<Self> {
        let transport = HttpTransport::new().context("Failed to build HTTP client")?;
        Ok(ApiClient::new(
            Fetcher::new(transport, ThreadSleeper, policy),
            base_url,
        ))
    }
}

impl<T: Transport, S: Sleeper> ApiClient<T, S> {
    pub fn new(fetcher: Fetcher<T, S>, base_url: &str) -> Self {
        ApiClient {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Search by (already normalised) common name. Records lacking a name or
    /// a TSN are skipped.
    pub fn search_by_common_name(&self, name: &str) -> Option<Vec<Candidate>> {
        let url = format!("{}/searchByCommonName", self.base_url);
        let body = self.fetcher.fetch(&url, &[("srchKey", name.to_string())])?;
        let resp: SearchResponse = match serde_json::from_value(body) {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Unexpected search response shape: {}", e);
                return Some(Vec::new());
            }
        };

        let candidates = resp
            .common_names
            .unwrap_or_default()
            .into_iter()
            .filter_map(candidate_from_record)
            .collect();
        Some(candidates)
    }

    /// Full hierarchy for a TSN as `(rank name, taxon name)` pairs, broadest
    /// first. `Some(vec![])` when the response carries no hierarchy list.
    pub fn full_hierarchy(&self, tsn: i64) -> Option<Vec<(String, String)>> {
        let url = format!("{}/getFullHierarchyFromTSN", self.base_url);
        let body = self.fetcher.fetch(&url, &[("tsn", tsn.to_string())])?;
        let resp: HierarchyResponse = match serde_json::from_value(body) {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Unexpected hierarchy response shape: {}", e);
                return Some(Vec::new());
            }
        };

        Some(
            resp.hierarchy_list
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .map(|record| (record.rank_name, record.taxon_name))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    /// Answers every request with the same body.
    struct Fixed(Value);

    impl Transport for Fixed {
        fn get_json(
            &self,
            _endpoint: &str,
            _params: &[(&str, String)],
            _timeout: Duration,
        ) -> Result<Value, TransportError> {
            Ok(self.0.clone())
        }
    }

    struct NoWait;

    impl Sleeper for NoWait {
        fn sleep(&self, _duration: Duration) {}
    }

    fn client(body: Value) -> ApiClient<Fixed, NoWait> {
        let fetcher = Fetcher::new(Fixed(body), NoWait, RetryPolicy::default());
        ApiClient::new(fetcher, "http://itis.test/json/")
    }

    #[test]
    fn search_accepts_string_and_numeric_tsn() {
        let client = client(json!({
            "commonNames": [
                { "commonName": "bald eagle", "language": "English", "tsn": "175420" },
                { "commonName": "American eagle", "tsn": 175420 },
                null
            ]
        }));

        let tsns: Vec<i64> = client
            .search_by_common_name("eagle")
            .unwrap()
            .into_iter()
            .map(|c| c.tsn)
            .collect();
        assert_eq!(tsns, vec![175420, 175420]);
    }

    #[test]
    fn bad_record_does_not_drop_the_batch() {
        let client = client(json!({
            "commonNames": [
                { "commonName": "bald eagle", "tsn": "175420" },
                { "commonName": "odd record", "tsn": "n/a" },
                { "commonName": 42, "tsn": "1" },
                { "commonName": "no tsn" },
                { "commonName": "  ", "tsn": "7" }
            ]
        }));

        let candidates = client.search_by_common_name("eagle").unwrap();

        assert_eq!(
            candidates,
            vec![Candidate {
                name: "bald eagle".into(),
                tsn: 175420
            }]
        );
    }

    #[test]
    fn no_matches_marker_is_empty() {
        let client = client(json!({ "commonNames": [null] }));
        assert_eq!(client.search_by_common_name("jackalope"), Some(vec![]));
    }

    #[test]
    fn hierarchy_response_without_list_is_empty() {
        let resp: HierarchyResponse = serde_json::from_value(json!({ "author": null })).unwrap();
        assert!(resp.hierarchy_list.is_none());
    }
}
