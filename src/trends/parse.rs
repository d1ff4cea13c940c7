//! Parsing of the trends service's framed-JSON responses.
//!
//! Every response body starts with a throwaway anti-hijacking line; the JSON
//! payload follows the first newline. Payloads are wrapped in a `default`
//! object.

use super::FetchError;
use crate::models::{InterestPoint, MAX_QUERIES};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Related and rising queries pulled out of a ranked-list response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RankedQueries {
    pub related: Vec<String>,
    pub rising: Vec<String>,
}

impl RankedQueries {
    pub fn is_empty(&self) -> bool {
        self.related.is_empty() && self.rising.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T: Default> {
    #[serde(default)]
    default: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedPayload {
    #[serde(default)]
    ranked_list: Vec<RankedList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedList {
    #[serde(default)]
    ranked_keyword: Vec<RankedKeyword>,
}

#[derive(Debug, Deserialize)]
struct RankedKeyword {
    query: Option<String>,
    value: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelinePayload {
    #[serde(default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelinePoint {
    formatted_time: Option<String>,
    #[serde(default)]
    value: Vec<Value>,
}

/// Drop everything up to and including the first newline.
pub fn strip_framing(body: &str) -> Result<&str, FetchError> {
    body.split_once('\n')
        .map(|(_, payload)| payload)
        .ok_or(FetchError::Unframed)
}

fn parse_framed<T: DeserializeOwned + Default>(body: &str) -> Result<T, FetchError> {
    let payload = strip_framing(body)?;
    let envelope: Envelope<T> = serde_json::from_str(payload)?;
    Ok(envelope.default)
}

/// Parse a ranked-list response.
///
/// A list counts as rising when any of its entries carries a numeric `value`;
/// otherwise its queries are related queries. Each side keeps at most
/// [`MAX_QUERIES`] entries in source order.
pub fn ranked_queries(body: &str) -> Result<RankedQueries, FetchError> {
    let payload: RankedPayload = parse_framed(body)?;
    let mut out = RankedQueries::default();

    for list in payload.ranked_list {
        let rising = list
            .ranked_keyword
            .iter()
            .any(|k| k.value.as_ref().is_some_and(Value::is_number));
        let target = if rising { &mut out.rising } else { &mut out.related };
        target.extend(list.ranked_keyword.into_iter().filter_map(|k| k.query));
    }

    out.related.truncate(MAX_QUERIES);
    out.rising.truncate(MAX_QUERIES);
    Ok(out)
}

/// Parse a multiline (interest over time) response.
///
/// Points without a time label or without a first value are skipped.
pub fn interest_over_time(body: &str) -> Result<Vec<InterestPoint>, FetchError> {
    let payload: TimelinePayload = parse_framed(body)?;
    let points = payload
        .timeline_data
        .into_iter()
        .filter_map(|p| {
            let date = p.formatted_time.filter(|t| !t.is_empty())?;
            let value = p.value.first().and_then(Value::as_f64)?;
            Some(InterestPoint {
                date,
                value: value.round() as i64,
            })
        })
        .collect();
    Ok(points)
}
