use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::data::types::{MarketRecord, DEFAULT_PRICE};
use crate::refresh::MarketFeed;

/// Days added to the fetch instant when a market carries no usable end date.
const MISSING_END_DATE_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(StatusCode),

    #[error("failed to decode markets response: {0}")]
    Decode(String),

    #[error("No active markets found")]
    NoEligibleMarkets,
}

pub struct GammaApiClient {
    client: Client,
    base_url: String,
}

/// One market as the Gamma API returns it. Every field is kept as raw JSON
/// until normalization so a single odd value never rejects the whole batch.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub condition_id: Option<Value>,
    #[serde(default)]
    pub question: Option<Value>,
    #[serde(default)]
    pub outcome_prices: Option<Value>,
    #[serde(default)]
    pub volume24hr: Option<Value>,
    #[serde(default)]
    pub liquidity: Option<Value>,
    #[serde(default)]
    pub end_date: Option<Value>,
    #[serde(default)]
    pub active: Option<Value>,
    #[serde(default)]
    pub closed: Option<Value>,
    #[serde(default)]
    pub archived: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GammaMarketsResponse {
    List(Vec<Value>),
    Wrapped { data: Vec<Value> },
}

impl GammaMarketsResponse {
    /// Entries that are not JSON objects are dropped.
    fn into_markets(self) -> Vec<GammaMarket> {
        let entries = match self {
            Self::List(entries) | Self::Wrapped { data: entries } => entries,
        };
        entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect()
    }
}

impl GammaApiClient {
    /// The timeout bounds every request so a slow feed can never overlap the
    /// next refresh tick.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch every market the feed returns, normalized. Ineligible markets are
    /// kept; filtering is the caller's decision.
    pub async fn fetch_markets(&self) -> Result<Vec<MarketRecord>, FeedError> {
        let url = format!("{}/markets", self.base_url);
        info!("Fetching markets from {}", url);

        let response = self.client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.text().await?;
        let raw = parse_markets_body(&body)?;
        info!("Received markets: {}", raw.len());

        let fetched_at = Utc::now();
        Ok(raw
            .into_iter()
            .filter_map(|gm| normalize_market(gm, fetched_at))
            .collect())
    }
}

#[async_trait]
impl MarketFeed for GammaApiClient {
    async fn fetch(&self) -> Result<Vec<MarketRecord>, FeedError> {
        self.fetch_markets().await
    }
}

/// Accepts either a bare array of markets or an object wrapping them in `data`.
pub fn parse_markets_body(body: &str) -> Result<Vec<GammaMarket>, FeedError> {
    serde_json::from_str::<GammaMarketsResponse>(body)
        .map(GammaMarketsResponse::into_markets)
        .map_err(|e| FeedError::Decode(e.to_string()))
}

/// Convert a raw Gamma market into a `MarketRecord`.
///
/// Returns `None` when the market has no identifier or when any of the three
/// eligibility flags is missing: those are excluded rather than defaulted.
/// Every other malformed field falls back to its default.
pub fn normalize_market(gm: GammaMarket, fetched_at: DateTime<Utc>) -> Option<MarketRecord> {
    let id = gm.condition_id.as_ref()
        .and_then(value_to_id)
        .or_else(|| gm.id.as_ref().and_then(value_to_id))?;

    let is_active = gm.active.as_ref()?.as_bool()?;
    let is_closed = gm.closed.as_ref()?.as_bool()?;
    let is_archived = gm.archived.as_ref()?.as_bool()?;

    let prices = gm.outcome_prices.as_ref().map(outcome_prices).unwrap_or_default();
    let yes_price = prices.first()
        .copied()
        .flatten()
        .unwrap_or(DEFAULT_PRICE);
    let no_price = prices.get(1)
        .copied()
        .flatten()
        .unwrap_or(1.0 - yes_price);

    let end_time = gm.end_date.as_ref()
        .and_then(Value::as_str)
        .and_then(parse_end_date)
        .unwrap_or_else(|| fetched_at + chrono::Duration::days(MISSING_END_DATE_DAYS));

    Some(MarketRecord {
        id,
        question: gm.question.as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        yes_price,
        no_price,
        volume_24h: gm.volume24hr.as_ref().map(non_negative).unwrap_or(0.0),
        liquidity: gm.liquidity.as_ref().map(non_negative).unwrap_or(0.0),
        end_time,
        is_active,
        is_closed,
        is_archived,
    })
}

/// RFC 3339 first, then an ISO timestamp without offset, then a bare date at
/// midnight. Values without an offset are read as UTC.
fn parse_end_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers may be JSON numbers or numeric strings.
fn lenient_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn non_negative(value: &Value) -> f64 {
    lenient_f64(value).filter(|v| *v >= 0.0).unwrap_or(0.0)
}

fn price(value: &Value) -> Option<f64> {
    lenient_f64(value).filter(|p| (0.0..=1.0).contains(p))
}

/// Outcome prices arrive as a JSON array or as a string holding one, e.g.
/// `"[\"0.52\", \"0.48\"]"`. Unusable entries are `None`.
fn outcome_prices(value: &Value) -> Vec<Option<f64>> {
    match value {
        Value::Array(items) => items.iter().map(price).collect(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items.iter().map(price).collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
