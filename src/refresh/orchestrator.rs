use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::data::demo::demo_markets;
use crate::data::gamma_api::FeedError;
use crate::data::types::MarketRecord;

/// Markets kept from each live fetch.
pub const MAX_LIVE_MARKETS: usize = 15;

/// Source of market records for the orchestrator.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    async fn fetch(&self) -> Result<Vec<MarketRecord>, FeedError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Live,
    Demo,
}

/// One published market collection. Never mutated after publishing.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub markets: Arc<Vec<MarketRecord>>,
    pub fetched_at: DateTime<Utc>,
    pub source: SnapshotSource,
    /// Set when the live feed failed and the demo set was published instead.
    pub advisory: Option<String>,
}

impl MarketSnapshot {
    pub fn find(&self, market_id: &str) -> Option<&MarketRecord> {
        self.markets.iter().find(|m| m.id == market_id)
    }
}

/// `None` until the first refresh completes.
pub type SnapshotReceiver = watch::Receiver<Option<Arc<MarketSnapshot>>>;

pub struct RefreshOrchestrator<F> {
    feed: Option<F>,
    interval: Duration,
    publisher: watch::Sender<Option<Arc<MarketSnapshot>>>,
}

impl<F: MarketFeed> RefreshOrchestrator<F> {
    pub fn new(feed: F, interval: Duration) -> (Self, SnapshotReceiver) {
        Self::build(Some(feed), interval)
    }

    /// Never touches the network; every refresh publishes the demo set.
    pub fn demo_only(interval: Duration) -> (Self, SnapshotReceiver) {
        Self::build(None, interval)
    }

    fn build(feed: Option<F>, interval: Duration) -> (Self, SnapshotReceiver) {
        let (publisher, receiver) = watch::channel(None);
        (Self { feed, interval, publisher }, receiver)
    }

    /// Run one fetch cycle and publish its result. Feed failures fall back to
    /// the demo set with an advisory; this never fails.
    pub async fn refresh(&self) -> Arc<MarketSnapshot> {
        let snapshot = match &self.feed {
            Some(feed) => match feed.fetch().await.and_then(select_live) {
                Ok(markets) => {
                    info!("Published {} live markets", markets.len());
                    MarketSnapshot {
                        markets: Arc::new(markets),
                        fetched_at: Utc::now(),
                        source: SnapshotSource::Live,
                        advisory: None,
                    }
                }
                Err(e) => {
                    warn!("Error fetching markets: {}", e);
                    demo_snapshot(Some(format!(
                        "Live API unavailable ({}). Showing demo markets - the analysis feature still works!",
                        e
                    )))
                }
            },
            None => demo_snapshot(None),
        };

        let snapshot = Arc::new(snapshot);
        self.publisher.send_replace(Some(snapshot.clone()));
        snapshot
    }

    /// Refresh immediately, then once per interval, until the task is dropped.
    /// A slow fetch delays the next tick rather than stacking requests.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }
}

/// Keep eligible markets, highest 24h volume first, capped at
/// [`MAX_LIVE_MARKETS`]. An empty result counts as a feed failure.
pub fn select_live(records: Vec<MarketRecord>) -> Result<Vec<MarketRecord>, FeedError> {
    let total = records.len();
    let mut eligible: Vec<MarketRecord> = records
        .into_iter()
        .filter(MarketRecord::is_eligible)
        .collect();

    eligible.sort_by(|a, b| b.volume_24h.total_cmp(&a.volume_24h));
    eligible.truncate(MAX_LIVE_MARKETS);
    info!("Active markets after filtering: {} of {}", eligible.len(), total);

    if eligible.is_empty() {
        return Err(FeedError::NoEligibleMarkets);
    }
    Ok(eligible)
}

fn demo_snapshot(advisory: Option<String>) -> MarketSnapshot {
    let now = Utc::now();
    MarketSnapshot {
        markets: Arc::new(demo_markets(now)),
        fetched_at: now,
        source: SnapshotSource::Demo,
        advisory,
    }
}
