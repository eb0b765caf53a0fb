//! Plain-text views over engine output. Nothing here decides ordering or
//! wording of the analysis; it only lays results out for a terminal.

use chrono::{DateTime, Utc};

use crate::data::annotations::Annotation;
use crate::data::types::MarketRecord;
use crate::engagement::EngagementLookup;
use crate::narrative::rules::classify;
use crate::narrative::synthesize;
use crate::ranking::{rank, rank_unfiltered, RankMode};
use crate::refresh::{MarketSnapshot, SnapshotSource};

pub const LOADING: &str = "Loading markets...";
pub const NO_MATCHES: &str = "No markets match this filter";

/// The ranked view for `mode`. Trending and social views feature their top
/// market separately and list the rest below it. With `unfiltered`, every
/// market is listed in the mode's order.
pub fn render_view<E>(snapshot: Option<&MarketSnapshot>, mode: RankMode, unfiltered: bool, engagement: &E) -> String
where
    E: EngagementLookup + ?Sized,
{
    let Some(snapshot) = snapshot else {
        return format!("{}\n", LOADING);
    };

    let mut out = String::new();
    if let Some(advisory) = &snapshot.advisory {
        out.push_str(&format!("⚠️ {}\n", advisory));
    }
    let source = match snapshot.source {
        SnapshotSource::Live => "live",
        SnapshotSource::Demo => "demo",
    };
    out.push_str(&format!(
        "[{}] {}  (updated {} UTC, {} data)\n\n",
        mode,
        mode.description(),
        snapshot.fetched_at.format("%H:%M:%S"),
        source
    ));

    let ranked = if unfiltered {
        rank_unfiltered(&snapshot.markets, mode, engagement)
    } else {
        rank(&snapshot.markets, mode, engagement)
    };
    if ranked.is_empty() {
        out.push_str(NO_MATCHES);
        out.push('\n');
        return out;
    }

    let listed = if mode.has_hero() {
        out.push_str(&hero(ranked[0], mode, engagement));
        &ranked[1..]
    } else {
        &ranked[..]
    };

    for (position, market) in listed.iter().enumerate() {
        out.push_str(&market_line(position + 1, market, engagement));
    }
    out.push_str(&format!("\n{} shown\n", ranked.len()));
    out
}

/// Full analysis of a single market with its discussion thread.
pub fn render_explain(record: &MarketRecord, thread: &[Annotation], now: DateTime<Utc>) -> String {
    let mut out = format!("{}\n", record.question);
    out.push_str(&format!(
        "24h Vol: ${:.0}K  Liquidity: ${:.0}K  Ends: {}\n",
        record.volume_24h / 1_000.0,
        record.liquidity / 1_000.0,
        record.end_time.format("%Y-%m-%d")
    ));
    out.push_str(&format!(
        "YES {:.1}%  NO {:.1}%\n",
        record.yes_price * 100.0,
        record.no_price * 100.0
    ));

    out.push_str(&format!("Topic: {}\n\n", classify(&record.question).label()));
    out.push_str(&synthesize(record, now));
    out.push_str("\n\n");
    out.push_str(&render_thread(thread));
    out
}

fn render_thread(thread: &[Annotation]) -> String {
    let count = crate::engagement::comment_count(thread);
    let mut out = format!("Discussion ({} comments)\n", count);
    if thread.is_empty() {
        out.push_str("No comments yet.\n");
        return out;
    }

    for annotation in thread {
        out.push_str(&format!(
            "  {} · {} · ♥ {}\n    {}\n",
            annotation.user, annotation.posted, annotation.likes, annotation.text
        ));
        for reply in &annotation.replies {
            out.push_str(&format!(
                "    ↳ {} · {} · ♥ {}\n      {}\n",
                reply.user, reply.posted, reply.likes, reply.text
            ));
        }
    }
    out
}

fn hero<E>(market: &MarketRecord, mode: RankMode, engagement: &E) -> String
where
    E: EngagementLookup + ?Sized,
{
    let badge = match mode {
        RankMode::Social => "💬 MOST DISCUSSED",
        _ => "🔥 TRENDING #1",
    };
    let lean = if market.yes_price >= 0.5 { "▲" } else { "▼" };

    format!(
        "{}\n  {}\n  {} {:.1}% YES  ${:.2}M vol  {} comments  [{}]\n\n",
        badge,
        market.question,
        lean,
        market.yes_prob(),
        market.volume_24h / 1_000_000.0,
        engagement.comment_count(&market.id),
        market.id
    )
}

fn market_line<E>(position: usize, market: &MarketRecord, engagement: &E) -> String
where
    E: EngagementLookup + ?Sized,
{
    format!(
        "{:>2}. {}\n    {:.1}% YES  ${:.0}K vol  {} comments  [{}]\n",
        position,
        market.question,
        market.yes_prob(),
        market.volume_24h / 1_000.0,
        engagement.comment_count(&market.id),
        market.id
    )
}
