use std::fmt;

use chrono::{DateTime, Utc};

use crate::data::types::{MarketMetrics, MarketRecord};
use crate::narrative::rules::{self, Topic};

/// A market's narrative, section by section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    pub topic: Topic,
    pub snapshot: String,
    pub macro_view: String,
    pub micro_view: String,
}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "**Market Snapshot:** {}\n\n**The Macro View:**\n{}\n\n**The Micro View:**\n{}",
            self.snapshot, self.macro_view, self.micro_view
        )
    }
}

/// Build the narrative for one market.
///
/// `now` only feeds the days-until-resolution figure. The same record and
/// instant always produce the same text.
pub fn analyze(record: &MarketRecord, now: DateTime<Utc>) -> Narrative {
    let metrics = MarketMetrics::derive(record, now);
    let topic = rules::classify(&record.question);

    Narrative {
        topic,
        snapshot: snapshot(&metrics),
        macro_view: rules::macro_ladder(topic).select(&metrics.yes_prob).to_string(),
        micro_view: micro_view(&metrics),
    }
}

/// The narrative as a single text blob: snapshot, macro and micro sections
/// separated by blank lines.
pub fn synthesize(record: &MarketRecord, now: DateTime<Utc>) -> String {
    analyze(record, now).to_string()
}

/// `$2.3M` from one million up, `$890K` below.
pub fn format_volume(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else {
        format!("${:.0}K", value / 1_000.0)
    }
}

fn snapshot(m: &MarketMetrics) -> String {
    format!(
        "{:.1}% YES / {:.1}% NO • {} 24h vol • {} {} to resolution",
        m.yes_prob,
        m.no_prob,
        format_volume(m.volume_24h),
        m.days_until_end,
        rules::day_noun(m.days_until_end)
    )
}

fn micro_view(m: &MarketMetrics) -> String {
    let volume = (rules::VOLUME.select(m))(m);
    let dispersion = rules::DISPERSION.select(&m.yes_prob);
    let liquidity = (rules::LIQUIDITY.select(m))(m);
    let horizon = (rules::HORIZON.select(m))(m);

    format!("{} {} {} {}", volume, dispersion, liquidity, horizon)
}
