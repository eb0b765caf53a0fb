use chrono::{DateTime, Duration, Utc};

use crate::data::types::MarketRecord;

/// (id, question, yes price, 24h volume, liquidity, days until resolution)
const DEMO_MARKETS: [(&str, &str, f64, f64, f64, i64); 8] = [
    ("demo-1", "Will Bitcoin reach $120,000 before March 2027?", 0.52, 2_340_000.0, 450_000.0, 136),
    ("demo-2", "Will Donald Trump win the 2027 Nobel Peace Prize?", 0.08, 890_000.0, 120_000.0, 364),
    ("demo-3", "Will the Fed cut interest rates in March 2027?", 0.67, 1_560_000.0, 380_000.0, 155),
    ("demo-4", "Will AI companies announce a major breakthrough in AGI before June 2027?", 0.23, 3_120_000.0, 670_000.0, 228),
    ("demo-5", "Will the S&P 500 exceed 7,000 by end of Q1 2027?", 0.71, 1_890_000.0, 520_000.0, 166),
    ("demo-6", "Will Apple launch a VR/AR product in 2027?", 0.44, 765_000.0, 210_000.0, 441),
    ("demo-7", "Will unemployment rate exceed 5% by July 2027?", 0.31, 1_234_000.0, 290_000.0, 288),
    ("demo-8", "Will SpaceX successfully land humans on Mars before 2028?", 0.12, 987_000.0, 180_000.0, 441),
];

/// Fixed demonstration markets used whenever the live feed is unavailable.
///
/// All of them are eligible, and between them they reach every narrative
/// topic. End times are anchored to `now` so the time-horizon commentary
/// stays meaningful.
pub fn demo_markets(now: DateTime<Utc>) -> Vec<MarketRecord> {
    DEMO_MARKETS
        .iter()
        .map(|&(id, question, yes_price, volume_24h, liquidity, days)| MarketRecord {
            id: id.to_string(),
            question: question.to_string(),
            yes_price,
            no_price: 1.0 - yes_price,
            volume_24h,
            liquidity,
            end_time: now + Duration::days(days),
            is_active: true,
            is_closed: false,
            is_archived: false,
        })
        .collect()
}
