use crate::data::types::MarketRecord;
use crate::engagement::EngagementLookup;
use crate::ranking::types::{RankMode, MAX_RANKED};

/// Markets priced inside this band are too ordinary for the odds view.
const ODDS_LOW: f64 = 0.2;
const ODDS_HIGH: f64 = 0.8;

/// Volume weight that does not depend on controversy.
const TRENDING_BASE_WEIGHT: f64 = 0.7;
const TRENDING_CONTROVERSY_WEIGHT: f64 = 0.3;

/// Rank eligible markets for a view.
///
/// Drops ineligible markets and anything the mode filters out, sorts by the
/// mode's score with ties kept in input order, and caps the result at
/// [`MAX_RANKED`]. The input is never modified.
pub fn rank<'a, E>(records: &'a [MarketRecord], mode: RankMode, engagement: &E) -> Vec<&'a MarketRecord>
where
    E: EngagementLookup + ?Sized,
{
    let admitted = records
        .iter()
        .filter(|m| m.is_eligible() && admits(m, mode, engagement));

    let mut ranked = sort_by_score(admitted, mode, engagement);
    ranked.truncate(MAX_RANKED);
    ranked
}

/// The mode's ordering without its filter, for "show all, sorted" views.
/// Not capped.
pub fn rank_unfiltered<'a, E>(records: &'a [MarketRecord], mode: RankMode, engagement: &E) -> Vec<&'a MarketRecord>
where
    E: EngagementLookup + ?Sized,
{
    sort_by_score(records.iter(), mode, engagement)
}

/// Whether a market belongs in the mode's view at all.
pub fn admits<E>(record: &MarketRecord, mode: RankMode, engagement: &E) -> bool
where
    E: EngagementLookup + ?Sized,
{
    match mode {
        RankMode::Trending | RankMode::Volume => true,
        RankMode::Social => engagement.comment_count(&record.id) > 0,
        RankMode::Odds => record.yes_price < ODDS_LOW || record.yes_price > ODDS_HIGH,
    }
}

/// Higher scores rank first.
pub fn score<E>(record: &MarketRecord, mode: RankMode, engagement: &E) -> f64
where
    E: EngagementLookup + ?Sized,
{
    match mode {
        RankMode::Volume => record.volume_24h,
        RankMode::Trending => {
            record.volume_24h * (TRENDING_BASE_WEIGHT + record.controversy() * TRENDING_CONTROVERSY_WEIGHT)
        }
        RankMode::Social => engagement.engagement_score(&record.id) as f64,
        RankMode::Odds => record.extremity(),
    }
}

fn sort_by_score<'a, E>(
    records: impl Iterator<Item = &'a MarketRecord>,
    mode: RankMode,
    engagement: &E,
) -> Vec<&'a MarketRecord>
where
    E: EngagementLookup + ?Sized,
{
    let mut scored: Vec<(f64, &MarketRecord)> = records
        .map(|m| (score(m, mode, engagement), m))
        .collect();

    // `sort_by` is stable, so equal scores keep their input order.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    scored.into_iter().map(|(_, m)| m).collect()
}
