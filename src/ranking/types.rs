use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Cap on every ranked view.
pub const MAX_RANKED: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RankMode {
    /// Volume weighted by how contested the market is
    #[default]
    Trending,
    /// Pure 24h volume
    Volume,
    /// Discussion activity; markets without comments are dropped
    Social,
    /// Longshots and near-certainties; the 20-80% band is dropped
    Odds,
}

impl RankMode {
    pub const ALL: [RankMode; 4] = [Self::Trending, Self::Volume, Self::Social, Self::Odds];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::Volume => "volume",
            Self::Social => "social",
            Self::Odds => "odds",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Trending => "Most active controversial markets with high volume",
            Self::Volume => "Highest 24-hour trading volume markets",
            Self::Social => "Most discussed markets by comment count and likes",
            Self::Odds => "Extreme probabilities - longshots and sure things",
        }
    }

    /// Trending and social views show their first entry as a featured item.
    pub fn has_hero(&self) -> bool {
        matches!(self, Self::Trending | Self::Social)
    }
}

impl fmt::Display for RankMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ranking mode '{0}' (expected trending, volume, social or odds)")]
pub struct UnknownRankMode(pub String);

impl FromStr for RankMode {
    type Err = UnknownRankMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRankMode(s.to_string()))
    }
}
