use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Price used whenever a feed price is missing or unusable.
pub const DEFAULT_PRICE: f64 = 0.5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Normalized snapshot of one prediction market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub id: String,
    pub question: String,
    pub yes_price: f64,
    pub no_price: f64,
    pub volume_24h: f64,
    pub liquidity: f64,
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
    pub is_closed: bool,
    pub is_archived: bool,
}

impl Default for MarketRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            question: String::new(),
            yes_price: DEFAULT_PRICE,
            no_price: 1.0 - DEFAULT_PRICE,
            volume_24h: 0.0,
            liquidity: 0.0,
            end_time: DateTime::<Utc>::default(),
            is_active: false,
            is_closed: false,
            is_archived: false,
        }
    }
}

impl MarketRecord {
    /// Active, not closed and not archived.
    pub fn is_eligible(&self) -> bool {
        self.is_active && !self.is_closed && !self.is_archived
    }

    /// YES probability as a percentage.
    pub fn yes_prob(&self) -> f64 {
        self.yes_price * 100.0
    }

    pub fn no_prob(&self) -> f64 {
        100.0 - self.yes_prob()
    }

    /// 1.0 at a 50/50 split, 0.0 at either extreme.
    pub fn controversy(&self) -> f64 {
        1.0 - (self.yes_price - 0.5).abs() * 2.0
    }

    /// Distance of the YES price from 50/50, in price units.
    pub fn extremity(&self) -> f64 {
        (self.yes_price - 0.5).abs()
    }

    /// Whole days until resolution, rounded up. Zero or negative once the
    /// end time has passed.
    pub fn days_until_end(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.end_time - now).num_milliseconds() as f64;
        (millis / MILLIS_PER_DAY).ceil() as i64
    }
}

/// Every metric the narrative rules look at, computed once per record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketMetrics {
    pub yes_prob: f64,
    pub no_prob: f64,
    pub volume_24h: f64,
    pub liquidity: f64,
    pub days_until_end: i64,
}

impl MarketMetrics {
    pub fn derive(record: &MarketRecord, now: DateTime<Utc>) -> Self {
        Self {
            yes_prob: record.yes_prob(),
            no_prob: record.no_prob(),
            volume_24h: record.volume_24h,
            liquidity: record.liquidity,
            days_until_end: record.days_until_end(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(yes_price: f64) -> MarketRecord {
        MarketRecord {
            id: "m".to_string(),
            yes_price,
            no_price: 1.0 - yes_price,
            is_active: true,
            ..MarketRecord::default()
        }
    }

    #[test]
    fn test_eligibility() {
        let mut m = record(0.5);
        assert!(m.is_eligible());

        m.is_closed = true;
        assert!(!m.is_eligible());

        m.is_closed = false;
        m.is_archived = true;
        assert!(!m.is_eligible());

        m.is_archived = false;
        m.is_active = false;
        assert!(!m.is_eligible());
    }

    #[test]
    fn test_controversy_bounds() {
        assert!((record(0.5).controversy() - 1.0).abs() < 1e-12);
        assert!(record(0.0).controversy().abs() < 1e-12);
        assert!(record(1.0).controversy().abs() < 1e-12);
        assert!((record(0.25).controversy() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_probabilities() {
        let m = record(0.52);
        assert_eq!(format!("{:.1}", m.yes_prob()), "52.0");
        assert_eq!(format!("{:.1}", m.no_prob()), "48.0");
    }

    #[test]
    fn test_days_until_end_rounds_up() {
        let now = Utc::now();
        let mut m = record(0.5);

        m.end_time = now + Duration::days(90);
        assert_eq!(m.days_until_end(now), 90);

        m.end_time = now + Duration::hours(25);
        assert_eq!(m.days_until_end(now), 2);

        m.end_time = now + Duration::minutes(1);
        assert_eq!(m.days_until_end(now), 1);
    }

    #[test]
    fn test_days_until_end_in_the_past() {
        let now = Utc::now();
        let mut m = record(0.5);

        m.end_time = now - Duration::days(3);
        assert_eq!(m.days_until_end(now), -3);

        m.end_time = now - Duration::hours(5);
        assert_eq!(m.days_until_end(now), 0);
    }

    #[test]
    fn test_default_record_uses_price_defaults() {
        let m = MarketRecord::default();
        assert_eq!(m.yes_price, DEFAULT_PRICE);
        assert_eq!(m.no_price, 0.5);
        assert_eq!(m.volume_24h, 0.0);
        assert_eq!(m.liquidity, 0.0);
    }
}
