//! Ordered rule tables behind the narrative.
//!
//! Every table is evaluated first-match-wins. A [`Ladder`] always carries an
//! `otherwise` entry, so selection is total.

use crate::data::types::MarketMetrics;

/// One `(predicate, outcome)` pair.
pub struct Rule<C: ?Sized + 'static, O: 'static> {
    pub when: fn(&C) -> bool,
    pub then: O,
}

/// Rules tried in order, with a fallback when none applies.
pub struct Ladder<C: ?Sized + 'static, O: 'static> {
    pub rules: &'static [Rule<C, O>],
    pub otherwise: O,
}

impl<C: ?Sized, O> Ladder<C, O> {
    pub fn select(&self, ctx: &C) -> &O {
        self.rules
            .iter()
            .find(|rule| (rule.when)(ctx))
            .map(|rule| &rule.then)
            .unwrap_or(&self.otherwise)
    }
}

/// Paragraph choice keyed on YES probability (percent).
pub type ProseLadder = Ladder<f64, &'static str>;

/// Fragment choice over all metrics, rendered with the numbers it mentions.
pub type FragmentLadder = Ladder<MarketMetrics, fn(&MarketMetrics) -> String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Crypto,
    Rates,
    Equities,
    ArtificialIntelligence,
    Politics,
    Employment,
    Tech,
    General,
}

impl Topic {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Crypto => "crypto",
            Self::Rates => "interest rates",
            Self::Equities => "equities",
            Self::ArtificialIntelligence => "artificial intelligence",
            Self::Politics => "politics",
            Self::Employment => "employment",
            Self::Tech => "tech",
            Self::General => "general",
        }
    }
}

pub struct TopicRule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
    pub ladder: ProseLadder,
}

impl TopicRule {
    /// `question` must already be lowercased.
    fn matches(&self, question: &str) -> bool {
        self.keywords.iter().any(|keyword| question.contains(keyword))
    }
}

/// Topics in priority order. Keywords match as plain substrings of the
/// lowercased question.
pub static TOPICS: [TopicRule; 7] = [
    TopicRule {
        topic: Topic::Crypto,
        keywords: &["bitcoin", "crypto", "btc"],
        ladder: Ladder {
            rules: &[
                Rule {
                    when: |p| *p > 60.0,
                    then: "The crypto market is showing renewed institutional confidence. With Bitcoin ETFs drawing record inflows and major corporations adding BTC to balance sheets, traders are pricing in continued momentum. The Fed's monetary policy stance and global liquidity conditions remain the dominant macro drivers.",
                },
                Rule {
                    when: |p| *p > 40.0,
                    then: "Bitcoin sits between competing forces: institutional adoption versus regulatory uncertainty. Traders hedge between the \"digital gold\" narrative and concerns about monetary tightening dampening risk appetite across all asset classes.",
                },
            ],
            otherwise: "Market sentiment reflects skepticism about near-term crypto rallies. Regulatory headwinds, macro uncertainty, and profit-taking after recent gains weigh on conviction. Traders await clearer catalysts before repositioning.",
        },
    },
    TopicRule {
        topic: Topic::Rates,
        keywords: &["fed", "interest rate", "rate cut"],
        ladder: Ladder {
            rules: &[Rule {
                when: |p| *p > 60.0,
                then: "Economic data signals the Fed has room to ease. Traders read recent inflation trends, employment figures, and Fed commentary as greenlight for rate cuts. The narrative: monetary policy pivoting from restrictive to accommodative as inflation pressures subside.",
            }],
            otherwise: "The market bets on Fed patience despite cooling inflation. The central bank's \"higher for longer\" messaging and concerns about re-accelerating inflation keep rate cut expectations in check. Traders price in a cautious Fed that won't rush to ease.",
        },
    },
    TopicRule {
        topic: Topic::Equities,
        keywords: &["s&p", "stock", "market", "500"],
        ladder: Ladder {
            rules: &[Rule {
                when: |p| *p > 60.0,
                then: "Equity markets ride a wave of optimism. Strong corporate earnings, AI-driven productivity narratives, and expectations of economic resilience support elevated valuations. Traders bet that markets can sustain premium multiples despite macro uncertainties.",
            }],
            otherwise: "Caution creeps into equity markets. Concerns about stretched valuations, geopolitical risks, or economic slowdown temper bullish sentiment. The market prices in the possibility that current levels are unsustainable without stronger fundamental support.",
        },
    },
    TopicRule {
        topic: Topic::ArtificialIntelligence,
        keywords: &["ai", "agi", "chatgpt", "breakthrough"],
        ladder: Ladder {
            rules: &[Rule {
                when: |p| *p > 40.0,
                then: "The AI arms race accelerates. With major labs burning billions on compute and talent, traders believe we're approaching capability inflection points. The narrative: competition breeds innovation, and someone will achieve a breakthrough sooner rather than later.",
            }],
            otherwise: "Despite hype cycles, traders are skeptical of near-term AGI breakthroughs. The gap between current narrow AI and true artificial general intelligence remains vast. The market prices in reality that fundamental research takes time, regardless of capital deployed.",
        },
    },
    TopicRule {
        topic: Topic::Politics,
        keywords: &["trump", "election", "political"],
        ladder: Ladder {
            rules: &[],
            otherwise: "Political prediction markets are uniquely sentiment-driven. Traders weigh polling data, campaign momentum, economic conditions, and historical precedents. The macro context includes voter sentiment on economy, geopolitical stability, and cultural issues shaping electoral outcomes.",
        },
    },
    TopicRule {
        topic: Topic::Employment,
        keywords: &["unemployment", "jobs", "employment"],
        ladder: Ladder {
            rules: &[Rule {
                when: |p| *p > 50.0,
                then: "Labor market softness emerges in the data. Leading indicators like jobless claims, job openings, and hiring plans signal potential weakness ahead. Traders connect this to broader economic deceleration and implications for both monetary policy and consumer spending.",
            }],
            otherwise: "The jobs market shows resilience. Despite rate hikes and recession fears, employment remains robust. Traders see this strength reflecting fundamental economic health, though it also keeps pressure on the Fed to maintain restrictive policy longer.",
        },
    },
    TopicRule {
        topic: Topic::Tech,
        keywords: &["apple", "tesla", "spacex", "tech"],
        ladder: Ladder {
            rules: &[],
            otherwise: "Tech sector dynamics reflect broader innovation cycles and market appetite for growth stories. Traders balance enthusiasm for breakthrough products against execution risks, regulatory pressures, and competitive threats. Individual company outcomes tie to both sector-wide trends and company-specific catalysts.",
        },
    },
];

/// Confidence tiers for questions no topic claims.
pub static GENERAL: ProseLadder = Ladder {
    rules: &[
        Rule {
            when: |p| *p > 65.0,
            then: "Strong consensus forms around this outcome. Traders interpret recent signals and trends as pointing decisively in one direction. The market prices in high confidence based on visible catalysts and momentum.",
        },
        Rule {
            when: |p| *p > 50.0,
            then: "Traders see slightly higher probability of this outcome, but meaningful uncertainty remains. Multiple scenarios are plausible depending on how key variables evolve in coming weeks.",
        },
        Rule {
            when: |p| *p > 35.0,
            then: "The market leans against this outcome while acknowledging it remains possible. Traders weigh contrary evidence and see the balance of probabilities tilt in the other direction.",
        },
    ],
    otherwise: "Strong skepticism dominates. Current trajectories, available evidence, and historical patterns suggest this outcome is unlikely. Traders would need significant unexpected developments to shift their view.",
};

/// First topic whose keywords appear in the question.
pub fn classify(question: &str) -> Topic {
    let question = question.to_lowercase();
    TOPICS
        .iter()
        .find(|rule| rule.matches(&question))
        .map(|rule| rule.topic)
        .unwrap_or(Topic::General)
}

pub fn macro_ladder(topic: Topic) -> &'static ProseLadder {
    TOPICS
        .iter()
        .find(|rule| rule.topic == topic)
        .map(|rule| &rule.ladder)
        .unwrap_or(&GENERAL)
}

pub static VOLUME: FragmentLadder = Ladder {
    rules: &[
        Rule {
            when: |m| m.volume_24h > 1_000_000.0,
            then: |m| format!(
                "High trading volume (${:.1}M) signals active price discovery. Smart money is positioning, conviction levels are strong enough to move significant capital.",
                m.volume_24h / 1_000_000.0
            ),
        },
        Rule {
            when: |m| m.volume_24h > 100_000.0,
            then: |_| "Moderate volume suggests engaged traders but not mainstream attention.".to_string(),
        },
    ],
    otherwise: |_| "Low volume indicates this remains niche.".to_string(),
};

pub static DISPERSION: ProseLadder = Ladder {
    rules: &[
        Rule {
            when: |p| (45.0..=55.0).contains(p),
            then: "The near 50-50 split reveals information asymmetry: different traders access or weight different signals differently. Each new data point could swing sentiment. This is where alpha lives—in resolving uncertainty before the broader market does.",
        },
        Rule {
            when: |p| *p >= 70.0 || *p <= 30.0,
            then: "The pronounced odds reflect information consensus. Most traders converged on the same interpretation of available data. For contrarians, this creates opportunity if consensus is wrong—but bucking the crowd requires strong conviction in differentiated analysis.",
        },
    ],
    otherwise: "The modest lean suggests informed disagreement. Bulls and bears both have rational cases, creating a tug-of-war in the order book. Watch for catalysts that could shift the balance decisively.",
};

pub static LIQUIDITY: FragmentLadder = Ladder {
    rules: &[
        Rule {
            when: |m| m.liquidity > 500_000.0,
            then: |m| format!(
                "Deep liquidity (${:.0}K) means institutional-grade market structure—positions can be sized meaningfully.",
                m.liquidity / 1_000.0
            ),
        },
        Rule {
            when: |m| m.liquidity > 50_000.0,
            then: |_| "Decent liquidity allows tactical positioning, though large trades would move the market.".to_string(),
        },
    ],
    otherwise: |_| "Thin liquidity means price discovery is vulnerable to single large trades.".to_string(),
};

pub static HORIZON: FragmentLadder = Ladder {
    rules: &[
        Rule {
            when: |m| m.days_until_end <= 7,
            then: |m| format!(
                "With only {} {} left, uncertainty collapses toward binary resolution. Late information could cause sharp moves, creating both risk and opportunity for nimble traders.",
                m.days_until_end,
                day_noun(m.days_until_end)
            ),
        },
        Rule {
            when: |m| m.days_until_end <= 30,
            then: |m| format!(
                "The {}-day window means probabilities can still shift as events unfold, but time decay begins to matter for portfolio managers.",
                m.days_until_end
            ),
        },
    ],
    otherwise: |m| format!(
        "With {} days until resolution, this is a macro bet on trends rather than near-term events. Patient capital has time to be proven right.",
        m.days_until_end
    ),
};

pub fn day_noun(days: i64) -> &'static str {
    if days == 1 { "day" } else { "days" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(yes_prob: f64, volume_24h: f64, liquidity: f64, days_until_end: i64) -> MarketMetrics {
        MarketMetrics {
            yes_prob,
            no_prob: 100.0 - yes_prob,
            volume_24h,
            liquidity,
            days_until_end,
        }
    }

    #[test]
    fn test_classify_each_topic() {
        assert_eq!(classify("Will Bitcoin reach $120,000?"), Topic::Crypto);
        assert_eq!(classify("Will the Fed cut interest rates?"), Topic::Rates);
        assert_eq!(classify("Will the S&P 500 exceed 7,000?"), Topic::Equities);
        assert_eq!(classify("Will OpenAI release ChatGPT-6?"), Topic::ArtificialIntelligence);
        assert_eq!(classify("Will Trump win the Nobel Peace Prize?"), Topic::Politics);
        assert_eq!(classify("Will unemployment exceed 5%?"), Topic::Employment);
        assert_eq!(classify("Will SpaceX land on Mars?"), Topic::Tech);
        assert_eq!(classify("Will it snow in Lisbon?"), Topic::General);
        assert_eq!(classify(""), Topic::General);
    }

    #[test]
    fn test_first_topic_wins() {
        // Mentions both crypto and rates; crypto comes first.
        assert_eq!(classify("Will BTC rally if the Fed cuts?"), Topic::Crypto);
        // "market" belongs to equities, which outranks politics.
        assert_eq!(classify("Will the election move the market?"), Topic::Equities);
    }

    #[test]
    fn test_keywords_are_substrings() {
        // "ai" inside "rain" is enough, as with every keyword.
        assert_eq!(classify("Will it rain tomorrow?"), Topic::ArtificialIntelligence);
        assert_eq!(classify("Will FEDEX deliver?"), Topic::Rates);
    }

    #[test]
    fn test_crypto_ladder_thresholds() {
        let ladder = macro_ladder(Topic::Crypto);
        assert!(ladder.select(&61.0).starts_with("The crypto market is showing"));
        assert!(ladder.select(&60.0).starts_with("Bitcoin sits between"));
        assert!(ladder.select(&40.1).starts_with("Bitcoin sits between"));
        assert!(ladder.select(&40.0).starts_with("Market sentiment reflects skepticism"));
    }

    #[test]
    fn test_general_ladder_tiers() {
        assert!(GENERAL.select(&80.0).starts_with("Strong consensus"));
        assert!(GENERAL.select(&55.0).starts_with("Traders see slightly higher"));
        assert!(GENERAL.select(&40.0).starts_with("The market leans against"));
        assert!(GENERAL.select(&35.0).starts_with("Strong skepticism"));
        assert_eq!(macro_ladder(Topic::General).select(&90.0), GENERAL.select(&90.0));
    }

    #[test]
    fn test_single_paragraph_topics_ignore_probability() {
        let politics = macro_ladder(Topic::Politics);
        assert_eq!(politics.select(&1.0), politics.select(&99.0));
        let tech = macro_ladder(Topic::Tech);
        assert_eq!(tech.select(&1.0), tech.select(&99.0));
    }

    #[test]
    fn test_every_topic_has_a_ladder() {
        for rule in TOPICS.iter() {
            assert!(std::ptr::eq(macro_ladder(rule.topic), &rule.ladder));
        }
    }

    #[test]
    fn test_volume_fragment() {
        let high = metrics(50.0, 2_340_000.0, 0.0, 10);
        assert!((VOLUME.select(&high))(&high).contains("($2.3M)"));

        let moderate = metrics(50.0, 1_000_000.0, 0.0, 10);
        assert!((VOLUME.select(&moderate))(&moderate).starts_with("Moderate volume"));

        let low = metrics(50.0, 100_000.0, 0.0, 10);
        assert!((VOLUME.select(&low))(&low).starts_with("Low volume"));
    }

    #[test]
    fn test_dispersion_bands() {
        assert!(DISPERSION.select(&45.0).starts_with("The near 50-50 split"));
        assert!(DISPERSION.select(&55.0).starts_with("The near 50-50 split"));
        assert!(DISPERSION.select(&70.0).starts_with("The pronounced odds"));
        assert!(DISPERSION.select(&30.0).starts_with("The pronounced odds"));
        assert!(DISPERSION.select(&60.0).starts_with("The modest lean"));
        assert!(DISPERSION.select(&35.0).starts_with("The modest lean"));
    }

    #[test]
    fn test_liquidity_fragment() {
        let deep = metrics(50.0, 0.0, 670_000.0, 10);
        assert!((LIQUIDITY.select(&deep))(&deep).contains("($670K)"));

        let decent = metrics(50.0, 0.0, 500_000.0, 10);
        assert!((LIQUIDITY.select(&decent))(&decent).starts_with("Decent liquidity"));

        let thin = metrics(50.0, 0.0, 50_000.0, 10);
        assert!((LIQUIDITY.select(&thin))(&thin).starts_with("Thin liquidity"));
    }

    #[test]
    fn test_horizon_fragment() {
        let one = metrics(50.0, 0.0, 0.0, 1);
        assert!((HORIZON.select(&one))(&one).starts_with("With only 1 day left"));

        let past = metrics(50.0, 0.0, 0.0, -4);
        assert!((HORIZON.select(&past))(&past).starts_with("With only -4 days left"));

        let month = metrics(50.0, 0.0, 0.0, 30);
        assert!((HORIZON.select(&month))(&month).starts_with("The 30-day window"));

        let long = metrics(50.0, 0.0, 0.0, 31);
        assert!((HORIZON.select(&long))(&long).starts_with("With 31 days until resolution"));
    }

    #[test]
    fn test_day_noun() {
        assert_eq!(day_noun(1), "day");
        assert_eq!(day_noun(0), "days");
        assert_eq!(day_noun(2), "days");
        assert_eq!(day_noun(-1), "days");
    }
}
