use clap::{Parser, Subcommand};

use crate::ranking::RankMode;

#[derive(Debug, Parser)]
#[command(name = "market-pulse", version, about = "Ranked prediction-market views with plain-language odds analysis")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the feed and re-render the ranked view on every refresh
    Watch {
        /// Ranking mode; defaults to the configured mode
        #[arg(short, long, value_enum)]
        mode: Option<RankMode>,
        /// Sort every market by the mode's score without its filter
        #[arg(long)]
        all: bool,
        /// Skip the live feed and use the demo markets
        #[arg(long)]
        demo: bool,
    },
    /// Fetch once and print the ranked view
    Rank {
        #[arg(short, long, value_enum)]
        mode: Option<RankMode>,
        #[arg(long)]
        all: bool,
        #[arg(long)]
        demo: bool,
    },
    /// Fetch once and print the analysis for one market
    Explain {
        /// Market identifier as shown in the ranked view
        market_id: String,
        #[arg(long)]
        demo: bool,
    },
}

impl Command {
    pub fn demo(&self) -> bool {
        match self {
            Self::Watch { demo, .. } | Self::Rank { demo, .. } | Self::Explain { demo, .. } => *demo,
        }
    }
}
