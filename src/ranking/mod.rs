pub mod engine;
pub mod types;

pub use engine::{rank, rank_unfiltered};
pub use types::RankMode;
