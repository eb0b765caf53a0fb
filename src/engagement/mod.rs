pub mod aggregator;

pub use aggregator::{comment_count, EngagementLookup};
