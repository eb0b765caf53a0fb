pub mod orchestrator;

pub use orchestrator::{MarketFeed, MarketSnapshot, RefreshOrchestrator, SnapshotReceiver, SnapshotSource};
