pub mod rules;
pub mod synthesis;

pub use synthesis::synthesize;
