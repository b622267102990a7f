pub mod cache;
pub mod counter_ops;

pub use cache::health::{health_check, memo_stats};
pub use counter_ops::{cached_count, raw_count};
