/// Order bridge - the merged dispatcher and its bookkeeping
mod core;
mod dispatch;
mod stats;

pub use self::core::OrderBridge;
pub use stats::DispatchStats;
