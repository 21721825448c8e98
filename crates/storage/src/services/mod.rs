pub mod breakdown_reconciliation;
pub mod change_detection;
pub mod charts;
pub mod credentials;
pub mod hole_stats;
pub mod recompute;
pub mod round_aggregation;
pub mod rounds;
