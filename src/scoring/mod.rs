pub mod engine;
pub mod factors;
pub mod search;

pub use engine::{calculate_metrics, explain_metrics, raw_totals, Metrics, MetricsBreakdown};
pub use factors::{Band, MetricKind, MetricVector};
pub use search::{
    compare, enumerate_designs, rank_designs, recommend, recommend_with_policy,
    select_recommendation, Candidate, Comparison, RecommendPolicy, Verdict,
};
