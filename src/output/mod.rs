pub mod formatter;

pub use formatter::{
    format_breakdown, format_comparison, format_delta, format_design_detail, format_metrics_tsv,
    format_ranked_table, format_score, format_tsv, goodness, metric_bar, should_use_colors,
};
