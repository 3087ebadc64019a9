use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::design::DesignState;
use crate::scoring::{Candidate, Comparison, MetricKind, Metrics, MetricsBreakdown, MetricVector, Verdict};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Bar width for metric rows: a quarter of the terminal, between 10 and 30 cells.
/// Pipes get the minimum.
fn bar_width() -> usize {
    get_terminal_width()
        .map(|w| (w / 4).clamp(10, 30))
        .unwrap_or(10)
}

/// Format an efficiency score with two decimals
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Format a score difference with an explicit sign ("+3.80", "0.00")
pub fn format_delta(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{:.2}", delta)
    } else if delta < 0.0 {
        format!("{:.2}", delta)
    } else {
        "0.00".to_string()
    }
}

/// Render a 0-100 value as a fixed-width bar of filled and empty cells
pub fn metric_bar(value: f64, width: usize) -> String {
    let ratio = (value / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// How favourable a metric value is on a 0-100 scale (burdens inverted)
pub fn goodness(kind: MetricKind, value: f64) -> f64 {
    if kind.is_burden() {
        100.0 - value
    } else {
        value
    }
}

fn colorize_by_goodness(text: &str, goodness: f64) -> String {
    if goodness >= 70.0 {
        text.green().to_string()
    } else if goodness >= 40.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

fn format_metric_rows(metrics: &Metrics, use_colors: bool, width: usize) -> Vec<String> {
    MetricKind::ALL
        .iter()
        .map(|kind| {
            let value = metrics.value(*kind);
            let bar = metric_bar(value, width);
            let hint = if kind.is_burden() { "(lower is better)" } else { "" };
            if use_colors {
                format!(
                    "  {:<18} {:>5.0}  {}  {}",
                    kind.label(),
                    value,
                    colorize_by_goodness(&bar, goodness(*kind, value)),
                    hint.dimmed()
                )
            } else {
                format!("  {:<18} {:>5.0}  {}  {}", kind.label(), value, bar, hint)
                    .trim_end()
                    .to_string()
            }
        })
        .collect()
}

/// Format one design with its metrics as a multi-line block
pub fn format_design_detail(candidate: &Candidate, use_colors: bool) -> String {
    let design = &candidate.design;
    let mut lines = Vec::new();

    if use_colors {
        lines.push(design.summary().bold().to_string());
    } else {
        lines.push(design.summary());
    }
    lines.push(format!("  Storage:    {}", design.storage_model));
    lines.push(format!("  Fulfilment: {}", design.fulfilment_logic));
    lines.push(format!("  Automation: {}", design.automation_level));
    lines.push(String::new());
    lines.extend(format_metric_rows(&candidate.metrics, use_colors, bar_width()));
    lines.push(String::new());

    let score = format_score(candidate.score());
    if use_colors {
        lines.push(format!("  Efficiency index: {}", score.bold()));
    } else {
        lines.push(format!("  Efficiency index: {}", score));
    }

    lines.join("\n")
}

fn format_vector(v: &MetricVector) -> String {
    v.components()
        .iter()
        .map(|(_, value)| format!("{:>4}", value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_signed_vector(v: &MetricVector) -> String {
    v.components()
        .iter()
        .map(|(_, value)| format!("{:>+4}", value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format the factor-by-factor derivation of a design's metrics
pub fn format_breakdown(breakdown: &MetricsBreakdown, use_colors: bool) -> String {
    let mut lines = Vec::new();
    let header = "                                    thru cost cong scal labr";
    if use_colors {
        lines.push(header.dimmed().to_string());
    } else {
        lines.push(header.to_string());
    }
    lines.push(format!("  {:<32}  {}", "Baseline", format_vector(&breakdown.baseline)));
    for factor in &breakdown.factors {
        let name = format!("{}: {}", factor.decision, factor.option);
        lines.push(format!("  {:<32}  {}", name, format_signed_vector(&factor.delta)));
    }
    lines.push(format!("  {:<32}  {}", "Raw total", format_vector(&breakdown.raw)));

    for clamp in &breakdown.clamps {
        let line = format!(
            "  {} clamped {} -> {}",
            clamp.metric.label(),
            clamp.raw,
            clamp.clamped
        );
        if use_colors {
            lines.push(line.yellow().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Format the human vs AI comparison
pub fn format_comparison(comparison: &Comparison, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let human_title = "Your design";
    let ai_title = "AI design";
    if use_colors {
        lines.push(human_title.cyan().bold().to_string());
    } else {
        lines.push(human_title.to_string());
    }
    lines.push(format_design_detail(&comparison.human, use_colors));
    lines.push(format!(
        "  Rank: {} of {}",
        comparison.human_rank, comparison.total_designs
    ));
    lines.push(String::new());

    if use_colors {
        lines.push(ai_title.magenta().bold().to_string());
    } else {
        lines.push(ai_title.to_string());
    }
    lines.push(format_design_detail(&comparison.recommended, use_colors));
    lines.push(String::new());

    let verdict = format!(
        "{} ({})",
        comparison.verdict.message(),
        format_delta(comparison.delta)
    );
    if use_colors {
        let colored = match comparison.verdict {
            Verdict::Improved => verdict.yellow().bold().to_string(),
            Verdict::Matched => verdict.cyan().bold().to_string(),
            Verdict::Optimal => verdict.green().bold().to_string(),
        };
        lines.push(colored);
    } else {
        lines.push(verdict);
    }

    lines.join("\n")
}

/// Format ranked designs as a table: Index, Score, Bar, Design, marker
/// The human design is marked with "<- you"
pub fn format_ranked_table(ranked: &[Candidate], human: &DesignState, use_colors: bool) -> String {
    if ranked.is_empty() {
        return "No designs to rank.".to_string();
    }

    let width = bar_width();

    ranked
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>6}", format_score(candidate.score()));
            let bar = metric_bar(candidate.score(), width);
            let is_human = candidate.design == *human;
            let marker = if is_human { "  <- you" } else { "" };

            if use_colors {
                let summary = if is_human {
                    candidate.design.summary().cyan().bold().to_string()
                } else {
                    candidate.design.summary()
                };
                format!(
                    "{} {}  {}  {}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    colorize_by_goodness(&bar, candidate.score()),
                    summary,
                    marker.cyan()
                )
            } else {
                format!(
                    "{} {}  {}  {}{}",
                    index_str,
                    score_str,
                    bar,
                    candidate.design.summary(),
                    marker
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked designs as tab-separated values for scripting
/// Columns: rank, score, storage, fulfilment, automation (no headers, no colors)
pub fn format_tsv(ranked: &[Candidate]) -> String {
    ranked
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                idx + 1,
                format_score(candidate.score()),
                candidate.design.storage_model.key(),
                candidate.design.fulfilment_logic.key(),
                candidate.design.automation_level.key()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one design's metrics as tab-separated key/value lines
pub fn format_metrics_tsv(candidate: &Candidate) -> String {
    let mut lines: Vec<String> = MetricKind::ALL
        .iter()
        .map(|kind| format!("{}\t{}", kind.label(), candidate.metrics.value(*kind)))
        .collect();
    lines.push(format!("Efficiency index\t{}", format_score(candidate.score())));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{AutomationLevel, FulfilmentLogic, StorageModel};
    use crate::scoring::{compare, explain_metrics, rank_designs, RecommendPolicy};

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(68.35), "68.35");
        assert_eq!(format_score(72.0), "72.00");
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(3.8), "+3.80");
        assert_eq!(format_delta(-1.25), "-1.25");
        assert_eq!(format_delta(0.0), "0.00");
    }

    #[test]
    fn test_metric_bar() {
        assert_eq!(metric_bar(50.0, 10), "█████░░░░░");
        assert_eq!(metric_bar(0.0, 4), "░░░░");
        assert_eq!(metric_bar(100.0, 4), "████");
        assert_eq!(metric_bar(150.0, 4), "████");
    }

    #[test]
    fn test_goodness_inverts_burdens() {
        assert_eq!(goodness(MetricKind::Throughput, 80.0), 80.0);
        assert_eq!(goodness(MetricKind::CostIndex, 80.0), 20.0);
    }

    #[test]
    fn test_format_design_detail() {
        let candidate = Candidate::evaluate(DesignState::default());
        let result = format_design_detail(&candidate, false);
        assert!(result.starts_with("Hybrid / Continuous Flow / Selective Automation"));
        assert!(result.contains("Storage:    Hybrid"));
        assert!(result.contains("Throughput"));
        assert!(result.contains("(lower is better)"));
        assert!(result.contains("Efficiency index: 68.35"));
    }

    #[test]
    fn test_format_breakdown_lists_factors_and_clamps() {
        let design = DesignState::new(
            StorageModel::HighDensity,
            FulfilmentLogic::Wave,
            AutomationLevel::LabourDriven,
        );
        let result = format_breakdown(&explain_metrics(&design), false);
        assert!(result.contains("Baseline"));
        assert!(result.contains("Storage: High Density"));
        assert!(result.contains("Fulfilment: Wave"));
        assert!(result.contains("Automation: Labour Driven"));
        assert!(result.contains("Labor sensitivity clamped 102 -> 100"));
    }

    #[test]
    fn test_format_comparison() {
        let comparison = compare(&DesignState::default(), RecommendPolicy::DistinctAlternative);
        let result = format_comparison(&comparison, false);
        assert!(result.contains("Your design"));
        assert!(result.contains("AI design"));
        assert!(result.contains("Rank: 5 of 27"));
        assert!(result.contains("High Accessibility / Continuous Flow / Mechanization Heavy"));
        assert!(result.contains("AI found a more efficient design (+3.80)"));
    }

    #[test]
    fn test_format_ranked_table_marks_human() {
        let ranked = rank_designs();
        let result = format_ranked_table(&ranked, &DesignState::default(), false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 27);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[0].contains("72.15"));
        assert!(lines[4].contains("68.35"));
        assert!(lines[4].ends_with("<- you"));
        assert!(!lines[0].contains("<- you"));
    }

    #[test]
    fn test_format_ranked_table_empty() {
        assert_eq!(
            format_ranked_table(&[], &DesignState::default(), false),
            "No designs to rank."
        );
    }

    #[test]
    fn test_format_tsv() {
        let ranked = rank_designs();
        let result = format_tsv(&ranked[..2]);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "1\t72.15\thigh-accessibility\tcontinuous-flow\tmechanization-heavy"
        );
        assert_eq!(lines[1].split('\t').count(), 5);
    }

    #[test]
    fn test_format_metrics_tsv() {
        let result = format_metrics_tsv(&Candidate::evaluate(DesignState::default()));
        assert!(result.contains("Throughput\t86"));
        assert!(result.ends_with("Efficiency index\t68.35"));
    }
}
