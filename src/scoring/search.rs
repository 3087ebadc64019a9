use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::engine::{calculate_metrics, Metrics};
use crate::design::{AutomationLevel, DesignState, FulfilmentLogic, StorageModel};

/// A design paired with its scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub design: DesignState,
    pub metrics: Metrics,
}

impl Candidate {
    pub fn evaluate(design: DesignState) -> Self {
        Self {
            design,
            metrics: calculate_metrics(&design),
        }
    }

    pub fn score(&self) -> f64 {
        self.metrics.efficiency_index
    }
}

/// What to recommend when nothing scores strictly higher than the human's design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendPolicy {
    /// Prefer a different design that scores at least as well, so the two
    /// sides of a comparison differ whenever an equal alternative exists.
    #[default]
    DistinctAlternative,
    /// Only recommend something else when it scores strictly higher;
    /// otherwise report the human's own design.
    StrictImprovement,
}

impl RecommendPolicy {
    pub fn key(self) -> &'static str {
        match self {
            RecommendPolicy::DistinctAlternative => "distinct-alternative",
            RecommendPolicy::StrictImprovement => "strict-improvement",
        }
    }
}

/// Every possible design, storage first, then fulfilment, then automation.
pub fn enumerate_designs() -> Vec<DesignState> {
    let mut designs = Vec::with_capacity(27);
    for storage in StorageModel::ALL {
        for fulfilment in FulfilmentLogic::ALL {
            for automation in AutomationLevel::ALL {
                designs.push(DesignState::new(storage, fulfilment, automation));
            }
        }
    }
    designs
}

fn by_score_descending(a: &Candidate, b: &Candidate) -> Ordering {
    b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal)
}

/// All designs scored and sorted best first. Equal scores keep enumeration order.
pub fn rank_designs() -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = enumerate_designs()
        .into_iter()
        .map(Candidate::evaluate)
        .collect();
    ranked.sort_by(by_score_descending);
    ranked
}

/// Pick the recommendation for `human` out of an already ranked slice.
///
/// Returns `None` only when `ranked` is empty.
pub fn select_recommendation(
    ranked: &[Candidate],
    human: &DesignState,
    human_metrics: &Metrics,
    policy: RecommendPolicy,
) -> Option<Candidate> {
    let top = ranked.first()?;
    let human_score = human_metrics.efficiency_index;

    if top.score() > human_score {
        return Some(*top);
    }

    match policy {
        RecommendPolicy::DistinctAlternative => {
            let alternative = ranked
                .iter()
                .find(|c| c.score() >= human_score && c.design != *human);
            Some(*alternative.unwrap_or(top))
        }
        RecommendPolicy::StrictImprovement => Some(Candidate {
            design: *human,
            metrics: *human_metrics,
        }),
    }
}

/// Best design to show next to the human's, using the default policy.
pub fn recommend(human: &DesignState, human_metrics: &Metrics) -> Candidate {
    recommend_with_policy(human, human_metrics, RecommendPolicy::default())
}

pub fn recommend_with_policy(
    human: &DesignState,
    human_metrics: &Metrics,
    policy: RecommendPolicy,
) -> Candidate {
    let ranked = rank_designs();
    // The enumeration is never empty, so a recommendation always exists.
    select_recommendation(&ranked, human, human_metrics, policy).unwrap_or(Candidate {
        design: *human,
        metrics: *human_metrics,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// The recommendation scores strictly higher.
    Improved,
    /// A different design scores exactly the same.
    Matched,
    /// Nothing beats the human's design.
    Optimal,
}

impl Verdict {
    pub fn message(self) -> &'static str {
        match self {
            Verdict::Improved => "AI found a more efficient design",
            Verdict::Matched => "AI found a different design with the same efficiency",
            Verdict::Optimal => "Your design is already optimal",
        }
    }
}

/// Side-by-side outcome of a human design versus the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub human: Candidate,
    pub recommended: Candidate,
    /// Recommended score minus human score.
    pub delta: f64,
    /// 1-based position of the human design among all designs; ties share a rank.
    pub human_rank: usize,
    pub total_designs: usize,
    pub verdict: Verdict,
}

pub fn compare(human: &DesignState, policy: RecommendPolicy) -> Comparison {
    let ranked = rank_designs();
    let human = Candidate::evaluate(*human);
    let recommended = select_recommendation(&ranked, &human.design, &human.metrics, policy)
        .unwrap_or(human);

    let delta = recommended.score() - human.score();
    let human_rank = 1 + ranked.iter().filter(|c| c.score() > human.score()).count();

    let verdict = if delta > 0.0 {
        Verdict::Improved
    } else if recommended.design == human.design {
        Verdict::Optimal
    } else {
        Verdict::Matched
    };

    Comparison {
        human,
        recommended,
        delta,
        human_rank,
        total_designs: ranked.len(),
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimum() -> DesignState {
        DesignState::new(
            StorageModel::HighAccessibility,
            FulfilmentLogic::ContinuousFlow,
            AutomationLevel::MechanizationHeavy,
        )
    }

    fn synthetic(design: DesignState, score: f64) -> Candidate {
        let mut metrics = calculate_metrics(&design);
        metrics.efficiency_index = score;
        Candidate { design, metrics }
    }

    #[test]
    fn test_enumerate_has_27_unique_designs() {
        let designs = enumerate_designs();
        assert_eq!(designs.len(), 27);
        let unique: std::collections::HashSet<_> = designs.iter().collect();
        assert_eq!(unique.len(), 27);
    }

    #[test]
    fn test_enumeration_order() {
        let designs = enumerate_designs();
        assert_eq!(
            designs[0],
            DesignState::new(
                StorageModel::HighDensity,
                FulfilmentLogic::Wave,
                AutomationLevel::LabourDriven
            )
        );
        assert_eq!(
            designs[1],
            DesignState::new(
                StorageModel::HighDensity,
                FulfilmentLogic::Wave,
                AutomationLevel::SelectiveAutomation
            )
        );
        assert_eq!(
            designs[26],
            DesignState::new(
                StorageModel::Hybrid,
                FulfilmentLogic::Batch,
                AutomationLevel::MechanizationHeavy
            )
        );
    }

    #[test]
    fn test_every_design_is_enumerated() {
        let designs = enumerate_designs();
        for d in &designs {
            assert!(designs.contains(d));
        }
        assert!(designs.contains(&DesignState::default()));
    }

    #[test]
    fn test_rank_is_descending() {
        let ranked = rank_designs();
        assert_eq!(ranked.len(), 27);
        for pair in ranked.windows(2) {
            assert!(pair[0].score() >= pair[1].score());
        }
    }

    #[test]
    fn test_unique_optimum_at_top() {
        let ranked = rank_designs();
        assert_eq!(ranked[0].design, optimum());
        assert!((ranked[0].score() - 72.15).abs() < 1e-9);
        assert!(ranked[0].score() > ranked[1].score());
    }

    #[test]
    fn test_recommend_default_design_returns_optimum() {
        let human = DesignState::default();
        let rec = recommend(&human, &calculate_metrics(&human));
        assert_eq!(rec.design, optimum());
        assert!(rec.score() > calculate_metrics(&human).efficiency_index);
    }

    #[test]
    fn test_recommend_optimum_returns_itself() {
        let human = optimum();
        let metrics = calculate_metrics(&human);
        let rec = recommend(&human, &metrics);
        assert_eq!(rec.design, human);
        assert_eq!(rec.metrics, metrics);
    }

    #[test]
    fn test_recommend_always_from_enumeration() {
        let designs = enumerate_designs();
        for human in &designs {
            let rec = recommend(human, &calculate_metrics(human));
            assert!(designs.contains(&rec.design));
            assert_eq!(rec.metrics, calculate_metrics(&rec.design));
            assert!(rec.score() >= calculate_metrics(human).efficiency_index);
        }
    }

    #[test]
    fn test_tie_prefers_first_distinct_candidate() {
        let designs = enumerate_designs();
        let human = synthetic(designs[5], 70.0);
        // Sorted best first: the human ties with two others and is listed first.
        let ranked = vec![
            human,
            synthetic(designs[2], 70.0),
            synthetic(designs[9], 70.0),
            synthetic(designs[0], 40.0),
        ];
        let rec = select_recommendation(
            &ranked,
            &human.design,
            &human.metrics,
            RecommendPolicy::DistinctAlternative,
        )
        .unwrap();
        assert_eq!(rec.design, designs[2]);
    }

    #[test]
    fn test_strict_improvement_keeps_human_on_tie() {
        let designs = enumerate_designs();
        let human = synthetic(designs[5], 70.0);
        let ranked = vec![human, synthetic(designs[2], 70.0)];
        let rec = select_recommendation(
            &ranked,
            &human.design,
            &human.metrics,
            RecommendPolicy::StrictImprovement,
        )
        .unwrap();
        assert_eq!(rec.design, human.design);
    }

    #[test]
    fn test_strictly_better_wins_under_both_policies() {
        let designs = enumerate_designs();
        let human = synthetic(designs[5], 60.0);
        let ranked = vec![synthetic(designs[7], 65.0), human];
        for policy in [RecommendPolicy::DistinctAlternative, RecommendPolicy::StrictImprovement] {
            let rec = select_recommendation(&ranked, &human.design, &human.metrics, policy).unwrap();
            assert_eq!(rec.design, designs[7]);
        }
    }

    #[test]
    fn test_unique_human_falls_back_to_top() {
        let designs = enumerate_designs();
        let human = synthetic(designs[3], 80.0);
        let ranked = vec![human, synthetic(designs[4], 50.0)];
        let rec = select_recommendation(
            &ranked,
            &human.design,
            &human.metrics,
            RecommendPolicy::DistinctAlternative,
        )
        .unwrap();
        assert_eq!(rec.design, human.design);
    }

    #[test]
    fn test_select_on_empty_slice() {
        let human = DesignState::default();
        let rec = select_recommendation(
            &[],
            &human,
            &calculate_metrics(&human),
            RecommendPolicy::DistinctAlternative,
        );
        assert!(rec.is_none());
    }

    #[test]
    fn test_compare_default_design() {
        let comparison = compare(&DesignState::default(), RecommendPolicy::DistinctAlternative);
        assert_eq!(comparison.verdict, Verdict::Improved);
        assert_eq!(comparison.recommended.design, optimum());
        assert_eq!(comparison.human_rank, 5);
        assert_eq!(comparison.total_designs, 27);
        // 72.15 - 68.35
        assert!((comparison.delta - 3.8).abs() < 1e-9);
    }

    #[test]
    fn test_compare_optimum() {
        let comparison = compare(&optimum(), RecommendPolicy::DistinctAlternative);
        assert_eq!(comparison.verdict, Verdict::Optimal);
        assert_eq!(comparison.human_rank, 1);
        assert_eq!(comparison.delta, 0.0);
    }

    #[test]
    fn test_compare_worst_design_ranks_last() {
        let worst = DesignState::new(
            StorageModel::HighDensity,
            FulfilmentLogic::Wave,
            AutomationLevel::LabourDriven,
        );
        let comparison = compare(&worst, RecommendPolicy::StrictImprovement);
        assert_eq!(comparison.human_rank, 27);
        assert_eq!(comparison.verdict, Verdict::Improved);
    }

    #[test]
    fn test_policy_serde_keys() {
        let policy: RecommendPolicy = serde_saphyr::from_str("strict-improvement").unwrap();
        assert_eq!(policy, RecommendPolicy::StrictImprovement);
        assert_eq!(RecommendPolicy::default().key(), "distinct-alternative");
    }
}
