//! Deterministic ranking of evaluations.

use crate::reasoning::critique::{Evaluation, RankEntry};
use crate::scoring::rubric::MAX_WEIGHTED_TOTAL;

/// Rank evaluations by weighted total, highest first.
///
/// The sort is stable: equal totals keep their input order, so the same
/// evaluations always produce the same ranking.
pub fn rank_evaluations(evaluations: &[Evaluation]) -> Vec<RankEntry> {
    let mut ordered: Vec<&Evaluation> = evaluations.iter().collect();
    ordered.sort_by(|a, b| b.weighted_total_score.total_cmp(&a.weighted_total_score));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, eval)| {
            let rank = i + 1;
            RankEntry {
                rank,
                agent_id: eval.agent_id,
                weighted_total_score: eval.weighted_total_score,
                rationale: rationale(eval, rank),
            }
        })
        .collect()
}

fn rationale(eval: &Evaluation, rank: usize) -> String {
    let score = format!("{:.2}/{:.1}", eval.weighted_total_score, MAX_WEIGHTED_TOTAL);
    let strongest = eval.strongest_rubric().display_name();
    match rank {
        1 => format!("Top scorer with {score} weighted points, excellent {strongest}"),
        2 | 3 => format!("Strong candidate with {score} weighted points, good {strongest}"),
        _ => format!("Moderate performance with {score} weighted points, best at {strongest}"),
    }
}
