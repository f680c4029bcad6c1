// Paired Table Comparison — same seeds and compositions, different tables
// Quantifies the completion uplift of de-risked gates over the default
// lifecycle

use portfolio_engine::{Portfolio, ProjectState, StateTally, TransitionTable};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::portfolios::PortfolioGenerator;
use crate::scenarios::derisked_table;

#[derive(Debug, Clone, Serialize)]
pub struct TableComparison {
    pub runs: usize,
    pub projects: u32,
    pub rollouts: u32,
    pub baseline_completed_share: f64,
    pub derisked_completed_share: f64,
    pub uplift_pct: f64,
    pub passes: bool,
}

/// Run paired comparison: identical seeds and all-IDEA compositions against
/// the default and the de-risked table. Only the table differs, so the
/// completion gap isolates the gate probabilities.
///
/// Analytically the default completes at 0.3024 and the de-risked variant at
/// 0.6498, a ~115% uplift; the check requires at least +50%.
pub fn run_table_comparison(
    projects: u32,
    rollouts: u32,
    runs: usize,
    base_seed: u64,
) -> TableComparison {
    let baseline =
        mean_completed_share(TransitionTable::default, projects, rollouts, runs, base_seed);
    let derisked = mean_completed_share(derisked_table, projects, rollouts, runs, base_seed);

    let uplift_pct = if baseline > 0.0 {
        (derisked - baseline) / baseline * 100.0
    } else {
        0.0
    };

    TableComparison {
        runs,
        projects,
        rollouts,
        baseline_completed_share: baseline,
        derisked_completed_share: derisked,
        uplift_pct,
        passes: uplift_pct >= 50.0,
    }
}

fn mean_completed_share(
    table: fn() -> TransitionTable,
    projects: u32,
    rollouts: u32,
    runs: usize,
    base_seed: u64,
) -> f64 {
    let mut shares = Vec::with_capacity(runs);
    for i in 0..runs {
        let seed = base_seed + i as u64;

        let mut generator = PortfolioGenerator::new(ChaCha8Rng::seed_from_u64(seed));
        let mut portfolio = Portfolio::new(table());
        for project in generator.generate_uniform(projects, ProjectState::Idea) {
            portfolio.add_project(project);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let tallies = portfolio.simulate(rollouts, &mut rng);
        let totals = StateTally::sum(&tallies);
        let slots = (projects as u64 * rollouts as u64).max(1) as f64;
        shares.push(totals.count(ProjectState::Completed) as f64 / slots);
    }
    shares.iter().sum::<f64>() / runs.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derisked_uplift() {
        let comparison = run_table_comparison(10, 200, 3, 42);
        assert!(
            comparison.derisked_completed_share > comparison.baseline_completed_share,
            "de-risked gates must complete more often: {} vs {}",
            comparison.derisked_completed_share,
            comparison.baseline_completed_share
        );
        assert!(comparison.passes);
    }
}
