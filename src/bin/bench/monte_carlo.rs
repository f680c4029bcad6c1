// Monte Carlo Infrastructure — N seeded batches per scenario with
// statistical aggregation: seeds base..base+N-1, mean ± 95% CI per metric

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use portfolio_engine::{Portfolio, ProjectState, StateTally};

use crate::portfolios::PortfolioGenerator;
use crate::report::*;
use crate::scenarios::{Composition, Scenario};
use crate::time_series::RolloutRecorder;

use std::time::Instant;

/// Build the scenario's portfolio for one seeded run. Generated names
/// restart at `project-001` per run, so setup closures can address them.
fn build_portfolio(scenario: &Scenario, seed: u64) -> Portfolio {
    let mut generator = PortfolioGenerator::new(ChaCha8Rng::seed_from_u64(seed));
    let projects = match scenario.composition {
        Composition::Empty => Vec::new(),
        Composition::Uniform(state) => generator.generate_uniform(scenario.projects, state),
        Composition::Mixed => generator.generate_mixed(scenario.projects),
    };

    let mut portfolio = Portfolio::new((scenario.table)());
    for project in projects {
        portfolio.add_project(project);
    }
    if let Some(setup) = &scenario.setup {
        setup(&mut portfolio);
    }
    portfolio
}

/// Run a single batch of a scenario with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> BenchResult {
    let start = Instant::now();

    let portfolio = build_portfolio(scenario, seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let tallies = portfolio.simulate(scenario.rollouts, &mut rng);

    let elapsed = start.elapsed();
    let elapsed_ms = elapsed.as_millis();
    let elapsed_secs = elapsed.as_secs_f64().max(0.001);

    // Write per-rollout time series if enabled
    if let Some(dir) = time_series_dir {
        let mut recorder = RolloutRecorder::new();
        for tally in &tallies {
            recorder.record(tally);
        }
        let path = dir.join(format!("seed-{}.jsonl", seed));
        if let Err(e) = recorder.write_jsonl(&path) {
            eprintln!("  Warning: failed to write time series: {}", e);
        }
    }

    // ─── Batch metrics ──────────────────────────────────────────────────

    let projects = portfolio.len() as u32;
    let rollouts = tallies.len() as u32;
    let slots = (projects as u64 * rollouts as u64).max(1) as f64;

    let totals = StateTally::sum(&tallies);
    let completed_share = totals.count(ProjectState::Completed) as f64 / slots;
    let cancelled_share = totals.count(ProjectState::Cancelled) as f64 / slots;

    let absorbed = tallies.iter().filter(|t| t.unresolved() == 0).count();
    let absorption_rate = absorbed as f64 / (rollouts.max(1)) as f64;
    let unresolved_mean =
        tallies.iter().map(|t| t.unresolved() as f64).sum::<f64>() / (rollouts.max(1)) as f64;

    let tally_conservation_holds = tallies.iter().all(|t| t.total() == projects);

    let mut state_totals = [0u32; 6];
    for (i, state) in ProjectState::ALL.iter().enumerate() {
        state_totals[i] = totals.count(*state);
    }

    // ─── Pass evaluation ────────────────────────────────────────────────

    let criteria = &scenario.criteria;
    let mut pass = true;
    if criteria.require_tally_conservation && !tally_conservation_holds {
        pass = false;
    }
    if let Some(min_rate) = criteria.min_absorption_rate {
        if absorption_rate < min_rate {
            pass = false;
        }
    }
    if let Some((lo, hi)) = criteria.completed_share_band {
        if completed_share < lo || completed_share > hi {
            pass = false;
        }
    }
    if let Some((lo, hi)) = criteria.cancelled_share_band {
        if cancelled_share < lo || cancelled_share > hi {
            pass = false;
        }
    }
    if let Some(max_unresolved) = criteria.max_unresolved_mean {
        if unresolved_mean > max_unresolved {
            pass = false;
        }
    }

    BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        pass,
        projects,
        rollouts,
        completed_share,
        cancelled_share,
        absorption_rate,
        unresolved_mean,
        tally_conservation_holds,
        state_totals,
        elapsed_ms,
        rollouts_per_sec: scenario.rollouts as f64 / elapsed_secs,
    }
}

/// Run Monte Carlo: N seeded batches of a scenario, aggregate stats.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    time_series_base: Option<&std::path::Path>,
) -> MonteCarloReport {
    let ts_dir = time_series_base.map(|base| base.join(scenario.name.to_lowercase()));

    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let seed = base_seed + i as u64;
        let result = run_single(scenario, seed, ts_dir.as_deref());
        results.push(result);
    }

    aggregate(scenario, results)
}

/// Aggregate individual batches into a MonteCarloReport.
fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let pass_rate = passed as f64 / n as f64;

    let completed_share = Stats::from_samples(
        &results.iter().map(|r| r.completed_share).collect::<Vec<_>>(),
    );
    let cancelled_share = Stats::from_samples(
        &results.iter().map(|r| r.cancelled_share).collect::<Vec<_>>(),
    );
    let absorption_rate = Stats::from_samples(
        &results.iter().map(|r| r.absorption_rate).collect::<Vec<_>>(),
    );
    let unresolved_mean = Stats::from_samples(
        &results.iter().map(|r| r.unresolved_mean).collect::<Vec<_>>(),
    );
    let elapsed_ms = Stats::from_samples(
        &results.iter().map(|r| r.elapsed_ms as f64).collect::<Vec<_>>(),
    );
    let rollouts_per_sec = Stats::from_samples(
        &results.iter().map(|r| r.rollouts_per_sec).collect::<Vec<_>>(),
    );

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate,
        completed_share,
        cancelled_share,
        absorption_rate,
        unresolved_mean,
        elapsed_ms,
        rollouts_per_sec,
        individual_runs: results,
    }
}
