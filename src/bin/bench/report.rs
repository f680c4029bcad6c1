// Benchmark Report Types
// Structured output for independent analysis of Monte Carlo batches

use serde::Serialize;

// ─── Statistics (per-metric aggregation across seeds) ───────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Batch Result ────────────────────────────────────────────────────

/// Outcome of one seeded Monte Carlo batch of a scenario.
///
/// Shares are fractions of project-slots (projects × rollouts); the
/// absorption rate is the fraction of rollouts in which every clone reached
/// a terminal state before the step cap.
#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub name: String,
    pub category: String,
    pub seed: u64,
    pub pass: bool,
    pub projects: u32,
    pub rollouts: u32,
    pub completed_share: f64,
    pub cancelled_share: f64,
    pub absorption_rate: f64,
    pub unresolved_mean: f64,
    pub tally_conservation_holds: bool,
    /// Summed final-state counts across the batch, in lifecycle order.
    pub state_totals: [u32; 6],
    pub elapsed_ms: u128,
    pub rollouts_per_sec: f64,
}

// ─── Monte Carlo Report (per-scenario aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub completed_share: Stats,
    pub cancelled_share: Stats,
    pub absorption_rate: Stats,
    pub unresolved_mean: Stats,
    pub elapsed_ms: Stats,
    pub rollouts_per_sec: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Model Validation Summary ───────────────────────────────────────────────

/// Analytic checks against the default lifecycle table.
///
/// From all-IDEA starts the chain completes with probability
/// 0.7 × 0.6 × 0.9 × 0.8 = 0.3024 and cancels with probability 0.6976;
/// the baseline scenario's Monte Carlo means must sit inside those bands.
#[derive(Debug, Clone, Serialize)]
pub struct ModelValidation {
    pub baseline_completed_in_band: bool,
    pub baseline_cancelled_in_band: bool,
    pub empty_portfolio_all_zero: bool,
    pub derisked_uplift_positive: bool,
    pub max_unresolved_mean: f64,
}

impl ModelValidation {
    pub fn all_pass(&self) -> bool {
        self.baseline_completed_in_band
            && self.baseline_cancelled_in_band
            && self.empty_portfolio_all_zero
            && self.derisked_uplift_positive
    }
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub summary: Summary,
    pub model_validation: ModelValidation,
    pub table_comparison: crate::metrics::TableComparison,
    pub scenarios: Vec<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_samples() {
        let stats = Stats::from_samples(&[1.0, 2.0, 3.0, 4.0]);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.min - 1.0).abs() < 1e-12);
        assert!((stats.max - 4.0).abs() < 1e-12);
        assert_eq!(stats.n, 4);
        assert!(stats.ci_lower < stats.mean && stats.mean < stats.ci_upper);
    }

    #[test]
    fn test_stats_empty() {
        let stats = Stats::from_samples(&[]);
        assert_eq!(stats.n, 0);
        assert_eq!(stats.mean, 0.0);
    }
}
