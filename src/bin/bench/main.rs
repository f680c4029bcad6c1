// Portfolio Benchmark Runner v1.0.0 — Monte Carlo Lifecycle Validation
// N seeded batches per scenario, ChaCha8 PRNG, per-rollout audit trail
//
// Usage:
//   cargo run --release --bin bench                     # Run all scenarios (30 batches each)
//   cargo run --release --bin bench -- --runs 5         # Quick mode (5 batches each)
//   cargo run --release --bin bench -- STICKY           # Filter by name
//   cargo run --release --bin bench -- --time-series    # Enable JSONL output
//   cargo run --release --bin bench -- --seed 42        # Custom base seed

mod metrics;
mod monte_carlo;
mod portfolios;
mod report;
mod scenarios;
mod time_series;

use metrics::run_table_comparison;
use report::*;
use scenarios::*;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    time_series: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        time_series: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(30);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--time-series" => {
                cli.time_series = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = parse_args();
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios
                .iter()
                .filter(|s| {
                    s.name.to_lowercase().contains(&f_lower)
                        || s.label.to_lowercase().contains(&f_lower)
                        || s.category.to_lowercase().contains(&f_lower)
                })
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    let ts_dir = if cli.time_series {
        let dir = std::path::Path::new("benchmark-results/time-series");
        Some(dir.to_path_buf())
    } else {
        None
    };

    println!("\n  Portfolio Benchmark Runner v1.0.0");
    println!(
        "  PRNG: ChaCha8Rng | Batches/scenario: {} | Base seed: {}",
        cli.runs, cli.seed
    );
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!(
        "  {:<32} {:>5} {:>10} {:>8} {:>8} {:>6} {:>7}",
        "Scenario", "Pass%", "Compl%", "Cancel%", "Absorb%", "Unres", "Time"
    );
    println!("  {}", "-".repeat(84));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, cli.runs, cli.seed, ts_dir.as_deref());

        let pass_pct = report.pass_rate * 100.0;
        let compl_mean = report.completed_share.mean * 100.0;
        let compl_ci =
            (report.completed_share.ci_upper - report.completed_share.ci_lower) / 2.0 * 100.0;
        let cancel_mean = report.cancelled_share.mean * 100.0;
        let absorb_mean = report.absorption_rate.mean * 100.0;
        let unres_mean = report.unresolved_mean.mean;
        let time_mean = report.elapsed_ms.mean;

        let status = if pass_pct >= 93.3 { "PASS" } else { "FAIL" };

        println!(
            "  {:<32} {:>4}% {:>6.1}±{:<3.1} {:>7.1}% {:>7.1}% {:>6.1} {:>5.0}ms  {}",
            report.label,
            pass_pct as u32,
            compl_mean,
            compl_ci,
            cancel_mean,
            absorb_mean,
            unres_mean,
            time_mean,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Model Validation ───────────────────────────────────────────────

    // Baseline funnel: means must sit inside the analytic bands of the
    // default table (0.3024 completed / 0.6976 cancelled from all-IDEA).
    let baseline = mc_reports
        .iter()
        .find(|r| r.scenario_name == "BASELINE_ALL_IDEA");
    let baseline_completed_in_band = baseline
        .map(|r| r.completed_share.mean > 0.27 && r.completed_share.mean < 0.34)
        .unwrap_or(true); // If not run, don't fail
    let baseline_cancelled_in_band = baseline
        .map(|r| r.cancelled_share.mean > 0.66 && r.cancelled_share.mean < 0.73)
        .unwrap_or(true);

    // Empty portfolio: nothing to count, nothing unresolved.
    let empty_portfolio_all_zero = mc_reports
        .iter()
        .find(|r| r.scenario_name == "EMPTY_PORTFOLIO")
        .map(|r| {
            r.completed_share.max == 0.0
                && r.cancelled_share.max == 0.0
                && r.unresolved_mean.max == 0.0
        })
        .unwrap_or(true);

    // Paired comparison: same seeds, default vs de-risked table.
    let table_comparison = run_table_comparison(10, 1000, cli.runs.min(10), cli.seed);

    let max_unresolved_mean = mc_reports
        .iter()
        .map(|r| r.unresolved_mean.max)
        .fold(0.0_f64, f64::max);

    let model_validation = ModelValidation {
        baseline_completed_in_band,
        baseline_cancelled_in_band,
        empty_portfolio_all_zero,
        derisked_uplift_positive: table_comparison.passes,
        max_unresolved_mean,
    };

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= 0.933).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(84));
    println!(
        "  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total,
        passed,
        failed,
        suite_elapsed.as_secs_f64()
    );

    println!("  Model Validation:");
    println!(
        "    Baseline Compl In Band:  {}",
        if model_validation.baseline_completed_in_band { "PASS" } else { "FAIL" }
    );
    println!(
        "    Baseline Cancel In Band: {}",
        if model_validation.baseline_cancelled_in_band { "PASS" } else { "FAIL" }
    );
    println!(
        "    Empty Portfolio Zeroes:  {}",
        if model_validation.empty_portfolio_all_zero { "PASS" } else { "FAIL" }
    );
    println!(
        "    De-Risked Uplift ≥50%:   {} ({:+.1}%)",
        if table_comparison.passes { "PASS" } else { "FAIL" },
        table_comparison.uplift_pct
    );
    println!(
        "    Max Unresolved Mean:     {:.2}\n",
        model_validation.max_unresolved_mean
    );

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis();
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "1.0.0",
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        model_validation,
        table_comparison,
        scenarios: mc_reports,
    };

    let dir = std::path::Path::new("benchmark-results");
    if !dir.exists() {
        std::fs::create_dir_all(dir).expect("Failed to create benchmark-results/");
    }
    let path = dir.join(format!("bench-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&report).expect("Failed to serialize");
    std::fs::write(&path, &json).expect("Failed to write benchmark file");
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 {
        std::process::exit(1);
    }
}
