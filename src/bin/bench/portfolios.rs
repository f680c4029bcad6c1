// Seedable Portfolio Composition Generator
// Deterministic per-seed project mixes for scenario batches

use portfolio_engine::{Project, ProjectState};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Initial-state mix CDF over the non-terminal states, weighted toward
/// early-stage work: 40% IDEA, 30% PROPOSAL, 20% APPROVED, 10% IN_PROGRESS.
const STATE_CDF: [(ProjectState, f64); 4] = [
    (ProjectState::Idea, 0.40),
    (ProjectState::Proposal, 0.70),
    (ProjectState::Approved, 0.90),
    (ProjectState::InProgress, 1.00),
];

pub struct PortfolioGenerator {
    rng: ChaCha8Rng,
    counter: u32,
}

impl PortfolioGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng, counter: 0 }
    }

    /// `count` projects with CDF-mixed initial states and generated names.
    pub fn generate_mixed(&mut self, count: u32) -> Vec<Project> {
        (0..count)
            .map(|_| {
                let state = select_state(&mut self.rng);
                self.next_project(state)
            })
            .collect()
    }

    /// `count` projects all starting in `state`.
    pub fn generate_uniform(&mut self, count: u32, state: ProjectState) -> Vec<Project> {
        (0..count).map(|_| self.next_project(state)).collect()
    }

    fn next_project(&mut self, state: ProjectState) -> Project {
        self.counter += 1;
        Project::with_state(format!("project-{:03}", self.counter), state)
    }
}

/// Initial-state selection based on the mix CDF.
fn select_state(rng: &mut ChaCha8Rng) -> ProjectState {
    let r: f64 = rng.gen();
    for &(state, cdf) in STATE_CDF.iter() {
        if r < cdf {
            return state;
        }
    }
    ProjectState::InProgress // fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_state_mix_distribution() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 10000;
        let mut idea = 0u32;
        let mut in_progress = 0u32;
        for _ in 0..n {
            match select_state(&mut rng) {
                ProjectState::Idea => idea += 1,
                ProjectState::InProgress => in_progress += 1,
                _ => {}
            }
        }
        let idea_pct = idea as f64 / n as f64 * 100.0;
        let in_progress_pct = in_progress as f64 / n as f64 * 100.0;
        // Within ~3% of target (40/10) at N=10000
        assert!((idea_pct - 40.0).abs() < 3.0, "IDEA: {:.1}% expected ~40%", idea_pct);
        assert!(
            (in_progress_pct - 10.0).abs() < 2.0,
            "IN_PROGRESS: {:.1}% expected ~10%",
            in_progress_pct
        );
    }

    #[test]
    fn test_generated_names_unique() {
        let mut gen = PortfolioGenerator::new(ChaCha8Rng::seed_from_u64(7));
        let projects = gen.generate_mixed(50);
        let mut names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 50, "generated names must be unique");
    }

    #[test]
    fn test_uniform_composition() {
        let mut gen = PortfolioGenerator::new(ChaCha8Rng::seed_from_u64(7));
        let projects = gen.generate_uniform(10, ProjectState::Idea);
        assert!(projects.iter().all(|p| p.state == ProjectState::Idea));
        assert!(projects.iter().all(|p| p.history.len() == 1));
    }
}
