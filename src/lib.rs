// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Portfolio Lifecycle Simulation Suite

pub mod machine;
pub mod simulation;
pub mod types;

pub use machine::{Transition, TransitionTable, TransitionTableError};
pub use simulation::{Portfolio, MAX_ROLLOUT_STEPS, SIMULATED_REASON};
pub use types::*;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Browser-facing session: one portfolio over the default lifecycle table,
/// plus the seeded PRNG that feeds its rollouts. The engine itself never
/// owns a random source; the frontend supplies the seed.
#[wasm_bindgen]
pub struct PortfolioSession {
    portfolio: Portfolio,
    rng: ChaCha8Rng,
    seed: u64,
}

#[wasm_bindgen]
impl PortfolioSession {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        Self {
            portfolio: Portfolio::new(TransitionTable::default()),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Add a project in the `IDEA` state. Returns false on a duplicate name.
    pub fn add_project(&mut self, name: String) -> bool {
        self.portfolio.add_project(Project::new(name))
    }

    /// Request a user-driven transition by wire name. Unknown projects,
    /// unparseable states and illegal moves all report false and leave the
    /// portfolio unchanged; the frontend decides the messaging.
    pub fn transition_project(&mut self, name: &str, state: &str, reason: Option<String>) -> bool {
        let new_state = match ProjectState::parse(state) {
            Some(s) => s,
            None => return false,
        };
        let reason = reason.unwrap_or_else(|| "User action".to_string());
        self.portfolio.transition_project(name, new_state, &reason)
    }

    /// Legal next states for `state`, by wire name. Unknown input yields an
    /// empty list.
    pub fn valid_transitions(&self, state: &str) -> JsValue {
        let targets: Vec<&'static str> = match ProjectState::parse(state) {
            Some(s) => self
                .portfolio
                .table()
                .valid_transitions(s)
                .iter()
                .map(|t| t.as_str())
                .collect(),
            None => Vec::new(),
        };
        serde_wasm_bindgen::to_value(&targets).unwrap_or(JsValue::NULL)
    }

    pub fn get_projects(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.portfolio.projects()).unwrap_or(JsValue::NULL)
    }

    pub fn get_project_states(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.portfolio.project_states()).unwrap_or(JsValue::NULL)
    }

    /// Run a Monte Carlo batch and return one final-state tally per rollout.
    pub fn simulate(&mut self, iterations: u32) -> JsValue {
        let results = self.portfolio.simulate(iterations, &mut self.rng);
        serde_wasm_bindgen::to_value(&results).unwrap_or(JsValue::NULL)
    }

    /// Run a Monte Carlo batch and return the per-state sums across all
    /// rollouts.
    pub fn simulate_aggregate(&mut self, iterations: u32) -> JsValue {
        let results = self.portfolio.simulate(iterations, &mut self.rng);
        serde_wasm_bindgen::to_value(&StateTally::sum(&results)).unwrap_or(JsValue::NULL)
    }

    pub fn project_count(&self) -> u32 {
        self.portfolio.len() as u32
    }

    /// Reset to an empty portfolio and a fresh draw stream from the original
    /// seed.
    pub fn reset(&mut self) {
        *self = PortfolioSession::new(self.seed);
    }
}
