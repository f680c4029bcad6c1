// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Portfolio Lifecycle Simulation Suite - State Machine

use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::ProjectState;

/// A row's probability sum may deviate from 1.0 by at most this much.
const PROBABILITY_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised when a transition table fails validation.
#[derive(Debug, thiserror::Error)]
pub enum TransitionTableError {
    #[error("probability {probability} for {from} -> {to} is outside [0, 1]")]
    ProbabilityOutOfRange {
        from: ProjectState,
        to: ProjectState,
        probability: f64,
    },

    #[error("probabilities for {state} sum to {sum}, expected 1.0")]
    RowSumMismatch { state: ProjectState, sum: f64 },
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// One table entry: target state, its base-rate probability, and the
/// cumulative threshold the sampling walk compares against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub target: ProjectState,
    pub probability: f64,
    pub cumulative: f64,
}

/// The fixed map of legal next-states and their probabilities per source
/// state.
///
/// Each row is an ordered list of `(target, cumulative threshold)` pairs
/// built once at construction, so the probability walk never depends on
/// incidental map iteration order. Terminal states have empty rows. The
/// table is read-only after construction and shared by every project in a
/// portfolio.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionTable {
    rows: BTreeMap<ProjectState, Vec<Transition>>,
}

impl TransitionTable {
    /// Build a table from per-state `(target, probability)` rows.
    ///
    /// Every probability must lie in [0, 1] and each non-empty row must sum
    /// to 1.0 within `PROBABILITY_TOLERANCE`. Malformed rows are rejected
    /// here rather than left to silently bias rollouts at simulation time;
    /// an intentional "stays put" residual is expressed explicitly as a
    /// self-loop entry. States without a row get an empty one.
    pub fn new(
        rows: Vec<(ProjectState, Vec<(ProjectState, f64)>)>,
    ) -> Result<Self, TransitionTableError> {
        let mut table: BTreeMap<ProjectState, Vec<Transition>> =
            ProjectState::ALL.iter().map(|&s| (s, Vec::new())).collect();

        for (state, row) in rows {
            for &(target, probability) in &row {
                if !(0.0..=1.0).contains(&probability) {
                    return Err(TransitionTableError::ProbabilityOutOfRange {
                        from: state,
                        to: target,
                        probability,
                    });
                }
            }
            let entries = cumulative_row(&row);
            if let Some(last) = entries.last() {
                if (last.cumulative - 1.0).abs() > PROBABILITY_TOLERANCE {
                    return Err(TransitionTableError::RowSumMismatch {
                        state,
                        sum: last.cumulative,
                    });
                }
            }
            table.insert(state, entries);
        }

        Ok(Self { rows: table })
    }

    /// Legal target states for `state`, in row order. Empty for terminal
    /// states and states with no defined transitions.
    pub fn valid_transitions(&self, state: ProjectState) -> Vec<ProjectState> {
        self.rows
            .get(&state)
            .map(|row| row.iter().map(|t| t.target).collect())
            .unwrap_or_default()
    }

    /// Whether `from -> to` is a legal move.
    pub fn is_valid(&self, from: ProjectState, to: ProjectState) -> bool {
        self.rows
            .get(&from)
            .map_or(false, |row| row.iter().any(|t| t.target == to))
    }

    /// Whether `state` has any outgoing transitions defined.
    pub fn has_transitions(&self, state: ProjectState) -> bool {
        self.rows.get(&state).map_or(false, |row| !row.is_empty())
    }

    /// Base-rate probability of `from -> to`, if the move is legal.
    pub fn probability(&self, from: ProjectState, to: ProjectState) -> Option<f64> {
        self.rows.get(&from).and_then(|row| {
            row.iter()
                .find(|t| t.target == to)
                .map(|t| t.probability)
        })
    }

    /// Walk the row's cumulative thresholds and return the first target whose
    /// threshold exceeds `r` (a uniform draw in [0, 1)).
    ///
    /// Returns `None` for empty rows, and when `r` lands past the last
    /// threshold (possible only within floating-point tolerance of 1.0 on a
    /// validated row) -- the project then simply stays put this round.
    pub fn sample_next(&self, state: ProjectState, r: f64) -> Option<ProjectState> {
        let row = self.rows.get(&state)?;
        row.iter().find(|t| r < t.cumulative).map(|t| t.target)
    }

    /// Draw one transition for `state` from `rng`.
    pub fn pick<R: Rng>(&self, state: ProjectState, rng: &mut R) -> Option<ProjectState> {
        self.sample_next(state, rng.gen::<f64>())
    }
}

impl Default for TransitionTable {
    /// The standard project lifecycle: every gate either advances or
    /// cancels, completion is reachable only through `InProgress`, and the
    /// terminal states absorb.
    fn default() -> Self {
        use ProjectState::*;

        let mut rows: BTreeMap<ProjectState, Vec<Transition>> =
            ProjectState::ALL.iter().map(|&s| (s, Vec::new())).collect();
        rows.insert(Idea, cumulative_row(&[(Proposal, 0.7), (Cancelled, 0.3)]));
        rows.insert(Proposal, cumulative_row(&[(Approved, 0.6), (Cancelled, 0.4)]));
        rows.insert(Approved, cumulative_row(&[(InProgress, 0.9), (Cancelled, 0.1)]));
        rows.insert(InProgress, cumulative_row(&[(Completed, 0.8), (Cancelled, 0.2)]));
        Self { rows }
    }
}

/// Fold a `(target, probability)` row into its cumulative-threshold form.
fn cumulative_row(row: &[(ProjectState, f64)]) -> Vec<Transition> {
    let mut cumulative = 0.0;
    row.iter()
        .map(|&(target, probability)| {
            cumulative += probability;
            Transition {
                target,
                probability,
                cumulative,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ProjectState::*;

    #[test]
    fn test_default_rows() {
        let table = TransitionTable::default();
        assert_eq!(table.valid_transitions(Idea), vec![Proposal, Cancelled]);
        assert_eq!(table.valid_transitions(InProgress), vec![Completed, Cancelled]);
        assert!(table.valid_transitions(Completed).is_empty());
        assert!(table.valid_transitions(Cancelled).is_empty());
    }

    #[test]
    fn test_is_valid_gates() {
        let table = TransitionTable::default();
        assert!(table.is_valid(Idea, Proposal));
        assert!(table.is_valid(Idea, Cancelled));
        assert!(!table.is_valid(Idea, Approved));
        assert!(!table.is_valid(Completed, Cancelled));
    }

    #[test]
    fn test_probability_lookup() {
        let table = TransitionTable::default();
        assert_eq!(table.probability(Idea, Proposal), Some(0.7));
        assert_eq!(table.probability(Idea, Approved), None);
    }

    #[test]
    fn test_sample_walk_boundaries() {
        let table = TransitionTable::default();
        // Idea row: Proposal up to 0.7, Cancelled up to 1.0
        assert_eq!(table.sample_next(Idea, 0.0), Some(Proposal));
        assert_eq!(table.sample_next(Idea, 0.699), Some(Proposal));
        assert_eq!(table.sample_next(Idea, 0.7), Some(Cancelled));
        assert_eq!(table.sample_next(Idea, 0.999), Some(Cancelled));
    }

    #[test]
    fn test_sample_terminal_is_none() {
        let table = TransitionTable::default();
        assert_eq!(table.sample_next(Completed, 0.5), None);
        assert_eq!(table.sample_next(Cancelled, 0.0), None);
        assert!(!table.has_transitions(Completed));
    }

    #[test]
    fn test_row_sum_mismatch_rejected() {
        let result = TransitionTable::new(vec![(Idea, vec![(Proposal, 0.5)])]);
        assert!(matches!(
            result,
            Err(TransitionTableError::RowSumMismatch { state: Idea, .. })
        ));
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let result = TransitionTable::new(vec![(
            Idea,
            vec![(Proposal, 1.2), (Cancelled, -0.2)],
        )]);
        assert!(matches!(
            result,
            Err(TransitionTableError::ProbabilityOutOfRange { .. })
        ));
    }

    #[test]
    fn test_self_loop_row_accepted() {
        let table = TransitionTable::new(vec![(Idea, vec![(Idea, 0.9), (Proposal, 0.1)])])
            .expect("self-loop row sums to 1.0");
        assert!(table.is_valid(Idea, Idea));
        assert_eq!(table.sample_next(Idea, 0.5), Some(Idea));
        assert_eq!(table.sample_next(Idea, 0.95), Some(Proposal));
    }

    #[test]
    fn test_missing_rows_default_empty() {
        let table = TransitionTable::new(vec![(Idea, vec![(Proposal, 0.7), (Cancelled, 0.3)])])
            .expect("single-row table is valid");
        assert!(table.valid_transitions(Proposal).is_empty());
        assert!(!table.has_transitions(Proposal));
    }
}
