// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Portfolio Lifecycle Simulation Suite - Type Definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ─── Project State ───────────────────────────────────────────────────────────

/// Project lifecycle state.
///
/// Born at `Idea`, dies at `Completed` / `Cancelled`. Serialized with the
/// wire names the frontend uses (`IDEA` .. `CANCELLED`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectState {
    Idea,
    Proposal,
    Approved,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectState {
    /// Every state, in lifecycle order.
    pub const ALL: [ProjectState; 6] = [
        Self::Idea,
        Self::Proposal,
        Self::Approved,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Whether this state is terminal (no outgoing transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Wire name used by the frontend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idea => "IDEA",
            Self::Proposal => "PROPOSAL",
            Self::Approved => "APPROVED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parse a wire name back into a state.
    pub fn parse(s: &str) -> Option<ProjectState> {
        match s {
            "IDEA" => Some(Self::Idea),
            "PROPOSAL" => Some(Self::Proposal),
            "APPROVED" => Some(Self::Approved),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Transition Record ───────────────────────────────────────────────────────

/// One entry in a project's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub state: ProjectState,
    pub reason: String,
}

// ─── Project ─────────────────────────────────────────────────────────────────

/// A single portfolio unit: current lifecycle position plus its audit trail.
///
/// Immutable value record: [`transition`](Self::transition) produces a new
/// `Project` with one appended history entry. The history is append-only and
/// always starts with an `"Initial state"` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub state: ProjectState,
    pub history: Vec<TransitionRecord>,
}

impl Project {
    /// Create a project in the `Idea` state.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_state(name, ProjectState::Idea)
    }

    /// Create a project in an arbitrary initial state, with a fresh
    /// one-entry history.
    pub fn with_state(name: impl Into<String>, state: ProjectState) -> Self {
        Self {
            name: name.into(),
            state,
            history: vec![TransitionRecord {
                state,
                reason: "Initial state".to_string(),
            }],
        }
    }

    /// Unchecked transition: the successor value with `new_state` current and
    /// one appended history entry. Legality is the portfolio's responsibility.
    #[must_use]
    pub fn transition(&self, new_state: ProjectState, reason: impl Into<String>) -> Self {
        let mut history = self.history.clone();
        history.push(TransitionRecord {
            state: new_state,
            reason: reason.into(),
        });
        Self {
            name: self.name.clone(),
            state: new_state,
            history,
        }
    }
}

// ─── State Tally ─────────────────────────────────────────────────────────────

/// Final-state counts for one simulated rollout.
///
/// Every state is present (zero-filled), so tallies aggregate across a batch
/// by plain per-state summation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateTally(BTreeMap<ProjectState, u32>);

impl StateTally {
    /// A tally with every state at zero.
    pub fn zeroed() -> Self {
        Self(ProjectState::ALL.iter().map(|&s| (s, 0)).collect())
    }

    /// Count one project ending in `state`.
    pub fn record(&mut self, state: ProjectState) {
        *self.0.entry(state).or_insert(0) += 1;
    }

    /// Count of projects that ended in `state`.
    pub fn count(&self, state: ProjectState) -> u32 {
        self.0.get(&state).copied().unwrap_or(0)
    }

    /// Total projects across all states.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    /// Projects that ended in a non-terminal state (rollout hit the step cap).
    pub fn unresolved(&self) -> u32 {
        self.0
            .iter()
            .filter(|(state, _)| !state.is_terminal())
            .map(|(_, count)| *count)
            .sum()
    }

    /// Iterate `(state, count)` pairs in lifecycle order.
    pub fn iter(&self) -> impl Iterator<Item = (ProjectState, u32)> + '_ {
        self.0.iter().map(|(&state, &count)| (state, count))
    }

    /// Aggregate a batch by per-state summation.
    pub fn sum<'a>(tallies: impl IntoIterator<Item = &'a StateTally>) -> StateTally {
        let mut out = Self::zeroed();
        for tally in tallies {
            for (state, count) in tally.iter() {
                *out.0.entry(state).or_insert(0) += count;
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for state in ProjectState::ALL {
            assert_eq!(ProjectState::parse(state.as_str()), Some(state));
        }
        assert_eq!(ProjectState::parse("DRAFT"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProjectState::Completed.is_terminal());
        assert!(ProjectState::Cancelled.is_terminal());
        assert!(!ProjectState::Idea.is_terminal());
        assert!(!ProjectState::InProgress.is_terminal());
    }

    #[test]
    fn test_new_project_history() {
        let project = Project::new("Alpha");
        assert_eq!(project.state, ProjectState::Idea);
        assert_eq!(project.history.len(), 1);
        assert_eq!(project.history[0].state, ProjectState::Idea);
        assert_eq!(project.history[0].reason, "Initial state");
    }

    #[test]
    fn test_transition_appends_without_rewriting() {
        let idea = Project::new("Alpha");
        let proposal = idea.transition(ProjectState::Proposal, "pitch ready");
        let approved = proposal.transition(ProjectState::Approved, "board sign-off");

        // Source values are untouched
        assert_eq!(idea.history.len(), 1);
        assert_eq!(proposal.history.len(), 2);

        assert_eq!(approved.state, ProjectState::Approved);
        assert_eq!(approved.history.len(), 3);
        assert_eq!(approved.history[0], idea.history[0]);
        assert_eq!(approved.history[1], proposal.history[1]);
        assert_eq!(approved.history[2].reason, "board sign-off");
    }

    #[test]
    fn test_tally_sum() {
        let mut a = StateTally::zeroed();
        a.record(ProjectState::Completed);
        a.record(ProjectState::Cancelled);
        let mut b = StateTally::zeroed();
        b.record(ProjectState::Completed);

        let total = StateTally::sum([&a, &b]);
        assert_eq!(total.count(ProjectState::Completed), 2);
        assert_eq!(total.count(ProjectState::Cancelled), 1);
        assert_eq!(total.count(ProjectState::Idea), 0);
        assert_eq!(total.total(), 3);
    }

    #[test]
    fn test_tally_unresolved() {
        let mut tally = StateTally::zeroed();
        tally.record(ProjectState::Proposal);
        tally.record(ProjectState::Completed);
        assert_eq!(tally.unresolved(), 1);
    }
}
