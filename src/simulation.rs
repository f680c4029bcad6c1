// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Portfolio Lifecycle Simulation Suite - Simulation Core

use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::machine::TransitionTable;
use crate::types::{Project, ProjectState, StateTally};

/// Hard bound on steps per rollout. Guards against probability
/// configurations that never absorb (e.g. heavy self-loop rows); not a
/// domain-meaningful week or sprint count.
pub const MAX_ROLLOUT_STEPS: u32 = 100;

/// Reason recorded on every simulated transition.
pub const SIMULATED_REASON: &str = "Simulated transition";

// ─── Portfolio ───────────────────────────────────────────────────────────────

/// An insertion-ordered collection of projects sharing one transition table.
///
/// All state changes go through [`transition_project`](Self::transition_project);
/// projects themselves never check legality. Rollouts only read the live
/// project set.
#[derive(Debug, Clone, Serialize)]
pub struct Portfolio {
    projects: Vec<Project>,
    table: TransitionTable,
}

impl Portfolio {
    /// An empty portfolio over `table`.
    pub fn new(table: TransitionTable) -> Self {
        Self {
            projects: Vec::new(),
            table,
        }
    }

    /// Projects in insertion order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// The shared transition table.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Look up a project by name.
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Append a project. Rejects a duplicate name, since the name is the
    /// only handle [`transition_project`](Self::transition_project) has.
    pub fn add_project(&mut self, project: Project) -> bool {
        if self.projects.iter().any(|p| p.name == project.name) {
            return false;
        }
        self.projects.push(project);
        true
    }

    /// The sole legality gate for user-driven state changes.
    ///
    /// Returns `true` and stores the successor value only when `name` exists
    /// and `new_state` is reachable from its current state; any other
    /// request leaves the portfolio untouched.
    pub fn transition_project(&mut self, name: &str, new_state: ProjectState, reason: &str) -> bool {
        let idx = match self.projects.iter().position(|p| p.name == name) {
            Some(idx) => idx,
            None => return false,
        };
        if !self.table.is_valid(self.projects[idx].state, new_state) {
            return false;
        }
        let successor = self.projects[idx].transition(new_state, reason);
        self.projects[idx] = successor;
        true
    }

    /// Snapshot partition of the portfolio by current state. Every state is
    /// present, including unoccupied ones.
    pub fn project_states(&self) -> BTreeMap<ProjectState, Vec<String>> {
        let mut partition: BTreeMap<ProjectState, Vec<String>> =
            ProjectState::ALL.iter().map(|&s| (s, Vec::new())).collect();
        for project in &self.projects {
            partition
                .entry(project.state)
                .or_default()
                .push(project.name.clone());
        }
        partition
    }

    // ─── Monte Carlo rollouts ────────────────────────────────────────────────

    /// Run `iterations` independent rollouts of the current portfolio and
    /// return one final-state tally per rollout.
    ///
    /// Each rollout works on fresh clones (name + current state, history
    /// reset to a single entry); the live portfolio is only read. Draws are
    /// independent across projects and across rollouts, all from the one
    /// `rng` handle the caller supplies.
    pub fn simulate<R: Rng>(&self, iterations: u32, rng: &mut R) -> Vec<StateTally> {
        (0..iterations).map(|_| self.rollout(rng)).collect()
    }

    /// One rollout: step every clone until all are terminal or the step cap
    /// is reached, then tally current states.
    fn rollout<R: Rng>(&self, rng: &mut R) -> StateTally {
        let mut clones: Vec<Project> = self
            .projects
            .iter()
            .map(|p| Project::with_state(p.name.clone(), p.state))
            .collect();

        for _ in 0..MAX_ROLLOUT_STEPS {
            if clones.iter().all(|p| p.state.is_terminal()) {
                break;
            }
            for project in clones.iter_mut() {
                // States without outgoing transitions draw nothing this round.
                if !self.table.has_transitions(project.state) {
                    continue;
                }
                if let Some(next) = self.table.pick(project.state, rng) {
                    let stepped = project.transition(next, SIMULATED_REASON);
                    *project = stepped;
                }
            }
        }

        let mut tally = StateTally::zeroed();
        for project in &clones {
            tally.record(project.state);
        }
        tally
    }
}
