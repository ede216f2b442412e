//! A minimal depth-first search driver over `StateSpacePlanningProblem`.
//!
//! The generic graph-search driver is explicitly out of scope for this
//! crate's core (§1): a real caller brings breadth-first, best-first, or
//! bidirectional search of their own, driving the same
//! `successors`/`predecessors`/`goal_test` methods. This module is a
//! reference/test harness only, sufficient to run the end-to-end scenarios
//! as integration tests without pulling in an external search crate.

use rand::rngs::StdRng;

use crate::error::PlanError;
use crate::problem::{PlanNode, StateSpacePlanningProblem};

/// Depth-first search over forward progression, bounded by `max_depth`
/// plan steps. Returns `Ok(None)` on exhaustion (the `NoPlanFound` case:
/// absence-of-result, not an error).
pub fn depth_first_plan(
    problem: &StateSpacePlanningProblem,
    max_depth: usize,
    rng: &mut StdRng,
) -> Result<Option<PlanNode>, PlanError> {
    let mut stack = vec![problem.initial_node()];
    let mut visited = std::collections::HashSet::new();

    while let Some(node) = stack.pop() {
        if problem.goal_test(&node, rng)? {
            return Ok(Some(node));
        }
        if node.cost as usize >= max_depth {
            continue;
        }
        let key = format!("{:?}", node.state);
        if !visited.insert(key) {
            continue;
        }
        for succ in problem.successors(&node, rng)? {
            stack.push(succ);
        }
    }
    Ok(None)
}

/// Depth-first search over backward regression, bounded by `max_depth`
/// plan steps. A solution is a `GoalNode` whose goal already holds in the
/// problem's initial state.
pub fn depth_first_regress(
    problem: &StateSpacePlanningProblem,
    max_depth: usize,
    rng: &mut StdRng,
) -> Result<Option<crate::problem::GoalNode>, PlanError> {
    let mut stack = vec![problem.goal_node()];

    while let Some(node) = stack.pop() {
        if problem.regression_goal_test(&node, rng)? {
            return Ok(Some(node));
        }
        if node.cost as usize >= max_depth {
            continue;
        }
        for pred in problem.predecessors(&node, rng)? {
            stack.push(pred);
        }
    }
    Ok(None)
}
