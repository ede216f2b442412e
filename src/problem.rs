//! The planning problem: progression (`successors`), regression
//! (`predecessors`), and `goal_test`, exposed to an external search driver.
//!
//! State is a node's payload; `successors` builds an index and matches
//! each operator's conditions against it; `goal_test` matches the problem
//! goal against the current state. Regression adds the fuller machinery
//! needed to go backward soundly: constant lifting, operator-consistency
//! constraints, a ground-term functional filter, and reachability pruning
//! via a precomputed `achievable` index.

use std::collections::HashSet;
use std::rc::Rc;

use rand::rngs::StdRng;

use crate::error::PlanError;
use crate::index::FactIndex;
use crate::matcher::{pattern_match, MatcherConfig};
use crate::operator::Operator;
use crate::skolem::skolem_var;
use crate::term::{Atomic, Term};
use crate::unify::{substitute, Substitution};

/// An immutable, `Rc`-shared set of facts. Cloning a `State` is O(1); a
/// successor that changes only a few facts still reconstructs the whole
/// set (cheap pointer clone at the `Rc` boundary, full reconstruction of
/// the underlying collection when it changes).
pub type State = Rc<HashSet<Term>>;

pub fn state_of(facts: impl IntoIterator<Item = Term>) -> State {
    Rc::new(facts.into_iter().collect())
}

/// A forward search node: a state reached from the initial state by a
/// chain of operator applications.
#[derive(Clone, Debug)]
pub struct PlanNode {
    pub state: State,
    pub parent: Option<Rc<PlanNode>>,
    pub action: Option<(String, Substitution)>,
    pub cost: f64,
}

impl PlanNode {
    pub fn root(state: State) -> PlanNode {
        PlanNode { state, parent: None, action: None, cost: 0.0 }
    }
}

/// A backward (regression) search node: a partially-ground goal pattern,
/// possibly augmented with residual computable constraints, reached by
/// regressing operators from the problem's goal.
#[derive(Clone, Debug)]
pub struct GoalNode {
    pub goal: Vec<Term>,
    pub parent: Option<Rc<GoalNode>>,
    pub action: Option<(String, Substitution)>,
    pub cost: f64,
}

impl GoalNode {
    pub fn root(goal: Vec<Term>) -> GoalNode {
        GoalNode { goal, parent: None, action: None, cost: 0.0 }
    }
}

impl std::fmt::Display for PlanNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.action {
            Some((name, sigma)) => write!(f, "{} {}", name, sigma),
            None => write!(f, "<initial state>"),
        }
    }
}

/// Walks parent links from `node` back to the root, returning the plan in
/// execution order.
pub fn format_plan(node: &PlanNode) -> String {
    let mut steps = Vec::new();
    let mut cur = Some(node.clone());
    while let Some(n) = cur {
        if let Some((name, sigma)) = &n.action {
            steps.push(format!("{} {}", name, sigma));
        }
        cur = n.parent.as_ref().map(|p| (**p).clone());
    }
    steps.reverse();
    steps.join("\n")
}

pub fn print_plan(node: &PlanNode) {
    println!("{}", format_plan(node));
}

/// Replaces every leaf constant inside `t`'s arguments with a fresh skolem
/// variable, recording an `(eq, skolem, original_constant)` constraint for
/// each one. The term's own head (predicate name) is left untouched; a
/// bare constant atom passed directly as `t` is itself lifted.
fn lift_leaf(t: &Term, constraints: &mut Vec<Term>) -> Term {
    match t {
        Term::Atom(_) => {
            let fresh = skolem_var();
            let v = Term::var(&fresh);
            constraints.push(Term::fun("eq", vec![v.clone(), t.clone()]));
            v
        }
        Term::Var(_) => t.clone(),
        Term::Compound(head, args) => {
            Term::Compound(head.clone(), args.iter().map(|a| lift_leaf(a, constraints)).collect())
        }
        Term::FunTerm(_, _) => t.clone(),
    }
}

/// Constant-lifts one goal atom: computable atoms are left untouched
/// (computable preconditions don't get lifted, per the term model), a
/// negated atom's inner term is lifted, a plain positive atom has its
/// argument constants lifted.
fn lift_goal_atom(t: &Term, constraints: &mut Vec<Term>) -> Term {
    if t.is_computable() {
        return t.clone();
    }
    if let Some(inner) = t.negated_inner() {
        return Term::not(lift_leaf(inner, constraints));
    }
    lift_leaf(t, constraints)
}

/// Follows a chain of variable-to-variable bindings in `m` starting at
/// `start`, collecting every variable name visited along the way. Stops at
/// either a non-variable value or an unbound variable, which becomes the
/// chain's terminal.
fn resolve_chain(m: &Substitution, start: &Rc<str>) -> (Vec<Rc<str>>, Term) {
    let mut visited = vec![Rc::clone(start)];
    let mut current = Term::Var(Rc::clone(start));
    loop {
        let name = match &current {
            Term::Var(n) => Rc::clone(n),
            _ => return (visited, current),
        };
        match m.get(&name) {
            Some(next) => {
                current = next.clone();
                if let Term::Var(next_name) = &current {
                    if visited.iter().any(|v| v == next_name) {
                        return (visited, current);
                    }
                    visited.push(Rc::clone(next_name));
                }
            }
            None => return (visited, current),
        }
    }
}

/// Resolves constant-lifting's `(eq, skolem, const)` constraints against a
/// match `m`. A constraint's skolem variable may have unified with one of
/// the operator's own still-free variables rather than a ground value; in
/// that case every variable along the chain gets bound straight to the
/// constant. Two constraints reaching the same variable with different
/// constants make the match inconsistent, reported as `None`.
fn resolve_equality_constraints(m: &Substitution, constraints: &[Term]) -> Option<Substitution> {
    let mut assignment: Vec<(Rc<str>, Term)> = Vec::new();
    for c in constraints {
        let (skolem_name, constant) = match c {
            Term::FunTerm(_, args) if args.len() == 2 => match &args[0] {
                Term::Var(name) => (name, &args[1]),
                _ => continue,
            },
            _ => continue,
        };
        let (chain, terminal) = resolve_chain(m, skolem_name);
        match terminal {
            Term::Var(_) => {
                for v in chain {
                    match assignment.iter().find(|(n, _)| *n == v) {
                        Some((_, existing)) if existing != constant => return None,
                        Some(_) => {}
                        None => assignment.push((v, constant.clone())),
                    }
                }
            }
            other => {
                if &other != constant {
                    return None;
                }
            }
        }
    }
    let mut out = m.clone();
    for (v, c) in assignment {
        out = out.extend(v, c);
    }
    Some(out)
}

/// The precomputed "what could ever be true" index used to prune
/// unreachable regression branches: the initial state's facts plus every
/// operator's add-effects.
fn build_achievable(initial_state: &State, operators: &[Operator], numeric_bucketing: bool) -> FactIndex {
    let mut facts: Vec<Term> = initial_state.iter().cloned().collect();
    for op in operators {
        facts.extend(op.add_effects.iter().cloned());
    }
    FactIndex::build(facts.iter(), numeric_bucketing)
}

/// `StateSpacePlanningProblem(initial_state, goal, operators)`.
pub struct StateSpacePlanningProblem {
    pub initial_state: State,
    pub goal: Vec<Term>,
    pub operators: Vec<Operator>,
    pub config: MatcherConfig,
    registry: crate::builtins::BuiltinRegistry,
    achievable: FactIndex,
}

impl StateSpacePlanningProblem {
    pub fn new(
        initial_state: State,
        goal: Vec<Term>,
        operators: Vec<Operator>,
        config: MatcherConfig,
    ) -> StateSpacePlanningProblem {
        let achievable = build_achievable(&initial_state, &operators, config.numeric_bucketing);
        StateSpacePlanningProblem {
            initial_state,
            goal,
            operators,
            config,
            registry: crate::builtins::BuiltinRegistry::default(),
            achievable,
        }
    }

    pub fn initial_node(&self) -> PlanNode {
        PlanNode::root(Rc::clone(&self.initial_state))
    }

    pub fn goal_node(&self) -> GoalNode {
        GoalNode::root(self.goal.clone())
    }

    fn apply_effect(&self, effect: &Term, sigma: &Substitution) -> Result<Term, PlanError> {
        if effect.is_computable() {
            crate::builtins::evaluate_functions(effect, sigma, &self.registry)
        } else {
            Ok(substitute(sigma, effect))
        }
    }

    /// Forward state transitions: every operator instantiation whose
    /// preconditions match the current state.
    pub fn successors(
        &self,
        node: &PlanNode,
        rng: &mut StdRng,
    ) -> Result<Vec<PlanNode>, PlanError> {
        let index = FactIndex::build(node.state.iter(), self.config.numeric_bucketing);
        let mut out = Vec::new();
        let mut complete = self.config;
        complete.partial_matching = false;

        for op in &self.operators {
            let matches =
                pattern_match(&op.conditions, &index, Substitution::new(), &complete, &self.registry, rng)?;
            for sigma in matches {
                let dels: HashSet<Term> = op
                    .delete_effects
                    .iter()
                    .map(|e| self.apply_effect(e, &sigma))
                    .collect::<Result<_, _>>()?;
                let adds: HashSet<Term> = op
                    .add_effects
                    .iter()
                    .map(|e| self.apply_effect(e, &sigma))
                    .collect::<Result<_, _>>()?;
                let mut new_state: HashSet<Term> =
                    node.state.difference(&dels).cloned().collect();
                new_state.extend(adds);
                out.push(PlanNode {
                    state: Rc::new(new_state),
                    parent: Some(Rc::new(node.clone())),
                    action: Some((op.name.clone(), sigma)),
                    cost: node.cost + op.cost,
                });
            }
        }
        Ok(out)
    }

    /// `goal_test`: does `node`'s state satisfy the problem's goal pattern?
    pub fn goal_test(&self, node: &PlanNode, rng: &mut StdRng) -> Result<bool, PlanError> {
        let index = FactIndex::build(node.state.iter(), self.config.numeric_bucketing);
        let mut complete = self.config;
        complete.partial_matching = false;
        let matches = pattern_match(&self.goal, &index, Substitution::new(), &complete, &self.registry, rng)?;
        Ok(!matches.is_empty())
    }

    /// Does `node`'s (possibly still partially-ground) regressed goal hold
    /// in the problem's initial state? Used to detect a regression
    /// solution.
    pub fn regression_goal_test(
        &self,
        node: &GoalNode,
        rng: &mut StdRng,
    ) -> Result<bool, PlanError> {
        let index = FactIndex::build(self.initial_state.iter(), self.config.numeric_bucketing);
        let mut complete = self.config;
        complete.partial_matching = false;
        let matches = pattern_match(&node.goal, &index, Substitution::new(), &complete, &self.registry, rng)?;
        Ok(!matches.is_empty())
    }

    /// Regresses `node`'s goal through every operator, producing the set of
    /// predecessor goal nodes.
    pub fn predecessors(
        &self,
        node: &GoalNode,
        rng: &mut StdRng,
    ) -> Result<Vec<GoalNode>, PlanError> {
        let mut out = Vec::new();
        let mut partial = self.config;
        partial.partial_matching = true;

        for op in &self.operators {
            let standardized = op.standardize();
            let sop = &standardized.operator;

            let mut equality_constraints: Vec<Term> = Vec::new();
            let lifted_goal: Vec<Term> =
                node.goal.iter().map(|t| lift_goal_atom(t, &mut equality_constraints)).collect();

            let del_index = FactIndex::build(sop.delete_effects.iter(), self.config.numeric_bucketing);
            let add_index = FactIndex::build(sop.add_effects.iter(), self.config.numeric_bucketing);

            // Operator-consistency constraints: the operator must not
            // delete a needed positive goal atom, nor add a negated one.
            // Conservative simplification (recorded in DESIGN.md): every
            // clobbering match contributes an AND-ed `ne` constraint per
            // bound variable rather than a per-match OR across all of
            // them — stronger, so it can discard a few more branches
            // than strictly necessary, but never unsound.
            let mut consistency: Vec<Term> = Vec::new();
            for g in &lifted_goal {
                if let Some(inner) = g.negated_inner() {
                    let ms = pattern_match(
                        &[inner.clone()],
                        &add_index,
                        Substitution::new(),
                        &partial,
                        &self.registry,
                        rng,
                    )?;
                    for m in ms {
                        for (v, val) in m.iter() {
                            consistency.push(Term::fun("ne", vec![Term::var(v), val.clone()]));
                        }
                    }
                } else if !g.is_computable() {
                    let ms = pattern_match(
                        &[g.clone()],
                        &del_index,
                        Substitution::new(),
                        &partial,
                        &self.registry,
                        rng,
                    )?;
                    for m in ms {
                        for (v, val) in m.iter() {
                            consistency.push(Term::fun("ne", vec![Term::var(v), val.clone()]));
                        }
                    }
                }
            }

            let matches = pattern_match(
                &lifted_goal,
                &add_index,
                Substitution::new(),
                &partial,
                &self.registry,
                rng,
            )?;

            for raw_m in matches {
                // Constant-lifting's equality constraints are resolved
                // here rather than folded into the pattern matched above:
                // a constraint's skolem can unify with the operator's own
                // still-free variable instead of a ground value, and its
                // job then is to bind that variable to the constant, not
                // to be evaluated as an ordinary boolean check.
                let m = match resolve_equality_constraints(&raw_m, &equality_constraints) {
                    Some(m) => m,
                    None => continue,
                };

                let substituted_v: Vec<Term> = lifted_goal.iter().map(|t| substitute(&m, t)).collect();
                let add_effect_terms: HashSet<Term> =
                    sop.add_effects.iter().map(|t| substitute(&m, t)).collect();
                let mut new_goal: Vec<Term> =
                    substituted_v.into_iter().filter(|t| !add_effect_terms.contains(t)).collect();
                for c in &sop.conditions {
                    new_goal.push(substitute(&m, c));
                }
                for c in &consistency {
                    new_goal.push(substitute(&m, c));
                }

                let mut cons: Vec<Term> = Vec::new();
                new_goal.retain(|t| {
                    if t.is_computable() {
                        cons.push(t.clone());
                        false
                    } else {
                        true
                    }
                });

                let mut discard = false;
                let mut residual_cons: Vec<Term> = Vec::new();
                for c in cons {
                    match crate::builtins::evaluate_functions(&c, &Substitution::new(), &self.registry) {
                        Ok(Term::Atom(Atomic::Bool(false))) => {
                            discard = true;
                            break;
                        }
                        Ok(Term::Atom(Atomic::Bool(true))) => {}
                        Ok(_) => residual_cons.push(c),
                        Err(_) => residual_cons.push(c),
                    }
                }
                if discard {
                    continue;
                }
                new_goal.extend(residual_cons);

                // Reachability pruning: every positive atom in the new
                // goal must be producible by some operator or be in the
                // initial state.
                let mut unreachable = false;
                for e in &new_goal {
                    if e.is_computable() || e.is_negated() {
                        continue;
                    }
                    let mut lift_constraints = Vec::new();
                    let lifted_e = lift_leaf(e, &mut lift_constraints);
                    let found = pattern_match(
                        &[lifted_e],
                        &self.achievable,
                        Substitution::new(),
                        &partial,
                        &self.registry,
                        rng,
                    )?;
                    let reachable = found
                        .iter()
                        .any(|c| resolve_equality_constraints(c, &lift_constraints).is_some());
                    if !reachable {
                        unreachable = true;
                        break;
                    }
                }
                if unreachable {
                    continue;
                }

                out.push(GoalNode {
                    goal: new_goal,
                    parent: Some(Rc::new(node.clone())),
                    action: Some((op.name.clone(), m)),
                    cost: node.cost + op.cost,
                });
            }
        }
        Ok(out)
    }
}
