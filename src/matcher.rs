//! The indexed conjunctive pattern matcher.
//!
//! Given a pattern (positive atoms, `not`-headed negated atoms, and
//! computable atoms), an index, and a starting substitution, enumerates
//! every extending substitution that satisfies the pattern: every positive
//! atom becomes a member of the indexed fact set, every negated atom fails
//! to unify with any fact (negation as finite failure), and every
//! computable atom evaluates to `true`.
//!
//! Implemented as bounded recursion over the (small, fixed-size) pattern
//! rather than a hand-rolled explicit choice-point stack: the pattern
//! length is the recursion depth, every consumer of this matcher
//! (`successors`/`predecessors`/`goal_test`) wants either "all solutions" or
//! "the first solution" rather than a value streamed one step at a time
//! across unrelated work, and collecting eagerly costs nothing those
//! consumers care about while avoiding reimplementing a generator by hand.
//! See DESIGN.md for the tradeoff this choice was weighed against.

use std::collections::HashSet;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::builtins::{evaluate_functions, BuiltinRegistry};
use crate::error::PlanError;
use crate::index::FactIndex;
use crate::term::Term;
use crate::unify::{substitute, unify, Substitution};

/// The four configuration knobs of the external interface.
#[derive(Clone, Copy, Debug)]
pub struct MatcherConfig {
    pub occur_check: bool,
    pub numeric_bucketing: bool,
    pub partial_matching: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig { occur_check: false, numeric_bucketing: false, partial_matching: false }
    }
}

fn vars_of(terms: &[Term]) -> HashSet<Rc<str>> {
    let mut out = HashSet::new();
    for t in terms {
        for v in t.vars() {
            out.insert(v);
        }
    }
    out
}

/// A pattern, preprocessed into its three classes plus each deferred term's
/// `necessary_vars`.
#[derive(Clone, Debug)]
pub struct ClassifiedPattern {
    positive: Vec<Term>,
    negated: Vec<(Term, HashSet<Rc<str>>)>,
    computable: Vec<(Term, HashSet<Rc<str>>)>,
}

impl ClassifiedPattern {
    pub fn classify(terms: &[Term]) -> Result<ClassifiedPattern, PlanError> {
        let mut positive = Vec::new();
        let mut negated_raw = Vec::new();
        let mut computable_raw = Vec::new();
        for t in terms {
            if t.is_computable() {
                computable_raw.push(t.clone());
            } else if let Some(inner) = t.negated_inner() {
                negated_raw.push(inner.clone());
            } else {
                positive.push(t.clone());
            }
        }

        let determined_vars = vars_of(&positive);

        let negated = negated_raw
            .into_iter()
            .map(|inner| {
                let nv: HashSet<Rc<str>> =
                    inner.vars().into_iter().filter(|v| determined_vars.contains(v)).collect();
                (inner, nv)
            })
            .collect();

        let mut computable = Vec::new();
        for t in computable_raw {
            let nv: HashSet<Rc<str>> = t.vars().into_iter().collect();
            for v in &nv {
                if !determined_vars.contains(v) {
                    return Err(PlanError::InvalidOperator {
                        operator: "<pattern>".to_string(),
                        var: v.to_string(),
                    });
                }
            }
            computable.push((t, nv));
        }

        Ok(ClassifiedPattern { positive, negated, computable })
    }
}

/// Mutable per-branch state threaded through the recursive solver.
struct Branch {
    sigma: Substitution,
    positive: Vec<Term>,
    negated: Vec<(Term, HashSet<Rc<str>>)>,
    computable: Vec<(Term, HashSet<Rc<str>>)>,
}

fn all_bound(vars: &HashSet<Rc<str>>, sigma: &Substitution) -> bool {
    vars.iter().all(|v| sigma.is_bound(v))
}

/// Resolves every deferred negated/computable term whose `necessary_vars`
/// are now bound, looping until a fixed point. Returns `Ok(false)` if the
/// branch is dead (a negation was violated, a computable term evaluated to
/// `false`, or an indexed value-check failed).
fn propagate(
    branch: &mut Branch,
    index: &FactIndex,
    registry: &BuiltinRegistry,
) -> Result<bool, PlanError> {
    loop {
        let mut progressed = false;

        let mut still_computable = Vec::new();
        for (term, nv) in branch.computable.drain(..) {
            if all_bound(&nv, &branch.sigma) {
                progressed = true;
                match evaluate_functions(&term, &branch.sigma, registry)? {
                    Term::Atom(crate::term::Atomic::Bool(true)) => {}
                    Term::Atom(crate::term::Atomic::Bool(false)) => return Ok(false),
                    other => {
                        if index.lookup(&other).is_empty() {
                            return Ok(false);
                        }
                    }
                }
            } else {
                still_computable.push((term, nv));
            }
        }
        branch.computable = still_computable;

        let mut still_negated = Vec::new();
        for (inner, nv) in branch.negated.drain(..) {
            if all_bound(&nv, &branch.sigma) {
                progressed = true;
                if inner.is_computable() {
                    match evaluate_functions(&inner, &branch.sigma, registry)? {
                        Term::Atom(crate::term::Atomic::Bool(true)) => return Ok(false),
                        Term::Atom(crate::term::Atomic::Bool(false)) => {}
                        other => {
                            if !index.lookup(&other).is_empty() {
                                return Ok(false);
                            }
                        }
                    }
                } else {
                    let bterm = substitute(&branch.sigma, &inner);
                    let candidates = index.lookup(&bterm);
                    let any_unifies = candidates
                        .iter()
                        .any(|fact| unify(&bterm, fact, &branch.sigma, false).is_some());
                    if any_unifies {
                        return Ok(false);
                    }
                }
            } else {
                still_negated.push((inner, nv));
            }
        }
        branch.negated = still_negated;

        if !progressed {
            break;
        }
    }
    Ok(true)
}

/// Picks the index of the positive term to branch on next: smallest
/// candidate-bucket size, then smallest `|necessary_vars|` (always `0` for
/// positive atoms, so this tie-breaks nothing extra by construction — kept
/// for a uniform three-key ordering), then a uniform random tiebreak.
fn choose_branch_term(
    positive: &[Term],
    sigma: &Substitution,
    index: &FactIndex,
    rng: &mut StdRng,
) -> usize {
    let mut best_idx = 0;
    let mut best_key: Option<(usize, usize, u64)> = None;
    for (i, t) in positive.iter().enumerate() {
        let bterm = substitute(sigma, t);
        let bucket_len = index.lookup(&bterm).len();
        let tie: u64 = rng.gen();
        let key = (bucket_len, 0usize, tie);
        if best_key.is_none() || key < *best_key.as_ref().unwrap() {
            best_key = Some(key);
            best_idx = i;
        }
    }
    best_idx
}

fn solve(
    mut branch: Branch,
    index: &FactIndex,
    config: &MatcherConfig,
    registry: &BuiltinRegistry,
    rng: &mut StdRng,
    out: &mut Vec<Substitution>,
) -> Result<(), PlanError> {
    if !propagate(&mut branch, index, registry)? {
        return Ok(());
    }

    if branch.positive.is_empty() {
        out.push(branch.sigma);
        return Ok(());
    }

    let idx = choose_branch_term(&branch.positive, &branch.sigma, index, rng);
    let term = branch.positive[idx].clone();
    let bterm = substitute(&branch.sigma, &term);
    let mut candidates: Vec<Term> = index.lookup(&bterm).to_vec();

    if candidates.is_empty() {
        if config.partial_matching {
            // Missing key does not fail the branch: the term is simply
            // skipped, unconstrained, and the search continues with it
            // gone from the remaining positive terms.
            let mut remaining_positive = branch.positive.clone();
            remaining_positive.remove(idx);
            let skipped = Branch {
                sigma: branch.sigma.clone(),
                positive: remaining_positive,
                negated: branch.negated.clone(),
                computable: branch.computable.clone(),
            };
            return solve(skipped, index, config, registry, rng, out);
        }
        return Ok(());
    }

    candidates.shuffle(rng);
    let mut remaining_positive = branch.positive.clone();
    remaining_positive.remove(idx);

    for fact in &candidates {
        if let Some(sigma2) = unify(&bterm, fact, &branch.sigma, config.occur_check) {
            let next = Branch {
                sigma: sigma2,
                positive: remaining_positive.clone(),
                negated: branch.negated.clone(),
                computable: branch.computable.clone(),
            };
            solve(next, index, config, registry, rng, out)?;
        }
    }
    Ok(())
}

/// Runs the matcher over `pattern`, returning every extending substitution.
pub fn pattern_match(
    pattern: &[Term],
    index: &FactIndex,
    sigma0: Substitution,
    config: &MatcherConfig,
    registry: &BuiltinRegistry,
    rng: &mut StdRng,
) -> Result<Vec<Substitution>, PlanError> {
    let classified = ClassifiedPattern::classify(pattern)?;
    let branch = Branch {
        sigma: sigma0,
        positive: classified.positive,
        negated: classified.negated,
        computable: classified.computable,
    };
    let mut out = Vec::new();
    solve(branch, index, config, registry, rng, &mut out)?;
    out.dedup_by(|a, b| format!("{}", a) == format!("{}", b));
    Ok(out)
}
