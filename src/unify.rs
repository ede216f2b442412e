//! Substitutions and first-order structural unification.
//!
//! The substitution set here is a persistent, `Rc`-shared map from variable
//! name to term: cheap to clone and share across backtracking branches, and
//! extended by copying the underlying map with one binding added, matching
//! a plain `extend(s, var, val)`. Keyed by variable name rather than by a
//! small integer id, since this crate's variables are not pre-registered
//! against a single global table before matching starts.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::term::Term;

/// A finite mapping from variable names to terms. Cloning a `Substitution`
/// is O(1) (it clones an `Rc`); extending one is O(n) in the number of
/// existing bindings, matching the copy-on-extend semantics of the
/// planner's own `extend`.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    bindings: Rc<HashMap<Rc<str>, Term>>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution { bindings: Rc::new(HashMap::new()) }
    }

    pub fn get(&self, var: &str) -> Option<&Term> {
        self.bindings.get(var)
    }

    pub fn is_bound(&self, var: &str) -> bool {
        self.bindings.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Term)> {
        self.bindings.iter()
    }

    /// Returns a new substitution extending `self` with `var -> val`.
    /// Does not check for an existing binding of `var`; callers that need
    /// `UnifyVar`'s "already bound" branch check `is_bound` first.
    pub fn extend(&self, var: Rc<str>, val: Term) -> Substitution {
        let mut map = (*self.bindings).clone();
        map.insert(var, val);
        Substitution { bindings: Rc::new(map) }
    }
}

/// `Substitute(sigma, x)`: replaces every variable in `x` bound by `sigma`
/// with its binding. Does not recurse into the substituted value itself
/// (idempotence is the caller's concern, per the term model).
pub fn substitute(sigma: &Substitution, x: &Term) -> Term {
    match x {
        Term::Var(name) => match sigma.get(name) {
            Some(bound) => bound.clone(),
            None => x.clone(),
        },
        Term::Compound(head, args) => {
            Term::Compound(Rc::clone(head), args.iter().map(|a| substitute(sigma, a)).collect())
        }
        Term::FunTerm(head, args) => {
            Term::FunTerm(Rc::clone(head), args.iter().map(|a| substitute(sigma, a)).collect())
        }
        Term::Atom(_) => x.clone(),
    }
}

/// `OccurCheck(var, x)`: true iff `var` occurs anywhere inside `x`.
pub fn occur_check(var: &str, x: &Term) -> bool {
    match x {
        Term::Var(name) => &**name == var,
        Term::Compound(_, args) | Term::FunTerm(_, args) => {
            args.iter().any(|a| occur_check(var, a))
        }
        Term::Atom(_) => false,
    }
}

/// `UnifyVar(v, x, sigma, check)`.
fn unify_var(
    var_name: &Rc<str>,
    x: &Term,
    sigma: &Substitution,
    check: bool,
) -> Option<Substitution> {
    if let Some(bound) = sigma.get(var_name).cloned() {
        return unify(&bound, x, sigma, check);
    }
    if let Term::Var(other) = x {
        if let Some(bound) = sigma.get(other).cloned() {
            return unify(&Term::Var(Rc::clone(var_name)), &bound, sigma, check);
        }
    }
    if check && occur_check(var_name, x) {
        return None;
    }
    Some(sigma.extend(Rc::clone(var_name), x.clone()))
}

/// `Unify(x, y, sigma, check)`: structural first-order unification.
/// Computable-headed terms (`Term::FunTerm`) are never unified here; they
/// are evaluated instead (see `crate::builtins::evaluate_functions`).
pub fn unify(x: &Term, y: &Term, sigma: &Substitution, check: bool) -> Option<Substitution> {
    if x == y {
        return Some(sigma.clone());
    }
    if let Term::Var(vx) = x {
        return unify_var(vx, y, sigma, check);
    }
    if let Term::Var(vy) = y {
        return unify_var(vy, x, sigma, check);
    }
    match (x, y) {
        (Term::Compound(hx, ax), Term::Compound(hy, ay)) => {
            if hx != hy || ax.len() != ay.len() {
                return None;
            }
            let mut s = sigma.clone();
            for (a, b) in ax.iter().zip(ay.iter()) {
                s = unify(a, b, &s, check)?;
            }
            Some(s)
        }
        _ => None,
    }
}

pub fn format_substitution(sigma: &Substitution) -> String {
    let mut parts: Vec<String> =
        sigma.iter().map(|(k, v)| format!("{} = {}", k, v)).collect();
    parts.sort();
    format!("{{{}}}", parts.join(", "))
}

pub fn print_substitution(sigma: &Substitution) {
    println!("{}", format_substitution(sigma));
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_substitution(self))
    }
}
