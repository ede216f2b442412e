//! The computable-predicate registry and its evaluator.
//!
//! Computable predicates are represented by embedding a callable reference
//! inside a term (`Term::FunTerm`). Since Rust has no first-class
//! function-in-data, this module plays the indirection-table role: a
//! `BuiltinRegistry` maps a head name to a `BuiltinFn` trampoline that
//! dispatches by string name to one of the `bip_*` evaluators below.

use std::collections::HashMap;

use crate::error::PlanError;
use crate::term::{Atomic, Term};
use crate::unify::Substitution;

/// A registered builtin: takes its already-evaluated argument terms and
/// returns a result term, or a fatal error.
pub type BuiltinFn = fn(&[Term]) -> Result<Term, PlanError>;

/// The reserved head name for the short-circuiting `or` special form; it is
/// never looked up in the registry because its evaluation order (lazily
/// evaluate the second branch only if needed) can't be expressed as a
/// strict `BuiltinFn`.
pub const OR_HEAD: &str = "or";

/// Maps callable names to their evaluators. Callers may register
/// additional builtins beyond the default library.
pub struct BuiltinRegistry {
    fns: HashMap<&'static str, BuiltinFn>,
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        let mut r = BuiltinRegistry { fns: HashMap::new() };
        r.register("eq", bip_eq);
        r.register("ne", bip_ne);
        r.register("lt", bip_lt);
        r.register("le", bip_le);
        r.register("gt", bip_gt);
        r.register("ge", bip_ge);
        r.register("add", bip_add);
        r.register("sub", bip_sub);
        r.register("mul", bip_mul);
        r.register("div", bip_div);
        r
    }
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        BuiltinRegistry { fns: HashMap::new() }
    }

    pub fn register(&mut self, name: &'static str, f: BuiltinFn) {
        self.fns.insert(name, f);
    }

    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.fns.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        name == OR_HEAD || self.fns.contains_key(name)
    }
}

/// `EvaluateFunctions(x, sigma)`: recursively rewrites a term, evaluating
/// every `FunTerm` it finds bottom-up. Non-`FunTerm` terms are returned
/// substituted but otherwise unchanged.
///
/// `or` is special-cased exactly as the source semantics require: evaluate
/// the first branch; if it is anything other than `false`, the whole thing
/// is `true`. If the first branch instead raises (a malformed/unbound
/// sub-term), fall through and evaluate the second branch; if that succeeds
/// return `true`, otherwise re-raise the first branch's error.
pub fn evaluate_functions(
    x: &Term,
    sigma: &Substitution,
    registry: &BuiltinRegistry,
) -> Result<Term, PlanError> {
    match x {
        Term::Var(name) => match sigma.get(name) {
            Some(bound) => evaluate_functions(bound, sigma, registry),
            None => Err(PlanError::UnboundInFunction {
                head: "<eval>".to_string(),
                var: name.to_string(),
            }),
        },
        Term::Atom(_) => Ok(x.clone()),
        Term::Compound(head, args) => {
            let evaluated: Result<Vec<Term>, PlanError> =
                args.iter().map(|a| evaluate_functions(a, sigma, registry)).collect();
            Ok(Term::Compound(head.clone(), evaluated?))
        }
        Term::FunTerm(head, args) => {
            if &**head == OR_HEAD {
                if args.len() != 2 {
                    return Err(PlanError::BadArity {
                        head: "or".to_string(),
                        expected: 2,
                        got: args.len(),
                    });
                }
                return match evaluate_functions(&args[0], sigma, registry) {
                    Ok(v) if v != Term::boolean(false) => Ok(Term::boolean(true)),
                    Ok(_) => evaluate_functions(&args[1], sigma, registry),
                    Err(first_err) => match evaluate_functions(&args[1], sigma, registry) {
                        Ok(v) if v != Term::boolean(false) => Ok(Term::boolean(true)),
                        Ok(_) => Err(first_err),
                        Err(_) => Err(first_err),
                    },
                };
            }
            let f = registry.get(head).ok_or_else(|| PlanError::NonCallableHead {
                head: head.to_string(),
            })?;
            let evaluated: Result<Vec<Term>, PlanError> =
                args.iter().map(|a| evaluate_functions(a, sigma, registry)).collect();
            f(&evaluated?)
        }
    }
}

fn two_args<'a>(args: &'a [Term], head: &str) -> Result<(&'a Term, &'a Term), PlanError> {
    if args.len() != 2 {
        return Err(PlanError::BadArity { head: head.to_string(), expected: 2, got: args.len() });
    }
    Ok((&args[0], &args[1]))
}

fn as_number(t: &Term, head: &str) -> Result<f64, PlanError> {
    match t {
        Term::Atom(Atomic::Int(i)) => Ok(*i as f64),
        Term::Atom(Atomic::Float(f)) => Ok(*f),
        _ => Err(PlanError::UserCallableError {
            head: head.to_string(),
            message: format!("{} is not numeric", t),
        }),
    }
}

fn both_int(a: &Term, b: &Term) -> Option<(i64, i64)> {
    match (a, b) {
        (Term::Atom(Atomic::Int(x)), Term::Atom(Atomic::Int(y))) => Some((*x, *y)),
        _ => None,
    }
}

fn bip_eq(args: &[Term]) -> Result<Term, PlanError> {
    let (a, b) = two_args(args, "eq")?;
    Ok(Term::boolean(a == b))
}

fn bip_ne(args: &[Term]) -> Result<Term, PlanError> {
    let (a, b) = two_args(args, "ne")?;
    Ok(Term::boolean(a != b))
}

fn bip_lt(args: &[Term]) -> Result<Term, PlanError> {
    let (a, b) = two_args(args, "lt")?;
    Ok(Term::boolean(as_number(a, "lt")? < as_number(b, "lt")?))
}

fn bip_le(args: &[Term]) -> Result<Term, PlanError> {
    let (a, b) = two_args(args, "le")?;
    Ok(Term::boolean(as_number(a, "le")? <= as_number(b, "le")?))
}

fn bip_gt(args: &[Term]) -> Result<Term, PlanError> {
    let (a, b) = two_args(args, "gt")?;
    Ok(Term::boolean(as_number(a, "gt")? > as_number(b, "gt")?))
}

fn bip_ge(args: &[Term]) -> Result<Term, PlanError> {
    let (a, b) = two_args(args, "ge")?;
    Ok(Term::boolean(as_number(a, "ge")? >= as_number(b, "ge")?))
}

fn bip_add(args: &[Term]) -> Result<Term, PlanError> {
    let (a, b) = two_args(args, "add")?;
    if let Some((x, y)) = both_int(a, b) {
        return Ok(Term::int(x + y));
    }
    Ok(Term::float(as_number(a, "add")? + as_number(b, "add")?))
}

fn bip_sub(args: &[Term]) -> Result<Term, PlanError> {
    let (a, b) = two_args(args, "sub")?;
    if let Some((x, y)) = both_int(a, b) {
        return Ok(Term::int(x - y));
    }
    Ok(Term::float(as_number(a, "sub")? - as_number(b, "sub")?))
}

fn bip_mul(args: &[Term]) -> Result<Term, PlanError> {
    let (a, b) = two_args(args, "mul")?;
    if let Some((x, y)) = both_int(a, b) {
        return Ok(Term::int(x * y));
    }
    Ok(Term::float(as_number(a, "mul")? * as_number(b, "mul")?))
}

fn bip_div(args: &[Term]) -> Result<Term, PlanError> {
    let (a, b) = two_args(args, "div")?;
    let denom = as_number(b, "div")?;
    if denom == 0.0 {
        return Err(PlanError::UserCallableError {
            head: "div".to_string(),
            message: "division by zero".to_string(),
        });
    }
    Ok(Term::float(as_number(a, "div")? / denom))
}
