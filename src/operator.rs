//! STRIPS operators: named precondition/effect triples, and the
//! standardization step that renames an operator's variables apart before
//! each expansion.
//!
//! Preconditions are partitioned into positive/negative/computable and
//! effects into add/delete at construction time, represented as typed
//! `Vec<Term>` fields rather than recomputed on every use.

use std::collections::HashSet;
use std::rc::Rc;

use crate::error::PlanError;
use crate::skolem::skolem_var;
use crate::term::Term;

/// A named STRIPS operator: preconditions partitioned into positive,
/// negative (negation-as-failure) and computable; effects partitioned into
/// additions and deletions.
#[derive(Clone, Debug)]
pub struct Operator {
    pub name: String,
    pub conditions: Vec<Term>,
    pub effects: Vec<Term>,
    pub cost: f64,

    pub positive_conditions: Vec<Term>,
    pub negative_conditions: Vec<Term>,
    pub computable_conditions: Vec<Term>,
    pub add_effects: Vec<Term>,
    pub delete_effects: Vec<Term>,
    /// Variables occurring only in negative preconditions: existentially
    /// quantified over the negation-as-failure domain, not bindable by
    /// matching a positive condition.
    pub free_vars: Vec<Rc<str>>,
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

impl Operator {
    /// Constructs an operator, partitioning conditions/effects and
    /// validating that every computable precondition only references
    /// variables bound by a positive precondition (`InvalidOperator`
    /// otherwise — a computable term with an undetermined variable can
    /// never be evaluated).
    pub fn new(
        name: impl Into<String>,
        conditions: Vec<Term>,
        effects: Vec<Term>,
        cost: f64,
    ) -> Result<Operator, PlanError> {
        let name = name.into();
        let mut positive_conditions = Vec::new();
        let mut negative_conditions = Vec::new();
        let mut computable_conditions = Vec::new();

        for c in &conditions {
            if c.is_computable() {
                computable_conditions.push(c.clone());
            } else if c.is_negated() {
                negative_conditions.push(c.negated_inner().unwrap().clone());
            } else {
                positive_conditions.push(c.clone());
            }
        }

        let mut add_effects = Vec::new();
        let mut delete_effects = Vec::new();
        for e in &effects {
            if let Some(inner) = e.negated_inner() {
                delete_effects.push(inner.clone());
            } else {
                add_effects.push(e.clone());
            }
        }

        let pos_vars = vars_of(&positive_conditions);
        let neg_vars = vars_of(&negative_conditions);
        let free_vars: Vec<Rc<str>> = neg_vars.difference(&pos_vars).cloned().collect();

        for c in &computable_conditions {
            for v in c.vars() {
                if !pos_vars.contains(&v) {
                    return Err(PlanError::InvalidOperator {
                        operator: name.clone(),
                        var: v.to_string(),
                    });
                }
            }
        }

        Ok(Operator {
            name,
            conditions,
            effects,
            cost,
            positive_conditions,
            negative_conditions,
            computable_conditions,
            add_effects,
            delete_effects,
            free_vars,
        })
    }

    /// `StandardizedCopy`: returns a new operator with every variable
    /// renamed to a fresh skolem, plus the reverse mapping from skolem name
    /// back to the original variable name (used to present plans in terms
    /// of the operator's own variable names).
    pub fn standardize(&self) -> StandardizedOperator {
        let mut mapping: std::collections::HashMap<Rc<str>, Rc<str>> = std::collections::HashMap::new();
        let mut reverse_sub: std::collections::HashMap<Rc<str>, Rc<str>> = std::collections::HashMap::new();

        let mut rename = |v: &Rc<str>| -> Rc<str> {
            if let Some(existing) = mapping.get(v) {
                return Rc::clone(existing);
            }
            let fresh: Rc<str> = Rc::from(skolem_var());
            mapping.insert(Rc::clone(v), Rc::clone(&fresh));
            reverse_sub.insert(Rc::clone(&fresh), Rc::clone(v));
            fresh
        };

        let conditions: Vec<Term> = self.conditions.iter().map(|t| rename_term(t, &mut rename)).collect();
        let effects: Vec<Term> = self.effects.iter().map(|t| rename_term(t, &mut rename)).collect();

        let operator = Operator::new(self.name.clone(), conditions, effects, self.cost)
            .expect("standardizing a valid operator cannot introduce an invalid one");

        StandardizedOperator { operator, reverse_sub }
    }
}

fn rename_term(t: &Term, rename: &mut impl FnMut(&Rc<str>) -> Rc<str>) -> Term {
    match t {
        Term::Var(name) => Term::Var(rename(name)),
        Term::Compound(head, args) => {
            Term::Compound(head.clone(), args.iter().map(|a| rename_term(a, rename)).collect())
        }
        Term::FunTerm(head, args) => {
            Term::FunTerm(head.clone(), args.iter().map(|a| rename_term(a, rename)).collect())
        }
        Term::Atom(_) => t.clone(),
    }
}

/// An operator copy in which every variable has been renamed to a fresh,
/// process-unique skolem name.
#[derive(Clone, Debug)]
pub struct StandardizedOperator {
    pub operator: Operator,
    pub reverse_sub: std::collections::HashMap<Rc<str>, Rc<str>>,
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Cost: {:.2}", self.cost)?;
        write!(f, "Conditions: [")?;
        for (i, c) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        writeln!(f, "]")?;
        write!(f, "Effects: [")?;
        for (i, e) in self.effects.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "]")
    }
}
