//! The variablized-key fact index.
//!
//! `IndexKey` collapses a term to its shape (every variable replaced by the
//! sentinel `?`, optionally every number bucketed to `#NUM`); `BuildIndex`
//! inserts each fact under every key reachable by independently replacing
//! any subset of its argument positions with `?`, so that a query with some
//! positions still unbound can still find candidate facts in O(1) amortized
//! lookup. The variablization step is a cartesian product over each
//! argument's own variant list — ported from `get_variablized_keys`'s
//! `product(*possible_bodies)` — not a single whole-term on/off toggle.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::term::{Atomic, Term};

pub const VAR_SENTINEL: &str = "?";
pub const NUM_SENTINEL: &str = "#NUM";

/// A term collapsed to its indexable shape. Hashable, so it can key a
/// `HashMap`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndexKey {
    Sentinel,
    NumSentinel,
    Leaf(String),
    Node(Rc<str>, Vec<IndexKey>),
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Sentinel => write!(f, "?"),
            IndexKey::NumSentinel => write!(f, "#NUM"),
            IndexKey::Leaf(s) => write!(f, "{}", s),
            IndexKey::Node(head, args) => {
                write!(f, "({}", head)?;
                for a in args {
                    write!(f, " {}", a)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// `IndexKey(t)`, per the term model: variables collapse to `?`; numbers
/// collapse to `#NUM` only when `numeric_bucketing` is enabled (off by
/// default, for exact-match precision).
pub fn index_key(t: &Term, numeric_bucketing: bool) -> IndexKey {
    match t {
        Term::Var(_) => IndexKey::Sentinel,
        Term::Atom(Atomic::Int(_)) | Term::Atom(Atomic::Float(_)) if numeric_bucketing => {
            IndexKey::NumSentinel
        }
        Term::Atom(a) => IndexKey::Leaf(a.to_string()),
        Term::Compound(head, args) | Term::FunTerm(head, args) => IndexKey::Node(
            Rc::clone(head),
            args.iter().map(|a| index_key(a, numeric_bucketing)).collect(),
        ),
    }
}

/// `VariablizedKeys(k)`: `k` itself, then every variant obtainable by
/// independently variablizing each argument position (recursively), in
/// depth-first right-before-left order, finally ending in the single `?`
/// sentinel (unless `k` already is one).
pub fn variablized_keys(k: &IndexKey) -> Vec<IndexKey> {
    let mut out = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut push = |key: IndexKey, out: &mut Vec<IndexKey>, seen: &mut std::collections::HashSet<IndexKey>| {
        if seen.insert(key.clone()) {
            out.push(key);
        }
    };
    push(k.clone(), &mut out, &mut seen);

    if let IndexKey::Node(head, args) = k {
        let per_arg_variants: Vec<Vec<IndexKey>> =
            args.iter().map(variablized_keys).collect();
        for combo in cartesian_product(&per_arg_variants) {
            let candidate = IndexKey::Node(Rc::clone(head), combo);
            if &candidate != k {
                push(candidate, &mut out, &mut seen);
            }
        }
    }

    if k != &IndexKey::Sentinel {
        push(IndexKey::Sentinel, &mut out, &mut seen);
    }
    out
}

fn cartesian_product(lists: &[Vec<IndexKey>]) -> Vec<Vec<IndexKey>> {
    let mut result: Vec<Vec<IndexKey>> = vec![vec![]];
    for list in lists {
        let mut next = Vec::with_capacity(result.len() * list.len().max(1));
        for prefix in &result {
            for item in list {
                let mut extended = prefix.clone();
                extended.push(item.clone());
                next.push(extended);
            }
        }
        result = next;
    }
    result
}

/// A mapping from index key to the ordered list of facts inserted under it.
#[derive(Clone, Debug, Default)]
pub struct FactIndex {
    buckets: HashMap<IndexKey, Vec<Term>>,
    numeric_bucketing: bool,
}

impl FactIndex {
    pub fn new(numeric_bucketing: bool) -> Self {
        FactIndex { buckets: HashMap::new(), numeric_bucketing }
    }

    /// `BuildIndex(facts)`.
    pub fn build<'a>(facts: impl IntoIterator<Item = &'a Term>, numeric_bucketing: bool) -> Self {
        let mut idx = FactIndex::new(numeric_bucketing);
        for f in facts {
            idx.insert(f);
        }
        idx
    }

    pub fn insert(&mut self, fact: &Term) {
        let key = index_key(fact, self.numeric_bucketing);
        for k in variablized_keys(&key) {
            self.buckets.entry(k).or_default().push(fact.clone());
        }
    }

    /// `Lookup(Q, sigma)`: candidates for a (possibly already-substituted)
    /// query term. Returns an empty slice, never absent, for callers'
    /// convenience.
    pub fn lookup(&self, query: &Term) -> &[Term] {
        let key = index_key(query, self.numeric_bucketing);
        self.buckets.get(&key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn lookup_key(&self, key: &IndexKey) -> &[Term] {
        self.buckets.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &IndexKey) -> bool {
        self.buckets.contains_key(key)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

pub fn format_index(idx: &FactIndex) -> String {
    let total: usize = idx.buckets.values().map(|v| v.len()).sum();
    format!("FactIndex {{ buckets: {}, total entries: {} }}", idx.buckets.len(), total)
}

pub fn print_index(idx: &FactIndex) {
    println!("{}", format_index(idx));
}
