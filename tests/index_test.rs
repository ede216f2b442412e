//! Cross-module index invariants: lookups through `FactIndex` agree with
//! what the full matcher finds, and an index built over a mixed-arity,
//! mixed-head fact base stays exact for every head/arity combination.

use praxis_plan::index::{index_key, FactIndex, IndexKey};
use praxis_plan::matcher::{pattern_match, MatcherConfig};
use praxis_plan::term::Term;
use praxis_plan::unify::Substitution;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sample_facts() -> Vec<Term> {
    vec![
        Term::compound("on", vec![Term::sym("A"), Term::sym("B")]),
        Term::compound("on", vec![Term::sym("B"), Term::sym("C")]),
        Term::compound("clear", vec![Term::sym("A")]),
        Term::compound("tire", vec![Term::sym("spare")]),
        Term::compound("cost", vec![Term::sym("book1"), Term::int(10)]),
    ]
}

#[test]
fn index_lookup_never_returns_a_fact_with_a_different_head_or_arity() {
    let facts = sample_facts();
    let idx = FactIndex::build(facts.iter(), false);
    let query = Term::compound("on", vec![Term::var("?x"), Term::var("?y")]);
    let hits = idx.lookup(&query);
    assert_eq!(hits.len(), 2);
    for h in hits {
        match h {
            Term::Compound(head, args) => {
                assert_eq!(&**head, "on");
                assert_eq!(args.len(), 2);
            }
            _ => panic!("expected a compound fact"),
        }
    }
}

#[test]
fn index_lookup_count_matches_full_matcher_result_count() {
    let facts = sample_facts();
    let idx = FactIndex::build(facts.iter(), false);
    let registry = praxis_plan::builtins::BuiltinRegistry::default();
    let pattern = vec![Term::compound("on", vec![Term::var("?x"), Term::var("?y")])];
    let mut rng = StdRng::seed_from_u64(4);
    let results = pattern_match(
        &pattern,
        &idx,
        Substitution::new(),
        &MatcherConfig::default(),
        &registry,
        &mut rng,
    )
    .unwrap();
    let direct_key = index_key(&pattern[0], false);
    assert_eq!(results.len(), idx.lookup_key(&direct_key).len());
}

#[test]
fn nullary_and_unary_facts_index_under_distinct_node_keys() {
    let facts = vec![Term::compound("done", vec![]), Term::compound("ready", vec![Term::sym("x")])];
    let idx = FactIndex::build(facts.iter(), false);
    let done_key = IndexKey::Node(std::rc::Rc::from("done"), vec![]);
    let ready_key = index_key(&Term::compound("ready", vec![Term::var("?x")]), false);
    assert_eq!(idx.lookup_key(&done_key).len(), 1);
    assert_eq!(idx.lookup_key(&ready_key).len(), 1);
}
