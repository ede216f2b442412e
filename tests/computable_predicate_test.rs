//! S5: computable/functional predicates end to end, including the `or`
//! short-circuit and an arithmetic effect.

use praxis_plan::matcher::MatcherConfig;
use praxis_plan::operator::Operator;
use praxis_plan::problem::{state_of, StateSpacePlanningProblem};
use praxis_plan::search::depth_first_plan;
use praxis_plan::term::Term;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn discount_if_cheap_or_loyal() -> Operator {
    Operator::new(
        "apply_discount",
        vec![
            Term::compound("price", vec![Term::var("?item"), Term::var("?p")]),
            Term::compound("tier", vec![Term::var("?item"), Term::var("?t")]),
            Term::fun(
                "or",
                vec![
                    Term::fun("lt", vec![Term::var("?p"), Term::int(10)]),
                    Term::fun("eq", vec![Term::var("?t"), Term::sym("loyal")]),
                ],
            ),
        ],
        vec![Term::compound("discounted", vec![Term::var("?item")])],
        1.0,
    )
    .unwrap()
}

#[test]
fn or_predicate_lets_either_branch_justify_the_discount() {
    let initial = state_of(vec![
        Term::compound("price", vec![Term::sym("widget"), Term::int(50)]),
        Term::compound("tier", vec![Term::sym("widget"), Term::sym("loyal")]),
    ]);
    let goal = vec![Term::compound("discounted", vec![Term::sym("widget")])];
    let problem = StateSpacePlanningProblem::new(
        initial,
        goal,
        vec![discount_if_cheap_or_loyal()],
        MatcherConfig::default(),
    );
    let mut rng = StdRng::seed_from_u64(9);
    let plan = depth_first_plan(&problem, 2, &mut rng).unwrap();
    assert!(plan.is_some(), "loyal tier alone should satisfy the or, even though price is not below 10");
}

#[test]
fn or_predicate_fails_when_neither_branch_holds() {
    let initial = state_of(vec![
        Term::compound("price", vec![Term::sym("widget"), Term::int(50)]),
        Term::compound("tier", vec![Term::sym("widget"), Term::sym("regular")]),
    ]);
    let goal = vec![Term::compound("discounted", vec![Term::sym("widget")])];
    let problem = StateSpacePlanningProblem::new(
        initial,
        goal,
        vec![discount_if_cheap_or_loyal()],
        MatcherConfig::default(),
    );
    let mut rng = StdRng::seed_from_u64(9);
    let plan = depth_first_plan(&problem, 2, &mut rng).unwrap();
    assert!(plan.is_none(), "neither price below 10 nor loyal tier holds, so the discount must not apply");
}

#[test]
fn arithmetic_effect_updates_a_numeric_fact() {
    let spend = Operator::new(
        "spend",
        vec![Term::compound("balance", vec![Term::var("?b")])],
        vec![
            Term::not(Term::compound("balance", vec![Term::var("?b")])),
            Term::compound("balance", vec![Term::fun("sub", vec![Term::var("?b"), Term::int(10)])]),
        ],
        1.0,
    )
    .unwrap();
    let initial = state_of(vec![Term::compound("balance", vec![Term::int(30)])]);
    let goal = vec![Term::compound("balance", vec![Term::int(20)])];
    let problem =
        StateSpacePlanningProblem::new(initial, goal, vec![spend], MatcherConfig::default());
    let mut rng = StdRng::seed_from_u64(9);
    let plan = depth_first_plan(&problem, 2, &mut rng).unwrap();
    assert!(plan.is_some(), "subtracting 10 from a balance of 30 should reach a balance of 20");
}
