//! S6: book ordering, exercising an arithmetic-comparison precondition
//! together with an arithmetic effect on the same variable.

use praxis_plan::matcher::MatcherConfig;
use praxis_plan::operator::Operator;
use praxis_plan::problem::{state_of, StateSpacePlanningProblem};
use praxis_plan::search::depth_first_plan;
use praxis_plan::term::Term;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn buy() -> Operator {
    Operator::new(
        "buy",
        vec![
            Term::compound("Money", vec![Term::var("?m")]),
            Term::compound("Price", vec![Term::var("?b"), Term::var("?c")]),
            Term::fun("ge", vec![Term::var("?m"), Term::var("?c")]),
        ],
        vec![
            Term::not(Term::compound("Money", vec![Term::var("?m")])),
            Term::compound("Money", vec![Term::fun("sub", vec![Term::var("?m"), Term::var("?c")])]),
            Term::compound("Own", vec![Term::var("?b")]),
        ],
        1.0,
    )
    .unwrap()
}

#[test]
fn buying_book2_leaves_twenty_dollars() {
    let initial = state_of(vec![
        Term::compound("Money", vec![Term::int(30)]),
        Term::compound("Price", vec![Term::sym("book1"), Term::int(10)]),
        Term::compound("Price", vec![Term::sym("book2"), Term::int(10)]),
        Term::compound("Price", vec![Term::sym("book3"), Term::int(10)]),
    ]);
    let goal = vec![Term::compound("Own", vec![Term::sym("book2")])];
    let problem = StateSpacePlanningProblem::new(initial, goal, vec![buy()], MatcherConfig::default());
    let mut rng = StdRng::seed_from_u64(13);
    let plan = depth_first_plan(&problem, 1, &mut rng).unwrap().expect("a single buy should suffice");
    assert_eq!(plan.cost, 1.0);
    assert!(plan.state.contains(&Term::compound("Money", vec![Term::int(20)])));
    assert!(plan.state.contains(&Term::compound("Own", vec![Term::sym("book2")])));
}

#[test]
fn buying_is_blocked_when_funds_are_insufficient() {
    let initial = state_of(vec![
        Term::compound("Money", vec![Term::int(5)]),
        Term::compound("Price", vec![Term::sym("book2"), Term::int(10)]),
    ]);
    let goal = vec![Term::compound("Own", vec![Term::sym("book2")])];
    let problem = StateSpacePlanningProblem::new(initial, goal, vec![buy()], MatcherConfig::default());
    let mut rng = StdRng::seed_from_u64(13);
    let plan = depth_first_plan(&problem, 1, &mut rng).unwrap();
    assert!(plan.is_none(), "5 dollars should not cover a 10 dollar book");
}
