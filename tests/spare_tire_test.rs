//! S2: spare tire, exercised in both the progression and regression
//! directions.

use praxis_plan::matcher::MatcherConfig;
use praxis_plan::operator::Operator;
use praxis_plan::problem::{state_of, StateSpacePlanningProblem};
use praxis_plan::search::{depth_first_plan, depth_first_regress};
use praxis_plan::term::Term;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn remove() -> Operator {
    Operator::new(
        "remove",
        vec![Term::compound("at", vec![Term::var("?obj"), Term::var("?loc")])],
        vec![
            Term::not(Term::compound("at", vec![Term::var("?obj"), Term::var("?loc")])),
            Term::compound("at", vec![Term::var("?obj"), Term::sym("ground")]),
        ],
        1.0,
    )
    .unwrap()
}

fn puton() -> Operator {
    Operator::new(
        "puton",
        vec![
            Term::compound("tire", vec![Term::var("?t")]),
            Term::compound("at", vec![Term::var("?t"), Term::sym("ground")]),
        ],
        vec![
            Term::not(Term::compound("at", vec![Term::var("?t"), Term::sym("ground")])),
            Term::compound("at", vec![Term::var("?t"), Term::sym("axle")]),
        ],
        1.0,
    )
    .unwrap()
}

fn leave_overnight() -> Operator {
    // Deliberately loses every fact: running it is never part of a
    // shortest plan, but it must not block the search.
    Operator::new("leave_overnight", vec![], vec![], 1.0).unwrap()
}

fn operators() -> Vec<Operator> {
    vec![remove(), puton(), leave_overnight()]
}

fn initial_state() -> praxis_plan::problem::State {
    state_of(vec![
        Term::compound("tire", vec![Term::sym("flat")]),
        Term::compound("tire", vec![Term::sym("spare")]),
        Term::compound("at", vec![Term::sym("flat"), Term::sym("axle")]),
        Term::compound("at", vec![Term::sym("spare"), Term::sym("trunk")]),
    ])
}

fn goal() -> Vec<Term> {
    vec![Term::compound("at", vec![Term::sym("spare"), Term::sym("axle")])]
}

#[test]
fn spare_tire_progression_finds_a_short_plan() {
    let problem =
        StateSpacePlanningProblem::new(initial_state(), goal(), operators(), MatcherConfig::default());
    let mut rng = StdRng::seed_from_u64(11);
    let plan = depth_first_plan(&problem, 6, &mut rng).unwrap().expect("plan should exist");
    assert!(plan.cost <= 3.0);
}

#[test]
fn spare_tire_regression_also_finds_a_plan() {
    let problem =
        StateSpacePlanningProblem::new(initial_state(), goal(), operators(), MatcherConfig::default());
    let mut rng = StdRng::seed_from_u64(11);
    let plan = depth_first_regress(&problem, 6, &mut rng).unwrap();
    assert!(plan.is_some(), "regression should reach a goal node satisfied by the initial state");
}
