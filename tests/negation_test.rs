//! S4: negation-as-failure end to end, through a full planning problem
//! rather than the matcher directly.

use praxis_plan::matcher::MatcherConfig;
use praxis_plan::operator::Operator;
use praxis_plan::problem::{state_of, StateSpacePlanningProblem};
use praxis_plan::search::depth_first_plan;
use praxis_plan::term::Term;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sound_alarm_if_unguarded() -> Operator {
    // Fires only when no guard is present, i.e. the site is unattended.
    Operator::new(
        "sound_alarm",
        vec![
            Term::compound("site", vec![Term::var("?s")]),
            Term::not(Term::compound("guard", vec![Term::var("?s")])),
        ],
        vec![Term::compound("alarmed", vec![Term::var("?s")])],
        1.0,
    )
    .unwrap()
}

#[test]
fn negated_precondition_blocks_application_when_a_witness_exists() {
    let initial = state_of(vec![
        Term::compound("site", vec![Term::sym("vault")]),
        Term::compound("guard", vec![Term::sym("vault")]),
    ]);
    let goal = vec![Term::compound("alarmed", vec![Term::sym("vault")])];
    let problem = StateSpacePlanningProblem::new(
        initial,
        goal,
        vec![sound_alarm_if_unguarded()],
        MatcherConfig::default(),
    );
    let mut rng = StdRng::seed_from_u64(3);
    let plan = depth_first_plan(&problem, 2, &mut rng).unwrap();
    assert!(plan.is_none(), "a guard at the vault should prevent the alarm operator from firing");
}

#[test]
fn negated_precondition_allows_application_once_the_witness_is_removed() {
    let initial = state_of(vec![Term::compound("site", vec![Term::sym("vault")])]);
    let goal = vec![Term::compound("alarmed", vec![Term::sym("vault")])];
    let problem = StateSpacePlanningProblem::new(
        initial,
        goal,
        vec![sound_alarm_if_unguarded()],
        MatcherConfig::default(),
    );
    let mut rng = StdRng::seed_from_u64(3);
    let plan = depth_first_plan(&problem, 2, &mut rng).unwrap();
    assert!(plan.is_some(), "with no guard fact present, negation as failure should let the operator fire");
}
