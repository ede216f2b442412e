//! A STRIPS-style classical planning core: first-order terms and
//! unification, an indexed conjunctive pattern matcher with
//! negation-as-failure and computable predicates, and forward/backward
//! state-space search over STRIPS operators.
//!
//! ```
//! use praxis_plan::term::Term;
//! use praxis_plan::operator::Operator;
//! use praxis_plan::problem::{state_of, StateSpacePlanningProblem};
//! use praxis_plan::matcher::MatcherConfig;
//! use praxis_plan::search::depth_first_plan;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let remove = Operator::new(
//!     "remove",
//!     vec![Term::compound("at", vec![Term::var("?x"), Term::var("?l")])],
//!     vec![
//!         Term::not(Term::compound("at", vec![Term::var("?x"), Term::var("?l")])),
//!         Term::compound("at", vec![Term::var("?x"), Term::sym("ground")]),
//!     ],
//!     1.0,
//! ).unwrap();
//!
//! let initial = state_of(vec![Term::compound("at", vec![Term::sym("flat"), Term::sym("axle")])]);
//! let goal = vec![Term::compound("at", vec![Term::sym("flat"), Term::sym("ground")])];
//! let problem = StateSpacePlanningProblem::new(initial, goal, vec![remove], MatcherConfig::default());
//! let mut rng = StdRng::seed_from_u64(0);
//! let plan = depth_first_plan(&problem, 5, &mut rng).unwrap();
//! assert!(plan.is_some());
//! ```

pub mod builtins;
pub mod error;
pub mod index;
pub mod macros;
pub mod matcher;
pub mod operator;
pub mod problem;
pub mod search;
pub mod skolem;
pub mod term;
pub mod unify;

pub use error::PlanError;
pub use term::Term;
