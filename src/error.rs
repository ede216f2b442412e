//! Fatal error types for the planning core.
//!
//! Most failure in this crate is silent: a unification that doesn't hold, or
//! a pattern that doesn't match, is represented by `None` or an empty
//! iterator, not an `Err`. `PlanError` only covers conditions that indicate
//! a malformed operator or a broken builtin, the way a malformed knowledge
//! base in the engine this crate grew out of triggers a `panic!` rather than
//! just failing to find a solution.

use std::fmt;

/// Fatal errors raised while evaluating computable terms or constructing
/// operators. Never used for ordinary unification/match failure.
#[derive(Clone, Debug, PartialEq)]
pub enum PlanError {
    /// A computable atom evaluated with a variable that was never bound.
    UnboundInFunction { head: String, var: String },
    /// A registered builtin reported an internal failure.
    UserCallableError { head: String, message: String },
    /// A computable precondition referenced a variable outside the
    /// operator's determined variables at construction time.
    InvalidOperator { operator: String, var: String },
    /// A callable was invoked with the wrong number of arguments.
    BadArity { head: String, expected: usize, got: usize },
    /// A compound's head was not a registered callable where one was
    /// required.
    NonCallableHead { head: String },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::UnboundInFunction { head, var } => {
                write!(f, "unbound variable {} in function {}", var, head)
            }
            PlanError::UserCallableError { head, message } => {
                write!(f, "builtin {} failed: {}", head, message)
            }
            PlanError::InvalidOperator { operator, var } => {
                write!(
                    f,
                    "operator {} references undetermined variable {} in a computable precondition",
                    operator, var
                )
            }
            PlanError::BadArity { head, expected, got } => {
                write!(f, "{} expects {} argument(s), got {}", head, expected, got)
            }
            PlanError::NonCallableHead { head } => {
                write!(f, "{} is not a registered callable", head)
            }
        }
    }
}

impl std::error::Error for PlanError {}
