//! Convenience macros for building terms without spelling out every
//! `Term::compound`/`Term::var` call at each use site.

/// Builds a symbol atom. `atom!("block")` => `Term::sym("block")`.
#[macro_export]
macro_rules! atom {
    ($s:expr) => {
        $crate::term::Term::sym($s)
    };
}

/// Builds a variable. `var!("?x")` => `Term::var("?x")`.
#[macro_export]
macro_rules! var {
    ($s:expr) => {
        $crate::term::Term::var($s)
    };
}

/// Builds a compound term. `compound!("on", [atom!("A"), var!("?y")])`.
///
/// # Usage
/// ```
/// use praxis_plan::{atom, var, compound};
/// let t = compound!("on", [atom!("A"), var!("?y")]);
/// ```
#[macro_export]
macro_rules! compound {
    ($head:expr, [$($arg:expr),* $(,)?]) => {
        $crate::term::Term::compound($head, vec![$($arg),*])
    };
}

/// Builds a computable (function-headed) term.
#[macro_export]
macro_rules! fun {
    ($head:expr, [$($arg:expr),* $(,)?]) => {
        $crate::term::Term::fun($head, vec![$($arg),*])
    };
}

/// Builds the `not`-headed negation shape.
#[macro_export]
macro_rules! not {
    ($inner:expr) => {
        $crate::term::Term::not($inner)
    };
}

/// Builds a `State` (set of facts) from a term list.
///
/// # Usage
/// ```
/// use praxis_plan::{atom, compound, state};
/// let s = state![compound!("on", [atom!("A"), atom!("Table")])];
/// ```
#[macro_export]
macro_rules! state {
    ($($fact:expr),* $(,)?) => {
        $crate::problem::state_of(vec![$($fact),*])
    };
}
