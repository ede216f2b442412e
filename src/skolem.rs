//! The process-wide skolem counter.
//!
//! Mints fresh, globally-unique variable names used when standardizing an
//! operator apart at each expansion. Plays the same role as `LOGIC_VAR_ID`
//! in the inference engine this crate grew out of, but as an `AtomicUsize`
//! rather than a `static mut` — the single-global-counter shape is kept,
//! the `unsafe` access pattern is not.

use std::sync::atomic::{AtomicUsize, Ordering};

static SKOLEM_ID: AtomicUsize = AtomicUsize::new(0);

/// Returns the next globally-unique skolem id and advances the counter.
pub fn next_skolem_id() -> usize {
    SKOLEM_ID.fetch_add(1, Ordering::SeqCst)
}

/// Resets the counter to zero. Exists for test determinism; production
/// callers never need to reset it, since uniqueness only ever requires
/// monotonic increase, not any particular starting value.
pub fn reset_skolem_id() {
    SKOLEM_ID.store(0, Ordering::SeqCst);
}

/// Mints a fresh skolem variable name, e.g. `?skolem7`. The original
/// variable's base name is not retained in the name itself; callers that
/// need to present results in terms of the original operator's variables
/// track the `skolem -> original` mapping separately (see
/// `operator::StandardizedOperator::reverse_sub`).
pub fn skolem_var() -> String {
    format!("?skolem{}", next_skolem_id())
}
