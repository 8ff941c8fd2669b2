//! Ordered first-match rule lists.
//!
//! Every decision cascade in the scorers is a slice of rules evaluated top
//! to bottom; the first predicate that holds decides the outcome.

/// A predicate over `C` paired with the outcome it yields.
pub struct Rule<C: ?Sized, T> {
    pub when: fn(&C) -> bool,
    pub then: T,
}

/// Outcome of the first rule whose predicate holds for `ctx`.
pub fn first_match<C: ?Sized, T: Copy>(rules: &[Rule<C, T>], ctx: &C) -> Option<T> {
    rules.iter().find(|r| (r.when)(ctx)).map(|r| r.then)
}
