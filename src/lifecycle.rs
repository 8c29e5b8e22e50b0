//! Directed status graphs shared by tasks and bookings.

use std::fmt;
use thiserror::Error;

/// A closed set of statuses with a directed transition graph.
pub trait StatusGraph: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// Returns the statuses reachable from `self` in a single step.
    fn successors(self) -> &'static [Self];

    /// Returns whether `next` is a legal successor of `self`.
    fn can_transition_to(self, next: Self) -> bool {
        self.successors().contains(&next)
    }

    /// Returns whether no transition leaves `self`.
    fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

/// A requested edge that is absent from the status graph.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot move from {from} to {to}")]
pub struct IllegalTransition<S: StatusGraph> {
    /// Current status.
    pub from: S,
    /// Requested status.
    pub to: S,
}

/// Checks that `to` is reachable from `from` in one step.
///
/// # Errors
///
/// Returns [`IllegalTransition`] when the edge is not in the graph.
pub fn check_transition<S: StatusGraph>(from: S, to: S) -> Result<(), IllegalTransition<S>> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(IllegalTransition { from, to })
    }
}
