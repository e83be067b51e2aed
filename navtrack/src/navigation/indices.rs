//! Position marker within a route.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::route::Route;

/// A `(leg, step)` position within a route.
///
/// Ordered lexicographically: any step of a later leg is after every step of
/// an earlier leg. Indices are replaced, never mutated, when progress advances.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NavigationIndices {
    leg_index: usize,
    step_index: usize,
}

impl NavigationIndices {
    /// The first step of the first leg.
    pub const START: Self = Self::new(0, 0);

    /// Create indices for a leg and step.
    pub const fn new(leg_index: usize, step_index: usize) -> Self {
        Self {
            leg_index,
            step_index,
        }
    }

    /// Leg index.
    #[inline]
    pub fn leg_index(&self) -> usize {
        self.leg_index
    }

    /// Step index within the leg.
    #[inline]
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Whether these indices point at an existing step of `route`.
    pub fn is_valid_for(&self, route: &Route) -> bool {
        route
            .leg(self.leg_index)
            .is_some_and(|leg| self.step_index < leg.steps.len())
    }
}

impl fmt::Display for NavigationIndices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leg {} step {}", self.leg_index, self.step_index)
    }
}
