//! Distance-threshold selection shared by the instruction milestones.

use parking_lot::Mutex;

use crate::navigation::{NavigationIndices, RouteProgress};
use crate::route::DistanceAlongGeometry;

/// Index of the instruction due at `step_distance_remaining`: the one with
/// the smallest distance along geometry that is still at or beyond it.
pub fn select_instruction<T: DistanceAlongGeometry>(
    instructions: &[T],
    step_distance_remaining: f64,
) -> Option<usize> {
    instructions
        .iter()
        .enumerate()
        .filter(|(_, i)| i.distance_along_geometry() >= step_distance_remaining)
        .min_by(|(_, a), (_, b)| {
            a.distance_along_geometry()
                .total_cmp(&b.distance_along_geometry())
        })
        .map(|(index, _)| index)
}

struct Selected<T> {
    key: Option<(NavigationIndices, usize)>,
    instruction: Option<T>,
}

/// Remembers the last selected instruction and reports changes.
pub(super) struct InstructionTracker<T> {
    selected: Mutex<Selected<T>>,
}

impl<T: DistanceAlongGeometry + Clone> InstructionTracker<T> {
    pub(super) fn new() -> Self {
        Self {
            selected: Mutex::new(Selected {
                key: None,
                instruction: None,
            }),
        }
    }

    /// Select from `instructions` and return true when the selection differs
    /// from the previous one.
    pub(super) fn update(&self, progress: &RouteProgress, instructions: &[T]) -> bool {
        let Some(index) = select_instruction(instructions, progress.step_distance_remaining) else {
            return false;
        };

        let key = Some((progress.indices, index));
        let mut selected = self.selected.lock();
        if selected.key == key {
            return false;
        }

        selected.key = key;
        selected.instruction = instructions.get(index).cloned();
        true
    }

    /// The most recently selected instruction.
    pub(super) fn current(&self) -> Option<T> {
        self.selected.lock().instruction.clone()
    }
}
