//! Milestone registry shared between the public API and the worker.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::milestone::Milestone;

use super::dispatcher::same_allocation;

/// Registered milestones in registration order.
///
/// The worker takes a snapshot each tick, so additions and removals made
/// during a tick apply from the next one.
#[derive(Default)]
pub struct MilestoneRegistry {
    milestones: Mutex<Vec<Arc<dyn Milestone>>>,
}

impl MilestoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a milestone. Returns false if this instance is already registered.
    pub fn add(&self, milestone: Arc<dyn Milestone>) -> bool {
        let mut milestones = self.milestones.lock();
        if milestones.iter().any(|m| same_allocation(m, &milestone)) {
            warn!(
                identifier = milestone.identifier(),
                "Milestone already registered, ignoring"
            );
            return false;
        }
        debug!(identifier = milestone.identifier(), "Milestone added");
        milestones.push(milestone);
        true
    }

    /// Register several milestones. Returns how many were new.
    pub fn add_all(&self, milestones: impl IntoIterator<Item = Arc<dyn Milestone>>) -> usize {
        milestones.into_iter().filter(|m| self.add(Arc::clone(m))).count()
    }

    /// Remove one milestone instance, or every milestone when `None`.
    pub fn remove(&self, milestone: Option<&Arc<dyn Milestone>>) -> bool {
        let mut milestones = self.milestones.lock();
        let before = milestones.len();
        match milestone {
            None => milestones.clear(),
            Some(target) => milestones.retain(|m| !same_allocation(m, target)),
        }
        milestones.len() != before
    }

    /// Remove every milestone carrying `identifier`. Returns how many were removed.
    pub fn remove_by_identifier(&self, identifier: u32) -> usize {
        let mut milestones = self.milestones.lock();
        let before = milestones.len();
        milestones.retain(|m| m.identifier() != identifier);
        before - milestones.len()
    }

    /// The registered milestones at this moment.
    pub fn snapshot(&self) -> Vec<Arc<dyn Milestone>> {
        self.milestones.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.milestones.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.lock().is_empty()
    }
}
