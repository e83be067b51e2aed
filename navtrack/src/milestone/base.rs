//! The milestone trait and the trigger-driven milestones.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::navigation::{NavigationIndices, RouteProgress};

use super::property::TriggerSnapshot;
use super::trigger::Trigger;

/// Builds the text attached to a fired milestone.
#[derive(Clone)]
pub struct Instruction {
    build: Arc<dyn Fn(&RouteProgress) -> String + Send + Sync>,
}

impl Instruction {
    /// An instruction computed from the progress it fires with.
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&RouteProgress) -> String + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(build),
        }
    }

    /// An instruction with fixed text.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| text.clone())
    }

    /// Build the text for `progress`.
    pub fn build(&self, progress: &RouteProgress) -> String {
        (self.build)(progress)
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction").finish_non_exhaustive()
    }
}

/// A condition evaluated every tick that fires a guidance event.
///
/// Implementations keep their own state behind interior mutability so a
/// milestone can be shared as `Arc<dyn Milestone>` between the caller that
/// registered it and the worker that evaluates it.
pub trait Milestone: Send + Sync {
    /// Caller-chosen identifier carried on milestone events.
    fn identifier(&self) -> u32;

    /// Whether the milestone fires for this tick.
    fn is_occurring(&self, previous: Option<&RouteProgress>, current: &RouteProgress) -> bool;

    /// Text for a fired milestone, if it has any.
    fn instruction(&self, progress: &RouteProgress) -> Option<String>;
}

// =============================================================================
// Step milestone
// =============================================================================

#[derive(Debug, Default)]
struct StepState {
    fired: bool,
    indices: Option<NavigationIndices>,
}

/// Fires at most once per step visit while its trigger holds.
#[derive(Debug)]
pub struct StepMilestone {
    identifier: u32,
    trigger: Option<Trigger>,
    instruction: Option<Instruction>,
    state: Mutex<StepState>,
}

impl StepMilestone {
    /// Create a milestone with no trigger. It never fires until one is set.
    pub fn new(identifier: u32) -> Self {
        Self {
            identifier,
            trigger: None,
            instruction: None,
            state: Mutex::new(StepState::default()),
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_instruction(mut self, instruction: Instruction) -> Self {
        self.instruction = Some(instruction);
        self
    }

    pub fn trigger(&self) -> Option<&Trigger> {
        self.trigger.as_ref()
    }
}

impl Milestone for StepMilestone {
    fn identifier(&self) -> u32 {
        self.identifier
    }

    fn is_occurring(&self, previous: Option<&RouteProgress>, current: &RouteProgress) -> bool {
        let Some(trigger) = &self.trigger else {
            return false;
        };

        let mut state = self.state.lock();
        if state.indices != Some(current.indices) {
            state.fired = false;
            state.indices = Some(current.indices);
        }
        if state.fired {
            return false;
        }

        let snapshot = TriggerSnapshot::from_progress(previous, current);
        if trigger.is_occurring(&snapshot) {
            state.fired = true;
            return true;
        }
        false
    }

    fn instruction(&self, progress: &RouteProgress) -> Option<String> {
        self.instruction.as_ref().map(|i| i.build(progress))
    }
}

// =============================================================================
// Route milestone
// =============================================================================

/// Fires at most once for its whole lifetime.
#[derive(Debug)]
pub struct RouteMilestone {
    identifier: u32,
    trigger: Option<Trigger>,
    instruction: Option<Instruction>,
    fired: Mutex<bool>,
}

impl RouteMilestone {
    /// Create a milestone with no trigger. It never fires until one is set.
    pub fn new(identifier: u32) -> Self {
        Self {
            identifier,
            trigger: None,
            instruction: None,
            fired: Mutex::new(false),
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_instruction(mut self, instruction: Instruction) -> Self {
        self.instruction = Some(instruction);
        self
    }

    pub fn trigger(&self) -> Option<&Trigger> {
        self.trigger.as_ref()
    }
}

impl Milestone for RouteMilestone {
    fn identifier(&self) -> u32 {
        self.identifier
    }

    fn is_occurring(&self, previous: Option<&RouteProgress>, current: &RouteProgress) -> bool {
        let Some(trigger) = &self.trigger else {
            return false;
        };

        let mut fired = self.fired.lock();
        if *fired {
            return false;
        }

        let snapshot = TriggerSnapshot::from_progress(previous, current);
        *fired = trigger.is_occurring(&snapshot);
        *fired
    }

    fn instruction(&self, progress: &RouteProgress) -> Option<String> {
        self.instruction.as_ref().map(|i| i.build(progress))
    }
}
