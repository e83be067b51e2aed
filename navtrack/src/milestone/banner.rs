//! Banner-instruction milestone.

use crate::navigation::RouteProgress;
use crate::route::BannerInstructions;

use super::base::Milestone;
use super::selection::InstructionTracker;

/// Identifier of the default banner-instruction milestone.
pub const BANNER_INSTRUCTION_MILESTONE_ID: u32 = 2;

/// Fires whenever the step's due banner changes. The instruction text is the
/// banner's primary text.
pub struct BannerInstructionMilestone {
    identifier: u32,
    tracker: InstructionTracker<BannerInstructions>,
}

impl BannerInstructionMilestone {
    pub fn new() -> Self {
        Self {
            identifier: BANNER_INSTRUCTION_MILESTONE_ID,
            tracker: InstructionTracker::new(),
        }
    }

    pub fn with_identifier(mut self, identifier: u32) -> Self {
        self.identifier = identifier;
        self
    }

    /// The banner shown since the last time this milestone fired.
    pub fn current_banner(&self) -> Option<BannerInstructions> {
        self.tracker.current()
    }
}

impl Default for BannerInstructionMilestone {
    fn default() -> Self {
        Self::new()
    }
}

impl Milestone for BannerInstructionMilestone {
    fn identifier(&self) -> u32 {
        self.identifier
    }

    fn is_occurring(&self, _previous: Option<&RouteProgress>, current: &RouteProgress) -> bool {
        self.tracker
            .update(current, &current.current_step().banner_instructions)
    }

    fn instruction(&self, _progress: &RouteProgress) -> Option<String> {
        self.tracker.current().map(|b| b.primary.text)
    }
}
