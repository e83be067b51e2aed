//! Voice-instruction milestone.

use crate::navigation::RouteProgress;
use crate::route::VoiceInstructions;

use super::base::Milestone;
use super::selection::InstructionTracker;

/// Identifier of the default voice-instruction milestone.
pub const VOICE_INSTRUCTION_MILESTONE_ID: u32 = 1;

/// Fires whenever the step's due voice instruction changes.
///
/// The instruction text is the announcement that was selected on the tick
/// the milestone fired.
pub struct VoiceInstructionMilestone {
    identifier: u32,
    tracker: InstructionTracker<VoiceInstructions>,
}

impl VoiceInstructionMilestone {
    pub fn new() -> Self {
        Self {
            identifier: VOICE_INSTRUCTION_MILESTONE_ID,
            tracker: InstructionTracker::new(),
        }
    }

    pub fn with_identifier(mut self, identifier: u32) -> Self {
        self.identifier = identifier;
        self
    }

    /// The most recently announced instruction.
    pub fn current_instruction(&self) -> Option<VoiceInstructions> {
        self.tracker.current()
    }

    /// SSML of the most recently announced instruction.
    pub fn ssml_announcement(&self) -> Option<String> {
        self.tracker.current().and_then(|v| v.ssml_announcement)
    }
}

impl Default for VoiceInstructionMilestone {
    fn default() -> Self {
        Self::new()
    }
}

impl Milestone for VoiceInstructionMilestone {
    fn identifier(&self) -> u32 {
        self.identifier
    }

    fn is_occurring(&self, _previous: Option<&RouteProgress>, current: &RouteProgress) -> bool {
        self.tracker
            .update(current, &current.current_step().voice_instructions)
    }

    fn instruction(&self, _progress: &RouteProgress) -> Option<String> {
        self.tracker.current().map(|v| v.announcement)
    }
}
