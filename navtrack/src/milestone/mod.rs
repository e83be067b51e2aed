//! Milestones and trigger expressions.
//!
//! A milestone is a stateful predicate evaluated once per tick against the
//! previous and current [`RouteProgress`](crate::navigation::RouteProgress).
//! When it fires the engine emits a milestone event carrying the milestone's
//! instruction text.
//!
//! # Variants
//!
//! | milestone | fires |
//! |---|---|
//! | [`StepMilestone`] | once per step visit while its [`Trigger`] holds |
//! | [`RouteMilestone`] | once per lifetime when its [`Trigger`] holds |
//! | [`VoiceInstructionMilestone`] | when the due voice instruction changes |
//! | [`BannerInstructionMilestone`] | when the due banner changes |
//!
//! # Usage
//!
//! ```ignore
//! use navtrack::milestone::{Instruction, StepMilestone, Trigger, TriggerProperty};
//!
//! let milestone = StepMilestone::new(100)
//!     .with_trigger(Trigger::all(vec![
//!         Trigger::gt(TriggerProperty::StepDistanceTotalMeters, 300.0),
//!         Trigger::lte(TriggerProperty::StepDistanceRemainingMeters, 150.0),
//!     ]))
//!     .with_instruction(Instruction::text("Prepare to turn"));
//! engine.add_milestone(Arc::new(milestone));
//! ```

mod banner;
mod base;
mod property;
mod selection;
mod trigger;
mod voice;

pub use banner::{BannerInstructionMilestone, BANNER_INSTRUCTION_MILESTONE_ID};
pub use base::{Instruction, Milestone, RouteMilestone, StepMilestone};
pub use property::{TriggerProperty, TriggerSnapshot, TriggerValue, FALSE, TRUE};
pub use selection::select_instruction;
pub use trigger::{Operator, Trigger};
pub use voice::{VoiceInstructionMilestone, VOICE_INSTRUCTION_MILESTONE_ID};
