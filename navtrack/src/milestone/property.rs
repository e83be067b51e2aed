//! Trigger properties and the per-tick snapshot they are read from.

use std::collections::HashMap;

use crate::navigation::RouteProgress;

/// Literal for boolean comparisons against [`TriggerValue::Delta`] properties.
pub const TRUE: f64 = 1.0;

/// Literal for boolean comparisons against [`TriggerValue::Delta`] properties.
pub const FALSE: f64 = 0.0;

/// A numeric fact derivable from `(previous, current)` progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerProperty {
    /// Total distance of the current step (meters).
    StepDistanceTotalMeters,
    /// Total duration of the current step (seconds).
    StepDurationTotalSeconds,
    /// Distance to the end of the current step (meters).
    StepDistanceRemainingMeters,
    /// Duration to the end of the current step (seconds).
    StepDurationRemainingSeconds,
    /// Distance covered on the current step (meters).
    StepDistanceTraveledMeters,
    /// Current step index.
    StepIndex,
    /// `[previous step index, current step index]`.
    NewStep,
    /// `[step index, 0]`.
    FirstStep,
    /// `[step index, index of the last maneuver before arrival]`.
    LastStep,
    /// Distance of the upcoming step, 0 when there is none.
    NextStepDistanceMeters,
    /// Duration of the upcoming step, 0 when there is none.
    NextStepDurationSeconds,
    /// `[leg index, 0]`.
    FirstLeg,
    /// `[leg index, last leg index]`.
    LastLeg,
}

/// The value of a property for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerValue {
    /// A plain number.
    Scalar(f64),
    /// A pair whose equality is the fact of interest, such as
    /// "the step index changed" or "this is the first leg".
    Delta(f64, f64),
}

impl TriggerValue {
    /// The number ordered comparisons use.
    pub fn primary(&self) -> f64 {
        match *self {
            TriggerValue::Scalar(value) => value,
            TriggerValue::Delta(first, _) => first,
        }
    }
}

/// All property values for one tick, built fresh from progress.
#[derive(Debug, Clone, Default)]
pub struct TriggerSnapshot {
    values: HashMap<TriggerProperty, TriggerValue>,
}

impl TriggerSnapshot {
    /// Build a snapshot. Without a previous tick the current one stands in,
    /// so change-detecting properties report "unchanged".
    pub fn from_progress(previous: Option<&RouteProgress>, current: &RouteProgress) -> Self {
        let previous = previous.unwrap_or(current);
        let step = current.current_step();
        let upcoming = current.upcoming_step();
        let step_index = current.step_index() as f64;
        let leg_index = current.leg_index() as f64;
        let last_maneuver_index = current.current_leg().steps.len().saturating_sub(2) as f64;
        let last_leg_index = current.route.legs.len().saturating_sub(1) as f64;

        use TriggerProperty::*;
        use TriggerValue::*;

        let values = HashMap::from([
            (StepDistanceTotalMeters, Scalar(step.distance)),
            (StepDurationTotalSeconds, Scalar(step.duration)),
            (StepDistanceRemainingMeters, Scalar(current.step_distance_remaining)),
            (StepDurationRemainingSeconds, Scalar(current.step_duration_remaining())),
            (StepDistanceTraveledMeters, Scalar(current.step_distance_traveled())),
            (StepIndex, Scalar(step_index)),
            (NewStep, Delta(previous.step_index() as f64, step_index)),
            (FirstStep, Delta(step_index, 0.0)),
            (LastStep, Delta(step_index, last_maneuver_index)),
            (NextStepDistanceMeters, Scalar(upcoming.map_or(0.0, |s| s.distance))),
            (NextStepDurationSeconds, Scalar(upcoming.map_or(0.0, |s| s.duration))),
            (FirstLeg, Delta(leg_index, 0.0)),
            (LastLeg, Delta(leg_index, last_leg_index)),
        ]);

        Self { values }
    }

    /// Value of `property`, if present.
    pub fn get(&self, property: TriggerProperty) -> Option<TriggerValue> {
        self.values.get(&property).copied()
    }

    /// Override a single value. Useful for evaluating hand-built scenarios.
    pub fn with(mut self, property: TriggerProperty, value: TriggerValue) -> Self {
        self.values.insert(property, value);
        self
    }
}
