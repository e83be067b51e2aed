//! Trigger expressions.
//!
//! A [`Trigger`] is a small boolean expression tree evaluated every tick
//! against a [`TriggerSnapshot`]:
//!
//! ```ignore
//! use navtrack::milestone::{Trigger, TriggerProperty, TRUE};
//!
//! // Fires when a new step begins and it is longer than 200m.
//! let trigger = Trigger::all(vec![
//!     Trigger::neq(TriggerProperty::NewStep, TRUE),
//!     Trigger::gt(TriggerProperty::StepDistanceTotalMeters, 200.0),
//! ]);
//! ```
//!
//! Comparison semantics depend on the property value:
//!
//! | value | `eq` / `neq` | `gt` / `gte` / `lt` / `lte` |
//! |---|---|---|
//! | `Scalar(v)` | `v` against the literal | `v` against the literal |
//! | `Delta(a, b)` | `a` against `b`, literal ignored | `a` against the literal |

use super::property::{TriggerProperty, TriggerSnapshot, TriggerValue};

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    /// Apply the operator to a property value and a literal.
    pub fn apply(self, value: TriggerValue, literal: f64) -> bool {
        match (self, value) {
            (Operator::Eq, TriggerValue::Delta(a, b)) => a == b,
            (Operator::Neq, TriggerValue::Delta(a, b)) => a != b,
            (Operator::Eq, TriggerValue::Scalar(v)) => v == literal,
            (Operator::Neq, TriggerValue::Scalar(v)) => v != literal,
            (Operator::Gt, v) => v.primary() > literal,
            (Operator::Gte, v) => v.primary() >= literal,
            (Operator::Lt, v) => v.primary() < literal,
            (Operator::Lte, v) => v.primary() <= literal,
        }
    }
}

/// A trigger expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// True when every child is true.
    All(Vec<Trigger>),
    /// True when at least one child is true.
    Any(Vec<Trigger>),
    /// True when no child is true.
    NoneOf(Vec<Trigger>),
    /// Leaf comparison against a property.
    Compare {
        property: TriggerProperty,
        operator: Operator,
        value: f64,
    },
}

impl Trigger {
    pub fn all(statements: Vec<Trigger>) -> Self {
        Trigger::All(statements)
    }

    pub fn any(statements: Vec<Trigger>) -> Self {
        Trigger::Any(statements)
    }

    pub fn none(statements: Vec<Trigger>) -> Self {
        Trigger::NoneOf(statements)
    }

    pub fn eq(property: TriggerProperty, value: f64) -> Self {
        Self::compare(property, Operator::Eq, value)
    }

    pub fn neq(property: TriggerProperty, value: f64) -> Self {
        Self::compare(property, Operator::Neq, value)
    }

    pub fn gt(property: TriggerProperty, value: f64) -> Self {
        Self::compare(property, Operator::Gt, value)
    }

    pub fn gte(property: TriggerProperty, value: f64) -> Self {
        Self::compare(property, Operator::Gte, value)
    }

    pub fn lt(property: TriggerProperty, value: f64) -> Self {
        Self::compare(property, Operator::Lt, value)
    }

    pub fn lte(property: TriggerProperty, value: f64) -> Self {
        Self::compare(property, Operator::Lte, value)
    }

    fn compare(property: TriggerProperty, operator: Operator, value: f64) -> Self {
        Trigger::Compare {
            property,
            operator,
            value,
        }
    }

    /// Evaluate against a snapshot. A comparison on a missing property is false.
    pub fn is_occurring(&self, snapshot: &TriggerSnapshot) -> bool {
        match self {
            Trigger::All(children) => children.iter().all(|c| c.is_occurring(snapshot)),
            Trigger::Any(children) => children.iter().any(|c| c.is_occurring(snapshot)),
            Trigger::NoneOf(children) => !children.iter().any(|c| c.is_occurring(snapshot)),
            Trigger::Compare {
                property,
                operator,
                value,
            } => snapshot
                .get(*property)
                .is_some_and(|actual| operator.apply(actual, *value)),
        }
    }
}
