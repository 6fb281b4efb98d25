//! Status conditions for managed resources
//!
//! Two condition types are maintained:
//! - `Ready`: availability of the external resource (Available, Creating,
//!   Deleting, Unavailable)
//! - `Synced`: outcome of the last reconciliation pass (ReconcileSuccess,
//!   ReconcileError)

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition type describing availability of the external resource
pub const TYPE_READY: &str = "Ready";
/// Condition type describing the outcome of the last reconcile
pub const TYPE_SYNCED: &str = "Synced";

/// Status of a condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

/// A single observation about a managed resource
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition (Ready, Synced)
    pub r#type: String,

    /// Status of the condition
    pub status: ConditionStatus,

    /// Last time the status transitioned
    pub last_transition_time: DateTime<Utc>,

    /// Machine-readable reason for the condition
    pub reason: String,

    /// Human-readable message, usually an error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    fn new(r#type: &str, status: ConditionStatus, reason: &str) -> Self {
        Self {
            r#type: r#type.to_string(),
            status,
            last_transition_time: Utc::now(),
            reason: reason.to_string(),
            message: None,
        }
    }

    /// Attach a message to the condition
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Equality ignoring `last_transition_time`
    pub fn equal(&self, other: &Condition) -> bool {
        self.r#type == other.r#type
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// The external resource is ready for use
pub fn available() -> Condition {
    Condition::new(TYPE_READY, ConditionStatus::True, "Available")
}

/// The external resource is being created
pub fn creating() -> Condition {
    Condition::new(TYPE_READY, ConditionStatus::False, "Creating")
}

/// The external resource is being deleted
pub fn deleting() -> Condition {
    Condition::new(TYPE_READY, ConditionStatus::False, "Deleting")
}

/// The external resource exists but is not usable
pub fn unavailable() -> Condition {
    Condition::new(TYPE_READY, ConditionStatus::False, "Unavailable")
}

/// The last reconcile pass completed
pub fn reconcile_success() -> Condition {
    Condition::new(TYPE_SYNCED, ConditionStatus::True, "ReconcileSuccess")
}

/// The last reconcile pass failed with `err`
pub fn reconcile_error(err: impl std::fmt::Display) -> Condition {
    Condition::new(TYPE_SYNCED, ConditionStatus::False, "ReconcileError").with_message(err.to_string())
}

/// Set of conditions, at most one per type
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionedStatus {
    /// Conditions of the resource
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl ConditionedStatus {
    /// Get the condition of the given type, if any
    pub fn get_condition(&self, r#type: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.r#type == r#type)
    }

    /// Set the supplied conditions, replacing any existing condition of the
    /// same type. A condition equal to the existing one (ignoring time) is
    /// left untouched so its transition time is preserved.
    pub fn set_conditions(&mut self, conditions: impl IntoIterator<Item = Condition>) {
        for new in conditions {
            match self.conditions.iter_mut().find(|c| c.r#type == new.r#type) {
                Some(existing) if existing.equal(&new) => {}
                Some(existing) => *existing = new,
                None => self.conditions.push(new),
            }
        }
    }
}
