use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of a work order. The same three values are enforced by a CHECK
/// constraint on the `work_orders` table, so the database is the final
/// authority even for callers that bypass this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Med,
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Med => "med",
            Self::High => "high",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "med" => Some(Self::Med),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a work order. An order starts `open` and transitions to
/// `closed` exactly once; there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Closed,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted work order as seen by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: i64,
    pub machine_id: String,
    pub issue: String,
    pub priority: Priority,
    pub status: Status,
    pub created_at: String,
    pub closed_at: Option<String>,
    pub updated_at: String,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
}

/// Input for creating a work order.
///
/// `priority` is carried as a string on purpose: validation belongs to the
/// CHECK constraint at the storage level, and an out-of-range value must
/// surface as a constraint violation rather than be rejected up front.
#[derive(Debug, Clone)]
pub struct NewWorkOrder {
    pub machine_id: String,
    pub issue: String,
    pub priority: String,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
}

impl NewWorkOrder {
    #[must_use]
    pub fn new(machine_id: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            machine_id: machine_id.into(),
            issue: issue.into(),
            priority: Priority::Med.as_str().to_string(),
            assigned_to: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    #[must_use]
    pub fn assigned_to(mut self, assignee: impl Into<String>) -> Self {
        self.assigned_to = Some(assignee.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Structured partial update: each field is explicitly present or absent,
/// which keeps the set of updatable columns statically enumerable.
#[derive(Debug, Clone, Default)]
pub struct WorkOrderPatch {
    pub issue: Option<String>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
}

impl WorkOrderPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.issue.is_none()
            && self.priority.is_none()
            && self.assigned_to.is_none()
            && self.notes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_round_trips_through_str() {
        for p in [Priority::Low, Priority::Med, Priority::High] {
            assert_eq!(Priority::parse(p.as_str()), Some(p));
        }
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::parse("MED"), None);
    }

    #[test]
    fn status_round_trips_through_str() {
        for s in [Status::Open, Status::Closed] {
            assert_eq!(Status::parse(s.as_str()), Some(s));
        }
        assert_eq!(Status::parse("done"), None);
    }

    #[test]
    fn new_work_order_defaults_to_med_priority() {
        let new = NewWorkOrder::new("KMT-102", "Hydraulic leak");
        assert_eq!(new.priority, "med");
        assert!(new.assigned_to.is_none());
        assert!(new.notes.is_none());
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(WorkOrderPatch::default().is_empty());

        let patch = WorkOrderPatch {
            notes: Some("checked seals".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
