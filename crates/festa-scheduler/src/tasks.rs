//! Task definitions — the unit of operational work handed to logistics and the kitchen.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use festa_core::FestaError;
use serde::{Deserialize, Serialize};

/// Kind of operational work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Shopping,
    Reservation,
    Delivery,
    Preparation,
    Cooking,
    Setup,
    Cleanup,
    Need,
}

impl TaskType {
    pub const ALL: [TaskType; 8] = [
        TaskType::Shopping,
        TaskType::Reservation,
        TaskType::Delivery,
        TaskType::Preparation,
        TaskType::Cooking,
        TaskType::Setup,
        TaskType::Cleanup,
        TaskType::Need,
    ];

    /// Position in [`TaskType::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Shopping => "shopping",
            TaskType::Reservation => "reservation",
            TaskType::Delivery => "delivery",
            TaskType::Preparation => "preparation",
            TaskType::Cooking => "cooking",
            TaskType::Setup => "setup",
            TaskType::Cleanup => "cleanup",
            TaskType::Need => "need",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = FestaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| FestaError::Config(format!("Unknown task type '{s}'")))
    }
}

/// Task (and need) progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    /// Only set by hand on template-generated tasks.
    Blocked,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Blocked => "blocked",
        })
    }
}

impl FromStr for TaskStatus {
    type Err = FestaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "blocked" => Ok(TaskStatus::Blocked),
            other => Err(FestaError::Config(format!("Unknown task status '{other}'"))),
        }
    }
}

/// Task priority. Ordering follows urgency: `Low < Medium < High < Urgent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        })
    }
}

impl FromStr for Priority {
    type Err = FestaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(FestaError::Config(format!("Unknown priority '{other}'"))),
        }
    }
}

/// Dashboard role. Tasks are only ever assigned to `Logistics` or `Cook`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Sales,
    Logistics,
    Cook,
}

impl Role {
    /// Whether tasks can be assigned to this role.
    pub fn executes_tasks(self) -> bool {
        matches!(self, Role::Logistics | Role::Cook)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Role::Admin => "admin",
            Role::Sales => "sales",
            Role::Logistics => "logistics",
            Role::Cook => "cook",
        })
    }
}

impl FromStr for Role {
    type Err = FestaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "sales" => Ok(Role::Sales),
            "logistics" => Ok(Role::Logistics),
            "cook" => Ok(Role::Cook),
            other => Err(FestaError::Config(format!("Unknown role '{other}'"))),
        }
    }
}

/// A quantified sub-requirement of a task, e.g. "12 x Charcoal".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Need {
    pub id: String,
    pub description: String,
    /// Always positive.
    pub quantity: u32,
    pub status: TaskStatus,
    pub requested_by: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfilled_by: Option<Role>,
}

impl Need {
    pub fn new(description: String, quantity: u32, requested_by: Role) -> Self {
        Self {
            id: new_id(),
            description,
            quantity,
            status: TaskStatus::Todo,
            requested_by,
            fulfilled_by: None,
        }
    }
}

/// A unit of work assigned to a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// UUID v4, unique across generation bursts.
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub title: String,
    pub description: String,
    /// Weak back-reference to the originating budget.
    pub related_budget_id: String,
    pub assigned_to_role: Role,
    pub due_date: NaiveDate,
    /// Hours.
    pub estimated_duration: f32,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub needs: Vec<Need>,
}

impl Task {
    /// Create a fresh `todo` task with a new ID and no needs.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        task_type: TaskType,
        title: impl Into<String>,
        description: impl Into<String>,
        related_budget_id: impl Into<String>,
        assigned_to_role: Role,
        due_date: NaiveDate,
        estimated_duration: f32,
        priority: Priority,
    ) -> Self {
        Self {
            id: new_id(),
            task_type,
            title: title.into(),
            description: description.into(),
            related_budget_id: related_budget_id.into(),
            assigned_to_role,
            due_date,
            estimated_duration,
            status: TaskStatus::Todo,
            priority,
            needs: Vec::new(),
        }
    }

    /// Attach needs, builder style.
    pub fn with_needs(mut self, needs: Vec<Need>) -> Self {
        self.needs = needs;
        self
    }
}

/// Collision-resistant identifier for tasks and needs.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
