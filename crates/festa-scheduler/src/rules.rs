//! Scheduling rule table — per task type defaults for duration, priority,
//! lead time and responsible role.
//!
//! Built once at process start (optionally with config overrides) and never
//! mutated afterward. Tasks already generated keep the values they were
//! created with.

use festa_core::{FestaConfig, FestaError, Result, RuleOverride};
use serde::{Deserialize, Serialize};

use crate::tasks::{Priority, Role, TaskType};

/// Defaults applied to every task of one type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingRule {
    /// Hours.
    pub default_duration: f32,
    pub default_priority: Priority,
    pub ideal_days_before: i64,
    pub assigned_to_role: Role,
}

impl SchedulingRule {
    const fn new(
        default_duration: f32,
        default_priority: Priority,
        ideal_days_before: i64,
        assigned_to_role: Role,
    ) -> Self {
        Self {
            default_duration,
            default_priority,
            ideal_days_before,
            assigned_to_role,
        }
    }
}

/// Built-in rules, indexed by [`TaskType::index`].
const DEFAULT_RULES: [SchedulingRule; 8] = [
    // shopping
    SchedulingRule::new(3.0, Priority::High, 2, Role::Logistics),
    // reservation
    SchedulingRule::new(1.0, Priority::High, 7, Role::Logistics),
    // delivery
    SchedulingRule::new(2.0, Priority::Medium, 1, Role::Logistics),
    // preparation
    SchedulingRule::new(4.0, Priority::High, 1, Role::Cook),
    // cooking
    SchedulingRule::new(5.0, Priority::Urgent, 0, Role::Cook),
    // setup
    SchedulingRule::new(2.0, Priority::Medium, 0, Role::Logistics),
    // cleanup
    SchedulingRule::new(2.0, Priority::Low, 0, Role::Logistics),
    // need
    SchedulingRule::new(1.0, Priority::Medium, 3, Role::Logistics),
];

/// Read-only lookup from task type to its rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: [SchedulingRule; 8],
}

impl RuleTable {
    /// Table with the built-in rules.
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES,
        }
    }

    /// Built-in rules with the config's overrides applied.
    pub fn from_config(config: &FestaConfig) -> Result<Self> {
        let mut rules = DEFAULT_RULES;
        for (key, over) in &config.rules {
            let task_type: TaskType = key.parse()?;
            apply_override(&mut rules[task_type.index()], over)
                .map_err(|e| FestaError::Config(format!("rules.{key}: {e}")))?;
            tracing::debug!("Rule override applied for {task_type}");
        }
        Ok(Self { rules })
    }

    pub fn rule(&self, task_type: TaskType) -> &SchedulingRule {
        &self.rules[task_type.index()]
    }

    /// All rules in [`TaskType::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskType, &SchedulingRule)> {
        TaskType::ALL.into_iter().zip(self.rules.iter())
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_override(rule: &mut SchedulingRule, over: &RuleOverride) -> Result<()> {
    if let Some(hours) = over.default_duration {
        if !(hours.is_finite() && hours > 0.0) {
            return Err(FestaError::Config(format!("duration must be positive, got {hours}")));
        }
        rule.default_duration = hours;
    }
    if let Some(priority) = &over.default_priority {
        rule.default_priority = priority.parse()?;
    }
    if let Some(days) = over.ideal_days_before {
        rule.ideal_days_before = days;
    }
    if let Some(role) = &over.assigned_to_role {
        let role: Role = role.parse()?;
        if !role.executes_tasks() {
            return Err(FestaError::Config(format!("tasks cannot be assigned to {role}")));
        }
        rule.assigned_to_role = role;
    }
    Ok(())
}
