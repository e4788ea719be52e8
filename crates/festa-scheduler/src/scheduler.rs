//! Task Scheduler — rule-driven generation of a budget's task batch and the
//! role-scoped work queue view.
//!
//! ```text
//! Budget (eventDate, guestCount)
//!   → one task per base type: reservation, shopping, delivery,
//!     preparation, cooking, setup
//!   → + need task when guestCount > large_event_threshold
//!   → dueDate = eventDate − rule.idealDaysBefore
//! ```

use festa_core::{FestaConfig, Result};

use crate::budget::{days_before, Budget};
use crate::rules::RuleTable;
use crate::tasks::{Role, Task, TaskType};

/// Types generated for every budget, in emission order.
pub const BASE_TASK_TYPES: [TaskType; 6] = [
    TaskType::Reservation,
    TaskType::Shopping,
    TaskType::Delivery,
    TaskType::Preparation,
    TaskType::Cooking,
    TaskType::Setup,
];

/// Rule-driven task generator.
#[derive(Debug, Clone)]
pub struct TaskScheduler {
    rules: RuleTable,
    large_event_threshold: u32,
}

impl TaskScheduler {
    pub fn new(rules: RuleTable, large_event_threshold: u32) -> Self {
        Self {
            rules,
            large_event_threshold,
        }
    }

    /// Built-in rules, extra needs above 20 guests.
    pub fn with_defaults() -> Self {
        Self::new(RuleTable::new(), FestaConfig::default().large_event_threshold)
    }

    pub fn from_config(config: &FestaConfig) -> Result<Self> {
        Ok(Self::new(
            RuleTable::from_config(config)?,
            config.large_event_threshold,
        ))
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Task types this budget gets, in emission order.
    pub fn task_types_for(&self, budget: &Budget) -> Vec<TaskType> {
        let mut types = BASE_TASK_TYPES.to_vec();
        if budget.guest_count > self.large_event_threshold {
            types.push(TaskType::Need);
        }
        types
    }

    /// Generate a fresh task batch for a budget.
    ///
    /// Pure apart from ID generation: two calls on the same budget give two
    /// structurally identical batches with distinct IDs. Deduplication is up to
    /// the caller.
    pub fn generate_tasks_from_budget(&self, budget: &Budget) -> Result<Vec<Task>> {
        let event_date = budget.event_day()?;

        let mut tasks = Vec::new();
        for task_type in self.task_types_for(budget) {
            let rule = self.rules.rule(task_type);
            let due_date = days_before(event_date, rule.ideal_days_before)?;
            let task = Task::new(
                task_type,
                title_for(task_type),
                describe(task_type, budget),
                budget.id.as_str(),
                rule.assigned_to_role,
                due_date,
                rule.default_duration,
                rule.default_priority,
            );
            tracing::debug!(
                "Scheduled {} for budget {} due {} ({})",
                task_type,
                budget.id,
                due_date,
                rule.assigned_to_role
            );
            tasks.push(task);
        }

        tracing::info!(
            "Generated {} tasks for budget {} ({})",
            tasks.len(),
            budget.id,
            budget.client_name
        );
        Ok(tasks)
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Tasks assigned to `role`, highest priority first, earliest due date among
/// equals. The sort is stable so full ties keep their input order.
pub fn get_tasks_by_role(tasks: &[Task], role: Role) -> Vec<Task> {
    let mut selected: Vec<Task> = tasks
        .iter()
        .filter(|t| t.assigned_to_role == role)
        .cloned()
        .collect();
    selected.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.due_date.cmp(&b.due_date))
    });
    selected
}

fn title_for(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::Shopping => "Shopping",
        TaskType::Reservation => "Confirm reservation",
        TaskType::Delivery => "Delivery",
        TaskType::Preparation => "Kitchen prep",
        TaskType::Cooking => "Cooking",
        TaskType::Setup => "Venue setup",
        TaskType::Cleanup => "Cleanup",
        TaskType::Need => "Extra needs",
    }
}

fn describe(task_type: TaskType, budget: &Budget) -> String {
    let client = &budget.client_name;
    let guests = budget.guest_count;
    match task_type {
        TaskType::Shopping => format!("Buy supplies for {client}'s event"),
        TaskType::Reservation => {
            format!("Confirm reservation for {client} ({guests} guests)")
        }
        TaskType::Delivery => format!("Deliver supplies and equipment for {client}'s event"),
        TaskType::Preparation => format!("Prepare ingredients for {client}'s event"),
        TaskType::Cooking => format!("Cook for {client}'s event ({guests} guests)"),
        TaskType::Setup => format!("Set up the venue for {client}'s event"),
        TaskType::Cleanup => format!("Clean up after {client}'s event"),
        TaskType::Need => format!("Review extra supplies for {client}'s large event"),
    }
}
