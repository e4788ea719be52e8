//! # Festa Scheduler
//!
//! Task generation engine for event budgets. When a budget becomes reserved,
//! it derives the logistics and kitchen work for the event, each task with a
//! due date, priority and duration, and the notifications announcing it.
//!
//! ## Architecture
//! ```text
//! Budget status change
//!   └── WorkflowAutomation (reserva edge only)
//!         ├── TaskScheduler: RuleTable → one task per type, due = event − lead time
//!         ├── generator: BudgetTemplate → titled tasks + product needs
//!         └── Notifications: admin summary + one per role with work
//!               └── TaskBoard.merge (caller-owned, once per budget)
//! ```
//!
//! Everything here is synchronous and reads its inputs without mutating them.

pub mod budget;
pub mod generator;
pub mod notify;
pub mod rules;
pub mod scheduler;
pub mod store;
pub mod tasks;
pub mod workflow;

pub use festa_core::FestaError;

pub use budget::{
    Activity, Budget, BudgetStatus, BudgetTemplate, Catalog, GenerationStrategy, Menu, Product,
    ProductRequirement, TaskTemplate, TemplateRegistry, TemplateSource,
};
pub use generator::{GeneratedTasks, ResolvedProduct};
pub use notify::Notification;
pub use rules::{RuleTable, SchedulingRule};
pub use scheduler::{get_tasks_by_role, TaskScheduler};
pub use store::TaskBoard;
pub use tasks::{Need, Priority, Role, Task, TaskStatus, TaskType};
pub use workflow::{StatusTrigger, WorkflowAutomation, WorkflowResult};
