//! File-based task board — the shared task/notification collection that
//! workflow results are merged into.
//! Saved as one pretty-printed JSON file; reads and writes happen only on
//! explicit load/save.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use festa_core::{FestaError, Result};
use serde::{Deserialize, Serialize};

use crate::notify::Notification;
use crate::scheduler::get_tasks_by_role;
use crate::tasks::{Role, Task, TaskStatus};
use crate::workflow::WorkflowResult;

/// Tasks, notifications and the set of budgets that already got a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBoard {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Generation marker: at most one batch per budget reservation.
    #[serde(default)]
    pub generated_budgets: BTreeSet<String>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default board path (~/.festa/board.json).
    pub fn default_path() -> PathBuf {
        festa_core::FestaConfig::home_dir().join("board.json")
    }

    /// Load a board from disk. A missing file is an empty board.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No board at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path)?;
        let board: Self = serde_json::from_str(&json)
            .map_err(|e| FestaError::Store(format!("Failed to parse {}: {e}", path.display())))?;
        tracing::debug!("Loaded {} tasks from {}", board.tasks.len(), path.display());
        Ok(board)
    }

    /// Save the board to disk, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!("💾 Saved {} tasks to {}", self.tasks.len(), path.display());
        Ok(())
    }

    pub fn is_generated(&self, budget_id: &str) -> bool {
        self.generated_budgets.contains(budget_id)
    }

    /// Append a workflow result. Returns `false` and leaves the board
    /// untouched when the budget already has a batch.
    ///
    /// Incoming notifications are renumbered after the highest ID on the
    /// board, so IDs stay unique across processes sharing one board file.
    pub fn merge(&mut self, result: WorkflowResult) -> bool {
        if self.is_generated(&result.budget_id) {
            tracing::warn!("⚠️ Budget {} already has tasks, skipping merge", result.budget_id);
            return false;
        }
        self.generated_budgets.insert(result.budget_id);
        self.tasks.extend(result.tasks);

        let mut next_id = self.next_notification_id();
        for mut notification in result.notifications {
            notification.id = next_id;
            next_id += 1;
            self.notifications.push(notification);
        }
        true
    }

    fn next_notification_id(&self) -> u64 {
        self.notifications.iter().map(|n| n.id).max().map_or(1, |max| max + 1)
    }

    /// Work queue for a role, priority then due date.
    pub fn tasks_for(&self, role: Role) -> Vec<Task> {
        get_tasks_by_role(&self.tasks, role)
    }

    /// Tasks generated for one budget.
    pub fn tasks_for_budget(&self, budget_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.related_budget_id == budget_id)
            .collect()
    }

    pub fn unread(&self, role: Role) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| !n.read && n.is_for(role))
            .collect()
    }

    /// Returns whether the notification exists.
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    /// Returns whether the task exists.
    pub fn set_status(&mut self, task_id: &str, status: TaskStatus) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                tracing::debug!("Task {} {} → {}", task.id, task.status, status);
                task.status = status;
                true
            }
            None => false,
        }
    }
}
