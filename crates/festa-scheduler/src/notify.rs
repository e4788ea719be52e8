//! Notifications — short role-targeted summaries of generated work.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tasks::Role;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A dashboard notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Monotonic within a process. [`TaskBoard::merge`](crate::store::TaskBoard::merge)
    /// renumbers it when the batch lands on a shared board.
    pub id: u64,
    pub text: String,
    /// Serialized as ISO-8601.
    pub time: DateTime<Utc>,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Notification {
    /// Create an unread notification stamped now.
    pub fn new(text: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            text: text.into(),
            time: Utc::now(),
            read: false,
            role,
        }
    }

    /// Admin-facing summary of a whole batch.
    pub fn batch_summary(task_count: usize, client_name: &str) -> Self {
        Self::new(
            format!("{task_count} tasks generated for client {client_name}"),
            Some(Role::Admin),
        )
    }

    /// Role-scoped summary; `detail` is appended when present.
    pub fn role_summary(
        role: Role,
        task_count: usize,
        client_name: &str,
        detail: Option<&str>,
    ) -> Self {
        let text = format!("{task_count} new {role} tasks for {client_name}'s event");
        let text = match detail {
            Some(detail) => format!("{text} ({detail})"),
            None => text,
        };
        Self::new(text, Some(role))
    }

    /// Whether `role` should see this notification. Untargeted ones are visible to everyone.
    pub fn is_for(&self, role: Role) -> bool {
        self.role.is_none_or(|r| r == role)
    }
}
