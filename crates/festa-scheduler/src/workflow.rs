//! Workflow Automation — the reservation trigger.
//!
//! Watches budget status changes and, on the edge into `reserva`, generates
//! the budget's task batch and the notifications announcing it.
//!
//! ## Architecture
//! ```text
//! StatusTrigger (previous → new)
//!   → WorkflowAutomation.handle_status_change(trigger, budget, catalog)
//!     → not a reservation edge       → Ok(None)
//!     → no template                  → TaskScheduler (rules)
//!     → template, strategy = rules    → TaskScheduler (rules)
//!     → template, strategy = template → generator (template)
//!     → unknown template             → Err(TemplateNotFound)
//!   → partition by role, summarize   → WorkflowResult for the caller to merge
//! ```

use chrono::{DateTime, Utc};
use festa_core::{FestaError, Result};
use serde::{Deserialize, Serialize};

use crate::budget::{Budget, BudgetStatus, Catalog, GenerationStrategy, TemplateSource};
use crate::generator::{self, ResolvedProduct};
use crate::notify::Notification;
use crate::scheduler::{get_tasks_by_role, TaskScheduler};
use crate::tasks::{Role, Task};

/// A budget status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTrigger {
    pub previous_status: BudgetStatus,
    pub new_status: BudgetStatus,
    pub timestamp: DateTime<Utc>,
}

impl StatusTrigger {
    pub fn new(previous_status: BudgetStatus, new_status: BudgetStatus) -> Self {
        Self {
            previous_status,
            new_status,
            timestamp: Utc::now(),
        }
    }

    /// The only edge that generates work: anything → `reserva`.
    pub fn is_reservation(&self) -> bool {
        self.new_status.is_reserved() && !self.previous_status.is_reserved()
    }
}

/// Everything a reservation produced. The caller merges it into shared storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResult {
    pub budget_id: String,
    /// When the reservation edge was observed.
    pub reserved_at: DateTime<Utc>,
    pub strategy: GenerationStrategy,
    /// Whole batch in generation order.
    pub tasks: Vec<Task>,
    /// Logistics queue, priority then due date.
    pub logistics_tasks: Vec<Task>,
    /// Kitchen queue, priority then due date.
    pub cook_tasks: Vec<Task>,
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub logistics_products: Vec<ResolvedProduct>,
    #[serde(default)]
    pub cook_products: Vec<ResolvedProduct>,
}

/// Reservation trigger with an injected template lookup.
pub struct WorkflowAutomation {
    scheduler: TaskScheduler,
    templates: Box<dyn TemplateSource>,
}

impl WorkflowAutomation {
    pub fn new(scheduler: TaskScheduler, templates: impl TemplateSource + 'static) -> Self {
        Self {
            scheduler,
            templates: Box::new(templates),
        }
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    /// React to a budget status change.
    ///
    /// Returns `Ok(None)` for every transition except the edge into `reserva`.
    /// Budget and catalog are only read.
    pub fn handle_status_change(
        &self,
        trigger: &StatusTrigger,
        budget: &Budget,
        catalog: &Catalog,
    ) -> Result<Option<WorkflowResult>> {
        if !trigger.is_reservation() {
            tracing::debug!(
                "Budget {}: {} → {} does not trigger generation",
                budget.id,
                trigger.previous_status,
                trigger.new_status
            );
            return Ok(None);
        }

        tracing::info!(
            "⚡ Budget {} reserved for {} at {}",
            budget.id,
            budget.client_name,
            trigger.timestamp.to_rfc3339()
        );

        let mut result = self.generate(budget, catalog, trigger.timestamp)?;
        result.logistics_tasks = get_tasks_by_role(&result.tasks, Role::Logistics);
        result.cook_tasks = get_tasks_by_role(&result.tasks, Role::Cook);
        result.notifications = summarize(&result, budget, catalog);

        tracing::info!(
            "Budget {}: {} tasks ({} logistics, {} cook), {} notifications",
            budget.id,
            result.tasks.len(),
            result.logistics_tasks.len(),
            result.cook_tasks.len(),
            result.notifications.len()
        );
        Ok(Some(result))
    }

    /// Pick exactly one generation path for the budget and run it.
    fn generate(
        &self,
        budget: &Budget,
        catalog: &Catalog,
        reserved_at: DateTime<Utc>,
    ) -> Result<WorkflowResult> {
        let template = match &budget.template_id {
            None => None,
            Some(id) => Some(self.templates.find_template(id).ok_or_else(|| {
                tracing::warn!("Budget {} references unknown template {}", budget.id, id);
                FestaError::TemplateNotFound(id.clone())
            })?),
        };

        let mut result = WorkflowResult {
            budget_id: budget.id.clone(),
            reserved_at,
            strategy: GenerationStrategy::Rules,
            tasks: Vec::new(),
            logistics_tasks: Vec::new(),
            cook_tasks: Vec::new(),
            notifications: Vec::new(),
            logistics_products: Vec::new(),
            cook_products: Vec::new(),
        };

        match template {
            Some(template) if template.strategy == GenerationStrategy::Template => {
                let generated =
                    generator::generate_tasks_from_budget(budget, &template, &catalog.products)?;
                result.strategy = GenerationStrategy::Template;
                result.tasks = generated.all_tasks();
                result.logistics_products = generated.logistics_products;
                result.cook_products = generated.cook_products;
            }
            _ => {
                result.tasks = self.scheduler.generate_tasks_from_budget(budget)?;
            }
        }
        Ok(result)
    }
}

/// One admin summary plus one summary per role that received work.
fn summarize(result: &WorkflowResult, budget: &Budget, catalog: &Catalog) -> Vec<Notification> {
    let mut notifications =
        vec![Notification::batch_summary(result.tasks.len(), &budget.client_name)];

    if !result.logistics_tasks.is_empty() {
        let activities: Vec<&str> = budget
            .activity_ids
            .iter()
            .filter_map(|id| catalog.activity(id))
            .map(|a| a.name.as_str())
            .collect();
        let detail = (!activities.is_empty())
            .then(|| format!("{} activities: {}", activities.len(), activities.join(", ")));
        notifications.push(Notification::role_summary(
            Role::Logistics,
            result.logistics_tasks.len(),
            &budget.client_name,
            detail.as_deref(),
        ));
    }

    if !result.cook_tasks.is_empty() {
        let detail = budget
            .menu_id
            .as_deref()
            .and_then(|id| catalog.menu(id))
            .map(|m| format!("menu: {}", m.name));
        notifications.push(Notification::role_summary(
            Role::Cook,
            result.cook_tasks.len(),
            &budget.client_name,
            detail.as_deref(),
        ));
    }

    notifications
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{
        Activity, BudgetTemplate, Menu, Product, ProductRequirement, TaskTemplate, TemplateRegistry,
    };
    use crate::tasks::Priority;

    fn budget() -> Budget {
        Budget {
            id: "b-1".into(),
            client_name: "Lucas".into(),
            event_date: "2024-08-02".into(),
            guest_count: 10,
            status: BudgetStatus::Pending,
            template_id: None,
            menu_id: None,
            activity_ids: vec![],
        }
    }

    fn no_templates() -> WorkflowAutomation {
        WorkflowAutomation::new(TaskScheduler::with_defaults(), TemplateRegistry::new())
    }

    fn reserve() -> StatusTrigger {
        StatusTrigger::new(BudgetStatus::Pending, BudgetStatus::Reserved)
    }

    fn logistics_only_template() -> BudgetTemplate {
        BudgetTemplate {
            id: "tpl-van".into(),
            name: "Delivery only".into(),
            strategy: GenerationStrategy::Template,
            auto_generate_logistics_tasks: true,
            auto_generate_cook_tasks: true,
            logistics_tasks: vec![TaskTemplate {
                title: "Load the van".into(),
                description: "Load equipment for {{client}}".into(),
                due_date_offset: 1,
                priority: Priority::Medium,
                estimated_duration: 1.0,
                task_type: None,
                required_products: Some(vec![ProductRequirement {
                    product_id: "p1".into(),
                    quantity: 2,
                    notes: None,
                }]),
            }],
            cook_tasks: vec![],
            logistics_products: vec![],
            cook_products: vec![],
        }
    }

    #[test]
    fn test_non_reservation_transitions_are_ignored() {
        let automation = no_templates();
        let cases = [
            (BudgetStatus::Pending, BudgetStatus::Confirmed),
            (BudgetStatus::Reserved, BudgetStatus::Reserved),
            (BudgetStatus::Reserved, BudgetStatus::Cancelled),
            (BudgetStatus::Pending, BudgetStatus::Pending),
        ];
        for (previous, new) in cases {
            let trigger = StatusTrigger::new(previous, new);
            let out = automation
                .handle_status_change(&trigger, &budget(), &Catalog::default())
                .unwrap();
            assert!(out.is_none(), "{previous} → {new}");
        }
    }

    #[test]
    fn test_reservation_generates_rule_batch() {
        let automation = no_templates();
        let b = budget();
        let out = automation
            .handle_status_change(&reserve(), &b, &Catalog::default())
            .unwrap()
            .unwrap();

        let expected = automation.scheduler().generate_tasks_from_budget(&b).unwrap();
        assert_eq!(out.tasks.len(), expected.len());
        assert_eq!(out.tasks.len(), 6);
        assert_eq!(out.strategy, GenerationStrategy::Rules);
        assert!(out.tasks.iter().all(|t| t.assigned_to_role.executes_tasks()));
        assert_eq!(out.logistics_tasks.len() + out.cook_tasks.len(), 6);

        let admin: Vec<_> =
            out.notifications.iter().filter(|n| n.role == Some(Role::Admin)).collect();
        assert_eq!(admin.len(), 1);
        assert_eq!(admin[0].text, "6 tasks generated for client Lucas");
        assert_eq!(out.notifications.len(), 3);
        assert!(out.notifications.iter().any(|n| n.role == Some(Role::Logistics)));
        assert!(out.notifications.iter().any(|n| n.role == Some(Role::Cook)));
    }

    #[test]
    fn test_result_carries_trigger_time() {
        let automation = no_templates();
        let trigger = reserve();
        let out = automation
            .handle_status_change(&trigger, &budget(), &Catalog::default())
            .unwrap()
            .unwrap();
        assert_eq!(out.reserved_at, trigger.timestamp);
    }

    #[test]
    fn test_other_status_into_reserva_fires() {
        let automation = no_templates();
        let trigger = StatusTrigger::new(BudgetStatus::Other, BudgetStatus::Reserved);
        let out = automation
            .handle_status_change(&trigger, &budget(), &Catalog::default())
            .unwrap();
        assert!(out.is_some());
    }

    #[test]
    fn test_missing_template_is_reported() {
        let automation = no_templates();
        let mut b = budget();
        b.template_id = Some("ghost".into());
        let err = automation.handle_status_change(&reserve(), &b, &Catalog::default()).unwrap_err();
        assert!(matches!(err, FestaError::TemplateNotFound(id) if id == "ghost"));
    }

    #[test]
    fn test_template_strategy_uses_generator() {
        let template = logistics_only_template();
        let fake = move |id: &str| (id == "tpl-van").then(|| template.clone());
        let automation = WorkflowAutomation::new(TaskScheduler::with_defaults(), fake);

        let mut b = budget();
        b.template_id = Some("tpl-van".into());
        let catalog = Catalog {
            products: vec![Product { id: "p1".into(), name: "Folding table".into(), unit: None }],
            ..Catalog::default()
        };
        let out = automation.handle_status_change(&reserve(), &b, &catalog).unwrap().unwrap();

        assert_eq!(out.strategy, GenerationStrategy::Template);
        assert_eq!(out.tasks.len(), 1);
        assert_eq!(out.tasks[0].title, "Load the van");
        assert_eq!(out.tasks[0].needs[0].description, "2 x Folding table");
        assert!(out.cook_tasks.is_empty());
        // Admin + logistics only.
        assert_eq!(out.notifications.len(), 2);
        assert!(out.notifications.iter().all(|n| n.role != Some(Role::Cook)));
    }

    #[test]
    fn test_rules_strategy_template_uses_scheduler() {
        let mut template = logistics_only_template();
        template.strategy = GenerationStrategy::Rules;
        let mut registry = TemplateRegistry::new();
        registry.register(template);
        let automation = WorkflowAutomation::new(TaskScheduler::with_defaults(), registry);

        let mut b = budget();
        b.template_id = Some("tpl-van".into());
        let out = automation
            .handle_status_change(&reserve(), &b, &Catalog::default())
            .unwrap()
            .unwrap();
        assert_eq!(out.strategy, GenerationStrategy::Rules);
        assert_eq!(out.tasks.len(), 6);
    }

    #[test]
    fn test_notifications_mention_menu_and_activities() {
        let automation = no_templates();
        let mut b = budget();
        b.menu_id = Some("m1".into());
        b.activity_ids = vec!["a1".into(), "unknown".into()];
        let catalog = Catalog {
            products: vec![],
            menus: vec![Menu { id: "m1".into(), name: "Parrillada".into() }],
            activities: vec![Activity { id: "a1".into(), name: "Karaoke".into() }],
        };
        let out = automation.handle_status_change(&reserve(), &b, &catalog).unwrap().unwrap();

        let cook = out.notifications.iter().find(|n| n.role == Some(Role::Cook)).unwrap();
        assert!(cook.text.contains("menu: Parrillada"));
        let logistics =
            out.notifications.iter().find(|n| n.role == Some(Role::Logistics)).unwrap();
        assert!(logistics.text.contains("1 activities: Karaoke"));
    }

    #[test]
    fn test_bad_date_propagates() {
        let automation = no_templates();
        let mut b = budget();
        b.event_date = "tomorrow-ish".into();
        let err = automation.handle_status_change(&reserve(), &b, &Catalog::default()).unwrap_err();
        assert!(matches!(err, FestaError::InvalidDate { .. }));
    }
}
