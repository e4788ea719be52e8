//! Template-driven task generation.
//!
//! Task titles and descriptions come from a [`BudgetTemplate`] instead of the
//! rule table, and per-task product requirements become [`Need`]s. Product IDs
//! that are missing from the catalog never fail a batch: task needs render an
//! "Unknown Product" placeholder and aggregate requirements are dropped.

use festa_core::Result;
use serde::{Deserialize, Serialize};

use crate::budget::{
    days_before, find_product, Budget, BudgetTemplate, Product, ProductRequirement, TaskTemplate,
};
use crate::tasks::{Need, Role, Task, TaskType};

/// Placeholder name for product IDs the catalog does not know.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// An aggregate requirement resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProduct {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Output of template generation. The four lists are independent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTasks {
    pub logistics_tasks: Vec<Task>,
    pub cook_tasks: Vec<Task>,
    pub logistics_products: Vec<ResolvedProduct>,
    pub cook_products: Vec<ResolvedProduct>,
}

impl GeneratedTasks {
    /// Logistics tasks followed by cook tasks.
    pub fn all_tasks(&self) -> Vec<Task> {
        self.logistics_tasks
            .iter()
            .chain(&self.cook_tasks)
            .cloned()
            .collect()
    }
}

/// Expand a template into tasks and resolved product lists for a budget.
pub fn generate_tasks_from_budget(
    budget: &Budget,
    template: &BudgetTemplate,
    products: &[Product],
) -> Result<GeneratedTasks> {
    let event_date = budget.event_day()?;
    let mut generated = GeneratedTasks::default();

    if template.auto_generate_logistics_tasks {
        for entry in &template.logistics_tasks {
            let due_date = days_before(event_date, entry.due_date_offset)?;
            generated
                .logistics_tasks
                .push(task_from_template(budget, entry, Role::Logistics, due_date, products));
        }
    }

    if template.auto_generate_cook_tasks {
        for entry in &template.cook_tasks {
            let due_date = days_before(event_date, entry.due_date_offset)?;
            generated
                .cook_tasks
                .push(task_from_template(budget, entry, Role::Cook, due_date, products));
        }
    }

    generated.logistics_products = resolve_requirements(&template.logistics_products, products);
    generated.cook_products = resolve_requirements(&template.cook_products, products);

    tracing::info!(
        "Template '{}' generated {} logistics / {} cook tasks for budget {}",
        template.id,
        generated.logistics_tasks.len(),
        generated.cook_tasks.len(),
        budget.id
    );
    Ok(generated)
}

fn task_from_template(
    budget: &Budget,
    entry: &TaskTemplate,
    role: Role,
    due_date: chrono::NaiveDate,
    products: &[Product],
) -> Task {
    let task_type = entry.task_type.unwrap_or(match role {
        Role::Cook => TaskType::Preparation,
        _ => TaskType::Setup,
    });
    let needs = entry
        .required_products
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|req| need_from_requirement(req, role, products))
        .collect();

    Task::new(
        task_type,
        interpolate(&entry.title, budget),
        interpolate(&entry.description, budget),
        budget.id.as_str(),
        role,
        due_date,
        entry.estimated_duration,
        entry.priority,
    )
    .with_needs(needs)
}

fn need_from_requirement(
    req: &ProductRequirement,
    role: Role,
    products: &[Product],
) -> Option<Need> {
    if req.quantity == 0 {
        tracing::warn!("Skipping zero-quantity requirement for product {}", req.product_id);
        return None;
    }
    let name = match find_product(products, &req.product_id) {
        Some(product) => product.name.as_str(),
        None => {
            tracing::warn!("Product {} not in catalog, using placeholder", req.product_id);
            UNKNOWN_PRODUCT
        }
    };
    let description = match &req.notes {
        Some(notes) => format!("{} x {} ({})", req.quantity, name, notes),
        None => format!("{} x {}", req.quantity, name),
    };
    Some(Need::new(description, req.quantity, role))
}

fn resolve_requirements(
    requirements: &[ProductRequirement],
    products: &[Product],
) -> Vec<ResolvedProduct> {
    requirements
        .iter()
        .filter_map(|req| match find_product(products, &req.product_id) {
            Some(product) => Some(ResolvedProduct {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity: req.quantity,
                notes: req.notes.clone(),
            }),
            None => {
                tracing::warn!("Dropping requirement for unknown product {}", req.product_id);
                None
            }
        })
        .collect()
}

/// Fill `{{client}}` and `{{guests}}` placeholders.
fn interpolate(text: &str, budget: &Budget) -> String {
    text.replace("{{client}}", &budget.client_name)
        .replace("{{guests}}", &budget.guest_count.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{BudgetStatus, GenerationStrategy};
    use crate::tasks::{Priority, TaskStatus};
    use chrono::NaiveDate;

    fn budget() -> Budget {
        Budget {
            id: "b-7".into(),
            client_name: "Marta".into(),
            event_date: "2024-08-02".into(),
            guest_count: 25,
            status: BudgetStatus::Reserved,
            template_id: Some("asado".into()),
            menu_id: None,
            activity_ids: vec![],
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            Product { id: "p1".into(), name: "Charcoal".into(), unit: Some("bag".into()) },
            Product { id: "p2".into(), name: "Beef ribs".into(), unit: Some("kg".into()) },
        ]
    }

    fn entry(title: &str, offset: i64, products: Option<Vec<ProductRequirement>>) -> TaskTemplate {
        TaskTemplate {
            title: title.into(),
            description: "For {{client}}, {{guests}} guests".into(),
            due_date_offset: offset,
            priority: Priority::High,
            estimated_duration: 2.0,
            task_type: None,
            required_products: products,
        }
    }

    fn req(product_id: &str, quantity: u32) -> ProductRequirement {
        ProductRequirement { product_id: product_id.into(), quantity, notes: None }
    }

    fn template() -> BudgetTemplate {
        BudgetTemplate {
            id: "asado".into(),
            name: "Asado".into(),
            strategy: GenerationStrategy::Template,
            auto_generate_logistics_tasks: true,
            auto_generate_cook_tasks: true,
            logistics_tasks: vec![entry("Buy charcoal", 2, Some(vec![req("p1", 3)]))],
            cook_tasks: vec![entry("Marinate ribs", 1, None)],
            logistics_products: vec![req("p1", 10), req("missing", 4)],
            cook_products: vec![req("p2", 12)],
        }
    }

    #[test]
    fn test_generates_both_roles() {
        let out = generate_tasks_from_budget(&budget(), &template(), &catalog()).unwrap();
        assert_eq!(out.logistics_tasks.len(), 1);
        assert_eq!(out.cook_tasks.len(), 1);

        let buy = &out.logistics_tasks[0];
        assert_eq!(buy.assigned_to_role, Role::Logistics);
        assert_eq!(buy.task_type, TaskType::Setup);
        assert_eq!(buy.status, TaskStatus::Todo);
        assert_eq!(buy.due_date, NaiveDate::from_ymd_opt(2024, 7, 31).unwrap());
        assert_eq!(buy.description, "For Marta, 25 guests");

        let marinate = &out.cook_tasks[0];
        assert_eq!(marinate.assigned_to_role, Role::Cook);
        assert_eq!(marinate.task_type, TaskType::Preparation);
        assert!(marinate.needs.is_empty());
        assert_eq!(out.all_tasks().len(), 2);
    }

    #[test]
    fn test_need_embeds_product_name() {
        let out = generate_tasks_from_budget(&budget(), &template(), &catalog()).unwrap();
        let needs = &out.logistics_tasks[0].needs;
        assert_eq!(needs.len(), 1);
        assert!(needs[0].description.contains('3'));
        assert!(needs[0].description.contains("Charcoal"));
        assert_eq!(needs[0].quantity, 3);
        assert_eq!(needs[0].requested_by, Role::Logistics);
        assert!(needs[0].fulfilled_by.is_none());
    }

    #[test]
    fn test_unknown_product_uses_placeholder() {
        let out = generate_tasks_from_budget(&budget(), &template(), &[]).unwrap();
        let needs = &out.logistics_tasks[0].needs;
        assert_eq!(needs.len(), 1);
        assert!(needs[0].description.contains(UNKNOWN_PRODUCT));
    }

    #[test]
    fn test_aggregate_requirements_drop_unknown() {
        let out = generate_tasks_from_budget(&budget(), &template(), &catalog()).unwrap();
        assert_eq!(out.logistics_products.len(), 1);
        assert_eq!(out.logistics_products[0].product_name, "Charcoal");
        assert_eq!(out.logistics_products[0].quantity, 10);
        assert_eq!(out.cook_products.len(), 1);
        assert_eq!(out.cook_products[0].product_name, "Beef ribs");
    }

    #[test]
    fn test_flags_gate_task_lists_only() {
        let mut tpl = template();
        tpl.auto_generate_logistics_tasks = false;
        tpl.auto_generate_cook_tasks = false;
        let out = generate_tasks_from_budget(&budget(), &tpl, &catalog()).unwrap();
        assert!(out.logistics_tasks.is_empty());
        assert!(out.cook_tasks.is_empty());
        // Aggregate lists are resolved regardless.
        assert_eq!(out.logistics_products.len(), 1);
        assert_eq!(out.cook_products.len(), 1);
    }

    #[test]
    fn test_notes_and_zero_quantity() {
        let mut tpl = template();
        tpl.logistics_tasks = vec![entry(
            "Buy charcoal",
            2,
            Some(vec![
                ProductRequirement {
                    product_id: "p1".into(),
                    quantity: 5,
                    notes: Some("hardwood".into()),
                },
                req("p2", 0),
            ]),
        )];
        let out = generate_tasks_from_budget(&budget(), &tpl, &catalog()).unwrap();
        let needs = &out.logistics_tasks[0].needs;
        assert_eq!(needs.len(), 1);
        assert_eq!(needs[0].description, "5 x Charcoal (hardwood)");
    }

    #[test]
    fn test_bad_event_date_fails_batch() {
        let mut b = budget();
        b.event_date = "soon".into();
        assert!(generate_tasks_from_budget(&b, &template(), &catalog()).is_err());
    }
}
