//! Inbound records: budgets, the reference catalog and budget templates.
//!
//! The engine only reads these. Budgets and templates are owned by the
//! surrounding store; nothing here mutates them.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use festa_core::{FestaError, Result};
use serde::{Deserialize, Serialize};

use crate::tasks::{Priority, TaskType};

/// Budget lifecycle status. `reserva` is the only state the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    #[default]
    #[serde(alias = "pendiente")]
    Pending,
    #[serde(rename = "reserva", alias = "reserved")]
    Reserved,
    #[serde(alias = "confirmado")]
    Confirmed,
    #[serde(alias = "completado")]
    Completed,
    #[serde(alias = "cancelado")]
    Cancelled,
    #[serde(other)]
    Other,
}

impl BudgetStatus {
    pub fn is_reserved(self) -> bool {
        self == BudgetStatus::Reserved
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Reserved => write!(f, "reserva"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for BudgetStatus {
    type Err = FestaError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_string()))
            .map_err(FestaError::from)
    }
}

/// An event order that tasks are generated for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub client_name: String,
    /// `YYYY-MM-DD` or RFC 3339; see [`parse_event_date`].
    pub event_date: String,
    pub guest_count: u32,
    #[serde(default)]
    pub status: BudgetStatus,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub menu_id: Option<String>,
    #[serde(default)]
    pub activity_ids: Vec<String>,
}

impl Budget {
    /// Calendar date of the event.
    pub fn event_day(&self) -> Result<NaiveDate> {
        parse_event_date(&self.event_date)
    }
}

/// Parse an event date given either as a plain date or as an RFC 3339 timestamp.
pub fn parse_event_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|e| FestaError::InvalidDate {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Subtract a lead time (in days) from an event date.
pub fn days_before(event_date: NaiveDate, days: i64) -> Result<NaiveDate> {
    chrono::TimeDelta::try_days(days)
        .and_then(|delta| event_date.checked_sub_signed(delta))
        .ok_or_else(|| FestaError::InvalidDate {
            value: event_date.to_string(),
            reason: format!("offset of {days} days is out of range"),
        })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
}

/// Read-only reference data available when a budget changes status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub menus: Vec<Menu>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Catalog {
    pub fn product(&self, id: &str) -> Option<&Product> {
        find_product(&self.products, id)
    }

    pub fn menu(&self, id: &str) -> Option<&Menu> {
        self.menus.iter().find(|m| m.id == id)
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }
}

pub(crate) fn find_product<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.id == id)
}

/// A quantity of one catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequirement {
    pub product_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One task a template generates for a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    pub title: String,
    /// May contain `{{client}}` and `{{guests}}`.
    pub description: String,
    /// Days before the event the task is due.
    pub due_date_offset: i64,
    pub priority: Priority,
    /// Hours.
    pub estimated_duration: f32,
    /// Defaults to `setup` for logistics and `preparation` for the kitchen.
    #[serde(default, rename = "type")]
    pub task_type: Option<TaskType>,
    #[serde(default)]
    pub required_products: Option<Vec<ProductRequirement>>,
}

/// Which generator a template drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStrategy {
    /// Rule-table scheduler.
    #[default]
    Rules,
    /// Explicit task templates with product needs.
    Template,
}

/// Reusable definition of what an event kind generates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTemplate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub strategy: GenerationStrategy,
    #[serde(default)]
    pub auto_generate_logistics_tasks: bool,
    #[serde(default)]
    pub auto_generate_cook_tasks: bool,
    #[serde(default)]
    pub logistics_tasks: Vec<TaskTemplate>,
    #[serde(default)]
    pub cook_tasks: Vec<TaskTemplate>,
    #[serde(default)]
    pub logistics_products: Vec<ProductRequirement>,
    #[serde(default)]
    pub cook_products: Vec<ProductRequirement>,
}

/// Template lookup injected into workflow automation.
pub trait TemplateSource {
    fn find_template(&self, id: &str) -> Option<BudgetTemplate>;
}

impl<F> TemplateSource for F
where
    F: Fn(&str) -> Option<BudgetTemplate>,
{
    fn find_template(&self, id: &str) -> Option<BudgetTemplate> {
        self(id)
    }
}

/// In-memory template source.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, BudgetTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON array of templates.
    pub fn from_json(content: &str) -> Result<Self> {
        let templates: Vec<BudgetTemplate> = serde_json::from_str(content)?;
        let mut registry = Self::new();
        for template in templates {
            registry.register(template);
        }
        Ok(registry)
    }

    pub fn register(&mut self, template: BudgetTemplate) {
        tracing::debug!("Registered budget template: {}", template.id);
        self.templates.insert(template.id.clone(), template);
    }

    pub fn count(&self) -> usize {
        self.templates.len()
    }
}

impl TemplateSource for TemplateRegistry {
    fn find_template(&self, id: &str) -> Option<BudgetTemplate> {
        self.templates.get(id).cloned()
    }
}
