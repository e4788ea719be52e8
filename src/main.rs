//! # Festa — event task generation CLI
//!
//! Drives the task generation engine over JSON files: reserve a budget,
//! then read each role's work queue and notifications from the task board.
//!
//! Usage:
//!   festa reserve --budget budget.json              # Generate tasks for a reserved budget
//!   festa reserve --budget b.json --catalog c.json --templates t.json
//!   festa tasks --role cook                         # Kitchen queue, priority then due date
//!   festa notifications --role logistics --unread
//!   festa rules                                     # Effective scheduling rules

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use festa_core::FestaConfig;
use festa_scheduler::{
    Budget, BudgetStatus, Catalog, Role, StatusTrigger, TaskBoard, TaskScheduler, TemplateRegistry,
    WorkflowAutomation,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "festa", version, about = "🎉 Festa — task generation for event budgets")]
struct Cli {
    /// Config file (default: ~/.festa/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Task board file (default: from config)
    #[arg(long, global = true)]
    board: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Move a budget into `reserva` and merge the generated tasks into the board
    Reserve {
        /// Budget JSON file
        #[arg(long)]
        budget: String,
        /// Status the budget is leaving (default: the status in the budget file)
        #[arg(long)]
        previous: Option<BudgetStatus>,
        /// Catalog JSON file with products, menus and activities
        #[arg(long)]
        catalog: Option<String>,
        /// JSON array of budget templates
        #[arg(long)]
        templates: Option<String>,
    },
    /// List a role's tasks, highest priority first
    Tasks {
        #[arg(long)]
        role: Role,
    },
    /// List notifications
    Notifications {
        #[arg(long)]
        role: Option<Role>,
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },
    /// Print the effective scheduling rules
    Rules,
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "festa=debug,festa_scheduler=debug,festa_core=debug"
    } else {
        "festa=info,festa_scheduler=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => FestaConfig::load_from(&expand_path(path))?,
        None => FestaConfig::load()?,
    };
    let board_path = expand_path(cli.board.as_deref().unwrap_or(&config.store.path));
    let scheduler = TaskScheduler::from_config(&config)?;

    match cli.command {
        Command::Reserve {
            budget,
            previous,
            catalog,
            templates,
        } => {
            let budget: Budget = read_json(&expand_path(&budget))?;
            let catalog: Catalog = match catalog {
                Some(path) => read_json(&expand_path(&path))?,
                None => Catalog::default(),
            };
            let templates = match templates {
                Some(path) => {
                    let path = expand_path(&path);
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    TemplateRegistry::from_json(&content)?
                }
                None => TemplateRegistry::new(),
            };
            cmd_reserve(scheduler, templates, &budget, previous, &catalog, &board_path)
        }
        Command::Tasks { role } => cmd_tasks(&board_path, role),
        Command::Notifications { role, unread } => cmd_notifications(&board_path, role, unread),
        Command::Rules => {
            cmd_rules(&scheduler);
            Ok(())
        }
    }
}

fn cmd_reserve(
    scheduler: TaskScheduler,
    templates: TemplateRegistry,
    budget: &Budget,
    previous: Option<BudgetStatus>,
    catalog: &Catalog,
    board_path: &Path,
) -> Result<()> {
    let mut board = TaskBoard::load(board_path)?;
    if board.is_generated(&budget.id) {
        println!("⚠️  Budget {} already has tasks on the board, nothing to do.", budget.id);
        return Ok(());
    }

    let automation = WorkflowAutomation::new(scheduler, templates);
    let trigger = StatusTrigger::new(previous.unwrap_or(budget.status), BudgetStatus::Reserved);
    let Some(result) = automation.handle_status_change(&trigger, budget, catalog)? else {
        println!(
            "ℹ️  {} → {}: no tasks generated.",
            trigger.previous_status, trigger.new_status
        );
        return Ok(());
    };

    println!("✅ {} tasks for {} ({})", result.tasks.len(), budget.client_name, budget.event_date);
    for task in &result.tasks {
        println!(
            "   {:<10} {:<12} {:<8} {}  {}",
            task.assigned_to_role, task.task_type, task.priority, task.due_date, task.description
        );
        for need in &task.needs {
            println!("              • {}", need.description);
        }
    }
    for product in result.logistics_products.iter().chain(&result.cook_products) {
        println!("   📦 {} x {}", product.quantity, product.product_name);
    }
    for notification in &result.notifications {
        println!("   🔔 {}", notification.text);
    }

    board.merge(result);
    board.save(board_path)?;
    println!("💾 Board saved to {}", board_path.display());
    Ok(())
}

fn cmd_tasks(board_path: &Path, role: Role) -> Result<()> {
    let board = TaskBoard::load(board_path)?;
    let tasks = board.tasks_for(role);
    if tasks.is_empty() {
        println!("No tasks for {role}.");
        return Ok(());
    }
    for task in tasks {
        println!(
            "{}  {:<8} {:<12} {:<11} {:>4.1}h  {}",
            task.due_date,
            task.priority,
            task.task_type,
            task.status,
            task.estimated_duration,
            task.description
        );
    }
    Ok(())
}

fn cmd_notifications(board_path: &Path, role: Option<Role>, unread: bool) -> Result<()> {
    let board = TaskBoard::load(board_path)?;
    let visible = board
        .notifications
        .iter()
        .filter(|n| role.is_none_or(|r| n.is_for(r)))
        .filter(|n| !unread || !n.read);
    for n in visible {
        let marker = if n.read { " " } else { "•" };
        println!("{marker} #{} {}  {}", n.id, n.time.format("%Y-%m-%d %H:%M"), n.text);
    }
    Ok(())
}

fn cmd_rules(scheduler: &TaskScheduler) {
    println!("{:<12} {:>6} {:<8} {:>11} role", "type", "hours", "priority", "days before");
    for (task_type, rule) in scheduler.rules().iter() {
        println!(
            "{:<12} {:>6.1} {:<8} {:>11} {}",
            task_type,
            rule.default_duration,
            rule.default_priority,
            rule.ideal_days_before,
            rule.assigned_to_role
        );
    }
}
