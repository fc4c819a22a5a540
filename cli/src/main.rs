mod commands;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use crate::commands::{
    cmd_add_entry, cmd_add_meal_plan, cmd_create_goal, cmd_create_report, cmd_create_user,
    cmd_delete_entry, cmd_delete_goal, cmd_delete_meal_plan, cmd_delete_report, cmd_delete_user,
    cmd_init_db, cmd_list_entries, cmd_list_goals, cmd_list_reports, cmd_list_users,
    cmd_progress, cmd_show_meal_plan, json_error,
};
use crate::config::Config;
use dietlog_core::DietService;

#[derive(Parser)]
#[command(
    name = "dietlog",
    version,
    about = "A simple diet tracking CLI",
    long_about = "Track what you eat: users, food entries, calorie goals, weekly meal plans \
                  and daily calorie reports, stored in a local SQLite database."
)]
struct Cli {
    /// Path to the database file (default: platform data directory)
    #[arg(long, global = true, env = "DIETLOG_DB", value_name = "PATH")]
    db: Option<PathBuf>,
    /// Allow only one meal plan per user and week
    #[arg(long, global = true, env = "DIETLOG_UNIQUE_MEAL_PLANS")]
    unique_meal_plans: bool,
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create all tables in the database. Run this once before any other command
    InitDb,
    /// Create a new user with the given name
    CreateUser {
        /// User name (must be unique)
        name: String,
    },
    /// List all users
    ListUsers,
    /// Delete a user and all of their entries, goals, meal plans and reports
    DeleteUser {
        /// User ID to delete
        user_id: i64,
    },
    /// Add a food entry for a user
    AddEntry {
        /// User ID the entry belongs to
        user_id: i64,
        /// Food name
        food: String,
        /// Calories (non-negative)
        #[arg(allow_negative_numbers = true)]
        calories: i64,
        /// Date as YYYY-MM-DD (or today/yesterday/tomorrow)
        date: String,
    },
    /// List food entries, optionally filtered by user and/or date
    ListEntries {
        /// Filter by user ID
        #[arg(long)]
        user_id: Option<i64>,
        /// Filter by date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a food entry by ID
    DeleteEntry {
        /// Entry ID to delete
        entry_id: i64,
    },
    /// Set the daily and weekly calorie goal for a user (one goal per user)
    CreateGoal {
        /// User ID the goal belongs to
        user_id: i64,
        /// Daily calorie target
        #[arg(allow_negative_numbers = true)]
        daily: i64,
        /// Weekly calorie target
        #[arg(allow_negative_numbers = true)]
        weekly: i64,
    },
    /// List goals, optionally for a single user
    ListGoals {
        /// Filter by user ID
        #[arg(long)]
        user_id: Option<i64>,
    },
    /// Delete a goal by ID
    DeleteGoal {
        /// Goal ID to delete
        goal_id: i64,
    },
    /// Add a meal plan for a user and week
    AddMealPlan {
        /// User ID the plan belongs to
        user_id: i64,
        /// Week number (1-53)
        #[arg(allow_negative_numbers = true)]
        week: i64,
        /// Meal plan details
        plan_details: String,
    },
    /// Show the meal plans of a user for a given week
    #[command(name = "show-mealplan")]
    ShowMealPlan {
        /// ID of the user
        #[arg(short, long)]
        user_id: i64,
        /// Week number of the plan
        #[arg(short, long)]
        week: i64,
    },
    /// Delete a meal plan by ID
    DeleteMealPlan {
        /// Meal plan ID to delete
        meal_plan_id: i64,
    },
    /// Create a daily report with the total calories of a user on a date
    CreateReport {
        /// User ID for the report
        #[arg(long)]
        user_id: i64,
        /// Date for the report (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// List stored reports, optionally for a single user
    ListReports {
        /// Filter by user ID
        #[arg(long)]
        user_id: Option<i64>,
    },
    /// Delete a report by ID
    DeleteReport {
        /// Report ID to delete
        report_id: i64,
    },
    /// Compare a day's and week's intake against the user's goal
    Progress {
        /// User ID
        #[arg(long)]
        user_id: i64,
        /// Date to check (YYYY-MM-DD, default: today)
        #[arg(long, default_value = "today")]
        date: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let json = cli.json;
    if let Err(e) = run(cli) {
        tracing::debug!(error = ?e, "command failed");
        if json {
            println!("{}", json_error(&format!("{e:#}")));
        } else {
            println!("Error: {e:#}");
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.db, cli.unique_meal_plans)?;
    let mut svc = DietService::new(&config.store_config())
        .with_context(|| format!("Failed to open database: {}", config.db_path.display()))?;
    let json = cli.json;

    match cli.command {
        Commands::InitDb => cmd_init_db(&svc, &config.db_path, json),
        Commands::CreateUser { name } => cmd_create_user(&mut svc, &name, json),
        Commands::ListUsers => cmd_list_users(&mut svc, json),
        Commands::DeleteUser { user_id } => cmd_delete_user(&mut svc, user_id, json),
        Commands::AddEntry {
            user_id,
            food,
            calories,
            date,
        } => cmd_add_entry(&mut svc, user_id, &food, calories, &date, json),
        Commands::ListEntries { user_id, date } => {
            cmd_list_entries(&mut svc, user_id, date.as_deref(), json)
        }
        Commands::DeleteEntry { entry_id } => cmd_delete_entry(&mut svc, entry_id, json),
        Commands::CreateGoal {
            user_id,
            daily,
            weekly,
        } => cmd_create_goal(&mut svc, user_id, daily, weekly, json),
        Commands::ListGoals { user_id } => cmd_list_goals(&mut svc, user_id, json),
        Commands::DeleteGoal { goal_id } => cmd_delete_goal(&mut svc, goal_id, json),
        Commands::AddMealPlan {
            user_id,
            week,
            plan_details,
        } => cmd_add_meal_plan(&mut svc, user_id, week, &plan_details, json),
        Commands::ShowMealPlan { user_id, week } => {
            cmd_show_meal_plan(&mut svc, user_id, week, json)
        }
        Commands::DeleteMealPlan { meal_plan_id } => {
            cmd_delete_meal_plan(&mut svc, meal_plan_id, json)
        }
        Commands::CreateReport { user_id, date } => {
            cmd_create_report(&mut svc, user_id, &date, json)
        }
        Commands::ListReports { user_id } => cmd_list_reports(&mut svc, user_id, json),
        Commands::DeleteReport { report_id } => cmd_delete_report(&mut svc, report_id, json),
        Commands::Progress { user_id, date } => cmd_progress(&mut svc, user_id, &date, json),
    }
}
