mod entries;
mod goals;
mod helpers;
mod init;
mod meal_plans;
mod reports;
mod users;

pub(crate) use entries::{cmd_add_entry, cmd_delete_entry, cmd_list_entries};
pub(crate) use goals::{cmd_create_goal, cmd_delete_goal, cmd_list_goals};
pub(crate) use helpers::json_error;
pub(crate) use init::cmd_init_db;
pub(crate) use meal_plans::{cmd_add_meal_plan, cmd_delete_meal_plan, cmd_show_meal_plan};
pub(crate) use reports::{cmd_create_report, cmd_delete_report, cmd_list_reports, cmd_progress};
pub(crate) use users::{cmd_create_user, cmd_delete_user, cmd_list_users};
