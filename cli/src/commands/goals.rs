use anyhow::Result;
use tabled::Tabled;

use dietlog_core::DietService;

use super::helpers::{print_json, print_table};

pub(crate) fn cmd_create_goal(
    svc: &mut DietService,
    user_id: i64,
    daily: i64,
    weekly: i64,
    json: bool,
) -> Result<()> {
    let goal = svc.create_goal(user_id, daily, weekly)?;

    if json {
        print_json(&goal)?;
    } else {
        println!(
            "Added goal: id={}, user_id={}, daily={} kcal, weekly={} kcal",
            goal.id, goal.user_id, goal.daily, goal.weekly
        );
    }
    Ok(())
}

pub(crate) fn cmd_list_goals(svc: &mut DietService, user_id: Option<i64>, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct GoalRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "User")]
        user_id: i64,
        #[tabled(rename = "Daily")]
        daily: String,
        #[tabled(rename = "Weekly")]
        weekly: String,
    }

    let goals = svc.list_goals(user_id)?;

    if json {
        return print_json(&goals);
    }

    if goals.is_empty() {
        println!("No goals found.");
        return Ok(());
    }

    let rows: Vec<GoalRow> = goals
        .iter()
        .map(|g| GoalRow {
            id: g.id,
            user_id: g.user_id,
            daily: format!("{} kcal", g.daily),
            weekly: format!("{} kcal", g.weekly),
        })
        .collect();
    print_table(&rows, 2..4);
    Ok(())
}

pub(crate) fn cmd_delete_goal(svc: &mut DietService, goal_id: i64, json: bool) -> Result<()> {
    let goal = svc.delete_goal(goal_id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": goal }));
    } else {
        println!("Deleted goal with id={goal_id}");
    }
    Ok(())
}
