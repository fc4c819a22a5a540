use anyhow::Result;
use tabled::Tabled;

use dietlog_core::DietService;

use super::helpers::{print_json, print_table, truncate};

pub(crate) fn cmd_add_meal_plan(
    svc: &mut DietService,
    user_id: i64,
    week: i64,
    plan_details: &str,
    json: bool,
) -> Result<()> {
    let plan = svc.add_meal_plan(user_id, week, plan_details)?;

    if json {
        print_json(&plan)?;
    } else {
        let details = if plan.plan_details.is_empty() {
            "N/A"
        } else {
            plan.plan_details.as_str()
        };
        println!(
            "Added meal plan: id={}, user_id={}, week={}, details='{details}'",
            plan.id, plan.user_id, plan.week
        );
    }
    Ok(())
}

pub(crate) fn cmd_show_meal_plan(
    svc: &mut DietService,
    user_id: i64,
    week: i64,
    json: bool,
) -> Result<()> {
    #[derive(Tabled)]
    struct PlanRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Plan")]
        details: String,
    }

    let plans = svc.show_meal_plan(user_id, week)?;

    if json {
        return print_json(&plans);
    }

    if plans.is_empty() {
        println!("No meal plan found for user {user_id} in week {week}");
        return Ok(());
    }

    println!("Meal plan for user {user_id}, week {week}:");
    let rows: Vec<PlanRow> = plans
        .iter()
        .map(|p| PlanRow {
            id: p.id,
            details: truncate(&p.plan_details, 70),
        })
        .collect();
    print_table(&rows, 0..1);
    Ok(())
}

pub(crate) fn cmd_delete_meal_plan(
    svc: &mut DietService,
    meal_plan_id: i64,
    json: bool,
) -> Result<()> {
    let plan = svc.delete_meal_plan(meal_plan_id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": plan }));
    } else {
        println!("Deleted meal plan with id={meal_plan_id}");
    }
    Ok(())
}
