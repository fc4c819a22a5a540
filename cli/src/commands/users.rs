use anyhow::Result;
use tabled::Tabled;

use dietlog_core::DietService;

use super::helpers::{plural, print_json, print_table, truncate};

pub(crate) fn cmd_create_user(svc: &mut DietService, name: &str, json: bool) -> Result<()> {
    let user = svc.create_user(name)?;

    if json {
        print_json(&user)?;
    } else {
        println!("Created user: {}  (id={})", user.name, user.id);
    }
    Ok(())
}

pub(crate) fn cmd_list_users(svc: &mut DietService, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct UserRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
    }

    let users = svc.list_users()?;

    if json {
        return print_json(&users);
    }

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    let rows: Vec<UserRow> = users
        .iter()
        .map(|u| UserRow {
            id: u.id,
            name: truncate(&u.name, 40),
        })
        .collect();
    print_table(&rows, 0..1);
    Ok(())
}

pub(crate) fn cmd_delete_user(svc: &mut DietService, user_id: i64, json: bool) -> Result<()> {
    let deleted = svc.delete_user(user_id)?;

    if json {
        print_json(&deleted)?;
    } else {
        let removed = &deleted.removed;
        println!(
            "Deleted user with id={user_id} and related data ({}, {}, {}, {})",
            plural(removed.entries, "entry", "entries"),
            plural(removed.goals, "goal", "goals"),
            plural(removed.meal_plans, "meal plan", "meal plans"),
            plural(removed.reports, "report", "reports"),
        );
    }
    Ok(())
}
