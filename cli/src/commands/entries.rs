use anyhow::Result;
use tabled::Tabled;

use dietlog_core::DietService;

use super::helpers::{print_json, print_table, truncate};

pub(crate) fn cmd_add_entry(
    svc: &mut DietService,
    user_id: i64,
    food: &str,
    calories: i64,
    date: &str,
    json: bool,
) -> Result<()> {
    let entry = svc.add_entry(user_id, food, calories, date)?;

    if json {
        print_json(&entry)?;
    } else {
        println!(
            "Added entry: id={}, user_id={}, {} ({} kcal) on {}",
            entry.id, entry.user_id, entry.food, entry.calories, entry.date
        );
    }
    Ok(())
}

pub(crate) fn cmd_list_entries(
    svc: &mut DietService,
    user_id: Option<i64>,
    date: Option<&str>,
    json: bool,
) -> Result<()> {
    #[derive(Tabled)]
    struct EntryRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "User")]
        user_id: i64,
        #[tabled(rename = "Food")]
        food: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Date")]
        date: String,
    }

    let entries = svc.list_entries(user_id, date)?;

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|e| EntryRow {
            id: e.id,
            user_id: e.user_id,
            food: truncate(&e.food, 35),
            calories: format!("{} kcal", e.calories),
            date: e.date.to_string(),
        })
        .collect();
    print_table(&rows, 3..4);

    let total: i64 = entries.iter().map(|e| e.calories).sum();
    println!("  TOTAL: {total} kcal");
    Ok(())
}

pub(crate) fn cmd_delete_entry(svc: &mut DietService, entry_id: i64, json: bool) -> Result<()> {
    let entry = svc.delete_entry(entry_id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": entry }));
    } else {
        println!("Deleted entry with id={entry_id}");
    }
    Ok(())
}
