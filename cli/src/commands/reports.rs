use anyhow::Result;
use tabled::Tabled;

use dietlog_core::DietService;

use super::helpers::{print_json, print_table};

pub(crate) fn cmd_create_report(
    svc: &mut DietService,
    user_id: i64,
    date: &str,
    json: bool,
) -> Result<()> {
    let outcome = svc.create_report(user_id, date)?;

    if json {
        return print_json(&outcome);
    }

    let report = &outcome.report;
    if outcome.created {
        println!("Report created successfully:");
        println!("  - Report ID: {}", report.id);
        println!("  - User ID: {}", report.user_id);
        println!("  - Date: {}", report.report_date);
        println!("  - Total Calories: {}", report.total_calories);
    } else {
        println!(
            "Report already exists for user_id={} on {} (id={}, Total calories: {})",
            report.user_id, report.report_date, report.id, report.total_calories
        );
    }
    Ok(())
}

pub(crate) fn cmd_list_reports(
    svc: &mut DietService,
    user_id: Option<i64>,
    json: bool,
) -> Result<()> {
    #[derive(Tabled)]
    struct ReportRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "User")]
        user_id: i64,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Total")]
        total: String,
    }

    let reports = svc.list_reports(user_id)?;

    if json {
        return print_json(&reports);
    }

    if reports.is_empty() {
        println!("No reports found.");
        return Ok(());
    }

    let rows: Vec<ReportRow> = reports
        .iter()
        .map(|r| ReportRow {
            id: r.id,
            user_id: r.user_id,
            date: r.report_date.to_string(),
            total: format!("{} kcal", r.total_calories),
        })
        .collect();
    print_table(&rows, 3..4);
    Ok(())
}

pub(crate) fn cmd_delete_report(svc: &mut DietService, report_id: i64, json: bool) -> Result<()> {
    let report = svc.delete_report(report_id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": report }));
    } else {
        println!("Deleted report with id={report_id}");
    }
    Ok(())
}

pub(crate) fn cmd_progress(svc: &mut DietService, user_id: i64, date: &str, json: bool) -> Result<()> {
    let progress = svc.progress(user_id, date)?;

    if json {
        return print_json(&progress);
    }

    println!("=== user {user_id} on {} ===\n", progress.date);
    println!("  Today's intake: {} kcal", progress.daily_calories);
    println!(
        "  This week ({} to {}): {} kcal",
        progress.week_start, progress.week_end, progress.weekly_calories
    );

    match &progress.goal {
        Some(goal) => {
            println!("  Daily goal: {} kcal", goal.daily);
            println!("  Weekly goal: {} kcal", goal.weekly);
            if let (Some(daily), Some(weekly)) =
                (progress.daily_remaining(), progress.weekly_remaining())
            {
                println!("  REMAINING: {daily} kcal today, {weekly} kcal this week");
            }
        }
        None => println!("  No goal set. Use `dietlog create-goal` to set one."),
    }
    Ok(())
}
