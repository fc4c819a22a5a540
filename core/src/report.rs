//! Daily calorie reports and goal progress derived from logged entries.
//!
//! A report row is written at most once per user and date. Asking for a
//! report that already exists returns the stored row untouched, even if
//! entries for that date changed since it was generated.

use chrono::NaiveDate;
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info};

use crate::db::Session;
use crate::error::Result;
use crate::models::{Progress, Report, ReportOutcome, format_date, week_bounds};

impl Session<'_> {
    /// Sum of entry calories for a user over an inclusive date range.
    /// No matching entries sums to zero.
    pub fn calories_between(&self, user_id: i64, from: NaiveDate, to: NaiveDate) -> Result<i64> {
        let total: i64 = self.tx.query_row(
            "SELECT COALESCE(SUM(calories), 0) FROM entries
             WHERE user_id = ?1 AND date >= ?2 AND date <= ?3",
            params![user_id, format_date(from), format_date(to)],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    pub fn find_report(&self, user_id: i64, date: NaiveDate) -> Result<Option<Report>> {
        Ok(self
            .tx
            .query_row(
                "SELECT id, user_id, report_date, total_calories FROM reporting
                 WHERE user_id = ?1 AND report_date = ?2",
                params![user_id, format_date(date)],
                Self::report_from_row,
            )
            .optional()?)
    }

    pub fn generate_report(&self, user_id: i64, date: NaiveDate) -> Result<ReportOutcome> {
        self.get_user(user_id)?;

        if let Some(report) = self.find_report(user_id, date)? {
            debug!(report_id = report.id, "report already exists");
            return Ok(ReportOutcome {
                report,
                created: false,
            });
        }

        let total_calories = self.calories_between(user_id, date, date)?;
        self.tx.execute(
            "INSERT INTO reporting (user_id, report_date, total_calories) VALUES (?1, ?2, ?3)",
            params![user_id, format_date(date), total_calories],
        )?;
        let id = self.tx.last_insert_rowid();
        info!(report_id = id, user_id, total_calories, "created report");

        Ok(ReportOutcome {
            report: self.get_report(id)?,
            created: true,
        })
    }

    /// Live intake for `date` and its Monday-Sunday week, alongside the
    /// user's goal when one is set.
    pub fn progress(&self, user_id: i64, date: NaiveDate) -> Result<Progress> {
        self.get_user(user_id)?;
        let (week_start, week_end) = week_bounds(date)?;
        Ok(Progress {
            user_id,
            date,
            week_start,
            week_end,
            daily_calories: self.calories_between(user_id, date, date)?,
            weekly_calories: self.calories_between(user_id, week_start, week_end)?,
            goal: self.goal_for_user(user_id)?,
        })
    }
}
