use chrono::{Datelike, Days, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DietError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lowest and highest ISO week numbers a meal plan can target.
pub const MIN_WEEK: i64 = 1;
pub const MAX_WEEK: i64 = 53;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub user_id: i64,
    pub food: String,
    pub calories: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub daily: i64,
    pub weekly: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: i64,
    pub user_id: i64,
    pub week: i64,
    pub plan_details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub user_id: i64,
    pub report_date: NaiveDate,
    pub total_calories: i64,
}

#[derive(Debug, Clone)]
pub struct NewEntry {
    pub user_id: i64,
    pub food: String,
    pub calories: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub user_id: i64,
    pub daily: i64,
    pub weekly: i64,
}

#[derive(Debug, Clone)]
pub struct NewMealPlan {
    pub user_id: i64,
    pub week: i64,
    pub plan_details: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EntryFilter {
    pub user_id: Option<i64>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MealPlanFilter {
    pub user_id: Option<i64>,
    pub week: Option<i64>,
}

/// Rows removed alongside a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeSummary {
    pub entries: usize,
    pub goals: usize,
    pub meal_plans: usize,
    pub reports: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedUser {
    pub user: User,
    pub removed: CascadeSummary,
}

/// Result of generating a report; `created` is false when an existing row
/// for the same user and date was returned instead.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub report: Report,
    pub created: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub user_id: i64,
    pub date: NaiveDate,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub daily_calories: i64,
    pub weekly_calories: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
}

impl Progress {
    #[must_use]
    pub fn daily_remaining(&self) -> Option<i64> {
        self.goal.as_ref().map(|g| g.daily - self.daily_calories)
    }

    #[must_use]
    pub fn weekly_remaining(&self) -> Option<i64> {
        self.goal.as_ref().map(|g| g.weekly - self.weekly_calories)
    }
}

/// Parse a date argument. Accepts `YYYY-MM-DD` and the keywords
/// `today`, `yesterday` and `tomorrow`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let invalid = || {
        DietError::Validation(format!(
            "Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday/tomorrow"
        ))
    };
    let today = Local::now().date_naive();
    match s.trim() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        "tomorrow" => Ok(today + Duration::days(1)),
        other if is_iso_date_shape(other) => {
            NaiveDate::parse_from_str(other, DATE_FORMAT).map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

/// Four-digit year, then one- or two-digit month and day. chrono alone would
/// also take signed and expanded years such as `+2024-01-01`.
fn is_iso_date_shape(s: &str) -> bool {
    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };
    let mut parts = s.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day), None) => {
            digits(year, 4, 4) && digits(month, 1, 2) && digits(day, 1, 2)
        }
        _ => false,
    }
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Monday and Sunday of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let offset = Days::new(u64::from(date.weekday().num_days_from_monday()));
    date.checked_sub_days(offset)
        .and_then(|start| Some((start, start.checked_add_days(Days::new(6))?)))
        .ok_or_else(|| DietError::Validation(format!("Date {date} is out of range")))
}

pub fn validate_user_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DietError::Validation("User name must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

pub fn validate_calories(calories: i64) -> Result<()> {
    if calories < 0 {
        return Err(DietError::Validation(format!(
            "Calories must be non-negative (got {calories})"
        )));
    }
    Ok(())
}

pub fn validate_goal(daily: i64, weekly: i64) -> Result<()> {
    if daily < 0 || weekly < 0 {
        return Err(DietError::Validation(
            "Goal calories must be non-negative".into(),
        ));
    }
    Ok(())
}

pub fn validate_week(week: i64) -> Result<()> {
    if !(MIN_WEEK..=MAX_WEEK).contains(&week) {
        return Err(DietError::Validation(format!(
            "Week must be between {MIN_WEEK} and {MAX_WEEK} (got {week})"
        )));
    }
    Ok(())
}
