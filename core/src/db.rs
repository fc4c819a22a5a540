use std::path::PathBuf;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use tracing::{debug, info};

use crate::error::{DietError, Result};
use crate::models::{
    CascadeSummary, DATE_FORMAT, DeletedUser, Entry, EntryFilter, Goal, MealPlan, MealPlanFilter,
    NewEntry, NewGoal, NewMealPlan, Report, User, format_date, validate_calories, validate_goal,
    validate_user_name, validate_week,
};

const SCHEMA_VERSION: i64 = 1;

/// Where the database lives and which optional constraints apply.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    /// Reject a second meal plan for the same user and week.
    pub unique_meal_plans: bool,
}

pub struct Database {
    conn: Connection,
    unique_meal_plans: bool,
}

impl Database {
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let path = config.db_path.as_path();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened database");
        Self::from_connection(conn, config.unique_meal_plans)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, false)
    }

    fn from_connection(conn: Connection, unique_meal_plans: bool) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Database {
            conn,
            unique_meal_plans,
        })
    }

    #[must_use]
    pub fn with_unique_meal_plans(mut self, enabled: bool) -> Self {
        self.unique_meal_plans = enabled;
        self
    }

    fn schema_version(&self) -> Result<i64> {
        Ok(self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?)
    }

    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.schema_version()? >= SCHEMA_VERSION)
    }

    /// Create the schema. Returns false when it was already in place.
    pub fn init(&self) -> Result<bool> {
        let version = self.schema_version()?;

        if version < 1 {
            self.conn.execute_batch(
                "BEGIN;
                CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL UNIQUE
                );

                CREATE TABLE IF NOT EXISTS entries (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    food TEXT NOT NULL,
                    calories INTEGER NOT NULL CHECK (calories >= 0),
                    date TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS goals (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    daily INTEGER NOT NULL,
                    weekly INTEGER NOT NULL,
                    CHECK (daily >= 0 AND weekly >= 0)
                );

                CREATE TABLE IF NOT EXISTS meal_plans (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    week INTEGER NOT NULL,
                    plan_details TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS reporting (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    report_date TEXT NOT NULL,
                    total_calories INTEGER NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_entries_user_date ON entries(user_id, date);
                CREATE INDEX IF NOT EXISTS idx_goals_user ON goals(user_id);
                CREATE INDEX IF NOT EXISTS idx_meal_plans_user_week ON meal_plans(user_id, week);
                CREATE UNIQUE INDEX IF NOT EXISTS idx_reporting_user_date ON reporting(user_id, report_date);

                PRAGMA user_version = 1;
                COMMIT;",
            )?;
            info!(version = SCHEMA_VERSION, "database schema created");
            return Ok(true);
        }

        Ok(false)
    }

    /// Begin a unit of work. Dropping the session without calling
    /// [`Session::commit`] rolls it back.
    pub fn session(&mut self) -> Result<Session<'_>> {
        if !self.is_initialized()? {
            return Err(DietError::NotInitialized);
        }
        let unique_meal_plans = self.unique_meal_plans;
        let tx = self.conn.transaction()?;
        debug!("session started");
        Ok(Session {
            tx,
            unique_meal_plans,
        })
    }
}

pub struct Session<'conn> {
    pub(crate) tx: Transaction<'conn>,
    unique_meal_plans: bool,
}

impl Session<'_> {
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        debug!("session committed");
        Ok(())
    }

    pub fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        debug!("session rolled back");
        Ok(())
    }

    // --- Row mapping helpers ---

    pub(crate) fn date_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<NaiveDate> {
        let raw: String = row.get(idx)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    }

    fn user_from_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    // Expects columns: 0: id, 1: user_id, 2: food, 3: calories, 4: date
    fn entry_from_row(row: &rusqlite::Row) -> rusqlite::Result<Entry> {
        Ok(Entry {
            id: row.get(0)?,
            user_id: row.get(1)?,
            food: row.get(2)?,
            calories: row.get(3)?,
            date: Self::date_column(row, 4)?,
        })
    }

    fn goal_from_row(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
        Ok(Goal {
            id: row.get(0)?,
            user_id: row.get(1)?,
            daily: row.get(2)?,
            weekly: row.get(3)?,
        })
    }

    fn meal_plan_from_row(row: &rusqlite::Row) -> rusqlite::Result<MealPlan> {
        Ok(MealPlan {
            id: row.get(0)?,
            user_id: row.get(1)?,
            week: row.get(2)?,
            plan_details: row.get(3)?,
        })
    }

    pub(crate) fn report_from_row(row: &rusqlite::Row) -> rusqlite::Result<Report> {
        Ok(Report {
            id: row.get(0)?,
            user_id: row.get(1)?,
            report_date: Self::date_column(row, 2)?,
            total_calories: row.get(3)?,
        })
    }

    // --- Users ---

    pub fn create_user(&self, name: &str) -> Result<User> {
        let name = validate_user_name(name)?;
        if let Some(existing) = self.find_user_by_name(&name)? {
            return Err(DietError::Conflict(format!(
                "A user named '{name}' already exists (id={})",
                existing.id
            )));
        }
        self.tx
            .execute("INSERT INTO users (name) VALUES (?1)", params![name])?;
        let id = self.tx.last_insert_rowid();
        info!(user_id = id, name = %name, "created user");
        self.get_user(id)
    }

    pub fn get_user(&self, id: i64) -> Result<User> {
        self.tx
            .query_row(
                "SELECT id, name FROM users WHERE id = ?1",
                params![id],
                Self::user_from_row,
            )
            .optional()?
            .ok_or_else(|| DietError::not_found("user", id))
    }

    pub fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        Ok(self
            .tx
            .query_row(
                "SELECT id, name FROM users WHERE name = ?1",
                params![name],
                Self::user_from_row,
            )
            .optional()?)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.tx.prepare("SELECT id, name FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], Self::user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    fn count_owned(&self, table: &str, user_id: i64) -> Result<usize> {
        let count: i64 = self.tx.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE user_id = ?1"),
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Delete a user together with every row it owns.
    pub fn delete_user(&self, id: i64) -> Result<DeletedUser> {
        let user = self.get_user(id)?;
        let removed = CascadeSummary {
            entries: self.count_owned("entries", id)?,
            goals: self.count_owned("goals", id)?,
            meal_plans: self.count_owned("meal_plans", id)?,
            reports: self.count_owned("reporting", id)?,
        };
        self.tx
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        info!(
            user_id = id,
            entries = removed.entries,
            goals = removed.goals,
            meal_plans = removed.meal_plans,
            reports = removed.reports,
            "deleted user"
        );
        Ok(DeletedUser { user, removed })
    }

    // --- Entries ---

    pub fn add_entry(&self, entry: &NewEntry) -> Result<Entry> {
        validate_calories(entry.calories)?;
        self.get_user(entry.user_id)?;
        self.tx.execute(
            "INSERT INTO entries (user_id, food, calories, date) VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.user_id,
                entry.food,
                entry.calories,
                format_date(entry.date)
            ],
        )?;
        let id = self.tx.last_insert_rowid();
        info!(entry_id = id, user_id = entry.user_id, "added entry");
        self.get_entry(id)
    }

    pub fn get_entry(&self, id: i64) -> Result<Entry> {
        self.tx
            .query_row(
                "SELECT id, user_id, food, calories, date FROM entries WHERE id = ?1",
                params![id],
                Self::entry_from_row,
            )
            .optional()?
            .ok_or_else(|| DietError::not_found("entry", id))
    }

    pub fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let date = filter.date.map(format_date);
        let mut stmt = self.tx.prepare(
            "SELECT id, user_id, food, calories, date FROM entries
             WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR date = ?2)
             ORDER BY id",
        )?;
        let entries = stmt
            .query_map(params![filter.user_id, date], Self::entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn delete_entry(&self, id: i64) -> Result<Entry> {
        let entry = self.get_entry(id)?;
        self.tx
            .execute("DELETE FROM entries WHERE id = ?1", params![id])?;
        info!(entry_id = id, "deleted entry");
        Ok(entry)
    }

    // --- Goals ---

    pub fn create_goal(&self, goal: &NewGoal) -> Result<Goal> {
        validate_goal(goal.daily, goal.weekly)?;
        self.get_user(goal.user_id)?;
        if let Some(existing) = self.goal_for_user(goal.user_id)? {
            return Err(DietError::Conflict(format!(
                "User {} already has a goal (id={}). Delete it first if you want to update",
                goal.user_id, existing.id
            )));
        }
        self.tx.execute(
            "INSERT INTO goals (user_id, daily, weekly) VALUES (?1, ?2, ?3)",
            params![goal.user_id, goal.daily, goal.weekly],
        )?;
        let id = self.tx.last_insert_rowid();
        info!(goal_id = id, user_id = goal.user_id, "created goal");
        self.get_goal(id)
    }

    pub fn get_goal(&self, id: i64) -> Result<Goal> {
        self.tx
            .query_row(
                "SELECT id, user_id, daily, weekly FROM goals WHERE id = ?1",
                params![id],
                Self::goal_from_row,
            )
            .optional()?
            .ok_or_else(|| DietError::not_found("goal", id))
    }

    pub fn goal_for_user(&self, user_id: i64) -> Result<Option<Goal>> {
        Ok(self
            .tx
            .query_row(
                "SELECT id, user_id, daily, weekly FROM goals WHERE user_id = ?1 ORDER BY id LIMIT 1",
                params![user_id],
                Self::goal_from_row,
            )
            .optional()?)
    }

    pub fn list_goals(&self, user_id: Option<i64>) -> Result<Vec<Goal>> {
        let mut stmt = self.tx.prepare(
            "SELECT id, user_id, daily, weekly FROM goals
             WHERE (?1 IS NULL OR user_id = ?1)
             ORDER BY id",
        )?;
        let goals = stmt
            .query_map(params![user_id], Self::goal_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(goals)
    }

    pub fn delete_goal(&self, id: i64) -> Result<Goal> {
        let goal = self.get_goal(id)?;
        self.tx
            .execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        info!(goal_id = id, "deleted goal");
        Ok(goal)
    }

    // --- Meal Plans ---

    pub fn add_meal_plan(&self, plan: &NewMealPlan) -> Result<MealPlan> {
        validate_week(plan.week)?;
        self.get_user(plan.user_id)?;
        if self.unique_meal_plans {
            let existing = self.list_meal_plans(&MealPlanFilter {
                user_id: Some(plan.user_id),
                week: Some(plan.week),
            })?;
            if let Some(existing) = existing.first() {
                return Err(DietError::Conflict(format!(
                    "User {} already has a meal plan for week {} (id={})",
                    plan.user_id, plan.week, existing.id
                )));
            }
        }
        self.tx.execute(
            "INSERT INTO meal_plans (user_id, week, plan_details) VALUES (?1, ?2, ?3)",
            params![plan.user_id, plan.week, plan.plan_details],
        )?;
        let id = self.tx.last_insert_rowid();
        info!(meal_plan_id = id, user_id = plan.user_id, week = plan.week, "added meal plan");
        self.get_meal_plan(id)
    }

    pub fn get_meal_plan(&self, id: i64) -> Result<MealPlan> {
        self.tx
            .query_row(
                "SELECT id, user_id, week, plan_details FROM meal_plans WHERE id = ?1",
                params![id],
                Self::meal_plan_from_row,
            )
            .optional()?
            .ok_or_else(|| DietError::not_found("meal plan", id))
    }

    pub fn list_meal_plans(&self, filter: &MealPlanFilter) -> Result<Vec<MealPlan>> {
        let mut stmt = self.tx.prepare(
            "SELECT id, user_id, week, plan_details FROM meal_plans
             WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR week = ?2)
             ORDER BY week, id",
        )?;
        let plans = stmt
            .query_map(params![filter.user_id, filter.week], Self::meal_plan_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(plans)
    }

    pub fn delete_meal_plan(&self, id: i64) -> Result<MealPlan> {
        let plan = self.get_meal_plan(id)?;
        self.tx
            .execute("DELETE FROM meal_plans WHERE id = ?1", params![id])?;
        info!(meal_plan_id = id, "deleted meal plan");
        Ok(plan)
    }

    // --- Reports ---

    pub fn get_report(&self, id: i64) -> Result<Report> {
        self.tx
            .query_row(
                "SELECT id, user_id, report_date, total_calories FROM reporting WHERE id = ?1",
                params![id],
                Self::report_from_row,
            )
            .optional()?
            .ok_or_else(|| DietError::not_found("report", id))
    }

    pub fn list_reports(&self, user_id: Option<i64>) -> Result<Vec<Report>> {
        let mut stmt = self.tx.prepare(
            "SELECT id, user_id, report_date, total_calories FROM reporting
             WHERE (?1 IS NULL OR user_id = ?1)
             ORDER BY report_date, id",
        )?;
        let reports = stmt
            .query_map(params![user_id], Self::report_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reports)
    }

    pub fn delete_report(&self, id: i64) -> Result<Report> {
        let report = self.get_report(id)?;
        self.tx
            .execute("DELETE FROM reporting WHERE id = ?1", params![id])?;
        info!(report_id = id, "deleted report");
        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        db
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn entry(user_id: i64, food: &str, calories: i64, date: NaiveDate) -> NewEntry {
        NewEntry {
            user_id,
            food: food.to_string(),
            calories,
            date,
        }
    }

    #[test]
    fn test_init_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.is_initialized().unwrap());
        assert!(db.init().unwrap());
        assert!(db.is_initialized().unwrap());
        assert!(!db.init().unwrap());
    }

    #[test]
    fn test_session_requires_init() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(matches!(db.session(), Err(DietError::NotInitialized)));
    }

    #[test]
    fn test_open_file_creates_parent_dir() {
        let dir = std::env::temp_dir().join(format!("dietlog-db-test-{}", std::process::id()));
        let path = dir.join("nested").join("test.db");
        let config = StoreConfig {
            db_path: path.clone(),
            unique_meal_plans: false,
        };
        let db = Database::open(&config).unwrap();
        assert!(db.init().unwrap());
        assert!(path.exists());
        drop(db);

        // Reopening sees the existing schema
        let db = Database::open(&config).unwrap();
        assert!(db.is_initialized().unwrap());
        drop(db);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_create_and_list_users() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let alice = s.create_user("Alice").unwrap();
        let bob = s.create_user("Bob").unwrap();
        assert_eq!(alice.name, "Alice");
        assert_ne!(alice.id, bob.id);

        let users = s.list_users().unwrap();
        assert_eq!(users, vec![alice.clone(), bob]);
        assert_eq!(s.get_user(alice.id).unwrap(), alice);
    }

    #[test]
    fn test_create_user_duplicate_name_conflicts() {
        let mut db = test_db();
        let s = db.session().unwrap();
        s.create_user("Alice").unwrap();
        let err = s.create_user("Alice").unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(
            s.list_users()
                .unwrap()
                .iter()
                .filter(|u| u.name == "Alice")
                .count(),
            1
        );
    }

    #[test]
    fn test_create_user_blank_name_rejected() {
        let mut db = test_db();
        let s = db.session().unwrap();
        assert!(s.create_user("   ").unwrap_err().is_validation());
        assert!(s.list_users().unwrap().is_empty());
    }

    #[test]
    fn test_get_user_not_found() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let err = s.get_user(42).unwrap_err();
        assert!(matches!(
            err,
            DietError::NotFound {
                entity: "user",
                id: 42
            }
        ));
    }

    #[test]
    fn test_add_entry_requires_user() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let err = s.add_entry(&entry(99, "Salad", 300, day(1))).unwrap_err();
        assert!(err.is_not_found());
        assert!(s.list_entries(&EntryFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_add_entry_rejects_negative_calories() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let user = s.create_user("Alice").unwrap();
        let err = s.add_entry(&entry(user.id, "Salad", -1, day(1))).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_list_entries_filters() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let alice = s.create_user("Alice").unwrap();
        let bob = s.create_user("Bob").unwrap();

        let salad = s.add_entry(&entry(alice.id, "Salad", 300, day(1))).unwrap();
        s.add_entry(&entry(alice.id, "Soup", 150, day(2))).unwrap();
        s.add_entry(&entry(bob.id, "Pizza", 800, day(1))).unwrap();

        assert_eq!(s.list_entries(&EntryFilter::default()).unwrap().len(), 3);

        let by_user = s
            .list_entries(&EntryFilter {
                user_id: Some(alice.id),
                date: None,
            })
            .unwrap();
        assert_eq!(by_user.len(), 2);

        let by_date = s
            .list_entries(&EntryFilter {
                user_id: None,
                date: Some(day(1)),
            })
            .unwrap();
        assert_eq!(by_date.len(), 2);

        let both = s
            .list_entries(&EntryFilter {
                user_id: Some(alice.id),
                date: Some(day(1)),
            })
            .unwrap();
        assert_eq!(both, vec![salad]);

        let none = s
            .list_entries(&EntryFilter {
                user_id: Some(alice.id),
                date: Some(day(9)),
            })
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_multiple_entries_same_day_allowed() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let user = s.create_user("Alice").unwrap();
        s.add_entry(&entry(user.id, "Salad", 300, day(1))).unwrap();
        s.add_entry(&entry(user.id, "Salad", 300, day(1))).unwrap();
        let entries = s
            .list_entries(&EntryFilter {
                user_id: Some(user.id),
                date: Some(day(1)),
            })
            .unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_delete_entry() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let user = s.create_user("Alice").unwrap();
        let e = s.add_entry(&entry(user.id, "Salad", 300, day(1))).unwrap();

        assert_eq!(s.delete_entry(e.id).unwrap(), e);
        // Deleting again is not found
        assert!(s.delete_entry(e.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_goal_singleton_per_user() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let user = s.create_user("Alice").unwrap();
        let new_goal = NewGoal {
            user_id: user.id,
            daily: 2000,
            weekly: 14000,
        };

        let goal = s.create_goal(&new_goal).unwrap();
        assert_eq!(goal.daily, 2000);
        assert!(s.create_goal(&new_goal).unwrap_err().is_conflict());

        s.delete_goal(goal.id).unwrap();
        let again = s.create_goal(&new_goal).unwrap();
        assert_ne!(again.id, goal.id);
        assert_eq!(s.goal_for_user(user.id).unwrap(), Some(again));
    }

    #[test]
    fn test_goal_requires_user() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let err = s
            .create_goal(&NewGoal {
                user_id: 5,
                daily: 2000,
                weekly: 14000,
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_goal_not_found() {
        let mut db = test_db();
        let s = db.session().unwrap();
        assert!(s.delete_goal(1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_goals_by_user() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let alice = s.create_user("Alice").unwrap();
        let bob = s.create_user("Bob").unwrap();
        for user in [&alice, &bob] {
            s.create_goal(&NewGoal {
                user_id: user.id,
                daily: 2000,
                weekly: 14000,
            })
            .unwrap();
        }
        assert_eq!(s.list_goals(None).unwrap().len(), 2);
        let bobs = s.list_goals(Some(bob.id)).unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].user_id, bob.id);
    }

    #[test]
    fn test_meal_plans_allow_duplicates_by_default() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let user = s.create_user("Alice").unwrap();
        let plan = NewMealPlan {
            user_id: user.id,
            week: 3,
            plan_details: "Oats, salad, fish".to_string(),
        };
        s.add_meal_plan(&plan).unwrap();
        s.add_meal_plan(&plan).unwrap();
        let plans = s
            .list_meal_plans(&MealPlanFilter {
                user_id: Some(user.id),
                week: Some(3),
            })
            .unwrap();
        assert_eq!(plans.len(), 2);
    }

    #[test]
    fn test_meal_plans_unique_when_configured() {
        let mut db = test_db().with_unique_meal_plans(true);
        let s = db.session().unwrap();
        let user = s.create_user("Alice").unwrap();
        let plan = NewMealPlan {
            user_id: user.id,
            week: 3,
            plan_details: "Oats".to_string(),
        };
        s.add_meal_plan(&plan).unwrap();
        assert!(s.add_meal_plan(&plan).unwrap_err().is_conflict());

        // A different week is still fine
        s.add_meal_plan(&NewMealPlan { week: 4, ..plan }).unwrap();
    }

    #[test]
    fn test_meal_plan_validation() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let user = s.create_user("Alice").unwrap();
        let err = s
            .add_meal_plan(&NewMealPlan {
                user_id: user.id,
                week: 0,
                plan_details: String::new(),
            })
            .unwrap_err();
        assert!(err.is_validation());

        let err = s
            .add_meal_plan(&NewMealPlan {
                user_id: user.id + 1,
                week: 1,
                plan_details: String::new(),
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_meal_plan() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let user = s.create_user("Alice").unwrap();
        let plan = s
            .add_meal_plan(&NewMealPlan {
                user_id: user.id,
                week: 1,
                plan_details: "Soup".to_string(),
            })
            .unwrap();
        assert_eq!(s.delete_meal_plan(plan.id).unwrap(), plan);
        assert!(s.delete_meal_plan(plan.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_user_cascades() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let alice = s.create_user("Alice").unwrap();
        let bob = s.create_user("Bob").unwrap();

        s.add_entry(&entry(alice.id, "Salad", 300, day(1))).unwrap();
        s.add_entry(&entry(alice.id, "Soup", 150, day(1))).unwrap();
        s.add_entry(&entry(bob.id, "Pizza", 800, day(1))).unwrap();
        s.create_goal(&NewGoal {
            user_id: alice.id,
            daily: 2000,
            weekly: 14000,
        })
        .unwrap();
        s.add_meal_plan(&NewMealPlan {
            user_id: alice.id,
            week: 1,
            plan_details: "Oats".to_string(),
        })
        .unwrap();
        s.generate_report(alice.id, day(1)).unwrap();

        let deleted = s.delete_user(alice.id).unwrap();
        assert_eq!(deleted.user, alice);
        assert_eq!(
            deleted.removed,
            CascadeSummary {
                entries: 2,
                goals: 1,
                meal_plans: 1,
                reports: 1,
            }
        );

        assert_eq!(s.list_users().unwrap(), vec![bob.clone()]);
        let remaining = s.list_entries(&EntryFilter::default()).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id, bob.id);
        assert!(s.list_goals(Some(alice.id)).unwrap().is_empty());
        assert!(
            s.list_meal_plans(&MealPlanFilter {
                user_id: Some(alice.id),
                week: None
            })
            .unwrap()
            .is_empty()
        );
        assert!(s.list_reports(Some(alice.id)).unwrap().is_empty());
    }

    #[test]
    fn test_delete_user_not_found() {
        let mut db = test_db();
        let s = db.session().unwrap();
        assert!(s.delete_user(1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_uncommitted_session_rolls_back() {
        let mut db = test_db();
        {
            let s = db.session().unwrap();
            s.create_user("Alice").unwrap();
            // dropped without commit
        }
        let s = db.session().unwrap();
        assert!(s.list_users().unwrap().is_empty());
    }

    #[test]
    fn test_committed_session_persists() {
        let mut db = test_db();
        let s = db.session().unwrap();
        s.create_user("Alice").unwrap();
        s.commit().unwrap();

        let s = db.session().unwrap();
        assert_eq!(s.list_users().unwrap().len(), 1);
        s.rollback().unwrap();
    }

    #[test]
    fn test_schema_rejects_negative_values() {
        let mut db = test_db();
        let s = db.session().unwrap();
        let user = s.create_user("Alice").unwrap();

        let goal = s.tx.execute(
            "INSERT INTO goals (user_id, daily, weekly) VALUES (?1, -1, 14000)",
            params![user.id],
        );
        assert!(matches!(goal, Err(rusqlite::Error::SqliteFailure(..))));
        let goal = s.tx.execute(
            "INSERT INTO goals (user_id, daily, weekly) VALUES (?1, 2000, -5)",
            params![user.id],
        );
        assert!(matches!(goal, Err(rusqlite::Error::SqliteFailure(..))));

        let entry = s.tx.execute(
            "INSERT INTO entries (user_id, food, calories, date) VALUES (?1, 'Salad', -1, '2024-01-01')",
            params![user.id],
        );
        assert!(matches!(entry, Err(rusqlite::Error::SqliteFailure(..))));
        assert!(s.list_goals(None).unwrap().is_empty());
    }

    #[test]
    fn test_delete_report_not_found() {
        let mut db = test_db();
        let s = db.session().unwrap();
        assert!(s.delete_report(3).unwrap_err().is_not_found());
    }
}
