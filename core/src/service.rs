use crate::db::{Database, Session, StoreConfig};
use crate::error::Result;
use crate::models::{
    DeletedUser, Entry, EntryFilter, Goal, MealPlan, MealPlanFilter, NewEntry, NewGoal,
    NewMealPlan, Progress, Report, ReportOutcome, User, parse_date,
};

/// One method per user-facing operation. Each call runs in its own unit of
/// work: it commits on success and rolls back on any error.
pub struct DietService {
    db: Database,
}

impl DietService {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let db = Database::open(config)?;
        Ok(Self { db })
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self { db })
    }

    #[must_use]
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    fn with_session<T>(&mut self, op: impl FnOnce(&Session) -> Result<T>) -> Result<T> {
        let session = self.db.session()?;
        let value = op(&session)?;
        session.commit()?;
        Ok(value)
    }

    pub fn init_db(&self) -> Result<bool> {
        self.db.init()
    }

    // --- Users ---

    pub fn create_user(&mut self, name: &str) -> Result<User> {
        self.with_session(|s| s.create_user(name))
    }

    pub fn list_users(&mut self) -> Result<Vec<User>> {
        self.with_session(|s| s.list_users())
    }

    pub fn delete_user(&mut self, user_id: i64) -> Result<DeletedUser> {
        self.with_session(|s| s.delete_user(user_id))
    }

    // --- Entries ---

    pub fn add_entry(
        &mut self,
        user_id: i64,
        food: &str,
        calories: i64,
        date: &str,
    ) -> Result<Entry> {
        let date = parse_date(date)?;
        let entry = NewEntry {
            user_id,
            food: food.to_string(),
            calories,
            date,
        };
        self.with_session(|s| s.add_entry(&entry))
    }

    pub fn list_entries(&mut self, user_id: Option<i64>, date: Option<&str>) -> Result<Vec<Entry>> {
        let date = date.map(parse_date).transpose()?;
        let filter = EntryFilter { user_id, date };
        self.with_session(|s| s.list_entries(&filter))
    }

    pub fn delete_entry(&mut self, entry_id: i64) -> Result<Entry> {
        self.with_session(|s| s.delete_entry(entry_id))
    }

    // --- Goals ---

    pub fn create_goal(&mut self, user_id: i64, daily: i64, weekly: i64) -> Result<Goal> {
        let goal = NewGoal {
            user_id,
            daily,
            weekly,
        };
        self.with_session(|s| s.create_goal(&goal))
    }

    pub fn list_goals(&mut self, user_id: Option<i64>) -> Result<Vec<Goal>> {
        self.with_session(|s| s.list_goals(user_id))
    }

    pub fn delete_goal(&mut self, goal_id: i64) -> Result<Goal> {
        self.with_session(|s| s.delete_goal(goal_id))
    }

    // --- Meal Plans ---

    pub fn add_meal_plan(
        &mut self,
        user_id: i64,
        week: i64,
        plan_details: &str,
    ) -> Result<MealPlan> {
        let plan = NewMealPlan {
            user_id,
            week,
            plan_details: plan_details.to_string(),
        };
        self.with_session(|s| s.add_meal_plan(&plan))
    }

    /// Plans for one user and week; fails when the user does not exist.
    pub fn show_meal_plan(&mut self, user_id: i64, week: i64) -> Result<Vec<MealPlan>> {
        self.with_session(|s| {
            s.get_user(user_id)?;
            s.list_meal_plans(&MealPlanFilter {
                user_id: Some(user_id),
                week: Some(week),
            })
        })
    }

    pub fn delete_meal_plan(&mut self, meal_plan_id: i64) -> Result<MealPlan> {
        self.with_session(|s| s.delete_meal_plan(meal_plan_id))
    }

    // --- Reports ---

    pub fn create_report(&mut self, user_id: i64, date: &str) -> Result<ReportOutcome> {
        let date = parse_date(date)?;
        self.with_session(|s| s.generate_report(user_id, date))
    }

    pub fn list_reports(&mut self, user_id: Option<i64>) -> Result<Vec<Report>> {
        self.with_session(|s| s.list_reports(user_id))
    }

    pub fn delete_report(&mut self, report_id: i64) -> Result<Report> {
        self.with_session(|s| s.delete_report(report_id))
    }

    pub fn progress(&mut self, user_id: i64, date: &str) -> Result<Progress> {
        let date = parse_date(date)?;
        self.with_session(|s| s.progress(user_id, date))
    }
}
