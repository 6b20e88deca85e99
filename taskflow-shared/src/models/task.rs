/// Task model and database operations
///
/// This module provides the Task model representing a unit of work within a
/// project, with an optional due date, a priority, and flags tracking
/// completion and reminder delivery.
///
/// # Reminder Flag
///
/// `notification_sent` transitions false → true exactly once, when a
/// reminder email is successfully delivered, and never resets. The
/// notification job selects candidates with
/// [`Task::due_for_notification`] and flips the flag with
/// [`Task::mark_notification_sent`] only after the mail transport accepts
/// the message.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     due_date TIMESTAMPTZ,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     notification_sent BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::models::task::{CreateTask, Task, TaskPriority};
/// use taskflow_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     project_id,
///     title: "Write chapter 3".to_string(),
///     description: String::new(),
///     due_date: None,
///     priority: TaskPriority::High,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Can wait
    Low,

    /// Default priority
    Medium,

    /// Needs attention first
    High,
}

impl TaskPriority {
    /// Converts priority to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Parses priority from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// Task model representing a unit of work within a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Project this task belongs to
    pub project_id: Uuid,

    /// Short task title
    pub title: String,

    /// Free-form description (may be empty)
    pub description: String,

    /// When the task is due (None = no deadline)
    pub due_date: Option<DateTime<Utc>>,

    /// Task priority
    pub priority: TaskPriority,

    /// Whether the task has been completed
    pub is_completed: bool,

    /// Whether a due-date reminder has been delivered for this task
    ///
    /// Set exactly once by the notification job; never reset
    pub notification_sent: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Project this task belongs to
    pub project_id: Uuid,

    /// Short task title
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Task priority (defaults to medium)
    #[serde(default)]
    pub priority: TaskPriority,
}

/// Input for updating a task
///
/// All fields are optional. Only non-None fields will be updated.
/// `due_date` uses a nested Option so callers can clear the deadline
/// (`Some(None)`) as well as set it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New due date (use Some(None) to clear)
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// Update completion flag
    pub is_completed: Option<bool>,
}

/// A task eligible for a due-date reminder, joined with its owner
///
/// Produced by [`Task::due_for_notification`]. The owner's profile is
/// LEFT-JOINed: `notifications_enabled` is None when the user has no
/// profile row, which callers treat as enabled.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationCandidate {
    /// Task ID
    pub task_id: Uuid,

    /// Task title
    pub title: String,

    /// Due date (always set for candidates)
    pub due_date: DateTime<Utc>,

    /// Name of the project the task belongs to
    pub project_name: String,

    /// Owning user's ID
    pub owner_id: Uuid,

    /// Owning user's login name
    pub username: String,

    /// Owning user's email address (may be empty)
    pub email: String,

    /// Owner's notification preference; None when no profile row exists
    pub notifications_enabled: Option<bool>,
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist or the database
    /// operation fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, due_date, priority)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_id, title, description, due_date, priority,
                      is_completed, notification_sent, created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .bind(data.priority)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, due_date, priority,
                   is_completed, notification_sent, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks for a project, newest first
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, due_date, priority,
                   is_completed, notification_sent, created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates a task
    ///
    /// Only non-None fields in `data` will be updated. The `updated_at`
    /// timestamp is automatically set to the current time.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.is_completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_completed = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, project_id, title, description, due_date, priority, is_completed, notification_sent, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(is_completed) = data.is_completed {
            q = q.bind(is_completed);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Selects tasks eligible for a due-date reminder
    ///
    /// Candidates are tasks whose `due_date` falls in `(now, until]`, that
    /// are not completed, and whose reminder has not been sent. Each row is
    /// joined with the owning project, owner, and the owner's profile (LEFT
    /// JOIN, so accounts without a profile still qualify).
    ///
    /// Ordered by due date, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn due_for_notification(
        pool: &PgPool,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<NotificationCandidate>, sqlx::Error> {
        let candidates = sqlx::query_as::<_, NotificationCandidate>(
            r#"
            SELECT t.id AS task_id,
                   t.title,
                   t.due_date,
                   p.name AS project_name,
                   u.id AS owner_id,
                   u.username,
                   u.email,
                   pr.email_notifications_enabled AS notifications_enabled
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            JOIN users u ON u.id = p.owner_id
            LEFT JOIN user_profiles pr ON pr.user_id = u.id
            WHERE t.due_date > $1
              AND t.due_date <= $2
              AND t.is_completed = FALSE
              AND t.notification_sent = FALSE
            ORDER BY t.due_date ASC
            "#,
        )
        .bind(now)
        .bind(until)
        .fetch_all(pool)
        .await?;

        Ok(candidates)
    }

    /// Marks a task's reminder as delivered
    ///
    /// Called by the notification job after the mail transport accepts the
    /// reminder. The WHERE guard keeps the transition one-way.
    ///
    /// # Returns
    ///
    /// True if the flag was flipped, false if the task was missing or
    /// already marked
    pub async fn mark_notification_sent(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET notification_sent = TRUE,
                updated_at = NOW()
            WHERE id = $1 AND notification_sent = FALSE
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts tasks for a project
    pub async fn count_by_project(pool: &PgPool, project_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts completed tasks for a project
    pub async fn count_completed_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks WHERE project_id = $1 AND is_completed = TRUE",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_priority_as_str() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::High.as_str(), "high");
    }

    #[test]
    fn test_task_priority_parse() {
        assert_eq!(TaskPriority::parse("low"), Some(TaskPriority::Low));
        assert_eq!(TaskPriority::parse("medium"), Some(TaskPriority::Medium));
        assert_eq!(TaskPriority::parse("high"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("urgent"), None);
        assert_eq!(TaskPriority::parse(""), None);
    }

    #[test]
    fn test_task_priority_default() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_task_priority_serde_roundtrip() {
        let json = serde_json::to_string(&TaskPriority::High).unwrap();
        assert_eq!(json, "\"high\"");

        let parsed: TaskPriority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, TaskPriority::Low);
    }

    #[test]
    fn test_update_task_default() {
        let update = UpdateTask::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.due_date.is_none());
        assert!(update.priority.is_none());
        assert!(update.is_completed.is_none());
    }
}
