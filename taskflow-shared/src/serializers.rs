/// Payload types for the external request/response layer
///
/// The HTTP API surface lives outside this crate; it consumes these serde
/// shapes. Payloads flatten relations the way clients expect them: tasks
/// carry their documents and a count, projects carry their tasks plus
/// total/completed counts and the owner's username, and the settings
/// payload merges the profile's notification flag onto the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::document::Document;
use crate::models::profile::UserProfile;
use crate::models::project::Project;
use crate::models::task::{Task, TaskPriority};
use crate::models::user::User;

/// Document as exposed to API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPayload {
    /// Document ID
    pub id: Uuid,

    /// Original file name
    pub file_name: String,

    /// Absolute URL clients download the file from
    pub file_url: String,

    /// File size in bytes
    pub file_size: i64,

    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,

    /// Owning task
    pub task_id: Uuid,
}

impl DocumentPayload {
    /// Builds a payload from a document row and the media base URL
    pub fn from_document(document: &Document, media_url: &str) -> Self {
        let file_url = format!(
            "{}/{}",
            media_url.trim_end_matches('/'),
            document.file_path
        );

        DocumentPayload {
            id: document.id,
            file_name: document.file_name.clone(),
            file_url,
            file_size: document.file_size,
            uploaded_at: document.uploaded_at,
            task_id: document.task_id,
        }
    }
}

/// Task as exposed to API clients, with its documents attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPayload {
    /// Task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Description
    pub description: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last-update timestamp
    pub updated_at: DateTime<Utc>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Priority
    pub priority: TaskPriority,

    /// Completion flag
    pub is_completed: bool,

    /// Whether a due-date reminder has been delivered
    pub notification_sent: bool,

    /// Owning project
    pub project_id: Uuid,

    /// Attached documents, newest first
    pub documents: Vec<DocumentPayload>,

    /// Number of attached documents
    pub documents_count: usize,
}

/// Project as exposed to API clients, with its tasks attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPayload {
    /// Project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Description
    pub description: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Owner's username
    pub owner: String,

    /// Tasks in the project, newest first
    pub tasks: Vec<TaskPayload>,

    /// Total number of tasks
    pub tasks_count: usize,

    /// Number of completed tasks
    pub completed_tasks_count: usize,
}

/// Account settings as exposed to API clients
///
/// The profile's notification flag is flattened onto the user; a missing
/// profile reads as notifications enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettingsPayload {
    /// User ID
    pub id: Uuid,

    /// Login name
    pub username: String,

    /// Email address
    pub email: String,

    /// Notification preference
    pub email_notifications_enabled: bool,
}

impl UserSettingsPayload {
    /// Builds a settings payload from a user and its (optional) profile
    pub fn from_parts(user: &User, profile: Option<&UserProfile>) -> Self {
        UserSettingsPayload {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            email_notifications_enabled: profile
                .map(|p| p.email_notifications_enabled)
                .unwrap_or(true),
        }
    }
}

/// Loads a task payload with its documents
///
/// # Errors
///
/// Returns an error on database failure
pub async fn task_payload(
    pool: &PgPool,
    task: &Task,
    media_url: &str,
) -> Result<TaskPayload, sqlx::Error> {
    let documents = Document::list_by_task(pool, task.id).await?;
    let documents: Vec<DocumentPayload> = documents
        .iter()
        .map(|d| DocumentPayload::from_document(d, media_url))
        .collect();

    Ok(TaskPayload {
        id: task.id,
        title: task.title.clone(),
        description: task.description.clone(),
        created_at: task.created_at,
        updated_at: task.updated_at,
        due_date: task.due_date,
        priority: task.priority,
        is_completed: task.is_completed,
        notification_sent: task.notification_sent,
        project_id: task.project_id,
        documents_count: documents.len(),
        documents,
    })
}

/// Loads a project payload with its tasks and their documents
///
/// # Errors
///
/// Returns an error on database failure
pub async fn project_payload(
    pool: &PgPool,
    project: &Project,
    media_url: &str,
) -> Result<ProjectPayload, sqlx::Error> {
    let owner = User::find_by_id(pool, project.owner_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_default();

    let task_rows = Task::list_by_project(pool, project.id).await?;
    let mut tasks = Vec::with_capacity(task_rows.len());
    for task in &task_rows {
        tasks.push(task_payload(pool, task, media_url).await?);
    }

    let completed_tasks_count = tasks.iter().filter(|t| t.is_completed).count();

    Ok(ProjectPayload {
        id: project.id,
        name: project.name.clone(),
        description: project.description.clone(),
        created_at: project.created_at,
        owner,
        tasks_count: tasks.len(),
        completed_tasks_count,
        tasks,
    })
}

/// Loads the settings payload for a user
///
/// # Returns
///
/// None if the user does not exist
pub async fn user_settings_payload(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<UserSettingsPayload>, sqlx::Error> {
    let user = match User::find_by_id(pool, user_id).await? {
        Some(user) => user,
        None => return Ok(None),
    };

    let profile = UserProfile::find_by_user(pool, user_id).await?;

    Ok(Some(UserSettingsPayload::from_parts(&user, profile.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_document() -> Document {
        Document {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            file_name: "notes.pdf".to_string(),
            file_path: "documents/2025_06_01/20250601_120000_abcd1234_notes.pdf".to_string(),
            file_hash: "deadbeef".to_string(),
            file_size: 1024,
            uploaded_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_document_payload_file_url() {
        let doc = sample_document();

        let payload = DocumentPayload::from_document(&doc, "https://media.example.com");
        assert_eq!(
            payload.file_url,
            "https://media.example.com/documents/2025_06_01/20250601_120000_abcd1234_notes.pdf"
        );

        // Trailing slash on the base URL does not double up
        let payload = DocumentPayload::from_document(&doc, "https://media.example.com/");
        assert!(!payload.file_url.contains("com//documents"));
    }

    #[test]
    fn test_user_settings_defaults_to_enabled_without_profile() {
        let user = sample_user();

        let payload = UserSettingsPayload::from_parts(&user, None);
        assert!(payload.email_notifications_enabled);
    }

    #[test]
    fn test_user_settings_reflects_profile() {
        let user = sample_user();
        let profile = UserProfile {
            id: Uuid::new_v4(),
            user_id: user.id,
            email_notifications_enabled: false,
        };

        let payload = UserSettingsPayload::from_parts(&user, Some(&profile));
        assert!(!payload.email_notifications_enabled);
        assert_eq!(payload.username, "ada");
    }
}
