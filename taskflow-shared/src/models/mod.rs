/// Database models for TaskFlow
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts
/// - `profile`: Per-user notification settings (one row per account)
/// - `project`: Projects owned by a user
/// - `task`: Tasks within a project, with due dates and priorities
/// - `document`: Files attached to a task
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::models::project::{CreateProject, Project};
/// use taskflow_shared::db::pool::{create_pool, DatabaseConfig};
/// # use uuid::Uuid;
///
/// # async fn example(owner_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create(&pool, CreateProject {
///     owner_id,
///     name: "Thesis".to_string(),
///     description: "Research and writing".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod document;
pub mod profile;
pub mod project;
pub mod task;
pub mod user;
