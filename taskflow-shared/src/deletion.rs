/// Explicit cascade deletion with stored-file cleanup
///
/// Database rows cascade on delete (documents go with their task, tasks
/// with their project, projects with their owner), but the database knows
/// nothing about the files those documents reference. Deleting a parent
/// entity therefore goes through this module: dependent documents' stored
/// paths are enumerated depth-first and removed from storage (best-effort)
/// before the parent row is deleted and the record cascade fires.
///
/// There are no implicit hooks; callers that delete a task, project, or
/// user directly through the models leak stored files.
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::deletion::delete_task;
/// use taskflow_shared::storage::LocalStorage;
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, task_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let storage = LocalStorage::new("/var/lib/taskflow/media");
/// delete_task(&pool, &storage, task_id).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::documents::remove_stored_file;
use crate::storage::FileStorage;

/// Deletes a task, its documents, and their stored files
///
/// # Returns
///
/// True if the task existed and was deleted, false otherwise
///
/// # Errors
///
/// Returns an error on database failure. Storage cleanup failures are
/// swallowed.
pub async fn delete_task(
    pool: &PgPool,
    storage: &dyn FileStorage,
    task_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let paths: Vec<(String,)> =
        sqlx::query_as("SELECT file_path FROM documents WHERE task_id = $1")
            .bind(task_id)
            .fetch_all(pool)
            .await?;

    for (path,) in &paths {
        remove_stored_file(storage, path).await;
    }

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_id)
        .execute(pool)
        .await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        info!(task_id = %task_id, files_removed = paths.len(), "Task deleted");
    }

    Ok(deleted)
}

/// Deletes a project, its tasks, their documents, and the stored files
///
/// # Returns
///
/// True if the project existed and was deleted, false otherwise
pub async fn delete_project(
    pool: &PgPool,
    storage: &dyn FileStorage,
    project_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let paths: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT d.file_path
        FROM documents d
        JOIN tasks t ON t.id = d.task_id
        WHERE t.project_id = $1
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    for (path,) in &paths {
        remove_stored_file(storage, path).await;
    }

    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(project_id)
        .execute(pool)
        .await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        info!(project_id = %project_id, files_removed = paths.len(), "Project deleted");
    }

    Ok(deleted)
}

/// Deletes a user account and everything it owns
///
/// Removes every stored file reachable through the user's projects, then
/// deletes the user row; projects, tasks, documents, and the profile
/// cascade in the database.
///
/// # Returns
///
/// True if the user existed and was deleted, false otherwise
pub async fn delete_user(
    pool: &PgPool,
    storage: &dyn FileStorage,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let paths: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT d.file_path
        FROM documents d
        JOIN tasks t ON t.id = d.task_id
        JOIN projects p ON p.id = t.project_id
        WHERE p.owner_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    for (path,) in &paths {
        remove_stored_file(storage, path).await;
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        info!(user_id = %user_id, files_removed = paths.len(), "User deleted");
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    // Cascade deletion needs a database; covered in tests/document_tests.rs
}
