//! The notes store — every query against the `notes` table lives here.
//!
//! One table, three columns, three operations. Each call borrows a pooled
//! connection for exactly one statement; there are no multi-step transactions.

use sqlx::PgPool;

use crate::error::NotedError;
use crate::models::Note;

/// Rejects empty/whitespace-only content and returns the trimmed text.
pub fn validate_content(content: &str) -> Result<&str, NotedError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(NotedError::Validation("content is required".to_string()));
    }
    Ok(trimmed)
}

#[derive(Clone)]
pub struct NoteStore {
    pool: PgPool,
}

impl NoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ensure the notes table exists. Idempotent across restarts.
    pub async fn init_schema(&self) -> Result<(), NotedError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notes (
                id BIGSERIAL PRIMARY KEY,
                content TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All notes, most recent first (id breaks ties between equal timestamps).
    pub async fn list(&self) -> Result<Vec<Note>, NotedError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, content, created_at FROM notes ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    /// Insert a note with trimmed content; id and created_at are assigned by
    /// the database. Fails with `Validation` before touching the pool when the
    /// content is blank after trimming.
    pub async fn create(&self, content: &str) -> Result<Note, NotedError> {
        let trimmed = validate_content(content)?;

        let note = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (content) VALUES ($1) RETURNING id, content, created_at",
        )
        .bind(trimmed)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    /// Remove a note by id. Returns `false` when no row matched.
    pub async fn delete(&self, id: i64) -> Result<bool, NotedError> {
        let deleted: Option<(i64,)> = sqlx::query_as("DELETE FROM notes WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(deleted.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_content_trims_surrounding_whitespace() {
        assert_eq!(validate_content("  hello  ").unwrap(), "hello");
        assert_eq!(validate_content("hello").unwrap(), "hello");
    }

    #[test]
    fn validate_content_rejects_empty() {
        assert!(matches!(
            validate_content(""),
            Err(NotedError::Validation(_))
        ));
    }

    #[test]
    fn validate_content_rejects_whitespace_only() {
        for s in ["   ", "\t", "\n\n", " \t \n "] {
            assert!(
                matches!(validate_content(s), Err(NotedError::Validation(_))),
                "{:?} should be rejected",
                s
            );
        }
    }

    #[test]
    fn validate_content_keeps_interior_whitespace() {
        assert_eq!(validate_content(" a  b ").unwrap(), "a  b");
    }
}
