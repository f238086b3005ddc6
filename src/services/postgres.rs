use crate::models::{NewStudyGroup, StudyGroup};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl PostgresError {
    /// Map unique-constraint violations to `Conflict`, pass everything else through
    fn from_insert(err: sqlx::Error, what: String) -> Self {
        let unique_violation = matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation());
        if unique_violation {
            PostgresError::Conflict(what)
        } else {
            PostgresError::SqlxError(err)
        }
    }
}

/// PostgreSQL client for study groups and their memberships
///
/// `member_count` on `study_groups` is kept in step with
/// `study_group_members` inside the same transaction as each join or leave.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// List all groups, largest first
    ///
    /// When `user_id` is given, `is_member` is filled in for that user.
    pub async fn list_groups(&self, user_id: Option<&str>) -> Result<Vec<StudyGroup>, PostgresError> {
        let groups = match user_id {
            Some(user_id) => {
                let query = r#"
                    SELECT g.id, g.skill_name, g.name, g.description, g.created_by,
                           g.member_count, g.created_at,
                           EXISTS (
                               SELECT 1 FROM study_group_members m
                               WHERE m.group_id = g.id AND m.user_id = $1
                           ) AS is_member
                    FROM study_groups g
                    ORDER BY g.member_count DESC, g.created_at ASC
                "#;

                sqlx::query_as::<_, StudyGroup>(query)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = r#"
                    SELECT id, skill_name, name, description, created_by,
                           member_count, created_at
                    FROM study_groups
                    ORDER BY member_count DESC, created_at ASC
                "#;

                sqlx::query_as::<_, StudyGroup>(query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        tracing::debug!("Loaded {} study groups", groups.len());

        Ok(groups)
    }

    /// Create a group and enrol its creator
    pub async fn create_group(&self, group: &NewStudyGroup) -> Result<StudyGroup, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let query = r#"
            INSERT INTO study_groups (id, skill_name, name, description, created_by, member_count, created_at)
            VALUES ($1, $2, $3, $4, $5, 1, NOW())
            RETURNING id, skill_name, name, description, created_by, member_count, created_at
        "#;

        let mut created = sqlx::query_as::<_, StudyGroup>(query)
            .bind(Uuid::new_v4())
            .bind(&group.skill_name)
            .bind(&group.name)
            .bind(&group.description)
            .bind(&group.created_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                PostgresError::from_insert(
                    e,
                    format!("A study group for {} already exists", group.skill_name),
                )
            })?;

        sqlx::query("INSERT INTO study_group_members (group_id, user_id, joined_at) VALUES ($1, $2, NOW())")
            .bind(created.id)
            .bind(&group.created_by)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        created.is_member = Some(true);

        tracing::info!(
            "Created study group {} for skill {} (by {})",
            created.id,
            created.skill_name,
            created.created_by
        );

        Ok(created)
    }

    /// Add a user to a group
    pub async fn join_group(&self, group_id: Uuid, user_id: &str) -> Result<(), PostgresError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE study_groups SET member_count = member_count + 1 WHERE id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(PostgresError::NotFound(format!("Study group {}", group_id)));
        }

        sqlx::query("INSERT INTO study_group_members (group_id, user_id, joined_at) VALUES ($1, $2, NOW())")
            .bind(group_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                PostgresError::from_insert(
                    e,
                    format!("User {} is already a member of {}", user_id, group_id),
                )
            })?;

        tx.commit().await?;

        tracing::debug!("User {} joined study group {}", user_id, group_id);

        Ok(())
    }

    /// Remove a user from a group
    ///
    /// Returns false when the user was not a member.
    pub async fn leave_group(&self, group_id: Uuid, user_id: &str) -> Result<bool, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM study_group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if removed.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE study_groups SET member_count = GREATEST(member_count - 1, 0) WHERE id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("User {} left study group {}", user_id, group_id);

        Ok(true)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
