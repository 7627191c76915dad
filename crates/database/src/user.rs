//! User CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Create a new user with default counters and no language preference.
///
/// Bumps the total-users analytics counter in the same transaction.
pub async fn create_user(pool: &SqlitePool, id: &str, name: &str) -> Result<User> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO users (id, name)
        VALUES (?, ?)
        "#,
    )
    .bind(id)
    .bind(name)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    sqlx::query("UPDATE analytics SET total_users = total_users + 1 WHERE id = 1")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_user(pool, id).await
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, language, message_count, created_at, last_seen
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Get a user by ID, or None if they have never been seen.
pub async fn find_user(pool: &SqlitePool, id: &str) -> Result<Option<User>> {
    match get_user(pool, id).await {
        Ok(user) => Ok(Some(user)),
        Err(DatabaseError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Set a user's language preference.
pub async fn set_language(pool: &SqlitePool, id: &str, language: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET language = ?
        WHERE id = ?
        "#,
    )
    .bind(language)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Update a user's display name.
pub async fn set_name(pool: &SqlitePool, id: &str, name: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List all users.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, language, message_count, created_at, last_seen
        FROM users
        ORDER BY created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// List the most recently active users.
pub async fn recent_users(pool: &SqlitePool, limit: i64) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, language, message_count, created_at, last_seen
        FROM users
        ORDER BY last_seen DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Count all users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn create_and_get() {
        let db = test_db().await;

        let user = create_user(db.pool(), "+628111", "Sari").await.unwrap();
        assert_eq!(user.id, "+628111");
        assert_eq!(user.name, "Sari");
        assert_eq!(user.language, None);
        assert_eq!(user.message_count, 0);

        let fetched = get_user(db.pool(), "+628111").await.unwrap();
        assert_eq!(fetched, user);
    }

    #[tokio::test]
    async fn duplicate_create_is_already_exists() {
        let db = test_db().await;

        create_user(db.pool(), "+628111", "Sari").await.unwrap();
        let result = create_user(db.pool(), "+628111", "Sari").await;
        assert!(matches!(
            result,
            Err(DatabaseError::AlreadyExists { entity: "User", .. })
        ));
    }

    #[tokio::test]
    async fn language_preference_persists() {
        let db = test_db().await;

        create_user(db.pool(), "+628111", "").await.unwrap();
        set_language(db.pool(), "+628111", "id").await.unwrap();

        let user = get_user(db.pool(), "+628111").await.unwrap();
        assert_eq!(user.language.as_deref(), Some("id"));
    }

    #[tokio::test]
    async fn set_name_updates_the_name() {
        let db = test_db().await;

        create_user(db.pool(), "+628111", "").await.unwrap();
        set_name(db.pool(), "+628111", "Sari").await.unwrap();

        let user = get_user(db.pool(), "+628111").await.unwrap();
        assert_eq!(user.name, "Sari");

        let missing = set_name(db.pool(), "+628999", "Sari").await;
        assert!(matches!(
            missing,
            Err(DatabaseError::NotFound { entity: "User", .. })
        ));
    }

    #[tokio::test]
    async fn find_missing_user_is_none() {
        let db = test_db().await;
        assert!(find_user(db.pool(), "+628999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recent_users_respects_limit() {
        let db = test_db().await;

        for i in 0..5 {
            create_user(db.pool(), &format!("+62811{}", i), "")
                .await
                .unwrap();
        }

        let recent = recent_users(db.pool(), 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(count_users(db.pool()).await.unwrap(), 5);
    }
}
