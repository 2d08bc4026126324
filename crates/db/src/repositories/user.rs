use crate::models::DbUser;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_user(pool: &Pool<Postgres>, email: &str, name: &str) -> Result<DbUser> {
    let id = Uuid::new_v4();

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, email, name)
        VALUES ($1, $2, $3)
        RETURNING id, email, name, created_at
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Identity lookup backing notification payloads. The booking core never
/// requires this to succeed.
pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, name, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
