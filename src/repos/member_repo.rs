/*
 * Responsibility
 * - "Member" テーブル向けの読み取り専用 SQLx 操作
 * - access token の oauth_user_id (= Email) から Member を引く
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Member {
    #[sqlx(rename = "ID")]
    pub id: i64,
    #[sqlx(rename = "Email")]
    pub email: String,
    #[sqlx(rename = "FirstName")]
    pub first_name: Option<String>,
    #[sqlx(rename = "Surname")]
    pub surname: Option<String>,
}

/// First member whose email equals `email`. Several rows may share an email;
/// the lowest id wins.
pub async fn find_by_email(db: &PgPool, email: &str) -> RepoResult<Option<Member>> {
    let row = sqlx::query_as::<_, Member>(
        r#"
        SELECT "ID", "Email", "FirstName", "Surname"
        FROM "Member"
        WHERE "Email" = $1
        ORDER BY "ID" ASC
        LIMIT 1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
