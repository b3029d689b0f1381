/*
 * Responsibility
 * - "OauthClient" テーブル向けの読み取り専用 SQLx 操作
 * - Secret は読まない (GraphQL context に載せる必要がない)
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Client {
    #[sqlx(rename = "ID")]
    pub id: i64,
    #[sqlx(rename = "Name")]
    pub name: String,
    #[sqlx(rename = "Identifier")]
    pub identifier: String,
}

pub async fn find_by_identifier(db: &PgPool, identifier: &str) -> RepoResult<Option<Client>> {
    let row = sqlx::query_as::<_, Client>(
        r#"
        SELECT "ID", "Name", "Identifier"
        FROM "OauthClient"
        WHERE "Identifier" = $1
        ORDER BY "ID" ASC
        LIMIT 1
        "#,
    )
    .bind(identifier)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
