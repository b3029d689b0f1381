/*
 * Responsibility
 * - Directory (Member / OauthClient の参照) の抽象と PostgreSQL 実装
 * - 認証パイプラインは Directory trait だけに依存する
 */
use async_trait::async_trait;
use sqlx::PgPool;

pub mod client_repo;
pub mod error;
pub mod member_repo;

pub use client_repo::Client;
pub use error::{RepoError, RepoResult};
pub use member_repo::Member;

/// Read-only lookups against the user/client directory.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn find_member_by_email(&self, email: &str) -> RepoResult<Option<Member>>;

    async fn find_client_by_identifier(&self, identifier: &str) -> RepoResult<Option<Client>>;
}

#[derive(Clone, Debug)]
pub struct PgDirectory {
    db: PgPool,
}

impl PgDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn find_member_by_email(&self, email: &str) -> RepoResult<Option<Member>> {
        member_repo::find_by_email(&self.db, email).await
    }

    async fn find_client_by_identifier(&self, identifier: &str) -> RepoResult<Option<Client>> {
        client_repo::find_by_identifier(&self.db, identifier).await
    }
}
