/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - directory, token validator, authenticator 群, GraphQL schema, 実行環境
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::config::AppEnv;
use crate::graphql::Schema;
use crate::repos::Directory;
use crate::services::auth::{AuthHandler, TokenValidator};

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn Directory>,
    pub validator: Arc<dyn TokenValidator>,
    pub auth: Arc<AuthHandler>,
    pub schema: Arc<Schema>,
    pub app_env: AppEnv,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn Directory>,
        validator: Arc<dyn TokenValidator>,
        auth: Arc<AuthHandler>,
        schema: Arc<Schema>,
        app_env: AppEnv,
    ) -> Self {
        Self {
            directory,
            validator,
            auth,
            schema,
            app_env,
        }
    }
}
