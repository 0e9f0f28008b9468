use std::sync::Arc;

use crate::application::auth::AuthService;
use crate::application::items::ItemService;
use crate::application::tokens::TokenService;
use crate::infra::db::SqliteRepositories;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub items: Arc<ItemService>,
    pub tokens: Arc<TokenService>,
    pub db: Arc<SqliteRepositories>,
}
