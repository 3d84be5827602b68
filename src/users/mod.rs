mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use repo_types::{Role, User};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
