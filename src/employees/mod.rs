mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use repo_types::Employee;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::employee_routes()
}
