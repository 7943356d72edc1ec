mod dto;
pub mod handlers;
mod repo;
mod services;

pub use services::AuthUser;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
