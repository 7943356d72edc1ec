mod dto;
pub mod handlers;
mod mock;
mod repo;

pub use repo::{ConditionFinding, HealthAnalysis};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
