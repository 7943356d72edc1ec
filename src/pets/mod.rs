mod dto;
pub mod handlers;
mod repo;

pub use repo::{EmergencyContact, Pet, PetNotes, VetContact, VetRecord};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
