use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
mod memory;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use memory::InMemoryUserStore;
pub use repo::{PgUserStore, UserStore};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
