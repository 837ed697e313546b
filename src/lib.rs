pub mod config;
pub mod email;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

pub use config::Config;
pub use email::Mailer;
pub use error::{AppError, AppResult};
pub use store::{FlightStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FlightStore>,
    pub mailer: Mailer,
    pub config: Config,
}
