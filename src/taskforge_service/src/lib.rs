pub mod api_service;
pub mod helpers;
pub mod sweeper;
pub mod telemetry;

pub use api_service::ApiService;
pub use helpers::{configure_postgresql, get_postgres_pool};
pub use sweeper::spawn_session_sweeper;
pub use telemetry::init_tracing;
