pub mod config;
pub mod content;
pub mod response;
pub mod routes;
pub mod state;
pub mod translate;

pub use config::Config;
pub use routes::create_app;
pub use state::AppState;
