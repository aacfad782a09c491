pub mod app;
pub mod config;
pub mod errors;
pub mod genesis;
pub mod query;

pub use app::Application;
pub use config::AppConfig;
pub use errors::AppError;
pub use genesis::{Genesis, GenesisAccount};
pub use query::{handle_query, QueryRequest, QueryResponse};
