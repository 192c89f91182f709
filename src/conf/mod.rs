mod config;
mod database;
mod resource;
mod server;

pub use config::Config;
pub use database::DatabaseConfig;
pub use resource::{FieldConfig, FieldKind, ResourceConfig};
pub use server::{AuthConfig, CorsConfig, ServerConfig};
