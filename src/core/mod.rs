mod args;
mod error;
mod logger;

pub use args::CliArgs;
pub use error::RestplateError;
pub use logger::setup_logging;
