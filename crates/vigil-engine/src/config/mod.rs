pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
pub use vigil_common::config::*;
