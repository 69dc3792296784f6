pub mod config;
pub mod error;
pub mod locator;
pub mod outcome;
pub mod parse;

pub use error::{BusinessError, DriverError};
pub use locator::Locator;
pub use outcome::{ActionOutcome, PermanentKind, TransientKind};
