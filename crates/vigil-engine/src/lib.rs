pub mod action;
pub mod business;
pub mod condition;
pub mod config;
pub mod driver;
pub mod harness;
pub mod page;
pub mod reader;
pub mod session;
pub mod storefront;
pub mod tracker;
pub mod wait;

pub use vigil_common::{
    ActionOutcome, BusinessError, DriverError, Locator, PermanentKind, TransientKind,
};
