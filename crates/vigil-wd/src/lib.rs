//! WebDriver-backed [`Driver`](vigil_engine::driver::Driver) for real browsers.

pub mod driver;
pub mod error_mapping;
pub mod webdriver;

pub use driver::WebDriverDriver;
pub use webdriver::WebDriverClient;
