//! Page objects and workflows for the demo Magento storefront.

pub mod account;
pub mod cart;
pub mod create_account;
pub mod customer;
pub mod error;
pub mod header;
pub mod identities;
pub mod locators;
pub mod product_detail;
pub mod product_list;
pub mod sign_in;
pub mod workflows;

pub use account::AccountPage;
pub use cart::CartPage;
pub use create_account::CreateAccountPage;
pub use customer::Customer;
pub use error::StepError;
pub use header::Header;
pub use product_detail::ProductDetailPage;
pub use product_list::{ProductListPage, ProductTile, SortDirection};
pub use sign_in::SignInPage;
