//! How each storefront page is recognized.

use super::locators::{
    account as acc, cart, common, create_account as reg, header, product_detail as pdp,
    product_list as plp, sign_in as login,
};
use crate::condition::Condition;
use crate::page::PageIdentity;

pub fn home() -> PageIdentity {
    PageIdentity::new("Home").signal(Condition::visible(header::search_input()))
}

pub fn sign_in() -> PageIdentity {
    PageIdentity::new("Customer Login")
        .signal(Condition::text_equals(common::page_title(), "Customer Login"))
        .signal(Condition::visible(login::email()))
        .title(common::page_title())
        .error_banner(common::error_banner())
}

pub fn create_account() -> PageIdentity {
    PageIdentity::new("Create New Customer Account")
        .signal(Condition::text_equals(
            common::page_title(),
            "Create New Customer Account",
        ))
        .signal(Condition::visible(reg::field(reg::EMAIL)))
        .title(common::page_title())
        .error_banner(common::error_banner())
}

/// The account dashboard. `came_from` is where a failed attempt leaves the
/// browser, probed to explain the failure.
pub fn account(came_from: PageIdentity) -> PageIdentity {
    PageIdentity::new("My Account")
        .signal(Condition::text_equals(common::page_title(), "My Account"))
        .signal(Condition::visible(acc::contact_info()))
        .excluding(Condition::visible(login::email()))
        .title(common::page_title())
        .probe(came_from)
}

pub fn product_list() -> PageIdentity {
    PageIdentity::new("Product List").signal(Condition::Any(vec![
        Condition::visible(common::page_title()),
        Condition::visible(plp::grid()),
    ]))
}

pub fn product_detail() -> PageIdentity {
    PageIdentity::new("Product Detail")
        .signal(Condition::visible(pdp::title()))
        .signal(Condition::visible(pdp::price()))
}

pub fn shopping_cart() -> PageIdentity {
    PageIdentity::new("Shopping Cart")
        .signal(Condition::text_equals(common::page_title(), "Shopping Cart"))
        .signal(Condition::Any(vec![
            Condition::visible(cart::table()),
            Condition::visible(cart::empty()),
        ]))
}
