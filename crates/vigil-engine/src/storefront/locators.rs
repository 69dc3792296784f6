//! Where things live on the storefront's pages.

pub mod common {
    use vigil_common::Locator;

    pub fn page_title() -> Locator {
        Locator::css(".page-title span.base")
    }

    pub fn error_banner() -> Locator {
        Locator::css("div[data-ui-id='message-error']")
    }

    pub fn error_message() -> Locator {
        Locator::css(".message.error")
    }

    pub fn success_banner() -> Locator {
        Locator::css("div[data-ui-id='message-success']")
    }
}

pub mod header {
    use vigil_common::Locator;

    pub fn sign_in_link() -> Locator {
        Locator::link_text("Sign In")
    }

    pub fn create_account_link() -> Locator {
        Locator::link_text("Create an Account")
    }

    pub fn search_input() -> Locator {
        Locator::id("search")
    }

    pub fn search_button() -> Locator {
        Locator::css(".action.search[type='submit']")
    }

    pub fn cart_counter() -> Locator {
        Locator::css(".counter.qty .counter-number")
    }

    pub fn cart_empty_marker() -> Locator {
        Locator::css("a.action.showcart .counter.qty.empty")
    }

    pub fn greeting() -> Locator {
        Locator::css(".greet.welcome .logged-in")
    }
}

pub mod sign_in {
    use vigil_common::Locator;

    pub fn email() -> Locator {
        Locator::id("email")
    }

    pub fn password() -> Locator {
        Locator::id("pass")
    }

    pub fn submit() -> Locator {
        Locator::css(".action.login.primary#send2")
    }
}

pub mod create_account {
    use vigil_common::Locator;

    pub const FIRST_NAME: &str = "firstname";
    pub const LAST_NAME: &str = "lastname";
    pub const EMAIL: &str = "email_address";
    pub const PASSWORD: &str = "password";
    pub const CONFIRMATION: &str = "password-confirmation";

    pub fn field(id: &str) -> Locator {
        Locator::id(id)
    }

    /// Inline validation message rendered under a field.
    pub fn field_error(id: &str) -> Locator {
        Locator::id(format!("{}-error", id))
    }

    pub fn submit() -> Locator {
        Locator::css("button.action.submit.primary[title='Create an Account']")
    }
}

pub mod account {
    use vigil_common::Locator;

    pub fn contact_info() -> Locator {
        Locator::css(".box-information .box-content")
    }
}

pub mod product_list {
    use vigil_common::Locator;

    pub fn sorter() -> Locator {
        Locator::id("sorter")
    }

    pub fn direction_switch() -> Locator {
        Locator::css(".toolbar-sorter .sorter-action")
    }

    pub fn grid() -> Locator {
        Locator::css(".products.wrapper.grid")
    }

    pub fn items() -> Locator {
        Locator::css(".product-items .product-item")
    }

    pub fn item_info() -> Locator {
        Locator::css(".product-item-info")
    }

    pub fn item_name() -> Locator {
        Locator::css(".product-item-link")
    }

    pub fn item_price() -> Locator {
        Locator::css(".price-box .price")
    }

    /// The product link with exactly this name.
    pub fn product_link(name: &str) -> Locator {
        Locator::xpath(format!(
            "//a[contains(@class,'product-item-link') and normalize-space(.)={}]",
            xpath_literal(name.trim())
        ))
    }

    fn xpath_literal(text: &str) -> String {
        if !text.contains('\'') {
            format!("'{}'", text)
        } else if !text.contains('"') {
            format!("\"{}\"", text)
        } else {
            let parts: Vec<String> = text.split('\'').map(|p| format!("'{}'", p)).collect();
            format!("concat({})", parts.join(", \"'\", "))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_product_link_quotes() {
            assert_eq!(
                product_link("Wayfarer Messenger Bag").value(),
                "//a[contains(@class,'product-item-link') and normalize-space(.)='Wayfarer Messenger Bag']"
            );
            assert_eq!(
                xpath_literal("Rival's \"Pro\" Tee"),
                "concat('Rival', \"'\", 's \"Pro\" Tee')"
            );
        }
    }
}

pub mod product_detail {
    use vigil_common::Locator;

    pub fn title() -> Locator {
        Locator::css(".page-title-wrapper .base[itemprop='name']")
    }

    pub fn price() -> Locator {
        Locator::css(".product-info-main .price-box .price")
    }

    pub fn add_to_cart() -> Locator {
        Locator::id("product-addtocart-button")
    }

    pub fn size_options() -> Locator {
        Locator::css(".swatch-attribute.size .swatch-option.text")
    }

    pub fn color_options() -> Locator {
        Locator::css(".swatch-attribute.color .swatch-option.color")
    }

    /// A single swatch, addressed by its option id so it can be re-resolved.
    pub fn option(options: &Locator, option_id: &str) -> Locator {
        Locator::css(format!("{}[option-id='{}']", options.value(), option_id))
    }
}

pub mod cart {
    use vigil_common::Locator;

    pub fn table() -> Locator {
        Locator::id("shopping-cart-table")
    }

    pub fn empty() -> Locator {
        Locator::css(".cart.empty")
    }

    pub fn rows() -> Locator {
        Locator::css(".cart.item")
    }

    pub fn row_name() -> Locator {
        Locator::css("td.col.item .product-item-name a")
    }

    pub fn row_price() -> Locator {
        Locator::css("td.col.price .cart-price .price")
    }

    pub fn row_quantity() -> Locator {
        Locator::css("td.col.qty input.qty")
    }

    pub fn row_subtotal() -> Locator {
        Locator::css("td.col.subtotal .cart-price .price")
    }

    pub fn grand_total() -> Locator {
        Locator::css(".grand.totals .price")
    }
}
