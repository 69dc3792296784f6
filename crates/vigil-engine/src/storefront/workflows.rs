//! End-to-end storefront journeys built from the page objects.
//!
//! Every journey tags a failure with what it was doing and the URL the
//! browser was on, unless the error already says so.

use super::customer::Customer;
use super::error::StepError;
use super::header::Header;
use super::identities;
use super::locators::create_account as form_fields;
use super::product_detail::ProductDetailPage;
use super::product_list::{ProductListPage, SortDirection};
use crate::action::ActionKind;
use crate::driver::{Driver, last_known_url};
use crate::harness::Harness;
use crate::page::VerifiedPage;
use crate::tracker::{CartReport, CartTracker};
use crate::wait::WaitOutcome;
use tracing::{info, warn};
use vigil_common::BusinessError;

const PRICE_SORT: &str = "Price";

/// Which end of a price-sorted list to pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceExtreme {
    Lowest,
    Highest,
}

fn check(holds: bool, message: impl FnOnce() -> String) -> Result<(), StepError> {
    if holds {
        Ok(())
    } else {
        Err(StepError::Assertion(message()))
    }
}

async fn tagged<D: Driver, T>(
    h: &Harness<D>,
    action: impl Into<String>,
    result: Result<T, StepError>,
) -> Result<T, StepError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => Err(e.in_step(action, &h.driver).await),
    }
}

pub async fn open_home<D: Driver>(h: &Harness<D>) -> Result<VerifiedPage, StepError> {
    let result = async {
        h.open("").await?;
        Ok::<_, StepError>(h.enter(&identities::home()).await?)
    }
    .await;
    tagged(h, "open home page", result).await
}

/// Register `customer` and check the dashboard greets them.
pub async fn register<D: Driver>(h: &Harness<D>, customer: &Customer) -> Result<(), StepError> {
    info!("Registering {}", customer.email);
    let result = async {
        open_home(h).await?;
        let form = Header::new(h).open_create_account().await?;
        let account = form.register(customer).await?;

        let message = account.success_message().await?;
        check(message.contains("Thank you for registering"), || {
            format!("no registration confirmation, banner reads '{}'", message)
        })?;

        let contact = account.contact_info().await?;
        for expected in [&customer.first_name, &customer.last_name, &customer.email] {
            check(contact.contains(expected.as_str()), || {
                format!("contact info '{}' lacks '{}'", contact, expected)
            })?;
        }
        Ok::<_, StepError>(())
    }
    .await;
    tagged(h, format!("register {}", customer.email), result).await?;
    info!("Registered {}", customer.email);
    Ok(())
}

/// Submit the form for an existing customer and expect the storefront to
/// refuse it, leaving the browser on the form.
pub async fn register_duplicate<D: Driver>(
    h: &Harness<D>,
    customer: &Customer,
) -> Result<BusinessError, StepError> {
    let result = async {
        open_home(h).await?;
        let form = Header::new(h).open_create_account().await?;
        form.fill(customer).await?;
        form.submit().await?;
        let refusal = match form.general_error().await? {
            Some(err @ BusinessError::DuplicateAccount(_)) => err,
            Some(other) => {
                return Err(StepError::Assertion(format!(
                    "expected a duplicate-account banner, got: {}",
                    other
                )));
            }
            None => {
                return Err(StepError::Assertion(
                    "no banner after registering an existing email".into(),
                ));
            }
        };
        h.enter(&identities::create_account()).await?;
        Ok::<_, StepError>(refusal)
    }
    .await;
    tagged(h, format!("register {} again", customer.email), result).await
}

/// Submit the empty form and expect every mandatory field to complain.
pub async fn register_empty_form<D: Driver>(
    h: &Harness<D>,
) -> Result<Vec<BusinessError>, StepError> {
    let result = async {
        open_home(h).await?;
        let form = Header::new(h).open_create_account().await?;
        form.submit().await?;

        let mut complaints = Vec::new();
        for field in [
            form_fields::FIRST_NAME,
            form_fields::LAST_NAME,
            form_fields::EMAIL,
            form_fields::PASSWORD,
            form_fields::CONFIRMATION,
        ] {
            match form.field_error(field).await? {
                Some(err) if err.message() == "This is a required field." => complaints.push(err),
                Some(err) => {
                    return Err(StepError::Assertion(format!(
                        "unexpected message for '{}': {}",
                        field,
                        err.message()
                    )));
                }
                None => {
                    return Err(StepError::Assertion(format!(
                        "no validation message for '{}'",
                        field
                    )));
                }
            }
        }
        h.enter(&identities::create_account()).await?;
        Ok::<_, StepError>(complaints)
    }
    .await;
    tagged(h, "submit empty registration form", result).await
}

/// Log in and check the header greets the customer by name.
pub async fn log_in<D: Driver>(h: &Harness<D>, customer: &Customer) -> Result<(), StepError> {
    info!("Logging in as {}", customer.email);
    let result = async {
        open_home(h).await?;
        let sign_in = Header::new(h).open_sign_in().await?;
        sign_in.log_in(&customer.email, &customer.password).await?;

        let header = Header::new(h);
        check(header.is_logged_in().await?, || {
            "header shows no logged-in greeting".to_string()
        })?;
        let welcome = header.welcome_message().await?;
        check(welcome.contains(customer.first_name.as_str()), || {
            format!("welcome '{}' lacks first name", welcome)
        })?;
        check(welcome.contains(customer.last_name.as_str()), || {
            format!("welcome '{}' lacks last name", welcome)
        })?;
        Ok::<_, StepError>(())
    }
    .await;
    tagged(h, format!("log in as {}", customer.email), result).await
}

/// Open a category sorted by price and return the first product's price.
pub async fn first_price_sorted<D: Driver>(
    h: &Harness<D>,
    category: &str,
    direction: SortDirection,
) -> Result<f64, StepError> {
    let result = async {
        h.open(category).await?;
        let mut list = ProductListPage::enter(h).await?;
        list.sort(PRICE_SORT, direction).await?;
        let price = list.first_product_price().await?;
        check(price >= 0.0, || format!("negative first price {}", price))?;
        Ok::<_, StepError>(price)
    }
    .await;
    tagged(h, format!("sort {} by price {:?}", category, direction), result).await
}

/// Search and return the names of the results. At least one result must
/// contain the term.
pub async fn search<D: Driver>(h: &Harness<D>, term: &str) -> Result<Vec<String>, StepError> {
    let result = async {
        open_home(h).await?;
        let results = Header::new(h).search(term).await?;
        let names = results.product_names().await?;
        check(!names.is_empty(), || format!("no results for '{}'", term))?;
        let first = &names[0];
        check(first.to_lowercase().contains(&term.to_lowercase()), || {
            format!("first result '{}' does not mention '{}'", first, term)
        })?;
        Ok::<_, StepError>(names)
    }
    .await;
    tagged(h, format!("search '{}'", term), result).await
}

/// Add the product on `detail` and bring the tracker along.
///
/// The tracker is handed the action outcome and any storefront banner and
/// records the product only when both are clean. The header badge must then
/// catch up.
pub async fn add_to_cart<D: Driver>(
    h: &Harness<D>,
    tracker: &mut CartTracker,
    detail: &ProductDetailPage<'_, D>,
) -> Result<(), StepError> {
    let name = tagged(h, "read product name", detail.name().await).await?;
    let result = async {
        let price = detail.price().await?;
        info!("Adding '{}' ({:.2}) to cart", name, price);

        detail.choose_first_size().await?;
        detail.choose_first_color().await?;

        let outcome = detail.add_to_cart().await;
        if !outcome.is_success() {
            let target = super::locators::product_detail::add_to_cart();
            h.actions
                .escalate(&h.driver, &ActionKind::Click, &target, outcome.clone())
                .await?;
        }
        let banner = detail.business_error().await?;
        if let Some(err) = &banner {
            warn!("'{}' was not added: {}", name, err);
        }
        tracker.record_confirmed(&name, price, &outcome, banner)?;

        let header = Header::new(h);
        match tracker
            .await_count_sync(&h.waiter, &h.driver, &header.counter())
            .await?
        {
            WaitOutcome::Met => {
                info!("Cart badge shows {}", tracker.expected_count());
                Ok::<_, StepError>(())
            }
            WaitOutcome::TimedOut => Err(StepError::CountNotSynced {
                expected: tracker.expected_count(),
                observed: header.cart_count().await.unwrap_or(0),
                url: last_known_url(&h.driver).await,
            }),
        }
    }
    .await;
    tagged(h, format!("add '{}' to cart", name), result).await
}

/// Add the cheapest or the most expensive product of a category.
pub async fn add_extreme_from_category<D: Driver>(
    h: &Harness<D>,
    tracker: &mut CartTracker,
    category: &str,
    extreme: PriceExtreme,
) -> Result<(), StepError> {
    let result = async {
        h.open(category).await?;
        let mut list = ProductListPage::enter(h).await?;
        let detail = match extreme {
            PriceExtreme::Highest => {
                list.sort(PRICE_SORT, SortDirection::Descending).await?;
                list.open_most_expensive().await?
            }
            PriceExtreme::Lowest => {
                list.sort(PRICE_SORT, SortDirection::Ascending).await?;
                list.open_cheapest().await?
            }
        };
        add_to_cart(h, tracker, &detail).await
    }
    .await;
    tagged(h, format!("pick {:?} product in {}", extreme, category), result).await
}

/// Search for a product by its full name and add it.
pub async fn add_searched_product<D: Driver>(
    h: &Harness<D>,
    tracker: &mut CartTracker,
    name: &str,
) -> Result<(), StepError> {
    let result = async {
        open_home(h).await?;
        let results = Header::new(h).search(name).await?;
        check(results.find_product(name).await?.is_some(), || {
            format!("'{}' not among search results", name)
        })?;
        let detail = results.open_product(name).await?;
        add_to_cart(h, tracker, &detail).await
    }
    .await;
    tagged(h, format!("find '{}' by search", name), result).await
}

/// Compare the cart page against the tracker.
pub async fn verify_cart<D: Driver>(
    h: &Harness<D>,
    tracker: &CartTracker,
) -> Result<CartReport, StepError> {
    let result = async {
        check(!tracker.items().is_empty(), || {
            "nothing was added to the cart".to_string()
        })?;
        let cart = Header::new(h).open_cart().await?;
        let snapshot = cart.snapshot().await?;
        Ok::<_, StepError>(tracker.verify(&snapshot, &h.config.verification)?)
    }
    .await;
    let report = tagged(h, "verify cart", result).await?;
    info!(
        "Cart verified: {} item(s), total {:.2}",
        report.total_quantity, report.grand_total
    );
    Ok(report)
}
