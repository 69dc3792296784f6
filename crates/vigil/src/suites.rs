use crate::report::Report;
use std::future::Future;
use vigil_common::config::VigilConfig;
use vigil_engine::harness::Harness;
use vigil_engine::session;
use vigil_engine::storefront::workflows::{self, PriceExtreme};
use vigil_engine::storefront::{Customer, SortDirection, StepError};
use vigil_engine::tracker::CartTracker;
use vigil_wd::{WebDriverClient, WebDriverDriver};

async fn open_session(config: &VigilConfig) -> Result<WebDriverDriver, StepError> {
    let client = WebDriverClient::from_settings(&config.webdriver).await?;
    Ok(WebDriverDriver::new(client))
}

/// Run `body` in a fresh browser session that is closed on every exit path.
async fn in_session<F, Fut>(config: &VigilConfig, mut report: Report, body: F) -> Report
where
    F: FnOnce(Harness<WebDriverDriver>, Report) -> Fut,
    Fut: Future<Output = Report>,
{
    let Some(driver) = report
        .step("Open browser session", open_session(config), |_| {
            config.webdriver.url.clone()
        })
        .await
    else {
        return report;
    };
    let config = config.clone();
    session::scoped(driver, move |driver| body(Harness::new(driver, config), report)).await
}

/// Register a fresh customer, then check the form refuses the same email
/// and an empty submission.
pub async fn register(config: &VigilConfig) -> Report {
    let customer = Customer::generate(&config.storefront.password);

    let first = customer.clone();
    let report = in_session(config, Report::new("register"), move |h, mut report| async move {
        report
            .step("Register new customer", workflows::register(&h, &first), |_| {
                first.email.clone()
            })
            .await;
        report
    })
    .await;

    in_session(config, report, move |h, mut report| async move {
        report
            .step(
                "Reject duplicate email",
                workflows::register_duplicate(&h, &customer),
                |refusal| refusal.message().to_string(),
            )
            .await;
        report
            .step(
                "Require mandatory fields",
                workflows::register_empty_form(&h),
                |complaints| format!("{} field message(s)", complaints.len()),
            )
            .await;
        report
    })
    .await
}

/// Register, then in a second session log in, browse and fill the cart.
pub async fn shop(config: &VigilConfig) -> Report {
    let customer = Customer::generate(&config.storefront.password);
    let storefront = config.storefront.clone();

    let first = customer.clone();
    let report = in_session(config, Report::new("shop"), move |h, mut report| async move {
        report
            .step("Register new customer", workflows::register(&h, &first), |_| {
                first.email.clone()
            })
            .await;
        report
    })
    .await;

    in_session(config, report, move |h, mut report| async move {
        let mut tracker = CartTracker::new();
        let s = &storefront;

        report
            .step("Log in", workflows::log_in(&h, &customer), |_| {
                customer.full_name()
            })
            .await;
        report
            .step(
                "Sort by price ascending",
                workflows::first_price_sorted(&h, &s.ascending_category, SortDirection::Ascending),
                |price| format!("first price {:.2}", price),
            )
            .await;
        report
            .step(
                "Sort by price descending",
                workflows::first_price_sorted(
                    &h,
                    &s.descending_category,
                    SortDirection::Descending,
                ),
                |price| format!("first price {:.2}", price),
            )
            .await;
        report
            .step(
                "Search by partial name",
                workflows::search(&h, &s.partial_search),
                |names| format!("{} result(s)", names.len()),
            )
            .await;
        report
            .step(
                "Search by full name",
                workflows::search(&h, &s.full_search),
                |names| format!("{} result(s)", names.len()),
            )
            .await;
        report
            .step(
                "Add most expensive product",
                workflows::add_extreme_from_category(
                    &h,
                    &mut tracker,
                    &s.min_max_category,
                    PriceExtreme::Highest,
                ),
                |_| String::new(),
            )
            .await;
        report
            .step(
                "Add cheapest product",
                workflows::add_extreme_from_category(
                    &h,
                    &mut tracker,
                    &s.min_max_category,
                    PriceExtreme::Lowest,
                ),
                |_| String::new(),
            )
            .await;
        report
            .step(
                "Add searched product",
                workflows::add_searched_product(&h, &mut tracker, &s.full_search),
                |_| String::new(),
            )
            .await;
        report
            .step("Verify cart", workflows::verify_cart(&h, &tracker), |cart| {
                format!(
                    "{} item(s), grand total {:.2}",
                    cart.total_quantity, cart.grand_total
                )
            })
            .await;
        report
    })
    .await
}
