mod common;

use common::{ClickReaction, FakeDriver, NodeSpec};
use vigil_common::{ActionOutcome, Locator, PermanentKind, TransientKind};
use vigil_engine::action::{ActionExecutor, ActionKind};
use vigil_engine::wait::Waiter;

fn executor() -> ActionExecutor {
    let config = common::fast_config();
    ActionExecutor::new(
        Waiter::new(config.waits.clone()),
        &config.actions,
        config.security.clone(),
    )
}

fn button() -> Locator {
    Locator::id("product-addtocart-button")
}

#[tokio::test(start_paused = true)]
async fn test_click_succeeds_first_time() {
    let driver = FakeDriver::new();
    driver.add(button(), NodeSpec::new());
    let outcome = executor().click(&driver, &button()).await;
    assert_eq!(outcome, ActionOutcome::Succeeded);
    assert_eq!(driver.clicks(&button()), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stale_twice_gives_up_after_two_attempts() {
    let driver = FakeDriver::new();
    driver.add(button(), NodeSpec::new());
    driver.script_clicks(button(), vec![ClickReaction::Stale, ClickReaction::Stale]);

    let outcome = executor().click(&driver, &button()).await;
    assert_eq!(
        outcome,
        ActionOutcome::TransientFailure(TransientKind::TargetBecameStale)
    );
    assert_eq!(driver.clicks(&button()), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_once_then_succeeds_on_fresh_handle() {
    let driver = FakeDriver::new();
    driver.add(button(), NodeSpec::new());
    driver.script_clicks(button(), vec![ClickReaction::Stale]);

    let outcome = executor().click(&driver, &button()).await;
    assert_eq!(outcome, ActionOutcome::Succeeded);
    assert_eq!(driver.clicks(&button()), 2);
}

#[tokio::test(start_paused = true)]
async fn test_interception_uses_fallback_once() {
    let driver = FakeDriver::new();
    let id = driver.add(button(), NodeSpec::new());
    driver.on_click(id, |page| page.url = "https://shop.test/added".into());
    driver.script_clicks(
        button(),
        vec![ClickReaction::Intercepted(
            "element click intercepted: <div class=\"modal\">".into(),
        )],
    );

    let outcome = executor().click(&driver, &button()).await;
    assert_eq!(outcome, ActionOutcome::Succeeded);
    assert_eq!(driver.clicks(&button()), 1);
    assert_eq!(driver.fallback_activations(), 1);
    assert_eq!(driver.page().url, "https://shop.test/added");
}

#[tokio::test(start_paused = true)]
async fn test_failed_fallback_reports_original_interception() {
    let driver = FakeDriver::new();
    driver.add(button(), NodeSpec::new());
    driver.page().fallback_fails = true;
    let original = "element click intercepted: Other element would receive the click";
    driver.script_clicks(button(), vec![ClickReaction::Intercepted(original.into())]);

    let outcome = executor().click(&driver, &button()).await;
    assert_eq!(
        outcome,
        ActionOutcome::TransientFailure(TransientKind::TargetTemporarilyObscured(
            original.into()
        ))
    );
    assert_eq!(driver.fallback_activations(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unexpected_error_is_not_retried() {
    let driver = FakeDriver::new();
    driver.add(button(), NodeSpec::new());
    driver.script_clicks(button(), vec![ClickReaction::Fail("invalid session id".into())]);

    let outcome = executor().click(&driver, &button()).await;
    assert!(matches!(
        outcome,
        ActionOutcome::PermanentFailure(PermanentKind::UnexpectedException(ref m))
            if m.contains("invalid session id")
    ));
    assert_eq!(driver.clicks(&button()), 1);
    assert_eq!(driver.fallback_activations(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_never_actionable_is_permanent() {
    let driver = FakeDriver::new();
    driver.add(button(), NodeSpec::new().disabled());
    let outcome = executor().click(&driver, &button()).await;
    assert_eq!(
        outcome,
        ActionOutcome::PermanentFailure(PermanentKind::TargetNotFoundAfterDeadline)
    );
    assert_eq!(driver.clicks(&button()), 0);
}

#[tokio::test(start_paused = true)]
async fn test_type_replaces_field_content() {
    let driver = FakeDriver::new();
    driver.add(Locator::id("email"), NodeSpec::new());
    let exec = executor();
    exec.type_text(&driver, &Locator::id("email"), "old@example.com")
        .await;
    let outcome = exec
        .type_text(&driver, &Locator::id("email"), "new@example.com")
        .await;
    assert!(outcome.is_success());
    assert_eq!(
        driver.typed(&Locator::id("email")).as_deref(),
        Some("new@example.com")
    );
}

#[tokio::test(start_paused = true)]
async fn test_select_clicks_matching_option() {
    let driver = FakeDriver::new();
    let sorter = driver.add(Locator::id("sorter"), NodeSpec::new());
    driver.add_child(sorter, Locator::css("option"), NodeSpec::new().text("Position"));
    let price = driver.add_child(sorter, Locator::css("option"), NodeSpec::new().text("Price"));
    driver.on_click(price, |page| {
        page.url = "https://shop.test/bags?product_list_order=price".into()
    });

    let outcome = executor()
        .select(&driver, &Locator::id("sorter"), "price")
        .await;
    assert!(outcome.is_success());
    assert!(driver.page().url.ends_with("product_list_order=price"));
}

#[tokio::test(start_paused = true)]
async fn test_run_escalates_with_context() {
    let driver = FakeDriver::with_url("https://shop.test/checkout/cart/");
    let err = executor()
        .run(&driver, &ActionKind::Click, &Locator::id("missing"))
        .await
        .unwrap_err();
    assert_eq!(err.target, "id=missing");
    assert_eq!(err.url, "https://shop.test/checkout/cart/");
    assert_eq!(
        err.outcome,
        ActionOutcome::PermanentFailure(PermanentKind::TargetNotFoundAfterDeadline)
    );
}

#[tokio::test(start_paused = true)]
async fn test_interception_without_fallback_is_transient() {
    let driver = FakeDriver::new();
    driver.add(button(), NodeSpec::new());
    let message = "element click intercepted: <div class=\"loading-mask\">";
    driver.script_clicks(button(), vec![ClickReaction::Intercepted(message.into())]);

    let mut config = common::fast_config();
    config.actions.fallback_activation = false;
    let executor = ActionExecutor::new(
        Waiter::new(config.waits.clone()),
        &config.actions,
        config.security.clone(),
    );

    let outcome = executor.click(&driver, &button()).await;
    assert_eq!(
        outcome,
        ActionOutcome::TransientFailure(TransientKind::TargetTemporarilyObscured(message.into()))
    );
    assert_eq!(driver.clicks(&button()), 1);
    assert_eq!(driver.fallback_activations(), 0);
}
