mod common;

use common::{FakeDriver, NodeSpec};
use std::time::Duration;
use tokio::time::Instant;
use vigil_common::Locator;
use vigil_common::config::WaitSettings;
use vigil_engine::condition::Condition;
use vigil_engine::wait::{Deadline, WaitError, WaitOutcome, Waiter};

fn waiter() -> Waiter {
    Waiter::new(common::fast_config().waits)
}

#[tokio::test(start_paused = true)]
async fn test_condition_met_after_element_appears() {
    let driver = FakeDriver::new();
    driver.schedule(Duration::from_millis(350), |page| {
        page.add(Locator::id("email"), NodeSpec::new());
    });

    let start = Instant::now();
    let outcome = waiter()
        .until(&driver, &Condition::visible(Locator::id("email")))
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::Met);
    assert_eq!(start.elapsed(), Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_bounded_by_deadline() {
    let driver = FakeDriver::new();
    let start = Instant::now();
    let outcome = waiter()
        .until(&driver, &Condition::visible(Locator::id("never")))
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert_eq!(start.elapsed(), Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_optional_wait_uses_shorter_budget() {
    let driver = FakeDriver::new();
    let start = Instant::now();
    let outcome = waiter()
        .until_optional(&driver, &Condition::visible(Locator::css(".message.error")))
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert_eq!(start.elapsed(), Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_require_reports_timeout() {
    let driver = FakeDriver::new();
    let w = waiter();
    let err = w
        .require(
            &driver,
            &Condition::visible(Locator::id("never")),
            Deadline::after(Duration::from_millis(300)),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WaitError::Timeout {
            condition: "visible(id=never)".into(),
            waited: Duration::from_millis(300),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_unexpected_error_aborts_wait() {
    let driver = FakeDriver::new();
    driver.page().broken = Some("session deleted".into());
    let start = Instant::now();
    let result = waiter()
        .until(&driver, &Condition::visible(Locator::id("email")))
        .await;
    assert!(result.is_err());
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_until_stale_sees_rerender() {
    let driver = FakeDriver::new();
    let item = driver.add(Locator::css(".product-item"), NodeSpec::new());
    let w = Waiter::new(WaitSettings::default());
    let old = vigil_engine::driver::Driver::find_element(&driver, &Locator::css(".product-item"))
        .await
        .unwrap();
    driver.schedule(Duration::from_millis(600), move |page| page.remove(item));

    let outcome = w
        .until_stale(&driver, &old, Deadline::after(Duration::from_secs(5)))
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::Met);
}
