mod common;

use common::{FakeDriver, NodeSpec};
use std::time::Duration;
use vigil_common::config::VerificationSettings;
use vigil_engine::storefront::locators::header;
use vigil_engine::tracker::{CartSnapshot, CartTracker, CounterSignals, ObservedItem};
use vigil_engine::wait::{WaitOutcome, Waiter};

fn counter() -> CounterSignals {
    CounterSignals {
        number: header::cart_counter(),
        empty_marker: header::cart_empty_marker(),
    }
}

fn waiter() -> Waiter {
    Waiter::new(common::fast_config().waits)
}

fn row(name: &str, price: f64, quantity: u32, subtotal: f64) -> ObservedItem {
    ObservedItem {
        name: name.into(),
        unit_price: price,
        quantity,
        subtotal,
    }
}

#[tokio::test(start_paused = true)]
async fn test_empty_cart_synced_by_empty_marker() {
    let driver = FakeDriver::new();
    driver.add(header::cart_empty_marker(), NodeSpec::new());
    driver.add(header::cart_counter(), NodeSpec::new().text("0"));
    let tracker = CartTracker::new();
    let outcome = tracker
        .await_count_sync(&waiter(), &driver, &counter())
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::Met);
}

#[tokio::test(start_paused = true)]
async fn test_empty_cart_synced_by_hidden_badge() {
    let driver = FakeDriver::new();
    driver.add(header::cart_counter(), NodeSpec::new().hidden());
    let outcome = CartTracker::new()
        .await_count_sync(&waiter(), &driver, &counter())
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::Met);
}

#[tokio::test(start_paused = true)]
async fn test_badge_catches_up_after_add() {
    let driver = FakeDriver::new();
    let badge = driver.add(header::cart_counter(), NodeSpec::new().text("1"));
    driver.schedule(Duration::from_millis(800), move |page| page.set_text(badge, "2"));

    let mut tracker = CartTracker::new();
    tracker.record_add("Push It Messenger Bag", 45.0);
    tracker.record_add("Wayfarer Messenger Bag", 45.0);
    let outcome = tracker
        .await_count_sync(&waiter(), &driver, &counter())
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::Met);
}

#[tokio::test(start_paused = true)]
async fn test_badge_never_updates() {
    let driver = FakeDriver::new();
    driver.add(header::cart_counter(), NodeSpec::new().text("1"));
    let mut tracker = CartTracker::new();
    tracker.record_add("A", 1.0);
    tracker.record_add("B", 2.0);
    let outcome = tracker
        .await_count_sync(&waiter(), &driver, &counter())
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::TimedOut);
}

#[test]
fn test_final_verification_scenario() {
    let mut tracker = CartTracker::new();
    tracker.record_add("Cassius Sparring Tank", 18.0);
    tracker.record_add("Wayfarer Messenger Bag", 45.0);
    tracker.record_add("Ingrid Running Jacket", 84.0);

    let snapshot = CartSnapshot {
        rows: vec![
            row("Cassius Sparring Tank", 18.0, 1, 18.0),
            row("Wayfarer Messenger Bag", 45.0, 1, 45.0),
            row("Ingrid Running Jacket", 84.0, 1, 84.0),
        ],
        grand_total: 152.0,
    };
    // Off by 5.00, far beyond the total tolerance.
    let err = tracker
        .verify(&snapshot, &VerificationSettings::default())
        .unwrap_err();
    assert_eq!(err.problems.len(), 1);

    let exact = CartSnapshot {
        grand_total: 147.0,
        ..snapshot
    };
    let report = tracker
        .verify(&exact, &VerificationSettings::default())
        .unwrap();
    assert_eq!(report.distinct_items, 3);
    assert_eq!(report.total_quantity, 3);
}
