use crate::condition::{Condition, ConditionError};
use crate::driver::Driver;
use crate::wait::{Deadline, WaitOutcome, Waiter};
use thiserror::Error;
use tracing::{debug, info};
use vigil_common::config::VerificationSettings;
use vigil_common::parse::within_tolerance;
use vigil_common::{ActionOutcome, BusinessError, Locator};

/// One product the test believes is in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedItem {
    pub key: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// One cart row as rendered by the storefront.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedItem {
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub subtotal: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
    pub rows: Vec<ObservedItem>,
    pub grand_total: f64,
}

/// The header badge that mirrors the cart size.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterSignals {
    /// Badge holding the number.
    pub number: Locator,
    /// Marker rendered only when the cart is empty.
    pub empty_marker: Locator,
}

impl CounterSignals {
    /// Condition meaning "the badge shows `count`". Zero is rendered as a
    /// hidden badge or an explicit empty marker rather than as "0".
    pub fn showing(&self, count: u32) -> Condition {
        if count == 0 {
            Condition::Any(vec![
                Condition::present(self.empty_marker.clone()),
                Condition::hidden(self.number.clone()),
            ])
        } else {
            Condition::All(vec![
                Condition::visible(self.number.clone()),
                Condition::text_equals(self.number.clone(), count.to_string()),
            ])
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    #[error("Not recording '{key}': action {outcome}")]
    ActionNotConfirmed { key: String, outcome: ActionOutcome },
    #[error("Not recording '{key}': {source}")]
    Rejected { key: String, source: BusinessError },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Cart verification failed: {}", .problems.join("; "))]
pub struct CartMismatch {
    pub problems: Vec<String>,
}

/// Summary of a cart that passed verification.
#[derive(Debug, Clone, PartialEq)]
pub struct CartReport {
    pub distinct_items: usize,
    pub total_quantity: u32,
    pub computed_total: f64,
    pub grand_total: f64,
}

/// Test-side model of the cart.
///
/// Only confirmed additions are recorded, so the expected count never runs
/// ahead of what the storefront accepted.
#[derive(Debug, Clone, Default)]
pub struct CartTracker {
    items: Vec<ExpectedItem>,
    expected_count: u32,
}

impl CartTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ExpectedItem] {
        &self.items
    }

    pub fn expected_count(&self) -> u32 {
        self.expected_count
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.key.eq_ignore_ascii_case(key.trim()))
    }

    /// Record one unit of `key`. A repeated key bumps its quantity.
    pub fn record_add(&mut self, key: &str, unit_price: f64) {
        match self.position(key) {
            Some(i) => self.items[i].quantity += 1,
            None => self.items.push(ExpectedItem {
                key: key.trim().to_string(),
                quantity: 1,
                unit_price,
            }),
        }
        self.expected_count += 1;
        info!(
            "Recorded '{}' at {:.2}, expecting {} item(s) in cart",
            key.trim(),
            unit_price,
            self.expected_count
        );
    }

    /// Record only if the action succeeded and the storefront raised nothing.
    pub fn record_confirmed(
        &mut self,
        key: &str,
        unit_price: f64,
        outcome: &ActionOutcome,
        banner: Option<BusinessError>,
    ) -> Result<(), TrackerError> {
        if !outcome.is_success() {
            return Err(TrackerError::ActionNotConfirmed {
                key: key.to_string(),
                outcome: outcome.clone(),
            });
        }
        if let Some(source) = banner {
            return Err(TrackerError::Rejected {
                key: key.to_string(),
                source,
            });
        }
        self.record_add(key, unit_price);
        Ok(())
    }

    /// Wait for the header badge to show the expected count.
    pub async fn await_count_sync<D: Driver>(
        &self,
        waiter: &Waiter,
        driver: &D,
        counter: &CounterSignals,
    ) -> Result<WaitOutcome, ConditionError> {
        let deadline = Deadline::after(waiter.settings().count_sync_timeout());
        waiter
            .await_condition(driver, &counter.showing(self.expected_count), deadline)
            .await
    }

    /// Compare the rendered cart against the model.
    pub fn verify(
        &self,
        observed: &CartSnapshot,
        tolerances: &VerificationSettings,
    ) -> Result<CartReport, CartMismatch> {
        let mut problems = Vec::new();

        if observed.rows.len() != self.items.len() {
            problems.push(format!(
                "expected {} distinct item(s), cart shows {}",
                self.items.len(),
                observed.rows.len()
            ));
        }
        let total_quantity: u32 = observed.rows.iter().map(|r| r.quantity).sum();
        if total_quantity != self.expected_count {
            problems.push(format!(
                "expected total quantity {}, cart shows {}",
                self.expected_count, total_quantity
            ));
        }

        for expected in &self.items {
            let Some(row) = observed
                .rows
                .iter()
                .find(|r| r.name.trim().eq_ignore_ascii_case(&expected.key))
            else {
                problems.push(format!("'{}' missing from cart", expected.key));
                continue;
            };
            if row.quantity != expected.quantity {
                problems.push(format!(
                    "'{}' quantity {} != expected {}",
                    expected.key, row.quantity, expected.quantity
                ));
            }
            if !within_tolerance(row.unit_price, expected.unit_price, tolerances.price_tolerance) {
                problems.push(format!(
                    "'{}' price {:.2} != expected {:.2}",
                    expected.key, row.unit_price, expected.unit_price
                ));
            }
        }

        for row in &observed.rows {
            let line_total = row.unit_price * row.quantity as f64;
            if !within_tolerance(row.subtotal, line_total, tolerances.price_tolerance) {
                problems.push(format!(
                    "'{}' subtotal {:.2} != {:.2} x {}",
                    row.name, row.subtotal, row.unit_price, row.quantity
                ));
            }
        }

        let computed_total: f64 = observed.rows.iter().map(|r| r.subtotal).sum();
        if !within_tolerance(observed.grand_total, computed_total, tolerances.total_tolerance) {
            problems.push(format!(
                "grand total {:.2} != sum of subtotals {:.2}",
                observed.grand_total, computed_total
            ));
        }

        if !problems.is_empty() {
            return Err(CartMismatch { problems });
        }
        debug!("Cart matches: {} item(s), total {:.2}", total_quantity, computed_total);
        Ok(CartReport {
            distinct_items: observed.rows.len(),
            total_quantity,
            computed_total,
            grand_total: observed.grand_total,
        })
    }
}
