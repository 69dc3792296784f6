use crate::condition::{Condition, ConditionError, Evaluator};
use crate::driver::Driver;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::debug;
use vigil_common::config::WaitSettings;

/// A point on the monotonic clock after which a wait gives up.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Met,
    TimedOut,
}

impl WaitOutcome {
    pub fn is_met(self) -> bool {
        self == WaitOutcome::Met
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaitError {
    #[error("Timed out after {waited:?} waiting for {condition}")]
    Timeout { condition: String, waited: Duration },
    #[error(transparent)]
    Condition(#[from] ConditionError),
}

/// Polls conditions until they hold or a deadline passes.
#[derive(Debug, Clone)]
pub struct Waiter {
    settings: WaitSettings,
    evaluator: Evaluator,
}

impl Waiter {
    pub fn new(settings: WaitSettings) -> Self {
        Self {
            settings,
            evaluator: Evaluator::new(),
        }
    }

    pub fn settings(&self) -> &WaitSettings {
        &self.settings
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn default_deadline(&self) -> Deadline {
        Deadline::after(self.settings.default_timeout())
    }

    /// Shorter budget for signals that may never appear.
    pub fn optional_deadline(&self) -> Deadline {
        Deadline::after(self.settings.optional_timeout())
    }

    /// Run `check` until it reports `true` or the deadline passes. The check
    /// always runs at least once, even on an expired deadline.
    pub async fn poll<F, Fut>(
        &self,
        deadline: Deadline,
        mut check: F,
    ) -> Result<WaitOutcome, ConditionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, ConditionError>>,
    {
        loop {
            if check().await? {
                return Ok(WaitOutcome::Met);
            }
            let remaining = deadline.remaining();
            if remaining.is_zero() {
                return Ok(WaitOutcome::TimedOut);
            }
            sleep(remaining.min(self.settings.poll_interval())).await;
        }
    }

    pub async fn await_condition<D: Driver>(
        &self,
        driver: &D,
        condition: &Condition,
        deadline: Deadline,
    ) -> Result<WaitOutcome, ConditionError> {
        debug!("Waiting up to {:?} for {}", deadline.budget(), condition);
        let outcome = self
            .poll(deadline, || self.evaluator.evaluate(driver, condition))
            .await?;
        debug!("Wait for {} finished: {:?}", condition, outcome);
        Ok(outcome)
    }

    pub async fn until<D: Driver>(
        &self,
        driver: &D,
        condition: &Condition,
    ) -> Result<WaitOutcome, ConditionError> {
        self.await_condition(driver, condition, self.default_deadline())
            .await
    }

    pub async fn until_optional<D: Driver>(
        &self,
        driver: &D,
        condition: &Condition,
    ) -> Result<WaitOutcome, ConditionError> {
        self.await_condition(driver, condition, self.optional_deadline())
            .await
    }

    /// Like [`Waiter::await_condition`], but a timeout is an error.
    pub async fn require<D: Driver>(
        &self,
        driver: &D,
        condition: &Condition,
        deadline: Deadline,
    ) -> Result<(), WaitError> {
        match self.await_condition(driver, condition, deadline).await? {
            WaitOutcome::Met => Ok(()),
            WaitOutcome::TimedOut => Err(WaitError::Timeout {
                condition: condition.to_string(),
                waited: deadline.budget(),
            }),
        }
    }

    /// Wait until a previously resolved element is detached from the page.
    pub async fn until_stale<D: Driver>(
        &self,
        driver: &D,
        element: &D::Element,
        deadline: Deadline,
    ) -> Result<WaitOutcome, ConditionError> {
        self.poll(deadline, || async move {
            match driver.is_visible(element).await {
                Ok(_) => Ok(false),
                Err(e) if e.is_absence() => Ok(true),
                Err(source) => Err(ConditionError::Unexpected {
                    condition: "element to go stale".to_string(),
                    source,
                }),
            }
        })
        .await
    }

    /// Debounce for widgets that react to input asynchronously.
    pub async fn settle(&self) {
        sleep(self.settings.settle_delay()).await;
    }
}
