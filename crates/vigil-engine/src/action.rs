use crate::condition::Condition;
use crate::driver::{Driver, DriverError, last_known_url};
use crate::wait::{WaitOutcome, Waiter};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};
use vigil_common::config::{ActionSettings, SecuritySettings};
use vigil_common::{ActionOutcome, Locator, PermanentKind, TransientKind};

const REDACTED: &str = "******";

/// A logical user action against a locator.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    Click,
    /// Replace the field's content with the text.
    Type(String),
    /// Pick the option with this visible text from a `<select>`.
    Select(String),
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Click => write!(f, "click"),
            ActionKind::Type(_) => write!(f, "type"),
            ActionKind::Select(option) => write!(f, "select '{}'", option),
        }
    }
}

/// A non-successful outcome escalated to an error, with context.
#[derive(Debug, Clone, Error)]
#[error("{action} on {target} failed: {outcome} (url: {url})")]
pub struct ActionError {
    pub action: String,
    pub target: String,
    pub url: String,
    pub outcome: ActionOutcome,
}

/// One state of the per-action retry machine. Every path ends in `Finished`
/// within `max_attempts` resolutions and at most one fallback activation.
enum Step<E> {
    AwaitActionable { attempt: u32 },
    Invoke { attempt: u32, element: E },
    Fallback { element: E, interception: String },
    Finished(ActionOutcome),
}

/// Performs actions with bounded recovery from stale and obscured targets.
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    waiter: Waiter,
    max_attempts: u32,
    fallback_activation: bool,
    security: SecuritySettings,
}

impl ActionExecutor {
    pub fn new(waiter: Waiter, settings: &ActionSettings, security: SecuritySettings) -> Self {
        Self {
            waiter,
            max_attempts: settings.max_attempts.max(1),
            fallback_activation: settings.fallback_activation,
            security,
        }
    }

    pub async fn click<D: Driver>(&self, driver: &D, target: &Locator) -> ActionOutcome {
        self.perform(driver, &ActionKind::Click, target).await
    }

    pub async fn type_text<D: Driver>(
        &self,
        driver: &D,
        target: &Locator,
        text: &str,
    ) -> ActionOutcome {
        self.perform(driver, &ActionKind::Type(text.to_string()), target)
            .await
    }

    pub async fn select<D: Driver>(
        &self,
        driver: &D,
        target: &Locator,
        option: &str,
    ) -> ActionOutcome {
        self.perform(driver, &ActionKind::Select(option.to_string()), target)
            .await
    }

    /// Perform the action and escalate anything but success to an error.
    pub async fn run<D: Driver>(
        &self,
        driver: &D,
        kind: &ActionKind,
        target: &Locator,
    ) -> Result<(), ActionError> {
        let outcome = self.perform(driver, kind, target).await;
        self.escalate(driver, kind, target, outcome).await
    }

    pub async fn escalate<D: Driver>(
        &self,
        driver: &D,
        kind: &ActionKind,
        target: &Locator,
        outcome: ActionOutcome,
    ) -> Result<(), ActionError> {
        if outcome.is_success() {
            return Ok(());
        }
        Err(ActionError {
            action: kind.to_string(),
            target: target.to_string(),
            url: last_known_url(driver).await,
            outcome,
        })
    }

    pub async fn perform<D: Driver>(
        &self,
        driver: &D,
        kind: &ActionKind,
        target: &Locator,
    ) -> ActionOutcome {
        match kind {
            ActionKind::Type(text) => {
                let shown = if self.security.is_sensitive(&target.to_string()) {
                    REDACTED
                } else {
                    text.as_str()
                };
                info!("Typing '{}' into {}", shown, target);
            }
            _ => info!("Performing {} on {}", kind, target),
        }

        let mut step = Step::AwaitActionable { attempt: 1 };
        loop {
            step = match step {
                Step::AwaitActionable { attempt } => {
                    self.await_actionable(driver, kind, target, attempt).await
                }
                Step::Invoke { attempt, element } => {
                    self.invoke(driver, kind, target, attempt, element).await
                }
                Step::Fallback {
                    element,
                    interception,
                } => match driver.activate_fallback(&element).await {
                    Ok(()) => {
                        info!("Fallback activation succeeded on {}", target);
                        Step::Finished(ActionOutcome::Succeeded)
                    }
                    Err(e) => {
                        warn!("Fallback activation on {} failed: {}", target, e);
                        Step::Finished(ActionOutcome::TransientFailure(
                            TransientKind::TargetTemporarilyObscured(interception),
                        ))
                    }
                },
                Step::Finished(outcome) => {
                    if outcome.is_success() {
                        debug!("{} on {} succeeded", kind, target);
                    } else {
                        warn!("{} on {} ended with {}", kind, target, outcome);
                    }
                    return outcome;
                }
            };
        }
    }

    async fn await_actionable<D: Driver>(
        &self,
        driver: &D,
        kind: &ActionKind,
        target: &Locator,
        attempt: u32,
    ) -> Step<D::Element> {
        let ready = match kind {
            ActionKind::Type(_) => Condition::visible(target.clone()),
            ActionKind::Click | ActionKind::Select(_) => Condition::clickable(target.clone()),
        };
        match self.waiter.until(driver, &ready).await {
            Ok(WaitOutcome::Met) => {}
            Ok(WaitOutcome::TimedOut) => {
                return Step::Finished(ActionOutcome::PermanentFailure(
                    PermanentKind::TargetNotFoundAfterDeadline,
                ));
            }
            Err(e) => return Step::Finished(unexpected(e)),
        }

        match self.resolve(driver, kind, target).await {
            Ok(element) => Step::Invoke { attempt, element },
            Err(e) if e.is_absence() => self.after_stale(target, attempt),
            Err(e) => Step::Finished(unexpected(e)),
        }
    }

    /// Fresh handle for this attempt. Select resolves to the option element.
    async fn resolve<D: Driver>(
        &self,
        driver: &D,
        kind: &ActionKind,
        target: &Locator,
    ) -> Result<D::Element, DriverError> {
        let element = driver.find_element(target).await?;
        let ActionKind::Select(wanted) = kind else {
            return Ok(element);
        };
        let options = driver
            .find_all_within(&element, &Locator::css("option"))
            .await?;
        for option in options {
            let text = driver.text(&option).await?;
            if text.trim().eq_ignore_ascii_case(wanted.trim()) {
                return Ok(option);
            }
        }
        Err(DriverError::Other(format!(
            "No option '{}' in {}",
            wanted, target
        )))
    }

    async fn invoke<D: Driver>(
        &self,
        driver: &D,
        kind: &ActionKind,
        target: &Locator,
        attempt: u32,
        element: D::Element,
    ) -> Step<D::Element> {
        let result = match kind {
            ActionKind::Click | ActionKind::Select(_) => driver.click(&element).await,
            ActionKind::Type(text) => match driver.clear(&element).await {
                Ok(()) => driver.send_keys(&element, text).await,
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(()) => Step::Finished(ActionOutcome::Succeeded),
            Err(DriverError::Stale) | Err(DriverError::NotFound { .. }) => {
                self.after_stale(target, attempt)
            }
            Err(DriverError::Intercepted(message)) => {
                if self.fallback_activation && !matches!(kind, ActionKind::Type(_)) {
                    warn!(
                        "{} on {} intercepted, trying fallback activation: {}",
                        kind, target, message
                    );
                    Step::Fallback {
                        element,
                        interception: message,
                    }
                } else {
                    Step::Finished(ActionOutcome::TransientFailure(
                        TransientKind::TargetTemporarilyObscured(message),
                    ))
                }
            }
            Err(e) => Step::Finished(unexpected(e)),
        }
    }

    fn after_stale<E>(&self, target: &Locator, attempt: u32) -> Step<E> {
        if attempt < self.max_attempts {
            warn!(
                "Target {} went stale, retrying (attempt {})",
                target,
                attempt + 1
            );
            Step::AwaitActionable {
                attempt: attempt + 1,
            }
        } else {
            Step::Finished(ActionOutcome::TransientFailure(
                TransientKind::TargetBecameStale,
            ))
        }
    }
}

fn unexpected(err: impl ToString) -> ActionOutcome {
    ActionOutcome::PermanentFailure(PermanentKind::UnexpectedException(err.to_string()))
}
