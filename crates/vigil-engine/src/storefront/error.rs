use crate::action::ActionError;
use crate::condition::ConditionError;
use crate::driver::{Driver, last_known_url};
use crate::page::NavigationError;
use crate::tracker::{CartMismatch, TrackerError};
use crate::wait::WaitError;
use thiserror::Error;
use vigil_common::{BusinessError, DriverError};

/// Why a storefront step failed.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Business(#[from] BusinessError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Condition(#[from] ConditionError),
    #[error(transparent)]
    Wait(#[from] WaitError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Cart(#[from] CartMismatch),
    #[error("Cart badge never showed {expected} (shows {observed}, url: {url})")]
    CountNotSynced {
        expected: u32,
        observed: u32,
        url: String,
    },
    #[error("Check failed: {0}")]
    Assertion(String),
    /// A failure raised without page context, tagged with the step that
    /// was running and where the browser was.
    #[error("{action} failed: {source} (url: {url})")]
    InStep {
        action: String,
        url: String,
        source: Box<StepError>,
    },
}

impl StepError {
    /// Failures reported by the storefront rather than by the automation.
    pub fn is_business(&self) -> bool {
        matches!(
            self.root(),
            StepError::Business(_) | StepError::Tracker(TrackerError::Rejected { .. })
        )
    }

    /// The failure underneath any step tagging.
    pub fn root(&self) -> &StepError {
        match self {
            StepError::InStep { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the error already names the page it happened on.
    fn has_context(&self) -> bool {
        matches!(
            self,
            StepError::Action(_)
                | StepError::Navigation(_)
                | StepError::CountNotSynced { .. }
                | StepError::InStep { .. }
        )
    }

    /// Tag the error with `action` and the last known URL, unless it
    /// already carries both.
    pub async fn in_step<D: Driver>(self, action: impl Into<String>, driver: &D) -> Self {
        if self.has_context() {
            return self;
        }
        StepError::InStep {
            action: action.into(),
            url: last_known_url(driver).await,
            source: Box::new(self),
        }
    }
}
