use thiserror::Error;

/// Signals raised by the browser driver.
///
/// `NotFound`, `Stale` and `Intercepted` are the transient signals the engine
/// knows how to recover from. Everything else is `Other` and is never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriverError {
    #[error("No element found for {locator}")]
    NotFound { locator: String },

    #[error("Element reference is stale")]
    Stale,

    #[error("Click intercepted: {0}")]
    Intercepted(String),

    #[error("Driver session is not ready")]
    NotReady,

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Driver error: {0}")]
    Other(String),
}

impl DriverError {
    pub fn not_found(locator: impl ToString) -> Self {
        DriverError::NotFound {
            locator: locator.to_string(),
        }
    }

    /// True for signals that mean "the element is not there right now".
    pub fn is_absence(&self) -> bool {
        matches!(self, DriverError::NotFound { .. } | DriverError::Stale)
    }
}

/// A failure reported by the storefront itself (banners, form validation).
///
/// These are not automation bugs: they fail the workflow assertion, not the
/// plumbing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BusinessError {
    #[error("Requested quantity is not available: {0}")]
    QuantityUnavailable(String),

    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Storefront reported an error: {0}")]
    Other(String),
}

impl BusinessError {
    /// Classify a banner text into a business error.
    pub fn classify(text: &str) -> Self {
        let text = text.trim().to_string();
        let lowered = text.to_lowercase();
        if lowered.contains("requested qty is not available")
            || lowered.contains("quantity is not available")
        {
            BusinessError::QuantityUnavailable(text)
        } else if lowered.contains("already an account") {
            BusinessError::DuplicateAccount(text)
        } else {
            BusinessError::Other(text)
        }
    }

    /// The on-page text that produced this error.
    pub fn message(&self) -> &str {
        match self {
            BusinessError::QuantityUnavailable(m)
            | BusinessError::DuplicateAccount(m)
            | BusinessError::Other(m) => m,
            BusinessError::Validation { message, .. } => message,
        }
    }
}
