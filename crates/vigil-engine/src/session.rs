use crate::driver::Driver;
use futures::FutureExt;
use std::future::Future;
use std::panic::{AssertUnwindSafe, resume_unwind};
use tracing::{info, warn};

/// Run `body` with a browser session and end the session afterwards.
///
/// The driver is quit whether the body returns, fails or panics. A failure
/// to quit is logged and never masks the body's own result.
pub async fn scoped<D, F, Fut, T>(driver: D, body: F) -> T
where
    D: Driver + Clone,
    F: FnOnce(D) -> Fut,
    Fut: Future<Output = T>,
{
    let session = driver.clone();
    let outcome = AssertUnwindSafe(async move { body(session).await })
        .catch_unwind()
        .await;

    match driver.quit().await {
        Ok(()) => info!("Browser session closed"),
        Err(e) => warn!("Failed to close browser session: {}", e),
    }

    match outcome {
        Ok(value) => value,
        Err(panic) => resume_unwind(panic),
    }
}
