use crate::condition::Condition;
use crate::driver::{Driver, DriverError};
use crate::wait::{WaitOutcome, Waiter};
use tracing::{debug, warn};
use vigil_common::{BusinessError, Locator};

/// Look for a storefront error banner after an action.
///
/// Waits up to the optional deadline for any of `banners` to become visible,
/// then classifies the first visible one with text. `None` means no banner
/// showed up, which is the normal case.
pub async fn detect_business_error<D: Driver>(
    waiter: &Waiter,
    driver: &D,
    banners: &[Locator],
) -> Result<Option<BusinessError>, DriverError> {
    if banners.is_empty() {
        return Ok(None);
    }
    let any_banner = Condition::Any(banners.iter().cloned().map(Condition::visible).collect());
    match waiter
        .until_optional(driver, &any_banner)
        .await
        .map_err(|e| e.into_driver_error())?
    {
        WaitOutcome::Met => {}
        WaitOutcome::TimedOut => {
            debug!("No error banner appeared");
            return Ok(None);
        }
    }

    for banner in banners {
        let element = match driver.find_element(banner).await {
            Ok(e) => e,
            Err(e) if e.is_absence() => continue,
            Err(e) => return Err(e),
        };
        let shown = match driver.is_visible(&element).await {
            Ok(v) => v,
            Err(e) if e.is_absence() => false,
            Err(e) => return Err(e),
        };
        if !shown {
            continue;
        }
        let text = match driver.text(&element).await {
            Ok(t) => t,
            Err(e) if e.is_absence() => continue,
            Err(e) => return Err(e),
        };
        if text.trim().is_empty() {
            continue;
        }
        let err = BusinessError::classify(&text);
        warn!("Storefront reported: {}", err);
        return Ok(Some(err));
    }
    Ok(None)
}

/// Inline validation message attached to a form field, if one is shown.
pub async fn field_validation<D: Driver>(
    waiter: &Waiter,
    driver: &D,
    field: &str,
    message_locator: &Locator,
) -> Result<Option<BusinessError>, DriverError> {
    let shown = Condition::visible(message_locator.clone());
    match waiter
        .until_optional(driver, &shown)
        .await
        .map_err(|e| e.into_driver_error())?
    {
        WaitOutcome::TimedOut => Ok(None),
        WaitOutcome::Met => {
            let text = match driver.find_element(message_locator).await {
                Ok(e) => match driver.text(&e).await {
                    Ok(text) => text,
                    Err(e) if e.is_absence() => return Ok(None),
                    Err(e) => return Err(e),
                },
                Err(e) if e.is_absence() => return Ok(None),
                Err(e) => return Err(e),
            };
            Ok(Some(BusinessError::Validation {
                field: field.to_string(),
                message: text.trim().to_string(),
            }))
        }
    }
}
